//! Starting a renderer: [`SessionConfig`] says what to run and where its
//! output goes, [`Session::launch`] makes it so.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Deserializer};
use tracing::{debug, trace};

use crate::graphics::{GraphKind, OutputFormat, Program};

use super::diagnostics::{Diagnostics, Silent, Tracing};
use super::emitter::Emitter;
use super::{search, Session};

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("executable not found: {}", _0)]
    ExecutableNotFound(String),

    #[error("spawn: {}", _0)]
    Spawn(#[source] io::Error),
}

/// Where the renderer puts what it renders.
#[derive(derive_more::Debug, Default)]
pub enum Destination {
    /// A file named by the renderer itself (`-O`).
    #[default]
    AutoFile,
    /// The given file (`-o<path>`).
    File(PathBuf),
    /// The renderer's stdout, relayed to ours.
    Stdout,
    /// The renderer's stdout, relayed into the given writer.
    Writer(#[debug(skip)] Box<dyn Write + Send>),
}

impl Destination {
    fn is_stream(&self) -> bool {
        matches!(self, Self::Stdout | Self::Writer(_))
    }
}

impl From<Option<PathBuf>> for Destination {
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            None => Self::AutoFile,
            Some(path) if path == Path::new("-") => Self::Stdout,
            Some(path) => Self::File(path),
        }
    }
}

fn deserialize_destination<'de, D>(deserializer: D) -> Result<Destination, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<PathBuf>::deserialize(deserializer).map(Destination::from)
}

/// Everything needed to start a [`Session`].
///
/// Deserializable, so that a session can be described in a script:
/// ```yaml
/// format: png
/// program: neato
/// kind: undirected
/// strict: false
/// output: graph.png   # "-" for stdout, omit to let the renderer pick a name
/// ```
#[derive(derive_more::Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub format:  OutputFormat,
    pub program: Program,
    pub kind:    GraphKind,
    /// Duplicate edges are merged by the renderer.
    pub strict:  bool,
    #[serde(rename = "output", deserialize_with = "deserialize_destination")]
    pub destination: Destination,
    /// Echo every emitted line to the diagnostics sink.
    pub debug:   bool,

    /// Run this file instead of looking the program up.
    pub executable: Option<PathBuf>,

    /// Directories to look the program up in, instead of `PATH`.
    #[serde(skip)]
    pub search_path: Option<Vec<PathBuf>>,

    #[serde(skip)]
    #[debug(skip)]
    pub diagnostics: Option<Box<dyn Diagnostics>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            format:      Default::default(),
            program:     Default::default(),
            kind:        Default::default(),
            strict:      true,
            destination: Default::default(),
            debug:       false,
            executable:  None,
            search_path: None,
            diagnostics: None,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_format(self, format: OutputFormat) -> Self {
        Self { format, ..self }
    }

    pub fn with_program(self, program: Program) -> Self {
        Self { program, ..self }
    }

    pub fn with_kind(self, kind: GraphKind) -> Self {
        Self { kind, ..self }
    }

    pub fn strict(self, strict: bool) -> Self {
        Self { strict, ..self }
    }

    pub fn with_destination(self, destination: impl Into<Destination>) -> Self {
        Self {
            destination: destination.into(),
            ..self
        }
    }

    pub fn debug(self, debug: bool) -> Self {
        Self { debug, ..self }
    }

    pub fn with_executable(self, executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: Some(executable.into()),
            ..self
        }
    }

    pub fn with_search_path<I, P>(self, search_path: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_path: Some(search_path.into_iter().map(Into::into).collect()),
            ..self
        }
    }

    pub fn with_diagnostics(self, diagnostics: impl Diagnostics + 'static) -> Self {
        Self {
            diagnostics: Some(Box::new(diagnostics)),
            ..self
        }
    }

    /// The command-line arguments for the renderer.
    pub fn arguments(&self) -> Vec<String> {
        let mut args = vec![format!("-T{}", self.format)];
        match &self.destination {
            Destination::AutoFile => args.push("-O".into()),
            Destination::File(path) => args.push(format!("-o{}", path.display())),
            Destination::Stdout | Destination::Writer(_) => (),
        }
        args
    }
}

impl Session {
    /// Starts `dot` writing a strict graph to `file`, or to a file named by
    /// `dot` if there is none.
    pub fn new(
        format: OutputFormat,
        kind: GraphKind,
        file: Option<PathBuf>,
    ) -> Result<Self, LaunchError> {
        let config = SessionConfig::new()
            .with_format(format)
            .with_program(Program::Dot)
            .with_kind(kind)
            .strict(true)
            .with_destination(file.map_or(Destination::AutoFile, Destination::File));
        Self::launch(config)
    }

    pub fn launch(config: SessionConfig) -> Result<Self, LaunchError> {
        let executable = match &config.executable {
            Some(path) if search::is_executable(path) => path.clone(),
            Some(path) => return Err(LaunchError::ExecutableNotFound(path.display().to_string())),
            None => search::find_executable(config.program, config.search_path.as_deref())?,
        };
        let args = config.arguments();

        let SessionConfig {
            kind,
            strict,
            destination,
            debug,
            diagnostics,
            ..
        } = config;

        let mut command = Command::new(&executable);
        command
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(if destination.is_stream() {
                Stdio::piped()
            } else {
                Stdio::inherit()
            })
            .stderr(Stdio::inherit());

        debug!("launching {:?} {:?}", executable, args);
        let mut child = command.spawn().map_err(LaunchError::Spawn)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| LaunchError::Spawn(io::Error::other("renderer stdin is not piped")))?;
        let relay = match (destination, child.stdout.take()) {
            (Destination::Stdout, Some(stdout)) => Some(spawn_relay(stdout, io::stdout())),
            (Destination::Writer(writer), Some(stdout)) => Some(spawn_relay(stdout, writer)),
            _ => None,
        };

        let emitter = build_emitter(stdin, kind, strict, debug, diagnostics);

        Ok(Session {
            executable,
            child,
            emitter,
            relay,
        })
    }
}

/// Without an explicit sink, `debug` lines go to `tracing`.
fn build_emitter<W: Write>(
    out: W,
    kind: GraphKind,
    strict: bool,
    debug: bool,
    diagnostics: Option<Box<dyn Diagnostics>>,
) -> Emitter<W> {
    let diagnostics = diagnostics.unwrap_or_else(|| {
        if debug {
            Box::new(Tracing)
        } else {
            Box::new(Silent)
        }
    });
    Emitter::new(out, kind, strict)
        .with_debug(debug)
        .with_diagnostics(diagnostics)
}

/// Copies the renderer's output verbatim until it closes its end.
fn spawn_relay(
    mut from: ChildStdout,
    mut to: impl Write + Send + 'static,
) -> JoinHandle<io::Result<u64>> {
    thread::spawn(move || {
        let relayed = io::copy(&mut from, &mut to)?;
        to.flush()?;
        trace!("relayed {} bytes", relayed);
        Ok(relayed)
    })
}
