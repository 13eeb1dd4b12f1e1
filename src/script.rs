//! A session written down in advance.
//!
//! A [`Script`] is a [`SessionConfig`] and the list of [`Command`]s to send
//! once the renderer is up:
//!
//! ```yaml
//! session:
//!   format: svg
//!   kind: directed
//!   output: deps.svg
//! commands:
//!   - rank_dir: LR
//!   - link: [app, lib]
//!   - label: { node: app, label: Application }
//!   - shape: { node: lib, shape: folder }
//!   - cluster: { name: core, nodes: [lib, util] }
//! ```

use std::io::{self, Write};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::graphics::{NodeShape, RankDirection};
use crate::session::{CloseError, Emitter, LaunchError, Session, SessionConfig};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("io: {}", _0)]
    Io(#[source] io::Error),

    #[error("syntax: {}", _0)]
    Syntax(#[source] serde_yaml::Error),

    #[error("launch: {}", _0)]
    Launch(#[from] LaunchError),

    #[error("command #{index} {command:?}: {source}")]
    Emit {
        index:   usize,
        command: Command,
        #[source]
        source:  io::Error,
    },

    #[error("close: {}", _0)]
    Close(#[from] CloseError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub commands: Vec<CommandDef>,
}

/// One entry of `commands`: a single-key map naming the [`Command`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandDef {
    #[serde(flatten)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Link(String, String),
    Label { node: String, label: String },
    Shape { node: String, shape: NodeShape },
    NodeSep(f64),
    RankSep(f64),
    RankDir(RankDirection),
    EdgeWeight(f64),
    Cluster { name: String, nodes: Vec<String> },
}

impl Command {
    pub fn apply<W: Write>(&self, emitter: &mut Emitter<W>) -> io::Result<()> {
        match self {
            Self::Link(from, to) => emitter.set_link(from, to),
            Self::Label { node, label } => emitter.set_label(node, label),
            Self::Shape { node, shape } => emitter.set_node_shape(node, *shape),
            Self::NodeSep(value) => emitter.set_node_sep(*value),
            Self::RankSep(value) => emitter.set_rank_sep(*value),
            Self::RankDir(direction) => emitter.set_rank_dir(*direction),
            Self::EdgeWeight(value) => emitter.set_edge_weight(*value),
            Self::Cluster { name, nodes } => emitter.create_cluster(name, nodes.as_slice()),
        }
    }
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        serde_yaml::from_str(source).map_err(ScriptError::Syntax)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let source = std::fs::read_to_string(path).map_err(ScriptError::Io)?;
        Self::parse(&source)
    }

    /// Launches the renderer, sends every command, and closes the session.
    ///
    /// If a command cannot be sent the session is still closed, and the
    /// failed command is reported.
    pub fn run(self) -> Result<(), ScriptError> {
        let Script { session, commands } = self;
        let mut session = Session::launch(session)?;
        debug!(
            "running {} commands through {:?}",
            commands.len(),
            session.executable()
        );

        if let Err(failure) = send_all(&commands, session.emitter_mut()) {
            if let Err(reason) = session.close() {
                warn!("closing after a failed command: {}", reason);
            }
            return Err(failure);
        }

        session.close()?;
        Ok(())
    }

    /// Writes the graph description into `out` instead of a renderer.
    pub fn render_to<W: Write>(&self, out: W) -> Result<(), ScriptError> {
        let mut emitter = Emitter::new(out, self.session.kind, self.session.strict);
        send_all(&self.commands, &mut emitter)?;
        emitter.close().map_err(ScriptError::Io)
    }
}

fn send_all<W: Write>(
    commands: &[CommandDef],
    emitter: &mut Emitter<W>,
) -> Result<(), ScriptError> {
    for (index, CommandDef { command }) in commands.iter().enumerate() {
        command
            .apply(emitter)
            .map_err(|source| ScriptError::Emit {
                index,
                command: command.clone(),
                source,
            })?;
    }
    Ok(())
}
