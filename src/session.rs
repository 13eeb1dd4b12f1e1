//! A [`Session`] is one running renderer plus the graph being streamed into it.
//!
//! Every `set_*`/`create_*` call writes one line into the renderer's stdin
//! right away; nothing is buffered on our side and nothing is ever taken back.
//! [`Session::close`] finishes the graph and waits for the renderer to exit.
//!
//! ```no_run
//! use dotter::graphics::{GraphKind, OutputFormat};
//! use dotter::session::Session;
//!
//! let mut session = Session::new(OutputFormat::Svg, GraphKind::Directed, Some("deps.svg".into()))?;
//! session.set_link("app", "lib")?;
//! session.set_label("app", "Application")?;
//! session.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ExitStatus};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::graphics::{GraphKind, NodeShape, RankDirection};

pub mod diagnostics;
mod emitter;
mod launch;
mod search;

pub use diagnostics::Diagnostics;
pub use emitter::{Emitter, State};
pub use launch::{Destination, LaunchError, SessionConfig};

#[derive(Debug, thiserror::Error)]
pub enum CloseError {
    #[error("io: {}", _0)]
    Io(#[source] io::Error),

    #[error("renderer failed: {}", _0)]
    Exit(ExitStatus),

    #[error("relaying renderer output: {}", _0)]
    Relay(#[source] io::Error),

    #[error("relay thread panicked")]
    RelayPanicked,
}

#[derive(Debug)]
pub struct Session {
    executable: PathBuf,
    child:      Child,
    emitter:    Emitter<ChildStdin>,
    relay:      Option<JoinHandle<io::Result<u64>>>,
}

impl Session {
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn state(&self) -> State {
        self.emitter.state()
    }

    pub fn kind(&self) -> GraphKind {
        self.emitter.kind()
    }

    pub fn is_strict(&self) -> bool {
        self.emitter.is_strict()
    }

    pub(crate) fn emitter_mut(&mut self) -> &mut Emitter<ChildStdin> {
        &mut self.emitter
    }

    pub fn set_link(&mut self, from: &str, to: &str) -> io::Result<()> {
        self.emitter.set_link(from, to)
    }

    pub fn set_label(&mut self, node: &str, label: &str) -> io::Result<()> {
        self.emitter.set_label(node, label)
    }

    pub fn set_node_shape(&mut self, node: &str, shape: NodeShape) -> io::Result<()> {
        self.emitter.set_node_shape(node, shape)
    }

    pub fn set_node_sep(&mut self, value: f64) -> io::Result<()> {
        self.emitter.set_node_sep(value)
    }

    pub fn set_rank_sep(&mut self, value: f64) -> io::Result<()> {
        self.emitter.set_rank_sep(value)
    }

    pub fn set_rank_dir(&mut self, direction: RankDirection) -> io::Result<()> {
        self.emitter.set_rank_dir(direction)
    }

    /// Sets the weight of the edges drawn from now on.
    pub fn set_edge_weight(&mut self, value: f64) -> io::Result<()> {
        self.emitter.set_edge_weight(value)
    }

    pub fn create_cluster<S: AsRef<str>>(&mut self, name: &str, nodes: &[S]) -> io::Result<()> {
        self.emitter.create_cluster(name, nodes)
    }

    /// Finishes the graph, closes the renderer's stdin and waits for it to exit.
    ///
    /// There is no timeout. If the renderer exits unsuccessfully that is
    /// reported over any error writing the closing line.
    pub fn close(&mut self) -> Result<(), CloseError> {
        if self.emitter.state() == State::Closed {
            return Err(CloseError::Io(emitter::closed()));
        }

        let closing = self.emitter.close();
        let status = self.child.wait();
        if let Ok(status) = &status {
            debug!("{:?} exited: {}", self.executable, status);
        }

        // The relay ends once the renderer's stdout is gone, so it is joined
        // whatever the wait returned.
        let relayed = self.relay.take().map(JoinHandle::join);

        settle(closing, status, relayed)
    }
}

type Relayed = thread::Result<io::Result<u64>>;

fn settle(
    closing: io::Result<()>,
    status: io::Result<ExitStatus>,
    relayed: Option<Relayed>,
) -> Result<(), CloseError> {
    let status = status.map_err(CloseError::Io)?;
    if !status.success() {
        return Err(CloseError::Exit(status));
    }
    closing.map_err(CloseError::Io)?;
    match relayed {
        Some(Err(_)) => Err(CloseError::RelayPanicked),
        Some(Ok(Err(reason))) => Err(CloseError::Relay(reason)),
        Some(Ok(Ok(_))) | None => Ok(()),
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.emitter.state() != State::Closed {
            warn!(
                "session with {:?} (pid {}) dropped without closing",
                self.executable,
                self.child.id()
            );
        }
    }
}
