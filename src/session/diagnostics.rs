use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::names::NodeId;

/// The marker put in front of every echoed line.
pub const MARKER: &str = "dot> ";

/// Receives a copy of what a [`Session`](super::Session) does, for a human to look at.
///
/// Nothing here is part of the protocol spoken to the renderer.
pub trait Diagnostics: Send {
    /// Called with every emitted line (without the trailing newline), when the
    /// session has `debug` turned on.
    fn emitted(&self, line: &str);

    /// Called whenever a cluster is created.
    fn cluster(&self, _name: &str, _nodes: &[NodeId]) {}
}

/// Drops everything. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Diagnostics for Silent {
    fn emitted(&self, _line: &str) {}
}

/// Forwards to `tracing` at the `DEBUG` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracing;

impl Diagnostics for Tracing {
    fn emitted(&self, line: &str) {
        debug!("{MARKER}{line}");
    }

    fn cluster(&self, name: &str, nodes: &[NodeId]) {
        debug!("creating cluster {name} with {nodes:?}");
    }
}

/// Keeps everything in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

impl Diagnostics for Recorder {
    fn emitted(&self, line: &str) {
        self.log.lock().push(format!("{MARKER}{line}"));
    }

    fn cluster(&self, name: &str, nodes: &[NodeId]) {
        let nodes = nodes
            .iter()
            .map(NodeId::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        self.log
            .lock()
            .push(format!("cluster {name}: [{nodes}]"));
    }
}
