//! Turns calls into lines of the graph description language.
//!
//! An [`Emitter`] writes into any [`Write`]: a renderer's stdin in a
//! [`Session`](super::Session), or a plain buffer.
//!
//! The first line it writes is always preceded by the header (`strict`, if
//! asked, then `digraph{` or `graph{`). [`Emitter::close`] writes the closing
//! brace and lets go of the writer; everything after that fails.

use std::fmt;
use std::io::{self, Write};

use crate::graphics::{GraphKind, NodeShape, RankDirection};
use crate::names::NodeId;

use super::diagnostics::{Diagnostics, Silent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing written yet, not even the header.
    Unopened,
    /// The header is out; statements may follow.
    Open,
    /// The closing brace is out and the writer is gone.
    Closed,
}

#[derive(derive_more::Debug)]
pub struct Emitter<W> {
    #[debug(skip)]
    out:         Option<W>,
    kind:        GraphKind,
    strict:      bool,
    state:       State,
    debug:       bool,
    #[debug(skip)]
    diagnostics: Box<dyn Diagnostics>,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W, kind: GraphKind, strict: bool) -> Self {
        Self {
            out: Some(out),
            kind,
            strict,
            state: State::Unopened,
            debug: false,
            diagnostics: Box::new(Silent),
        }
    }

    /// Echo every emitted line to the diagnostics sink.
    pub fn with_debug(self, debug: bool) -> Self {
        Self { debug, ..self }
    }

    pub fn with_diagnostics(self, diagnostics: Box<dyn Diagnostics>) -> Self {
        Self {
            diagnostics,
            ..self
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn set_link(&mut self, from: &str, to: &str) -> io::Result<()> {
        let (from, to) = (NodeId::new(from), NodeId::new(to));
        let connector = self.kind.connector();
        self.emit(format_args!("{from} {connector} {to}"))
    }

    pub fn set_label(&mut self, node: &str, label: &str) -> io::Result<()> {
        let node = NodeId::new(node);
        self.emit(format_args!(r#"{node} [label="{label}"]"#))
    }

    pub fn set_node_shape(&mut self, node: &str, shape: NodeShape) -> io::Result<()> {
        let node = NodeId::new(node);
        self.emit(format_args!(r#"{node} [shape="{shape}"]"#))
    }

    pub fn set_node_sep(&mut self, value: f64) -> io::Result<()> {
        self.emit(format_args!("nodesep={value:.6}"))
    }

    pub fn set_rank_sep(&mut self, value: f64) -> io::Result<()> {
        self.emit(format_args!("ranksep={value:.6}"))
    }

    pub fn set_rank_dir(&mut self, direction: RankDirection) -> io::Result<()> {
        self.emit(format_args!("rankdir={direction}"))
    }

    /// Sets the weight of the edges drawn from now on.
    pub fn set_edge_weight(&mut self, value: f64) -> io::Result<()> {
        self.emit(format_args!("edge [weight={value:.6}];"))
    }

    pub fn create_cluster<S: AsRef<str>>(&mut self, name: &str, nodes: &[S]) -> io::Result<()> {
        let nodes = nodes
            .iter()
            .map(|node| NodeId::new(node.as_ref()))
            .collect::<Vec<_>>();
        self.diagnostics.cluster(name, &nodes);

        let members = nodes
            .iter()
            .map(NodeId::as_str)
            .collect::<Vec<_>>()
            .join(";");
        self.emit(format_args!(
            r#"subgraph cluster_{name} {{label="{name}";{members}}}"#
        ))
    }

    /// Writes the closing brace, flushes and drops the writer.
    ///
    /// The emitter is [`State::Closed`] afterwards even if writing failed.
    pub fn close(&mut self) -> io::Result<()> {
        let outcome = self
            .emit(format_args!("}}"))
            .and_then(|()| self.out.as_mut().ok_or_else(closed)?.flush());
        self.state = State::Closed;
        self.out = None;
        outcome
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) -> io::Result<()> {
        match self.state {
            State::Closed => return Err(closed()),
            State::Open => (),
            State::Unopened => {
                self.state = State::Open;
                if self.strict {
                    self.write_line(format_args!("strict"))?;
                }
                let kind = self.kind;
                self.write_line(format_args!("{kind}{{"))?;
            },
        }
        self.write_line(line)
    }

    fn write_line(&mut self, line: fmt::Arguments<'_>) -> io::Result<()> {
        let line = line.to_string();
        if self.debug {
            self.diagnostics.emitted(&line);
        }

        let out = self.out.as_mut().ok_or_else(closed)?;
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")
    }
}

pub(crate) fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "session is closed")
}
