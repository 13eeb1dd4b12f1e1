#![cfg(unix)]

//! These tests run a shell script in place of the renderer. The script records
//! its arguments next to itself, then does whatever the test asks of it.

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

use dotter::graphics::{GraphKind, NodeShape, OutputFormat, RankDirection};
use dotter::script::Script;
use dotter::session::diagnostics::Recorder;
use dotter::session::{CloseError, Destination, Session, SessionConfig, State};
use parking_lot::{Mutex, MutexGuard};
use test_case::test_case;

// Writing an executable while another thread forks may leave the file busy;
// the tests in this file take turns.
static SERIAL: Mutex<()> = parking_lot::const_mutex(());

struct Fixture {
    dir:     PathBuf,
    _serial: MutexGuard<'static, ()>,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let serial = SERIAL.lock();
        let dir = std::env::temp_dir()
            .join(format!("dotter-session-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create_dir_all");
        Self {
            dir,
            _serial: serial,
        }
    }

    fn renderer(&self, file_name: &str, body: &str) -> PathBuf {
        let path = self.dir.join(file_name);
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > \"$(dirname \"$0\")/args\"\n{body}\n"
        );
        fs::write(&path, script).expect("fs::write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("set_permissions");
        path
    }

    fn args(&self) -> Vec<String> {
        fs::read_to_string(self.dir.join("args"))
            .expect("read args")
            .lines()
            .map(String::from)
            .collect()
    }

    fn read(&self, file_name: &str) -> String {
        fs::read_to_string(self.dir.join(file_name)).expect("fs::read_to_string")
    }
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().clone()).expect("utf-8")
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn echoing(fixture: &Fixture, captured: &Captured) -> SessionConfig {
    SessionConfig::new()
        .with_executable(fixture.renderer("renderer", "exec cat"))
        .with_destination(Destination::Writer(Box::new(captured.clone())))
}

#[test]
fn streams_a_strict_digraph() {
    let fixture = Fixture::new("strict-digraph");
    let captured = Captured::default();
    let mut session = Session::launch(echoing(&fixture, &captured)).expect("launch");
    assert_eq!(session.state(), State::Unopened);

    session.set_link("a", "b").unwrap();
    session.set_label("a", "Start").unwrap();
    assert_eq!(session.state(), State::Open);
    session.close().expect("close");
    assert_eq!(session.state(), State::Closed);

    assert_eq!(
        captured.text(),
        "strict\ndigraph{\na -> b\na [label=\"Start\"]\n}\n"
    );
    assert_eq!(fixture.args(), ["-Tsvg"]);
}

#[test]
fn every_operation_reaches_the_renderer() {
    let fixture = Fixture::new("every-operation");
    let captured = Captured::default();
    let config = echoing(&fixture, &captured)
        .with_kind(GraphKind::Undirected)
        .strict(false);
    let mut session = Session::launch(config).expect("launch");

    session.set_rank_dir(RankDirection::RightLeft).unwrap();
    session.set_node_sep(0.5).unwrap();
    session.set_rank_sep(1.0).unwrap();
    session.set_edge_weight(4.0).unwrap();
    session.set_link("x.y", "z/w").unwrap();
    session.set_node_shape("x.y", NodeShape::Circle).unwrap();
    session.create_cluster("g1", &["x.y", "z/w"]).unwrap();
    session.close().expect("close");

    let text = captured.text();
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(
        lines,
        [
            "graph{",
            "rankdir=RL",
            "nodesep=0.500000",
            "ranksep=1.000000",
            "edge [weight=4.000000];",
            "xDOTy -- zSLASHw",
            "xDOTy [shape=\"circle\"]",
            "subgraph cluster_g1 {label=\"g1\";xDOTy;zSLASHw}",
            "}",
        ]
    );
}

#[test_case(Destination::AutoFile, &["-Tpng", "-O"]; "auto named file")]
#[test_case(Destination::File("graph.png".into()), &["-Tpng", "-ograph.png"]; "named file")]
fn file_destinations(destination: Destination, expected: &[&str]) {
    let fixture = Fixture::new("file-destination");
    let config = SessionConfig::new()
        .with_format(OutputFormat::Png)
        .with_executable(fixture.renderer("renderer", "cat > /dev/null"))
        .with_destination(destination);
    let mut session = Session::launch(config).expect("launch");
    session.set_link("a", "b").unwrap();
    session.close().expect("close");

    assert_eq!(fixture.args(), expected);
}

#[test]
fn program_is_looked_up_in_the_search_path() {
    let fixture = Fixture::new("search-path");
    let expected = fixture.renderer("dot", "cat > \"$(dirname \"$0\")/stdin\"");
    let config = SessionConfig::new().with_search_path([fixture.dir.clone()]);
    let mut session = Session::launch(config).expect("launch");
    assert_eq!(session.executable(), expected);

    session.set_link("a", "b").unwrap();
    session.close().expect("close");

    assert_eq!(fixture.read("stdin"), "strict\ndigraph{\na -> b\n}\n");
}

#[test]
fn stdout_destination_relays_through_the_process_stdout() {
    let fixture = Fixture::new("stdout");
    let renderer = fixture.renderer("renderer", "exec tee \"$(dirname \"$0\")/stdin\"");
    let config = SessionConfig::new()
        .with_executable(renderer)
        .with_destination(Destination::Stdout);
    let mut session = Session::launch(config).expect("launch");
    session.set_link("a", "b").unwrap();
    session.close().expect("close");

    assert_eq!(fixture.args(), ["-Tsvg"]);
    assert_eq!(fixture.read("stdin"), "strict\ndigraph{\na -> b\n}\n");
}

#[test]
fn unsuccessful_exit_is_reported() {
    let fixture = Fixture::new("exit-code");
    let config = SessionConfig::new()
        .with_executable(fixture.renderer("renderer", "cat > /dev/null\nexit 3"));
    let mut session = Session::launch(config).expect("launch");
    session.set_link("a", "b").unwrap();

    match session.close() {
        Err(CloseError::Exit(status)) => assert_eq!(status.code(), Some(3)),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn emitting_after_close_is_an_error() {
    let fixture = Fixture::new("after-close");
    let captured = Captured::default();
    let mut session = Session::launch(echoing(&fixture, &captured)).expect("launch");
    session.close().expect("close");
    assert_eq!(captured.text(), "strict\ndigraph{\n}\n");

    let err = session.set_link("a", "b").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    let err = session.set_label("a", "b").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert!(matches!(session.close(), Err(CloseError::Io(_))));
}

#[test]
fn renderer_exiting_early_surfaces_as_write_error() {
    let fixture = Fixture::new("early-exit");
    let config =
        SessionConfig::new().with_executable(fixture.renderer("renderer", "exit 0"));
    let mut session = Session::launch(config).expect("launch");

    let failed = (0..1_000_000).find_map(|i| session.set_link(&format!("n{i}"), "hub").err());
    let err = failed.expect("writes into an exited renderer should fail");
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

    assert!(matches!(session.close(), Err(CloseError::Io(_))));
}

#[test]
fn debug_lines_go_to_diagnostics() {
    let fixture = Fixture::new("debug");
    let captured = Captured::default();
    let recorder = Recorder::new();
    let config = echoing(&fixture, &captured)
        .strict(false)
        .debug(true)
        .with_diagnostics(recorder.clone());
    let mut session = Session::launch(config).expect("launch");
    session.set_link("a", "b").unwrap();
    session.close().expect("close");

    assert_eq!(recorder.lines(), ["dot> digraph{", "dot> a -> b", "dot> }"]);
}

#[test]
fn script_runs_through_the_renderer() {
    let fixture = Fixture::new("script");
    let renderer = fixture.renderer("renderer", "cat > \"$(dirname \"$0\")/stdin\"");
    let source = format!(
        r#"
session:
  format: pdf
  kind: undirected
  output: graph.pdf
  executable: {}
commands:
  - link: [a, b-c]
  - label: {{ node: b-c, label: "B C" }}
"#,
        renderer.display()
    );

    Script::parse(&source).expect("parse").run().expect("run");

    assert_eq!(fixture.args(), ["-Tpdf", "-ograph.pdf"]);
    assert_eq!(
        fixture.read("stdin"),
        "strict\ngraph{\na -- bHYPHENc\nbHYPHENc [label=\"B C\"]\n}\n"
    );
}
