//! `dotter` — streams a Graphviz graph into a running renderer, line by line.
//!
//! We start a renderer (`dot`, `neato`, ...) as a [session](crate::session::Session).
//!
//! We write [links, attributes and clusters](crate::session::Session::set_link)
//! into it as they become known.
//!
//! We [close](crate::session::Session::close) the session and the renderer
//! produces its file (or its output on our stdout).
//!
//! A whole session can also be described up-front as a [script](crate::script::Script).

pub mod graphics;
pub mod names;
pub mod script;
pub mod session;
