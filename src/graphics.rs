//! The closed vocabularies a [`Session`](crate::session::Session) speaks: graph
//! kinds, renderer programs, output formats and the few attribute values the
//! session knows how to set.

use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    #[default]
    #[display("digraph")]
    Directed,
    #[display("graph")]
    Undirected,
}

impl GraphKind {
    /// The token placed between two nodes of a link.
    pub fn connector(self) -> &'static str {
        match self {
            Self::Directed => "->",
            Self::Undirected => "--",
        }
    }
}

/// What the renderer is asked to produce, passed as `-T<format>`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[display("bmp")]
    Bmp,
    #[display("dot")]
    Dot,
    #[display("jpg")]
    Jpg,
    #[display("pdf")]
    Pdf,
    #[display("png")]
    Png,
    #[display("ps")]
    Ps,
    #[default]
    #[display("svg")]
    Svg,
}

/// The layout program to run. Its name is looked up on the execution path.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    #[display("circo")]
    Circo,
    #[default]
    #[display("dot")]
    Dot,
    #[display("fdp")]
    Fdp,
    #[display("neato")]
    Neato,
    #[display("sfdp")]
    Sfdp,
    #[display("twopi")]
    Twopi,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum RankDirection {
    #[serde(rename = "LR")]
    #[display("LR")]
    LeftRight,
    #[serde(rename = "RL")]
    #[display("RL")]
    RightLeft,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    #[display("box")]
    Box,
    #[display("circle")]
    Circle,
    #[display("folder")]
    Folder,
    #[display("plaintext")]
    Plaintext,
    #[display("triangle")]
    Triangle,
}
