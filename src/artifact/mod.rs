//! # Topology artifact
//!
//! The artifact (`topology.conf`) is the only interface between this
//! compiler and the simulator, which loads it at startup:
//!
//! ```text
//! # Topology: Mesh_XY
//! NumRouters 4
//! 0 0 0 0
//! ...
//! NumNIs 4
//! 0 0 0 0
//! ...
//! NumExtLinks 4
//! NumIntLinks 8
//!
//! ExtLinks
//! 0 0
//! ...
//!
//! IntLinks
//! 0 2 0 1 South North
//! ...
//!
//! RoutingTables
//! 0 0 0
//! ...
//! ```
//!
//! - `writer.rs`: rendering and atomic writing
//! - `reader.rs`: parsing and consistency checks of existing artifacts

pub mod reader;
pub mod writer;

pub use reader::{parse_artifact, read_artifact, ArtifactSummary, ParsedArtifact};
pub use writer::{render_artifact, write_artifact};

use crate::topology::TopologyError;

/// Default artifact file name, as looked up by the simulator
pub const DEFAULT_ARTIFACT: &str = "topology.conf";

/// Errors reading, writing or verifying an artifact
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("{section} section declares {declared} links but contains {found}")]
    CountMismatch {
        section: &'static str,
        declared: usize,
        found: usize,
    },

    #[error("Inconsistent artifact: {0}")]
    Inconsistent(String),

    #[error("Artifact describes an invalid topology: {0}")]
    Topology(#[from] TopologyError),
}
