use crate::artifact::DEFAULT_ARTIFACT;
use crate::compiler::ConnectivityPolicy;
use crate::topology::{BuiltinTopology, GridOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Compiler configuration, as read from YAML and/or the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    /// Built-in topology name (e.g. "Mesh_XY") or path to a definition file
    pub topology: String,
    /// Grid rows
    #[serde(default = "default_extent")]
    pub rows: usize,
    /// Grid columns
    #[serde(default = "default_extent")]
    pub cols: usize,
    /// Grid layers, used by 3-D topologies
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// (Optional) Endpoint count override (default: one per grid slot; layers count only for Mesh_3D)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_cpus: Option<usize>,
    /// Artifact destination
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Handling of routers that cannot reach every endpoint
    #[serde(default)]
    pub connectivity: ConnectivityPolicy,
    /// Routing worker threads (0 = one per core)
    #[serde(default)]
    pub threads: usize,
}

fn default_extent() -> usize {
    2
}

fn default_depth() -> usize {
    1
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT)
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid topology selector: {0}")]
    InvalidTopology(String),
    #[error("Invalid grid configuration: {0}")]
    InvalidGrid(String),
    #[error("Invalid output configuration: {0}")]
    InvalidOutput(String),
}

impl CompilerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topology.trim().is_empty() {
            return Err(ValidationError::InvalidTopology(
                "topology cannot be empty".to_string(),
            ));
        }

        if self.rows == 0 || self.cols == 0 || self.depth == 0 {
            return Err(ValidationError::InvalidGrid(format!(
                "rows, cols and depth must be at least 1 (got rows={}, cols={}, depth={})",
                self.rows, self.cols, self.depth
            )));
        }

        if self.output.as_os_str().is_empty() {
            return Err(ValidationError::InvalidOutput(
                "output path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Grid options handed to the topology builder
    pub fn grid_options(&self) -> GridOptions {
        let layers = if BuiltinTopology::from_name(&self.topology) == Some(BuiltinTopology::Mesh3d) {
            self.depth
        } else {
            if self.depth > 1 {
                log::warn!(
                    "depth={} is ignored by '{}'; only Mesh_3D stacks layers",
                    self.depth,
                    self.topology
                );
            }
            1
        };
        GridOptions {
            rows: self.rows,
            cols: self.cols,
            depth: self.depth,
            num_endpoints: self
                .num_cpus
                .unwrap_or(self.rows.saturating_mul(self.cols).saturating_mul(layers)),
        }
    }
}

/// Default implementation for CompilerConfig
impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            topology: "Mesh_XY".to_string(),
            rows: default_extent(),
            cols: default_extent(),
            depth: default_depth(),
            num_cpus: None,
            output: default_output(),
            connectivity: ConnectivityPolicy::Lenient,
            threads: 0,
        }
    }
}
