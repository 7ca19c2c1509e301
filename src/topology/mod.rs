//! Network topology module.
//!
//! This module contains the topology builder capability, the built-in
//! builders, and loading of file-based topology definitions.

pub mod types;
pub mod builtin;
pub mod definition;

use std::path::Path;

// Re-export key types and functions for easier access
pub use types::{EndpointId, ExtLink, GridOptions, IntLink, Network, Router, RouterId, TopologyError};
pub use builtin::BuiltinTopology;
pub use definition::{is_definition_path, load_definition, DefinitionFile, TopologyDefinition};

/// Anything that can emit the three ordered topology lists.
///
/// The compiler only ever sees the returned [`Network`]; which builder
/// produced it is irrelevant past this point.
pub trait TopologyBuilder {
    /// Name written into the artifact header
    fn name(&self) -> String;

    /// Emit routers, external links and internal links for the given grid
    fn make_topology(&self, opts: &GridOptions) -> Result<Network, TopologyError>;
}

/// Resolve a topology selector: a built-in name or a path to a definition file
pub fn resolve_builder(selector: &str) -> Result<Box<dyn TopologyBuilder>, TopologyError> {
    if let Some(builtin) = BuiltinTopology::from_name(selector) {
        log::debug!("Using built-in topology {}", builtin.name());
        return Ok(Box::new(builtin));
    }

    if is_definition_path(selector) {
        return Ok(Box::new(load_definition(Path::new(selector))?));
    }

    Err(TopologyError::UnknownTopology(selector.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_builtin() {
        let builder = resolve_builder("Pt2Pt").unwrap();
        assert_eq!(builder.name(), "Pt2Pt");
    }

    #[test]
    fn test_resolve_unknown() {
        let err = resolve_builder("Torus").err().unwrap();
        assert!(matches!(err, TopologyError::UnknownTopology(ref name) if name == "Torus"));
    }

    #[test]
    fn test_resolve_missing_definition() {
        let err = resolve_builder("topologies/missing.yaml").err().unwrap();
        assert!(matches!(err, TopologyError::DefinitionIo { .. }));
    }
}
