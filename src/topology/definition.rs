//! File-based topology definitions.
//!
//! A definition lists the routers, external links and internal links
//! explicitly, in the order they should be emitted. YAML and JSON are
//! accepted, selected by file extension.

use super::types::{EndpointId, ExtLink, GridOptions, IntLink, Network, Router, RouterId, TopologyError};
use super::TopologyBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// External link entry in a definition file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExtLinkDef {
    pub endpoint: EndpointId,
    pub router: RouterId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<u32>,
}

/// Internal link entry in a definition file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IntLinkDef {
    pub src: RouterId,
    pub dst: RouterId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_port: Option<String>,
}

/// Explicit topology description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TopologyDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Router count; router ids are `0..routers`
    pub routers: usize,
    /// Endpoint count; defaults to the number of external links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<usize>,
    #[serde(default)]
    pub ext_links: Vec<ExtLinkDef>,
    #[serde(default)]
    pub int_links: Vec<IntLinkDef>,
}

/// A definition together with the file it came from
#[derive(Debug, Clone)]
pub struct DefinitionFile {
    pub path: PathBuf,
    pub definition: TopologyDefinition,
}

/// Returns true if a topology selector names a definition file rather than a built-in
pub fn is_definition_path(selector: &str) -> bool {
    let has_separator = selector.contains('/') || selector.contains(std::path::MAIN_SEPARATOR);
    let has_extension = matches!(
        Path::new(selector).extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    );
    has_separator || has_extension
}

/// Load and parse a topology definition file
pub fn load_definition(path: &Path) -> Result<DefinitionFile, TopologyError> {
    log::info!("Loading topology definition from: {:?}", path);

    let content = fs::read_to_string(path).map_err(|source| TopologyError::DefinitionIo {
        path: path.display().to_string(),
        source,
    })?;

    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let parsed = if is_json {
        serde_json::from_str::<TopologyDefinition>(&content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<TopologyDefinition>(&content).map_err(|e| e.to_string())
    };

    let definition = parsed.map_err(|message| TopologyError::InvalidDefinition {
        path: path.display().to_string(),
        message,
    })?;

    Ok(DefinitionFile {
        path: path.to_path_buf(),
        definition,
    })
}

impl TopologyDefinition {
    /// Convert into builder output. Emission order is file order.
    pub fn to_network(&self) -> Network {
        Network {
            routers: (0..self.routers).map(|router_id| Router { router_id }).collect(),
            ext_links: self
                .ext_links
                .iter()
                .map(|l| ExtLink {
                    endpoint_id: l.endpoint,
                    router_id: l.router,
                    latency: l.latency,
                })
                .collect(),
            int_links: self
                .int_links
                .iter()
                .map(|l| IntLink {
                    src: l.src,
                    dst: l.dst,
                    latency: l.latency,
                    weight: l.weight,
                    src_outport: l.src_port.clone(),
                    dst_inport: l.dst_port.clone(),
                })
                .collect(),
            num_endpoints: self.endpoints.unwrap_or(self.ext_links.len()),
        }
    }
}

impl TopologyBuilder for DefinitionFile {
    fn name(&self) -> String {
        self.definition
            .name
            .clone()
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Definition files fix their own shape; the grid only drives coordinates
    fn make_topology(&self, opts: &GridOptions) -> Result<Network, TopologyError> {
        let network = self.definition.to_network();
        if opts.num_endpoints != network.num_endpoints {
            log::debug!(
                "Ignoring endpoint count {} for definition {:?}, which declares {}",
                opts.num_endpoints,
                self.path,
                network.num_endpoints
            );
        }
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const RING: &str = r#"
name: ring3
routers: 3
ext_links:
  - { endpoint: 0, router: 0 }
  - { endpoint: 1, router: 1 }
  - { endpoint: 2, router: 2, latency: 2 }
int_links:
  - { src: 0, dst: 1, src_port: East, dst_port: West }
  - { src: 1, dst: 2, weight: 3 }
  - { src: 2, dst: 0 }
"#;

    #[test]
    fn test_selector_detection() {
        assert!(is_definition_path("topologies/ring.yaml"));
        assert!(is_definition_path("ring.json"));
        assert!(is_definition_path("./ring"));
        assert!(!is_definition_path("Mesh_XY"));
    }

    #[test]
    fn test_load_yaml_definition() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "{}", RING).unwrap();

        let def = load_definition(file.path()).unwrap();
        assert_eq!(TopologyBuilder::name(&def), "ring3");

        let network = def.make_topology(&GridOptions::new(1, 3)).unwrap();
        assert_eq!(network.routers.len(), 3);
        assert_eq!(network.num_endpoints, 3);
        assert_eq!(network.ext_links[2].latency, Some(2));
        assert_eq!(network.int_links[0].src_outport.as_deref(), Some("East"));
        assert_eq!(network.int_links[1].weight, Some(3));
        assert_eq!(network.int_links[2].dst_inport, None);
    }

    #[test]
    fn test_load_json_definition() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"routers": 1, "endpoints": 2, "ext_links": [{{"endpoint": 0, "router": 0}}, {{"endpoint": 1, "router": 0}}]}}"#
        )
        .unwrap();

        let def = load_definition(file.path()).unwrap();
        let network = def.definition.to_network();
        assert_eq!(network.num_endpoints, 2);
        assert!(network.int_links.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "routers: 1\nswitches: 4\n").unwrap();

        let err = load_definition(file.path()).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_definition(Path::new("/nonexistent/topology.yaml")).unwrap_err();
        assert!(matches!(err, TopologyError::DefinitionIo { .. }));
    }
}
