//! Artifact parsing and verification.
//!
//! Reads an artifact the way the simulator's loader does (blank and `#`
//! lines skipped, `NumRouters`/`NumNIs` followed by that many coordinate
//! lines, section headers switching the data-line interpretation) but
//! reports malformed lines instead of skipping them.

use super::ArtifactError;
use crate::compiler::{assign_ports, Coordinate, PortKind, RoutingEntry};
use crate::topology::{ExtLink, IntLink, Network, Router};
use crate::utils::validation::validate_network;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A node line: `id x y z`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLine {
    pub id: usize,
    pub coord: Coordinate,
}

/// An internal-link line: `src dst latency weight src_port dst_port`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntLinkLine {
    pub src: usize,
    pub dst: usize,
    pub latency: u32,
    pub weight: u32,
    pub src_port: Option<String>,
    pub dst_port: Option<String>,
}

/// Parsed artifact contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArtifact {
    pub name: Option<String>,
    pub routers: Vec<NodeLine>,
    pub endpoints: Vec<NodeLine>,
    pub declared_ext_links: usize,
    pub declared_int_links: usize,
    pub ext_links: Vec<(usize, usize)>,
    pub int_links: Vec<IntLinkLine>,
    pub routes: Vec<RoutingEntry>,
}

/// Result of a successful verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub routers: usize,
    pub endpoints: usize,
    pub ext_links: usize,
    pub int_links: usize,
    pub routes: usize,
    /// Router/endpoint pairs without a routing entry
    pub missing_routes: usize,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Header,
    ExtLinks,
    IntLinks,
    RoutingTables,
}

fn field<T: FromStr>(tokens: &[&str], index: usize, line: usize, what: &str) -> Result<T, ArtifactError> {
    let token = tokens.get(index).ok_or_else(|| ArtifactError::Malformed {
        line,
        message: format!("missing {}", what),
    })?;
    token.parse().map_err(|_| ArtifactError::Malformed {
        line,
        message: format!("invalid {} '{}'", what, token),
    })
}

fn port_hint(token: &str) -> Option<String> {
    (token != super::writer::NO_PORT).then(|| token.to_string())
}

/// Parse artifact text
pub fn parse_artifact(text: &str) -> Result<ParsedArtifact, ArtifactError> {
    let mut parsed = ParsedArtifact::default();
    let mut section = Section::Header;
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    while let Some((line_no, line)) = lines.next() {
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some(name) = comment.trim().strip_prefix("Topology:") {
                parsed.name.get_or_insert_with(|| name.trim().to_string());
            }
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "NumRouters" | "NumNIs" => {
                let count: usize = field(&tokens, 1, line_no, "count")?;
                let mut nodes = Vec::new();
                for _ in 0..count {
                    let (node_line, node) = lines.next().ok_or_else(|| ArtifactError::Malformed {
                        line: line_no,
                        message: format!("{} declares {} entries but the file ends early", tokens[0], count),
                    })?;
                    let t: Vec<&str> = node.split_whitespace().collect();
                    nodes.push(NodeLine {
                        id: field(&t, 0, node_line, "id")?,
                        coord: Coordinate {
                            x: field(&t, 1, node_line, "x")?,
                            y: field(&t, 2, node_line, "y")?,
                            z: field(&t, 3, node_line, "z")?,
                        },
                    });
                }
                if tokens[0] == "NumRouters" {
                    parsed.routers = nodes;
                } else {
                    parsed.endpoints = nodes;
                }
            }
            "NumExtLinks" => parsed.declared_ext_links = field(&tokens, 1, line_no, "count")?,
            "NumIntLinks" => parsed.declared_int_links = field(&tokens, 1, line_no, "count")?,
            "ExtLinks" => section = Section::ExtLinks,
            "IntLinks" => section = Section::IntLinks,
            "RoutingTables" => section = Section::RoutingTables,
            _ => match section {
                Section::Header => {
                    return Err(ArtifactError::Malformed {
                        line: line_no,
                        message: format!("unexpected '{}' before any section", tokens[0]),
                    })
                }
                Section::ExtLinks => parsed.ext_links.push((
                    field(&tokens, 0, line_no, "endpoint id")?,
                    field(&tokens, 1, line_no, "router id")?,
                )),
                Section::IntLinks => parsed.int_links.push(IntLinkLine {
                    src: field(&tokens, 0, line_no, "source router")?,
                    dst: field(&tokens, 1, line_no, "destination router")?,
                    latency: field(&tokens, 2, line_no, "latency")?,
                    weight: field(&tokens, 3, line_no, "weight")?,
                    src_port: port_hint(field::<String>(&tokens, 4, line_no, "source port")?.as_str()),
                    dst_port: port_hint(field::<String>(&tokens, 5, line_no, "destination port")?.as_str()),
                }),
                Section::RoutingTables => parsed.routes.push(RoutingEntry {
                    router: field(&tokens, 0, line_no, "router id")?,
                    endpoint: field(&tokens, 1, line_no, "endpoint id")?,
                    port: field(&tokens, 2, line_no, "port")?,
                }),
            },
        }
    }

    Ok(parsed)
}

/// Read and parse an artifact file
pub fn read_artifact(path: &Path) -> Result<ParsedArtifact, ArtifactError> {
    let text = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_artifact(&text)
}

impl ParsedArtifact {
    /// Rebuild builder output from the parsed links, in file order
    pub fn to_network(&self) -> Network {
        Network {
            routers: self.routers.iter().map(|r| Router { router_id: r.id }).collect(),
            ext_links: self
                .ext_links
                .iter()
                .map(|&(endpoint_id, router_id)| ExtLink { endpoint_id, router_id, latency: None })
                .collect(),
            int_links: self
                .int_links
                .iter()
                .map(|l| IntLink {
                    src: l.src,
                    dst: l.dst,
                    latency: Some(l.latency),
                    weight: Some(l.weight),
                    src_outport: l.src_port.clone(),
                    dst_inport: l.dst_port.clone(),
                })
                .collect(),
            num_endpoints: self.endpoints.len(),
        }
    }

    /// Check the artifact for internal consistency.
    ///
    /// Declared link counts must match the link sections, every id must be
    /// in range, every routing entry must name an existing port of its
    /// router, and an endpoint attached to a router must be routed through
    /// that router's external port for it.
    pub fn verify(&self) -> Result<ArtifactSummary, ArtifactError> {
        for (section, declared, found) in [
            ("ExtLinks", self.declared_ext_links, self.ext_links.len()),
            ("IntLinks", self.declared_int_links, self.int_links.len()),
        ] {
            if declared != found {
                return Err(ArtifactError::CountMismatch { section, declared, found });
            }
        }

        for (position, endpoint) in self.endpoints.iter().enumerate() {
            if endpoint.id != position {
                return Err(ArtifactError::Inconsistent(format!(
                    "endpoint line {} has id {}, expected {}",
                    position, endpoint.id, position
                )));
            }
        }

        let network = self.to_network();
        validate_network(&network)?;
        let ports = assign_ports(&network)?;

        let mut seen = HashMap::new();
        for entry in &self.routes {
            let router_ports = ports.ports(entry.router);
            if entry.router >= network.num_routers() || entry.endpoint >= network.num_endpoints {
                return Err(ArtifactError::Inconsistent(format!(
                    "routing entry ({} {} {}) references an unknown router or endpoint",
                    entry.router, entry.endpoint, entry.port
                )));
            }
            if entry.port >= router_ports.len() {
                return Err(ArtifactError::Inconsistent(format!(
                    "routing entry ({} {} {}) uses port {}, but router {} has {} ports",
                    entry.router,
                    entry.endpoint,
                    entry.port,
                    entry.port,
                    entry.router,
                    router_ports.len()
                )));
            }
            if let Some(local) = ports.external_port(entry.router, entry.endpoint) {
                if local != entry.port {
                    return Err(ArtifactError::Inconsistent(format!(
                        "endpoint {} is attached to router {} on port {}, but is routed via port {}",
                        entry.endpoint, entry.router, local, entry.port
                    )));
                }
            } else if let PortKind::External { endpoint } = router_ports[entry.port] {
                return Err(ArtifactError::Inconsistent(format!(
                    "router {} routes endpoint {} into the external port of endpoint {}",
                    entry.router, entry.endpoint, endpoint
                )));
            }
            if seen.insert((entry.router, entry.endpoint), entry.port).is_some() {
                return Err(ArtifactError::Inconsistent(format!(
                    "duplicate routing entry for endpoint {} on router {}",
                    entry.endpoint, entry.router
                )));
            }
        }

        let routers = network.num_routers();
        let endpoints = network.num_endpoints;
        Ok(ArtifactSummary {
            routers,
            endpoints,
            ext_links: self.ext_links.len(),
            int_links: self.int_links.len(),
            routes: seen.len(),
            missing_routes: routers * endpoints - seen.len(),
        })
    }
}
