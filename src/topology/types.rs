//! Topology type definitions.
//!
//! This file contains the builder-facing data model: routers, the links
//! joining endpoints to routers, the links joining routers to each other,
//! and the grid options every builder receives.

use serde::{Deserialize, Serialize};

/// Dense, zero-based router identifier
pub type RouterId = usize;

/// Dense, zero-based endpoint (network interface) identifier
pub type EndpointId = usize;

/// Grid extents and endpoint count handed to a topology builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOptions {
    pub rows: usize,
    pub cols: usize,
    /// Number of stacked layers (only meaningful for 3-D builders)
    pub depth: usize,
    /// Number of endpoints to attach
    pub num_endpoints: usize,
}

impl GridOptions {
    /// Options for a `rows x cols` grid with one endpoint per grid slot
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            depth: 1,
            num_endpoints: rows * cols,
        }
    }

    /// Number of routers in a full `rows x cols x depth` grid
    pub fn grid_size(&self) -> usize {
        self.rows * self.cols * self.depth.max(1)
    }
}

/// A router as emitted by a builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    pub router_id: RouterId,
}

/// Connection between an endpoint and the router it attaches to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtLink {
    pub endpoint_id: EndpointId,
    pub router_id: RouterId,
    pub latency: Option<u32>,
}

/// Directed connection between two routers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntLink {
    pub src: RouterId,
    pub dst: RouterId,
    pub latency: Option<u32>,
    pub weight: Option<u32>,
    /// Output port label on the source router, e.g. `East`
    pub src_outport: Option<String>,
    /// Input port label on the destination router, e.g. `West`
    pub dst_inport: Option<String>,
}

impl IntLink {
    /// Plain link with no hints
    pub fn new(src: RouterId, dst: RouterId) -> Self {
        Self {
            src,
            dst,
            latency: None,
            weight: None,
            src_outport: None,
            dst_inport: None,
        }
    }

    /// Link carrying directional port labels
    pub fn with_ports(src: RouterId, dst: RouterId, src_outport: &str, dst_inport: &str) -> Self {
        Self {
            src_outport: Some(src_outport.to_string()),
            dst_inport: Some(dst_inport.to_string()),
            ..Self::new(src, dst)
        }
    }
}

/// The three ordered lists a builder emits, plus the endpoint population.
///
/// Emission order is significant: port numbering on every router follows
/// the order of `ext_links` and then `int_links`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Network {
    pub routers: Vec<Router>,
    pub ext_links: Vec<ExtLink>,
    pub int_links: Vec<IntLink>,
    pub num_endpoints: usize,
}

impl Network {
    pub fn num_routers(&self) -> usize {
        self.routers.len()
    }

    /// Append a bidirectional connection as two directed links, forward first
    pub fn connect(&mut self, forward: IntLink, backward: IntLink) {
        self.int_links.push(forward);
        self.int_links.push(backward);
    }
}

/// Errors raised while building or validating a topology
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Unknown topology '{0}' (use `garnet-topo list` to see built-in topologies)")]
    UnknownTopology(String),

    #[error("Failed to read topology definition {path}: {source}")]
    DefinitionIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid topology definition {path}: {message}")]
    InvalidDefinition { path: String, message: String },

    #[error("Invalid grid options: {0}")]
    InvalidGrid(String),

    #[error("Router list is not dense: expected router id {expected} at position {position}, found {found}")]
    NonDenseRouters {
        position: usize,
        expected: RouterId,
        found: RouterId,
    },

    #[error("External link #{link} (endpoint {endpoint}) references router {router}, but only {num_routers} routers exist")]
    ExtLinkRouterOutOfRange {
        link: usize,
        endpoint: EndpointId,
        router: RouterId,
        num_routers: usize,
    },

    #[error("External link #{link} references endpoint {endpoint}, but only {num_endpoints} endpoints exist")]
    EndpointOutOfRange {
        link: usize,
        endpoint: EndpointId,
        num_endpoints: usize,
    },

    #[error("Internal link #{link} ({src} -> {dst}) references router {router}, but only {num_routers} routers exist")]
    IntLinkRouterOutOfRange {
        link: usize,
        src: RouterId,
        dst: RouterId,
        router: RouterId,
        num_routers: usize,
    },

    #[error("Endpoint {endpoint} has no external link")]
    UnattachedEndpoint { endpoint: EndpointId },

    #[error("Endpoint {endpoint} has {count} external links (to routers {routers:?}); exactly one is required")]
    MultiplyAttachedEndpoint {
        endpoint: EndpointId,
        count: usize,
        routers: Vec<RouterId>,
    },
}
