//! Topology compiler.
//!
//! Turns builder output into everything the simulator needs at startup:
//! per-router port numbering, grid coordinates for routers and endpoints,
//! and per-router first-hop routing tables.
//!
//! ## Pipeline
//!
//! 1. **Validation**: the builder contract is checked (dense ids, one
//!    external link per endpoint, in-range link ends)
//! 2. **Port assignment**: external links, then internal links, in
//!    emission order
//! 3. **Coordinates**: row-major placement on the configured grid
//! 4. **Routing**: one shortest-path expansion per source router
//! 5. **Connectivity check**: missing entries are reported, and rejected in
//!    strict mode

pub mod coordinates;
pub mod ports;
pub mod routing;

pub use coordinates::{Coordinate, GridExtent};
pub use ports::{assign_ports, PortIndex, PortKind, PortMap};
pub use routing::{compile_routing_tables, RoutingEntry, RoutingTables};

use crate::topology::{EndpointId, Network, RouterId, TopologyError};
use crate::utils::validation::validate_network;
use serde::{Deserialize, Serialize};

/// What to do when some router cannot reach some endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityPolicy {
    /// Leave the entry out of the routing table and warn
    #[default]
    Lenient,
    /// Fail compilation
    Strict,
}

/// Compilation errors
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("Grid extents must be non-zero (rows={rows}, cols={cols})")]
    InvalidExtent { rows: usize, cols: usize },

    #[error("Endpoint {endpoint} is unreachable from router {router} ({missing} routing entries missing in total)")]
    ConnectivityGap {
        router: RouterId,
        endpoint: EndpointId,
        missing: usize,
    },
}

/// Fully derived topology, ready for serialization
#[derive(Debug, Clone)]
pub struct CompiledTopology {
    pub name: String,
    pub network: Network,
    pub ports: PortMap,
    pub router_coords: Vec<Coordinate>,
    pub endpoint_coords: Vec<Coordinate>,
    pub routes: RoutingTables,
    /// Router/endpoint pairs without a route (always empty in strict mode)
    pub missing: Vec<(RouterId, EndpointId)>,
}

/// Compile builder output into ports, coordinates and routing tables
pub fn compile(
    name: &str,
    network: Network,
    grid: GridExtent,
    policy: ConnectivityPolicy,
) -> Result<CompiledTopology, CompileError> {
    if grid.rows == 0 || grid.cols == 0 {
        return Err(CompileError::InvalidExtent { rows: grid.rows, cols: grid.cols });
    }

    validate_network(&network)?;

    let ports = assign_ports(&network)?;
    log::debug!("Assigned {} ports across {} routers", ports.total_ports(), ports.num_routers());

    let router_coords = grid.coordinates(network.num_routers());
    let endpoint_coords = grid.coordinates(network.num_endpoints);
    log::debug!(
        "Router grid spans {} layer(s), endpoint grid spans {} layer(s)",
        grid.depth_for(network.num_routers()),
        grid.depth_for(network.num_endpoints)
    );

    let routes = compile_routing_tables(&ports);
    let missing = routes.missing(network.num_endpoints);

    if let Some(&(router, endpoint)) = missing.first() {
        match policy {
            ConnectivityPolicy::Strict => {
                return Err(CompileError::ConnectivityGap {
                    router,
                    endpoint,
                    missing: missing.len(),
                });
            }
            ConnectivityPolicy::Lenient => {
                log::warn!(
                    "Topology is not fully connected: {} routing entries missing (first: endpoint {} from router {})",
                    missing.len(),
                    endpoint,
                    router
                );
            }
        }
    }

    log::info!(
        "Compiled topology '{}': {} routers, {} endpoints, {} routing entries",
        name,
        network.num_routers(),
        network.num_endpoints,
        routes.len()
    );

    Ok(CompiledTopology {
        name: name.to_string(),
        network,
        ports,
        router_coords,
        endpoint_coords,
        routes,
        missing,
    })
}
