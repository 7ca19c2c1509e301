//! Built-in topology builders.
//!
//! These reproduce the link emission order of the simulator's own
//! topologies, so that port numbers derived from them line up with the
//! physical links the simulator instantiates.

use super::types::{ExtLink, GridOptions, IntLink, Network, Router, TopologyError};
use super::TopologyBuilder;

/// Topologies known by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTopology {
    /// 2-D mesh, one router per grid slot
    MeshXy,
    /// Stacked 2-D meshes joined vertically
    Mesh3d,
    /// Single router with every endpoint attached
    Crossbar,
    /// One router per endpoint, every router linked to every other
    Pt2Pt,
}

impl BuiltinTopology {
    pub const ALL: [BuiltinTopology; 4] = [
        BuiltinTopology::MeshXy,
        BuiltinTopology::Mesh3d,
        BuiltinTopology::Crossbar,
        BuiltinTopology::Pt2Pt,
    ];

    /// Look up a built-in topology by its selector name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Selector name as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::MeshXy => "Mesh_XY",
            Self::Mesh3d => "Mesh_3D",
            Self::Crossbar => "Crossbar",
            Self::Pt2Pt => "Pt2Pt",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::MeshXy => "rows x cols mesh, one router per grid slot",
            Self::Mesh3d => "rows x cols x depth mesh with Up/Down links between layers",
            Self::Crossbar => "single router with every endpoint attached",
            Self::Pt2Pt => "one router per endpoint, fully connected",
        }
    }
}

impl TopologyBuilder for BuiltinTopology {
    fn name(&self) -> String {
        BuiltinTopology::name(self).to_string()
    }

    fn make_topology(&self, opts: &GridOptions) -> Result<Network, TopologyError> {
        match self {
            Self::MeshXy => make_mesh(opts.rows, opts.cols, 1, opts.num_endpoints),
            Self::Mesh3d => make_mesh(opts.rows, opts.cols, opts.depth, opts.num_endpoints),
            Self::Crossbar => make_crossbar(opts.num_endpoints),
            Self::Pt2Pt => make_pt2pt(opts.num_endpoints),
        }
    }
}

/// Attach endpoints round-robin across the routers, endpoint `i` to router `i mod R`
fn reserve<T>(items: &mut Vec<T>, count: usize, what: &str) -> Result<(), TopologyError> {
    items
        .try_reserve_exact(count)
        .map_err(|_| TopologyError::InvalidGrid(format!("cannot allocate {} {}", count, what)))
}

fn attach_endpoints(network: &mut Network, num_endpoints: usize) -> Result<(), TopologyError> {
    let num_routers = network.routers.len();
    reserve(&mut network.ext_links, num_endpoints, "external links")?;
    network.num_endpoints = num_endpoints;
    network.ext_links.extend((0..num_endpoints).map(|endpoint_id| ExtLink {
        endpoint_id,
        router_id: endpoint_id % num_routers,
        latency: None,
    }));
    Ok(())
}

fn with_routers(count: usize) -> Result<Network, TopologyError> {
    let mut network = Network::default();
    reserve(&mut network.routers, count, "routers")?;
    network.routers.extend((0..count).map(|router_id| Router { router_id }));
    Ok(network)
}

fn make_mesh(rows: usize, cols: usize, depth: usize, num_endpoints: usize) -> Result<Network, TopologyError> {
    if rows == 0 || cols == 0 || depth == 0 {
        return Err(TopologyError::InvalidGrid(format!(
            "mesh needs at least one row, column and layer (got {}x{}x{})",
            rows, cols, depth
        )));
    }

    let too_large = || TopologyError::InvalidGrid(format!("{}x{}x{} mesh is too large", rows, cols, depth));
    let layer = rows.checked_mul(cols).ok_or_else(too_large)?;
    let mut network = with_routers(layer.checked_mul(depth).ok_or_else(too_large)?)?;
    attach_endpoints(&mut network, num_endpoints)?;

    for z in 0..depth {
        for col in 0..cols {
            for row in 0..rows {
                let curr = z * layer + row * cols + col;

                if row + 1 < rows {
                    let south = curr + cols;
                    network.connect(
                        IntLink::with_ports(curr, south, "South", "North"),
                        IntLink::with_ports(south, curr, "North", "South"),
                    );
                }

                if col + 1 < cols {
                    let east = curr + 1;
                    network.connect(
                        IntLink::with_ports(curr, east, "East", "West"),
                        IntLink::with_ports(east, curr, "West", "East"),
                    );
                }

                if z + 1 < depth {
                    let up = curr + layer;
                    network.connect(
                        IntLink::with_ports(curr, up, "Up", "Down"),
                        IntLink::with_ports(up, curr, "Down", "Up"),
                    );
                }
            }
        }
    }

    log::debug!(
        "Built {}x{}x{} mesh: {} routers, {} internal links",
        rows,
        cols,
        depth,
        network.routers.len(),
        network.int_links.len()
    );
    Ok(network)
}

fn make_crossbar(num_endpoints: usize) -> Result<Network, TopologyError> {
    let mut network = with_routers(1)?;
    attach_endpoints(&mut network, num_endpoints)?;
    Ok(network)
}

fn make_pt2pt(num_endpoints: usize) -> Result<Network, TopologyError> {
    let mut network = with_routers(num_endpoints)?;
    attach_endpoints(&mut network, num_endpoints)?;
    let num_links = num_endpoints
        .checked_mul(num_endpoints.saturating_sub(1))
        .ok_or_else(|| TopologyError::InvalidGrid(format!("{} fully connected routers is too many", num_endpoints)))?;
    reserve(&mut network.int_links, num_links, "internal links")?;
    for src in 0..num_endpoints {
        for dst in 0..num_endpoints {
            if src != dst {
                network.int_links.push(IntLink::new(src, dst));
            }
        }
    }
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(BuiltinTopology::from_name("Mesh_XY"), Some(BuiltinTopology::MeshXy));
        assert_eq!(BuiltinTopology::from_name("Crossbar"), Some(BuiltinTopology::Crossbar));
        assert_eq!(BuiltinTopology::from_name("mesh_xy"), None);
    }

    #[test]
    fn test_mesh_2x2_emission_order() {
        let network = BuiltinTopology::MeshXy
            .make_topology(&GridOptions::new(2, 2))
            .unwrap();

        assert_eq!(network.routers.len(), 4);
        assert_eq!(network.num_endpoints, 4);
        let ext: Vec<(usize, usize)> = network.ext_links.iter().map(|l| (l.endpoint_id, l.router_id)).collect();
        assert_eq!(ext, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);

        // col 0: router 0 south to 2, east to 1; router 2 east to 3
        // col 1: router 1 south to 3
        let int: Vec<(usize, usize)> = network.int_links.iter().map(|l| (l.src, l.dst)).collect();
        assert_eq!(
            int,
            vec![(0, 2), (2, 0), (0, 1), (1, 0), (2, 3), (3, 2), (1, 3), (3, 1)]
        );
        assert_eq!(network.int_links[0].src_outport.as_deref(), Some("South"));
        assert_eq!(network.int_links[0].dst_inport.as_deref(), Some("North"));
        assert_eq!(network.int_links[2].src_outport.as_deref(), Some("East"));
    }

    #[test]
    fn test_mesh_endpoint_override_wraps() {
        let opts = GridOptions { num_endpoints: 6, ..GridOptions::new(2, 2) };
        let network = BuiltinTopology::MeshXy.make_topology(&opts).unwrap();
        assert_eq!(network.ext_links.len(), 6);
        assert_eq!(network.ext_links[4].router_id, 0);
        assert_eq!(network.ext_links[5].router_id, 1);
    }

    #[test]
    fn test_mesh_3d_vertical_links() {
        let opts = GridOptions { depth: 2, num_endpoints: 8, ..GridOptions::new(2, 2) };
        let network = BuiltinTopology::Mesh3d.make_topology(&opts).unwrap();
        assert_eq!(network.routers.len(), 8);
        // 4 planar connections per layer, 4 vertical connections, two links each
        assert_eq!(network.int_links.len(), (4 * 2 + 4) * 2);
        assert!(network
            .int_links
            .iter()
            .any(|l| l.src == 0 && l.dst == 4 && l.src_outport.as_deref() == Some("Up")));
    }

    #[test]
    fn test_mesh_rejects_empty_grid() {
        let result = BuiltinTopology::MeshXy.make_topology(&GridOptions::new(0, 4));
        assert!(matches!(result, Err(TopologyError::InvalidGrid(_))));
    }

    #[test]
    fn test_crossbar_single_router() {
        let opts = GridOptions::new(1, 16);
        let network = BuiltinTopology::Crossbar.make_topology(&opts).unwrap();
        assert_eq!(network.routers.len(), 1);
        assert_eq!(network.ext_links.len(), 16);
        assert!(network.ext_links.iter().all(|l| l.router_id == 0));
        assert!(network.int_links.is_empty());
    }

    #[test]
    fn test_pt2pt_fully_connected() {
        let opts = GridOptions::new(1, 4);
        let network = BuiltinTopology::Pt2Pt.make_topology(&opts).unwrap();
        assert_eq!(network.routers.len(), 4);
        assert_eq!(network.int_links.len(), 12);
        let first: Vec<(usize, usize)> = network.int_links[..3].iter().map(|l| (l.src, l.dst)).collect();
        assert_eq!(first, vec![(0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_oversized_endpoint_count_is_an_error() {
        let opts = GridOptions { num_endpoints: usize::MAX / 8, ..GridOptions::new(2, 2) };
        for topology in [BuiltinTopology::MeshXy, BuiltinTopology::Crossbar, BuiltinTopology::Pt2Pt] {
            let result = topology.make_topology(&opts);
            assert!(matches!(result, Err(TopologyError::InvalidGrid(_))), "{}", topology.name());
        }
    }

    #[test]
    fn test_oversized_mesh_is_an_error() {
        let opts = GridOptions { num_endpoints: 1, ..GridOptions::new(usize::MAX / 2, 4) };
        let result = BuiltinTopology::MeshXy.make_topology(&opts);
        assert!(matches!(result, Err(TopologyError::InvalidGrid(_))));
    }
}
