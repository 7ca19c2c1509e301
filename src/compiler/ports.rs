//! Router port assignment.
//!
//! Ports are numbered per router in emission order: every external link
//! attached to the router first, then every internal link leaving it. The
//! simulator indexes ports the same way, so no other ordering is allowed.

use crate::topology::{EndpointId, Network, RouterId, TopologyError};

/// Dense per-router port index
pub type PortIndex = usize;

/// What sits on the far side of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Port to an attached endpoint
    External { endpoint: EndpointId },
    /// Port to a neighbouring router
    Internal { peer: RouterId },
}

/// Ordered port list for every router; a port's position is its index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMap {
    ports: Vec<Vec<PortKind>>,
}

impl PortMap {
    /// Ports of `router` in index order
    pub fn ports(&self, router: RouterId) -> &[PortKind] {
        self.ports.get(router).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_routers(&self) -> usize {
        self.ports.len()
    }

    /// Total number of ports across all routers
    pub fn total_ports(&self) -> usize {
        self.ports.iter().map(Vec::len).sum()
    }

    /// Index of the external port `router` uses for `endpoint`, if attached there
    pub fn external_port(&self, router: RouterId, endpoint: EndpointId) -> Option<PortIndex> {
        self.ports(router)
            .iter()
            .position(|p| *p == PortKind::External { endpoint })
    }
}

/// Assign ports to every router of `network`
pub fn assign_ports(network: &Network) -> Result<PortMap, TopologyError> {
    let num_routers = network.num_routers();
    let mut ports: Vec<Vec<PortKind>> = vec![Vec::new(); num_routers];

    for (link, ext) in network.ext_links.iter().enumerate() {
        let router = ports
            .get_mut(ext.router_id)
            .ok_or_else(|| TopologyError::ExtLinkRouterOutOfRange {
                link,
                endpoint: ext.endpoint_id,
                router: ext.router_id,
                num_routers,
            })?;
        router.push(PortKind::External { endpoint: ext.endpoint_id });
    }

    for (link, int) in network.int_links.iter().enumerate() {
        if int.dst >= num_routers {
            return Err(TopologyError::IntLinkRouterOutOfRange {
                link,
                src: int.src,
                dst: int.dst,
                router: int.dst,
                num_routers,
            });
        }
        let router = ports
            .get_mut(int.src)
            .ok_or_else(|| TopologyError::IntLinkRouterOutOfRange {
                link,
                src: int.src,
                dst: int.dst,
                router: int.src,
                num_routers,
            })?;
        router.push(PortKind::Internal { peer: int.dst });
    }

    Ok(PortMap { ports })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{ExtLink, IntLink, Router};

    fn network(num_routers: usize, ext: &[(usize, usize)], int: &[(usize, usize)]) -> Network {
        Network {
            routers: (0..num_routers).map(|router_id| Router { router_id }).collect(),
            ext_links: ext
                .iter()
                .map(|&(endpoint_id, router_id)| ExtLink { endpoint_id, router_id, latency: None })
                .collect(),
            int_links: int.iter().map(|&(s, d)| IntLink::new(s, d)).collect(),
            num_endpoints: ext.len(),
        }
    }

    #[test]
    fn test_externals_precede_internals() {
        // internal link emitted before the second endpoint's external link still lands after it
        let net = network(2, &[(0, 0), (1, 0), (2, 1)], &[(0, 1), (1, 0)]);
        let map = assign_ports(&net).unwrap();

        assert_eq!(
            map.ports(0),
            &[
                PortKind::External { endpoint: 0 },
                PortKind::External { endpoint: 1 },
                PortKind::Internal { peer: 1 },
            ]
        );
        assert_eq!(map.ports(1), &[PortKind::External { endpoint: 2 }, PortKind::Internal { peer: 0 }]);
        assert_eq!(map.total_ports(), 5);
        assert_eq!(map.external_port(0, 1), Some(1));
        assert_eq!(map.external_port(1, 1), None);
    }

    #[test]
    fn test_internal_order_follows_emission_not_peer_id() {
        let net = network(4, &[(0, 0)], &[(0, 3), (0, 1), (0, 2)]);
        let map = assign_ports(&net).unwrap();
        let peers: Vec<PortKind> = map.ports(0)[1..].to_vec();
        assert_eq!(
            peers,
            vec![
                PortKind::Internal { peer: 3 },
                PortKind::Internal { peer: 1 },
                PortKind::Internal { peer: 2 },
            ]
        );
    }

    #[test]
    fn test_parallel_links_get_distinct_ports() {
        let net = network(2, &[(0, 0), (1, 1)], &[(0, 1), (0, 1)]);
        let map = assign_ports(&net).unwrap();
        assert_eq!(map.ports(0).len(), 3);
        assert_eq!(map.ports(0)[1], map.ports(0)[2]);
    }

    #[test]
    fn test_out_of_range_router_is_fatal() {
        let net = network(2, &[(0, 0)], &[(0, 2)]);
        let err = assign_ports(&net).unwrap_err();
        assert!(matches!(err, TopologyError::IntLinkRouterOutOfRange { link: 0, router: 2, .. }));

        let net = network(1, &[(0, 4)], &[]);
        let err = assign_ports(&net).unwrap_err();
        assert!(matches!(err, TopologyError::ExtLinkRouterOutOfRange { router: 4, .. }));
    }
}
