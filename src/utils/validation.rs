//! Builder contract validation.
//!
//! This module checks a builder's output before any derived map is
//! computed, so that a malformed topology aborts compilation with an error
//! naming the offending router, endpoint or link.

use crate::topology::{EndpointId, Network, RouterId, TopologyError};
use std::collections::HashSet;

/// Validate a builder's output against the topology contract
///
/// Checks for:
/// - Router ids forming the dense range `0..R` in emission order
/// - External links referencing existing routers and endpoints
/// - Internal links referencing existing routers
/// - Every endpoint having exactly one external link
///
/// # Examples
/// ```
/// use garnet_topo::topology::{BuiltinTopology, GridOptions, TopologyBuilder};
/// use garnet_topo::utils::validation::validate_network;
///
/// let network = BuiltinTopology::MeshXy.make_topology(&GridOptions::new(2, 2)).unwrap();
/// assert!(validate_network(&network).is_ok());
/// ```
pub fn validate_network(network: &Network) -> Result<(), TopologyError> {
    let num_routers = network.num_routers();

    for (position, router) in network.routers.iter().enumerate() {
        if router.router_id != position {
            return Err(TopologyError::NonDenseRouters {
                position,
                expected: position,
                found: router.router_id,
            });
        }
    }

    for (link, ext) in network.ext_links.iter().enumerate() {
        if ext.router_id >= num_routers {
            return Err(TopologyError::ExtLinkRouterOutOfRange {
                link,
                endpoint: ext.endpoint_id,
                router: ext.router_id,
                num_routers,
            });
        }
        if ext.endpoint_id >= network.num_endpoints {
            return Err(TopologyError::EndpointOutOfRange {
                link,
                endpoint: ext.endpoint_id,
                num_endpoints: network.num_endpoints,
            });
        }
    }

    for (link, int) in network.int_links.iter().enumerate() {
        if let Some(router) = [int.src, int.dst].into_iter().find(|&r| r >= num_routers) {
            return Err(TopologyError::IntLinkRouterOutOfRange {
                link,
                src: int.src,
                dst: int.dst,
                router,
                num_routers,
            });
        }
    }

    // More endpoints than external links: some endpoint is unattached, and
    // the declared count must not size any allocation.
    if network.num_endpoints > network.ext_links.len() {
        let attached: HashSet<EndpointId> = network.ext_links.iter().map(|l| l.endpoint_id).collect();
        let endpoint = (0..network.num_endpoints)
            .find(|e| !attached.contains(e))
            .unwrap_or(network.ext_links.len());
        return Err(TopologyError::UnattachedEndpoint { endpoint });
    }

    let mut attachments: Vec<Vec<RouterId>> = vec![Vec::new(); network.num_endpoints];
    for ext in &network.ext_links {
        attachments[ext.endpoint_id].push(ext.router_id);
    }

    for (endpoint, routers) in attachments.into_iter().enumerate() {
        match routers.len() {
            0 => return Err(TopologyError::UnattachedEndpoint { endpoint }),
            1 => {}
            count => {
                return Err(TopologyError::MultiplyAttachedEndpoint {
                    endpoint,
                    count,
                    routers,
                })
            }
        }
    }

    let self_loops = network.int_links.iter().filter(|l| l.src == l.dst).count();
    if self_loops > 0 {
        log::warn!("Topology contains {} self-looping internal links; they get ports but never carry routes", self_loops);
    }

    log::debug!(
        "Topology validated: {} routers, {} endpoints, {} external links, {} internal links",
        num_routers,
        network.num_endpoints,
        network.ext_links.len(),
        network.int_links.len()
    );
    Ok(())
}
