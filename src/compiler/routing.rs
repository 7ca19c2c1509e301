//! Shortest-path routing table compilation.
//!
//! For every source router a hop-count shortest-path expansion is run over
//! the router graph, remembering for each reached router the port of the
//! source that started the path. Equal-distance candidates are ordered by
//! when they were offered, and offers follow port order, so the builder's
//! emission order decides every tie.

use super::ports::{PortIndex, PortKind, PortMap};
use crate::topology::{EndpointId, RouterId};
use rayon::prelude::*;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

/// One line of a routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoutingEntry {
    pub router: RouterId,
    pub endpoint: EndpointId,
    pub port: PortIndex,
}

/// First-hop ports for every router, keyed by destination endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutingTables {
    tables: Vec<BTreeMap<EndpointId, PortIndex>>,
}

impl RoutingTables {
    /// Table of `router`, ascending by endpoint
    pub fn table(&self, router: RouterId) -> Option<&BTreeMap<EndpointId, PortIndex>> {
        self.tables.get(router)
    }

    /// First-hop port from `router` toward `endpoint`, if reachable
    pub fn first_hop(&self, router: RouterId, endpoint: EndpointId) -> Option<PortIndex> {
        self.tables.get(router)?.get(&endpoint).copied()
    }

    pub fn num_routers(&self) -> usize {
        self.tables.len()
    }

    /// Total number of routing entries
    pub fn len(&self) -> usize {
        self.tables.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, routers ascending then endpoints ascending
    pub fn entries(&self) -> impl Iterator<Item = RoutingEntry> + '_ {
        self.tables.iter().enumerate().flat_map(|(router, table)| {
            table.iter().map(move |(&endpoint, &port)| RoutingEntry { router, endpoint, port })
        })
    }

    /// `(router, endpoint)` pairs with no route, in ascending order
    pub fn missing(&self, num_endpoints: usize) -> Vec<(RouterId, EndpointId)> {
        self.tables
            .iter()
            .enumerate()
            .flat_map(|(router, table)| {
                (0..num_endpoints)
                    .filter(move |endpoint| !table.contains_key(endpoint))
                    .map(move |endpoint| (router, endpoint))
            })
            .collect()
    }
}

/// A queued candidate. Field order is the priority: nearest first, then earliest offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Offer {
    distance: usize,
    sequence: usize,
    router: RouterId,
    first_hop: PortIndex,
}

/// Compute routing tables for every router. Sources are expanded in parallel.
pub fn compile_routing_tables(ports: &PortMap) -> RoutingTables {
    let tables = (0..ports.num_routers())
        .into_par_iter()
        .map(|source| route_from(ports, source))
        .collect();
    RoutingTables { tables }
}

/// Shortest-path expansion from a single source router
pub fn route_from(ports: &PortMap, source: RouterId) -> BTreeMap<EndpointId, PortIndex> {
    let mut table = BTreeMap::new();
    let mut distance = vec![usize::MAX; ports.num_routers()];
    let mut frontier = BinaryHeap::new();
    let mut sequence = 0;

    let mut offer = |frontier: &mut BinaryHeap<Reverse<Offer>>,
                     distance: &mut [usize],
                     router: RouterId,
                     hops: usize,
                     first_hop: PortIndex| {
        if hops < distance[router] {
            distance[router] = hops;
            frontier.push(Reverse(Offer { distance: hops, sequence, router, first_hop }));
            sequence += 1;
        }
    };

    distance[source] = 0;

    // Local endpoints are final at distance zero
    for (port, kind) in ports.ports(source).iter().enumerate() {
        match *kind {
            PortKind::External { endpoint } => {
                table.entry(endpoint).or_insert(port);
            }
            PortKind::Internal { peer } => offer(&mut frontier, &mut distance, peer, 1, port),
        }
    }

    while let Some(Reverse(current)) = frontier.pop() {
        if current.distance > distance[current.router] {
            continue;
        }

        for kind in ports.ports(current.router) {
            match *kind {
                PortKind::External { endpoint } => {
                    table.entry(endpoint).or_insert(current.first_hop);
                }
                PortKind::Internal { peer } => offer(
                    &mut frontier,
                    &mut distance,
                    peer,
                    current.distance + 1,
                    current.first_hop,
                ),
            }
        }
    }

    table
}
