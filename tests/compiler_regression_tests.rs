#[cfg(test)]
mod compiler_regression_tests {
    use std::path::PathBuf;

    use garnet_topo::artifact::{parse_artifact, read_artifact, render_artifact, write_artifact};
    use garnet_topo::compiler::{compile, CompileError, CompiledTopology, ConnectivityPolicy, GridExtent, PortKind};
    use garnet_topo::config_loader::load_config;
    use garnet_topo::orchestrator::generate_topology_conf;
    use garnet_topo::topology::{
        resolve_builder, BuiltinTopology, ExtLink, GridOptions, IntLink, Network, Router, TopologyBuilder,
    };

    fn manifest_path(relative: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
    }

    fn one_endpoint_per_router(num_routers: usize) -> Network {
        Network {
            routers: (0..num_routers).map(|router_id| Router { router_id }).collect(),
            ext_links: (0..num_routers)
                .map(|i| ExtLink { endpoint_id: i, router_id: i, latency: None })
                .collect(),
            int_links: Vec::new(),
            num_endpoints: num_routers,
        }
    }

    fn builtin(topology: BuiltinTopology, opts: GridOptions) -> CompiledTopology {
        let network = topology.make_topology(&opts).unwrap();
        compile(
            topology.name(),
            network,
            GridExtent::new(opts.rows, opts.cols),
            ConnectivityPolicy::Strict,
        )
        .unwrap()
    }

    /// 2x2 grid: 0 East to 1, 0 South to 2, 1 South to 3, 3 West to 2
    fn scenario_a(east_first: bool) -> Network {
        let mut network = one_endpoint_per_router(4);
        let east = (IntLink::with_ports(0, 1, "East", "West"), IntLink::with_ports(1, 0, "West", "East"));
        let south = (IntLink::with_ports(0, 2, "South", "North"), IntLink::with_ports(2, 0, "North", "South"));
        let (first, second) = if east_first { (east, south) } else { (south, east) };
        network.connect(first.0, first.1);
        network.connect(second.0, second.1);
        network.connect(IntLink::with_ports(1, 3, "South", "North"), IntLink::with_ports(3, 1, "North", "South"));
        network.connect(IntLink::with_ports(3, 2, "West", "East"), IntLink::with_ports(2, 3, "East", "West"));
        network
    }

    #[test]
    fn test_scenario_a_tie_break_follows_emission_order() {
        let compiled = compile("scenario_a", scenario_a(true), GridExtent::new(2, 2), ConnectivityPolicy::Strict).unwrap();

        // router 0: port 0 -> NI 0, port 1 -> router 1, port 2 -> router 2
        assert_eq!(compiled.ports.ports(0)[1], PortKind::Internal { peer: 1 });
        assert_eq!(compiled.ports.ports(0)[2], PortKind::Internal { peer: 2 });
        assert_eq!(compiled.routes.first_hop(0, 3), Some(1));

        // Emitting the southern link first flips the tie toward router 2
        let compiled = compile("scenario_a", scenario_a(false), GridExtent::new(2, 2), ConnectivityPolicy::Strict).unwrap();
        assert_eq!(compiled.ports.ports(0)[1], PortKind::Internal { peer: 2 });
        assert_eq!(compiled.routes.first_hop(0, 3), Some(1));
        assert_eq!(compiled.routes.first_hop(0, 1), Some(2));
    }

    #[test]
    fn test_scenario_b_crossbar() {
        let compiled = builtin(BuiltinTopology::Crossbar, GridOptions::new(1, 16));

        assert_eq!(compiled.routes.num_routers(), 1);
        let table = compiled.routes.table(0).unwrap();
        assert_eq!(table.len(), 16);
        for (&endpoint, &port) in table {
            assert_eq!(port, endpoint);
            assert_eq!(compiled.ports.ports(0)[port], PortKind::External { endpoint });
        }
    }

    #[test]
    fn test_scenario_c_disconnected() {
        let network = one_endpoint_per_router(2);

        let lenient = compile("split", network.clone(), GridExtent::new(1, 2), ConnectivityPolicy::Lenient).unwrap();
        assert_eq!(lenient.routes.table(0).unwrap().len(), 1);
        assert_eq!(lenient.routes.first_hop(0, 0), Some(0));
        assert_eq!(lenient.routes.first_hop(1, 1), Some(0));
        assert_eq!(lenient.routes.first_hop(0, 1), None);
        assert_eq!(lenient.missing, vec![(0, 1), (1, 0)]);

        let err = compile("split", network, GridExtent::new(1, 2), ConnectivityPolicy::Strict).unwrap_err();
        assert!(matches!(err, CompileError::ConnectivityGap { router: 0, endpoint: 1, missing: 2 }));
        assert!(err.to_string().contains("Endpoint 1 is unreachable from router 0"));
    }

    #[test]
    fn test_ports_externals_first() {
        let opts = GridOptions { depth: 2, num_endpoints: 24, ..GridOptions::new(2, 3) };
        let compiled = builtin(BuiltinTopology::Mesh3d, opts);

        for router in 0..compiled.network.num_routers() {
            let ports = compiled.ports.ports(router);
            let externals = ports.iter().filter(|p| matches!(p, PortKind::External { .. })).count();
            assert!(ports[..externals].iter().all(|p| matches!(p, PortKind::External { .. })));
            assert!(ports[externals..].iter().all(|p| matches!(p, PortKind::Internal { .. })));
        }
        assert_eq!(
            compiled.ports.total_ports(),
            compiled.network.ext_links.len() + compiled.network.int_links.len()
        );
    }

    #[test]
    fn test_attached_endpoints_use_external_port() {
        for (topology, opts) in [
            (BuiltinTopology::MeshXy, GridOptions { num_endpoints: 32, ..GridOptions::new(4, 4) }),
            (BuiltinTopology::Pt2Pt, GridOptions::new(1, 5)),
            (BuiltinTopology::Mesh3d, GridOptions { depth: 3, num_endpoints: 12, ..GridOptions::new(2, 2) }),
        ] {
            let compiled = builtin(topology, opts);
            for link in &compiled.network.ext_links {
                let local = compiled.ports.external_port(link.router_id, link.endpoint_id);
                assert!(local.is_some());
                assert_eq!(compiled.routes.first_hop(link.router_id, link.endpoint_id), local);
            }
        }
    }

    #[test]
    fn test_pt2pt_single_hop() {
        let compiled = builtin(BuiltinTopology::Pt2Pt, GridOptions::new(1, 4));
        // router 2: port 0 -> NI 2, then routers 0, 1, 3
        assert_eq!(compiled.routes.first_hop(2, 0), Some(1));
        assert_eq!(compiled.routes.first_hop(2, 1), Some(2));
        assert_eq!(compiled.routes.first_hop(2, 3), Some(3));
    }

    #[test]
    fn test_mesh_routes_take_first_emitted_direction() {
        let compiled = builtin(BuiltinTopology::MeshXy, GridOptions::new(2, 2));
        // router 0 emits South (to 2) before East (to 1): port 1 -> 2, port 2 -> 1
        assert_eq!(compiled.ports.ports(0)[1], PortKind::Internal { peer: 2 });
        assert_eq!(compiled.routes.first_hop(0, 3), Some(1));
        assert_eq!(compiled.routes.first_hop(0, 1), Some(2));
    }

    #[test]
    fn test_deterministic_across_runs_and_threads() {
        let opts = GridOptions::new(4, 4);
        let reference = render_artifact(&builtin(BuiltinTopology::MeshXy, opts));

        for threads in [1, 3, 8] {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
            let text = pool.install(|| render_artifact(&builtin(BuiltinTopology::MeshXy, opts)));
            assert_eq!(text, reference, "artifact differs with {} threads", threads);
        }
    }

    #[test]
    fn test_mirrored_mesh_is_isomorphic() {
        let (rows, cols) = (3, 4);
        let plain = BuiltinTopology::MeshXy.make_topology(&GridOptions::new(rows, cols)).unwrap();
        let mirror = |id: usize| (id / cols) * cols + (cols - 1 - id % cols);

        let mirrored = Network {
            routers: plain.routers.clone(),
            ext_links: plain
                .ext_links
                .iter()
                .map(|l| ExtLink { endpoint_id: mirror(l.endpoint_id), router_id: mirror(l.router_id), latency: None })
                .collect(),
            int_links: plain
                .int_links
                .iter()
                .map(|l| IntLink::new(mirror(l.src), mirror(l.dst)))
                .collect(),
            num_endpoints: plain.num_endpoints,
        };

        let grid = GridExtent::new(rows, cols);
        let a = compile("plain", plain, grid, ConnectivityPolicy::Strict).unwrap();
        let b = compile("mirrored", mirrored, grid, ConnectivityPolicy::Strict).unwrap();

        for entry in a.routes.entries() {
            assert_eq!(
                b.routes.first_hop(mirror(entry.router), mirror(entry.endpoint)),
                Some(entry.port),
                "router {} endpoint {}",
                entry.router,
                entry.endpoint
            );
        }
        assert_eq!(a.routes.len(), b.routes.len());
    }

    #[test]
    fn test_artifact_round_trip_verifies() {
        let opts = GridOptions { depth: 2, num_endpoints: 8, ..GridOptions::new(2, 2) };
        let compiled = builtin(BuiltinTopology::Mesh3d, opts);
        let parsed = parse_artifact(&render_artifact(&compiled)).unwrap();

        assert_eq!(parsed.name.as_deref(), Some("Mesh_3D"));
        assert_eq!(parsed.routes, compiled.routes.entries().collect::<Vec<_>>());
        assert_eq!(parsed.routers[5].coord, compiled.router_coords[5]);

        let summary = parsed.verify().unwrap();
        assert_eq!(summary.routers, 8);
        assert_eq!(summary.routes, 64);
        assert_eq!(summary.missing_routes, 0);
    }

    #[test]
    fn test_definition_file_ring() {
        let selector = manifest_path("topologies/ring4.yaml");
        let builder = resolve_builder(selector.to_str().unwrap()).unwrap();
        assert_eq!(builder.name(), "Ring4");

        let network = builder.make_topology(&GridOptions::new(2, 2)).unwrap();
        let compiled = compile(&builder.name(), network, GridExtent::new(2, 2), ConnectivityPolicy::Strict).unwrap();

        // router 0: port 1 clockwise to 1, port 2 counterclockwise to 3; the
        // opposite router is two hops either way and the clockwise port wins
        assert_eq!(compiled.routes.first_hop(0, 2), Some(1));
        assert_eq!(compiled.routes.first_hop(0, 3), Some(2));
        assert!(render_artifact(&compiled).contains("0 1 0 1 Clockwise Counterclockwise\n"));
    }

    #[test]
    fn test_config_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = load_config(&manifest_path("configs/mesh_4x4.yaml")).unwrap();
        config.output = dir.path().join("topology.conf");

        let report = generate_topology_conf(&config).unwrap();
        assert_eq!(report.routers, 16);
        assert_eq!(report.routes, 256);

        let summary = read_artifact(&config.output).unwrap().verify().unwrap();
        assert_eq!(summary.routes, 256);
        assert_eq!(summary.int_links, 48);
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crossbar.conf");
        let compiled = builtin(BuiltinTopology::Crossbar, GridOptions::new(4, 4));

        write_artifact(&path, &compiled).unwrap();
        let parsed = read_artifact(&path).unwrap();
        assert_eq!(parsed.routers.len(), 1);
        assert_eq!(parsed.endpoints.len(), 16);
        assert_eq!(parsed.endpoints[5].coord, compiled.endpoint_coords[5]);
        assert!(parsed.int_links.is_empty());
    }

    #[test]
    fn test_huge_endpoint_count_fails_cleanly() {
        let network = Network { num_endpoints: usize::MAX / 8, ..one_endpoint_per_router(1) };
        let err = compile("huge", network, GridExtent::new(1, 1), ConnectivityPolicy::Lenient).unwrap_err();
        assert!(matches!(err, CompileError::Topology(_)));
        assert!(err.to_string().contains("Endpoint 1 has no external link"));
    }
}
