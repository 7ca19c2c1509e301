//! Compilation orchestrator.
//!
//! This module coordinates the overall compilation process, managing the
//! flow from topology selection through artifact generation.

use crate::artifact::write_artifact;
use crate::compiler::{compile, CompiledTopology, GridExtent};
use crate::config::CompilerConfig;
use crate::topology::resolve_builder;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::path::PathBuf;

/// Outcome of a successful compilation
#[derive(Debug, Clone)]
pub struct CompilationReport {
    pub topology: String,
    pub output: PathBuf,
    pub routers: usize,
    pub endpoints: usize,
    pub ext_links: usize,
    pub int_links: usize,
    pub routes: usize,
    pub missing_routes: usize,
}

impl CompilationReport {
    fn new(compiled: &CompiledTopology, output: PathBuf) -> Self {
        Self {
            topology: compiled.name.clone(),
            output,
            routers: compiled.network.num_routers(),
            endpoints: compiled.network.num_endpoints,
            ext_links: compiled.network.ext_links.len(),
            int_links: compiled.network.int_links.len(),
            routes: compiled.routes.len(),
            missing_routes: compiled.missing.len(),
        }
    }
}

/// Build and compile the topology described by `config` without writing anything
pub fn build_and_compile(config: &CompilerConfig) -> Result<CompiledTopology> {
    config.validate()?;

    let builder = resolve_builder(&config.topology)
        .wrap_err_with(|| format!("Failed to load topology '{}'", config.topology))?;

    let opts = config.grid_options();
    log::info!(
        "Building {} for {}x{}x{} grid with {} endpoints",
        builder.name(),
        opts.rows,
        opts.cols,
        opts.depth,
        opts.num_endpoints
    );

    let network = builder
        .make_topology(&opts)
        .wrap_err_with(|| format!("Topology builder '{}' failed", builder.name()))?;

    let compiled = compile(
        &builder.name(),
        network,
        GridExtent::new(config.rows, config.cols),
        config.connectivity,
    )
    .wrap_err_with(|| format!("Failed to compile topology '{}'", builder.name()))?;

    Ok(compiled)
}

/// Compile the configured topology and write the artifact
pub fn generate_topology_conf(config: &CompilerConfig) -> Result<CompilationReport> {
    let compiled = build_and_compile(config)?;

    write_artifact(&config.output, &compiled)
        .wrap_err_with(|| format!("Failed to write topology artifact '{}'", config.output.display()))?;

    let report = CompilationReport::new(&compiled, config.output.clone());

    println!("Generated topology configuration at {:?}", report.output);
    println!("  - Topology: {}", report.topology);
    println!("  - Routers: {}", report.routers);
    println!("  - Network interfaces: {}", report.endpoints);
    println!("  - Links: {} external, {} internal", report.ext_links, report.int_links);
    println!("  - Routing entries: {}", report.routes);
    if report.missing_routes > 0 {
        println!("  - Missing routing entries: {} (topology is not fully connected)", report.missing_routes);
    }

    Ok(report)
}
