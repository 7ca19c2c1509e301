use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::{Path, PathBuf};

use garnet_topo::artifact::read_artifact;
use garnet_topo::config::CompilerConfig;
use garnet_topo::config_loader::{self, CliOverrides};
use garnet_topo::orchestrator::generate_topology_conf;
use garnet_topo::topology::BuiltinTopology;

/// Topology and routing-table compiler for the standalone Garnet network simulator
#[derive(Parser, Debug)]
#[command(name = "garnet-topo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a topology into a simulator configuration file
    Compile(CompileArgs),

    /// Check an existing configuration file for consistency
    Verify {
        /// Path to the configuration file
        #[arg(default_value = "topology.conf")]
        artifact: PathBuf,
    },

    /// List built-in topologies
    List,
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Built-in topology name or path to a topology definition (YAML/JSON)
    #[arg(short, long)]
    topology: Option<String>,

    /// Number of grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Number of grid columns
    #[arg(long)]
    cols: Option<usize>,

    /// Number of grid layers (3-D topologies)
    #[arg(long)]
    depth: Option<usize>,

    /// Override the number of network interfaces
    #[arg(long)]
    num_cpus: Option<usize>,

    /// Output path for the generated configuration
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail if any router cannot reach every network interface
    #[arg(long)]
    strict: bool,

    /// Number of routing workers (0 = auto-detect)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Path to a compiler configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CompileArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            topology: self.topology.clone(),
            rows: self.rows,
            cols: self.cols,
            depth: self.depth,
            num_cpus: self.num_cpus,
            output: self.output.clone(),
            strict: self.strict,
            threads: self.threads,
        }
    }
}

fn compile(args: &CompileArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => config_loader::load_config(path)?,
        None => CompilerConfig::default(),
    };
    config_loader::apply_overrides(&mut config, &args.overrides())?;

    if config.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
            .wrap_err("Failed to configure thread pool")?;
    }

    info!("Topology: {}", config.topology);
    info!("Output file: {:?}", config.output);

    generate_topology_conf(&config)?;
    Ok(())
}

fn verify(artifact: &Path) -> Result<()> {
    let parsed = read_artifact(artifact)
        .wrap_err_with(|| format!("Failed to read '{}'", artifact.display()))?;
    let summary = parsed
        .verify()
        .wrap_err_with(|| format!("Verification of '{}' failed", artifact.display()))?;

    println!("{:?} is consistent", artifact);
    if let Some(name) = &parsed.name {
        println!("  - Topology: {}", name);
    }
    println!("  - Routers: {}", summary.routers);
    println!("  - Network interfaces: {}", summary.endpoints);
    println!("  - Links: {} external, {} internal", summary.ext_links, summary.int_links);
    println!("  - Routing entries: {}", summary.routes);
    if summary.missing_routes > 0 {
        println!("  - Missing routing entries: {}", summary.missing_routes);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    match &cli.command {
        Commands::Compile(args) => compile(args),
        Commands::Verify { artifact } => verify(artifact),
        Commands::List => {
            for topology in BuiltinTopology::ALL {
                println!("{:<10} {}", topology.name(), topology.description());
            }
            Ok(())
        }
    }
}
