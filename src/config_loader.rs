use crate::compiler::ConnectivityPolicy;
use crate::config::CompilerConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and parse compiler configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<CompilerConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration file '{}'", config_path.display()))?;

    let config: CompilerConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Command-line values that override the configuration file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub topology: Option<String>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub depth: Option<usize>,
    pub num_cpus: Option<usize>,
    pub output: Option<PathBuf>,
    pub strict: bool,
    pub threads: Option<usize>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut CompilerConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(topology) = &overrides.topology {
        config.topology = topology.clone();
    }
    if let Some(rows) = overrides.rows {
        config.rows = rows;
    }
    if let Some(cols) = overrides.cols {
        config.cols = cols;
    }
    if let Some(depth) = overrides.depth {
        config.depth = depth;
    }
    if overrides.num_cpus.is_some() {
        config.num_cpus = overrides.num_cpus;
    }
    if let Some(output) = &overrides.output {
        config.output = output.clone();
    }
    if overrides.strict {
        config.connectivity = ConnectivityPolicy::Strict;
    }
    if let Some(threads) = overrides.threads {
        config.threads = threads;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
