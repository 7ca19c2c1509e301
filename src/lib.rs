//! # garnet-topo - Topology compiler for the standalone Garnet network simulator
//!
//! This library turns an abstract interconnect topology into the
//! `topology.conf` file the simulator loads at startup.
//!
//! ## Overview
//!
//! The simulator indexes router ports purely by the order in which links
//! appear in its configuration file, and trusts the routing tables it is
//! given. This crate derives both from a topology description so that the
//! simulated paths match the physical links the topology claims to have.
//!
//! ## Key Features
//!
//! - **Built-in Topologies**: `Mesh_XY`, `Mesh_3D`, `Crossbar`, `Pt2Pt`
//! - **Definition Files**: explicit router/link lists in YAML or JSON
//! - **Deterministic Routing**: shortest-path first-hop tables whose ties are
//!   broken by link emission order
//! - **Strict Mode**: optionally reject topologies that are not fully connected
//! - **Verification**: check an existing `topology.conf` for consistency
//!
//! ## Architecture
//!
//! - `topology`: builder capability, built-in builders, definition files
//! - `compiler`: port assignment, coordinates, routing tables
//! - `artifact`: serialization and parsing of `topology.conf`
//! - `config` / `config_loader`: compiler configuration and CLI overrides
//! - `orchestrator`: end-to-end compilation
//! - `utils`: builder contract validation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use garnet_topo::{config::CompilerConfig, orchestrator};
//!
//! let config = CompilerConfig {
//!     topology: "Mesh_XY".to_string(),
//!     rows: 4,
//!     cols: 4,
//!     ..CompilerConfig::default()
//! };
//!
//! // Writes topology.conf in the current directory
//! let report = orchestrator::generate_topology_conf(&config)?;
//! assert_eq!(report.routes, 256);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Component errors are `thiserror` enums; the orchestration layer wraps them
//! into `color_eyre` reports with context.

pub mod artifact;
pub mod compiler;
pub mod config;
pub mod config_loader;
pub mod orchestrator;
pub mod topology;
pub mod utils;
