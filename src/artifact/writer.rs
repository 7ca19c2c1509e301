//! Artifact serialization.
//!
//! The layout is a compatibility contract with the simulator's loader:
//! section order, line prefixes and token order must not change.

use super::ArtifactError;
use crate::compiler::CompiledTopology;
use std::io::Write;
use std::path::Path;

/// Link latency written for every internal link; link timing is modelled by the simulator
pub const REPORTED_LINK_LATENCY: u32 = 0;

/// Weight written for internal links that carry no explicit weight
pub const DEFAULT_LINK_WEIGHT: u32 = 1;

/// Token written for a missing port hint
pub const NO_PORT: &str = "None";

/// Render a compiled topology into artifact text
pub fn render_artifact(compiled: &CompiledTopology) -> String {
    let network = &compiled.network;
    let mut out = String::new();

    out.push_str(&format!("# Topology: {}\n", compiled.name));

    out.push_str(&format!("NumRouters {}\n", network.routers.len()));
    for router in &network.routers {
        let c = compiled.router_coords[router.router_id];
        out.push_str(&format!("{} {} {} {}\n", router.router_id, c.x, c.y, c.z));
    }

    out.push_str(&format!("NumNIs {}\n", network.num_endpoints));
    for (endpoint, c) in compiled.endpoint_coords.iter().enumerate() {
        out.push_str(&format!("{} {} {} {}\n", endpoint, c.x, c.y, c.z));
    }

    out.push_str(&format!("NumExtLinks {}\n", network.ext_links.len()));
    out.push_str(&format!("NumIntLinks {}\n", network.int_links.len()));

    out.push_str("\nExtLinks\n");
    for link in &network.ext_links {
        out.push_str(&format!("{} {}\n", link.endpoint_id, link.router_id));
    }

    out.push_str("\nIntLinks\n");
    for link in &network.int_links {
        out.push_str(&format!(
            "{} {} {} {} {} {}\n",
            link.src,
            link.dst,
            REPORTED_LINK_LATENCY,
            link.weight.unwrap_or(DEFAULT_LINK_WEIGHT),
            link.src_outport.as_deref().unwrap_or(NO_PORT),
            link.dst_inport.as_deref().unwrap_or(NO_PORT),
        ));
    }

    out.push_str("\nRoutingTables\n");
    for entry in compiled.routes.entries() {
        out.push_str(&format!("{} {} {}\n", entry.router, entry.endpoint, entry.port));
    }

    out
}

/// Write the artifact atomically: a temporary file next to `path` is renamed
/// over it once fully written, so a failed write never leaves a partial file.
pub fn write_artifact(path: &Path, compiled: &CompiledTopology) -> Result<(), ArtifactError> {
    let content = render_artifact(compiled);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_err = |source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut builder = tempfile::Builder::new();
    // Same mode a plain create would get (0666 less the umask), not 0600
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut temp = builder.tempfile_in(dir).map_err(io_err)?;
    temp.write_all(content.as_bytes()).map_err(io_err)?;
    temp.flush().map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;

    log::info!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}
