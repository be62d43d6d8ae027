//! Static asset pipeline: byte-for-byte copies of everything no other
//! pipeline claims.

use super::{BuildContext, extension, scan_sources};
use crate::utils::to_slash;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Extensions owned by the script, markup, style and template pipelines.
const PIPELINE_EXTS: [&str; 6] = ["js", "html", "htm", "md", "css", "hbs"];

pub fn run(ctx: &BuildContext) -> Result<()> {
    let source_dir = ctx.config.source_dir();
    let output_dir = ctx.config.output_dir();
    // The route table is build input, not site content. When the host
    // interprets it natively it ships to the platform as-is instead.
    let copy_routes_file = ctx.config.host_handles_routes;

    let files = scan_sources(&source_dir, |rel| {
        is_static(rel) && (copy_routes_file || to_slash(rel) != "routes.json")
    })?;

    for rel in &files {
        let target = output_dir.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::copy(source_dir.join(rel), &target)
            .with_context(|| format!("failed to copy {}", rel.display()))?;
    }

    crate::debug!("static"; "copied {} static file(s)", files.len());
    Ok(())
}

fn is_static(rel: &Path) -> bool {
    match extension(rel) {
        Some(ext) => !PIPELINE_EXTS.contains(&ext.as_str()),
        None => true,
    }
}
