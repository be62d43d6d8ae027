//! Per-type pipelines and their task wiring.
//!
//! A [`BuildContext`] carries everything a pass needs - resolved
//! configuration, route table, build mode, the process build timestamp
//! and the transformer collaborators - so no task reads ambient state.
//! `register_tasks` wires each pipeline into the scheduler's registry
//! under its fixed name.

mod assets;
mod front_matter;
mod pages;
pub mod pretty;
mod redirects;
mod scripts;
mod styles;

use crate::config::SiteConfig;
use crate::routes::RouteTable;
use crate::stamp;
use crate::task::{BuildMode, Registry};
use crate::transform::{
    MarkupParser, Minifier, ScriptTransformer, StyleTransformer, html::ConservativeHtml,
    markdown::CmarkMarkdown, script::OxcScripts, style::LightningStyles,
};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared, read-only state for one pipeline invocation.
pub struct BuildContext {
    pub config: SiteConfig,
    pub routes: RouteTable,
    pub mode: BuildMode,
    /// The process-wide build timestamp (injectable for tests).
    pub stamp: String,
    pub scripts: Box<dyn ScriptTransformer>,
    pub styles: Box<dyn StyleTransformer>,
    pub markup: Box<dyn MarkupParser>,
    pub minifier: Box<dyn Minifier>,
}

impl BuildContext {
    /// Context with the bundled collaborators and the process stamp.
    pub fn new(config: SiteConfig, routes: RouteTable, mode: BuildMode) -> Self {
        Self {
            config,
            routes,
            mode,
            stamp: stamp::build_timestamp().to_string(),
            scripts: Box::new(OxcScripts),
            styles: Box::new(LightningStyles),
            markup: Box::new(CmarkMarkdown),
            minifier: Box::new(ConservativeHtml),
        }
    }
}

/// Register the per-type pipeline tasks.
pub fn register_tasks(registry: &mut Registry, ctx: &Arc<BuildContext>) {
    let c = Arc::clone(ctx);
    registry.register("setup", move || setup_output(&c.config));

    let c = Arc::clone(ctx);
    registry.register("clean", move || clean_output(&c.config));

    let c = Arc::clone(ctx);
    registry.register("scripts", move || scripts::run(&c));

    let c = Arc::clone(ctx);
    registry.register("pages", move || pages::run(&c));

    let c = Arc::clone(ctx);
    registry.register("styles", move || styles::run(&c));

    let c = Arc::clone(ctx);
    registry.register("static", move || assets::run(&c));

    let c = Arc::clone(ctx);
    registry.register("redirects", move || {
        redirects::compile_redirects(
            &c.routes,
            &c.config.canonical_url,
            &c.config.output_dir(),
            c.config.host_handles_routes,
        )
    });
}

// ============================================================================
// setup / clean
// ============================================================================

/// Create the output root if missing.
fn setup_output(config: &SiteConfig) -> Result<()> {
    let output = config.output_dir();
    fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output folder {}", output.display()))
}

/// Remove everything inside the output root, keeping the root itself.
fn clean_output(config: &SiteConfig) -> Result<()> {
    let output = config.output_dir();
    if !output.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(&output)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        }
        .with_context(|| format!("failed to clean {}", path.display()))?;
    }
    Ok(())
}

// ============================================================================
// shared helpers
// ============================================================================

/// Source files under the source root matching an extension predicate,
/// as root-relative paths in sorted order (deterministic output).
pub(crate) fn scan_sources<F>(source_dir: &Path, mut keep: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path) -> bool,
{
    let mut files = Vec::new();
    if !source_dir.exists() {
        return Ok(files);
    }
    for entry in jwalk::WalkDir::new(source_dir).sort(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = path
            .strip_prefix(source_dir)
            .unwrap_or(&path)
            .to_path_buf();
        if keep(&rel) {
            files.push(rel);
        }
    }
    files.sort();
    Ok(files)
}

/// Extension of a relative path, lowercased.
pub(crate) fn extension(rel: &Path) -> Option<String> {
    rel.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Write file contents, creating intermediate directories. Filesystem
/// failures are fatal for the whole pipeline run.
pub(crate) fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
impl BuildContext {
    /// Context over a minimal config with a fixed build timestamp.
    pub fn test_context(root: &Path, mode: BuildMode) -> Self {
        let mut ctx = Self::new(SiteConfig::test_config(root), RouteTable::default(), mode);
        ctx.stamp = "202401011200".to_string();
        ctx
    }
}
