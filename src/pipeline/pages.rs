//! Markup pipeline: front matter, markdown, layout rendering and
//! pretty-URL placement for `.html`, `.htm` and `.md` sources.
//!
//! Each pass builds a fresh [`TemplateCache`] before touching any page,
//! so a whole pass renders against one consistent snapshot of the
//! layouts and a dev-mode rebuild observes template edits.

use super::{BuildContext, extension, front_matter, pretty, scan_sources, write_output};
use crate::stamp;
use crate::template::{TemplateCache, render};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

const PAGE_EXTS: [&str; 3] = ["html", "htm", "md"];

pub fn run(ctx: &BuildContext) -> Result<()> {
    let source_dir = ctx.config.source_dir();
    let output_dir = ctx.config.output_dir();
    let exclusions = ctx.routes.exclusion_set();
    let helpers = render::default_helpers();

    let files = scan_sources(&source_dir, |rel| {
        matches!(extension(rel).as_deref(), Some(ext) if PAGE_EXTS.contains(&ext))
    })?;
    if files.is_empty() {
        return Ok(());
    }

    // One cache per pass. Layouts are read at most once each below.
    let mut cache = TemplateCache::fresh(&ctx.config.layouts_dir())?;

    for rel in &files {
        let source = fs::read_to_string(source_dir.join(rel))
            .with_context(|| format!("failed to read {}", rel.display()))?;
        let html = compile_page(ctx, &mut cache, &helpers, rel, &source)
            .with_context(|| format!("failed to build page {}", rel.display()))?;

        // Override serve paths are matched by the source filename as
        // authored, extension included, and keep that exact name.
        let out_rel = if pretty::is_excluded(rel, &exclusions) {
            rel.clone()
        } else {
            pretty::rewrite(&rel.with_extension("html"), &exclusions)
        };
        write_output(&output_dir.join(out_rel), html.as_bytes())?;
    }

    crate::debug!("pages"; "built {} page(s)", files.len());
    Ok(())
}

fn compile_page(
    ctx: &BuildContext,
    cache: &mut TemplateCache,
    helpers: &FxHashMap<&'static str, render::Helper>,
    rel: &Path,
    source: &str,
) -> Result<String> {
    let (matter, body) = front_matter::split(source);

    let body = if extension(rel).as_deref() == Some("md") {
        ctx.markup.to_html(body)?
    } else {
        body.to_string()
    };

    let mut vars = matter.vars;
    vars.insert("site.canonicalUrl".to_string(), ctx.config.canonical_url.clone());
    if ctx.config.cache_busting {
        vars.insert("timestamp".to_string(), ctx.stamp.clone());
    }

    let layout = matter.layout.as_deref().unwrap_or(&ctx.config.default_layout);
    let template = cache.get(layout)?.to_string();

    let rendered = render::render(
        &template,
        cache.base(),
        &render::RenderContext {
            content: &body,
            vars: &vars,
            helpers,
        },
    );

    // Body text is inserted after placeholder substitution, so its
    // literal tokens are still present here.
    let rendered = if ctx.config.cache_busting {
        stamp::replace_token(&rendered, &ctx.stamp)
    } else {
        rendered
    };

    if ctx.mode.is_production() {
        Ok(ctx.minifier.minify(&rendered)?)
    } else {
        Ok(rendered)
    }
}
