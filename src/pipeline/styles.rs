//! Style pipeline: compile `.css` sources into the output tree.

use super::{BuildContext, extension, scan_sources, write_output};
use crate::pipeline::pretty::is_excluded;
use crate::stamp;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;

pub fn run(ctx: &BuildContext) -> Result<()> {
    let source_dir = ctx.config.source_dir();
    let output_dir = ctx.config.output_dir();
    let exclusions = ctx.routes.exclusion_set();

    let files = scan_sources(&source_dir, |rel| extension(rel).as_deref() == Some("css"))?;
    files.par_iter().try_for_each(|rel| {
        let source = fs::read_to_string(source_dir.join(rel))
            .with_context(|| format!("failed to read {}", rel.display()))?;
        let compiled = ctx
            .styles
            .compile(&source, ctx.mode)
            .with_context(|| format!("failed to compile {}", rel.display()))?;

        let out_rel = if ctx.config.cache_busting && !is_excluded(rel, &exclusions) {
            stamp::stamped_filename(rel, &ctx.stamp)
        } else {
            rel.clone()
        };
        write_output(&output_dir.join(out_rel), compiled.as_bytes())
    })?;

    crate::debug!("styles"; "compiled {} stylesheet(s)", files.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::BuildMode;
    use tempfile::TempDir;

    #[test]
    fn test_development_keeps_readable_css() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src/css");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("site.css"), "body {\n  color: red;\n}\n").unwrap();

        let ctx = BuildContext::test_context(dir.path(), BuildMode::Development);
        run(&ctx).unwrap();

        let out = fs::read_to_string(ctx.config.output_dir().join("css/site.css")).unwrap();
        assert!(out.contains("color: red"));
    }

    #[test]
    fn test_production_minifies_and_stamps() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("site.css"), "body {\n  color: #ff0000;\n}\n").unwrap();

        let mut ctx = BuildContext::test_context(dir.path(), BuildMode::Production);
        ctx.config.cache_busting = true;
        run(&ctx).unwrap();

        let path = ctx.config.output_dir().join("site.202401011200.css");
        let out = fs::read_to_string(path).unwrap();
        assert!(out.contains("red") || out.contains("#f00"));
        assert!(!out.contains('\n'));
    }
}
