//! Script pipeline: compile `.js` sources into the output tree.

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

    let files = scan_sources(&source_dir, |rel| extension(rel).as_deref() == Some("js"))?;
    files.par_iter().try_for_each(|rel| {
        let source = fs::read_to_string(source_dir.join(rel))
            .with_context(|| format!("failed to read {}", rel.display()))?;
        let compiled = ctx
            .scripts
            .compile(&source, ctx.mode)
            .with_context(|| format!("failed to compile {}", rel.display()))?;

        let out_rel = if ctx.config.cache_busting && !is_excluded(rel, &exclusions) {
            stamp::stamped_filename(rel, &ctx.stamp)
        } else {
            rel.clone()
        };
        write_output(&output_dir.join(out_rel), compiled.as_bytes())
    })?;

    crate::debug!("scripts"; "compiled {} script(s)", files.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::BuildMode;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_src(root: &Path, rel: &str, contents: &str) {
        let path = root.join("src").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_compiles_into_output_tree() {
        let dir = TempDir::new().unwrap();
        write_src(dir.path(), "js/app.js", "const a = 1;\nconsole.log(a);\n");

        let ctx = BuildContext::test_context(dir.path(), BuildMode::Development);
        run(&ctx).unwrap();

        let out = fs::read_to_string(ctx.config.output_dir().join("js/app.js")).unwrap();
        assert!(out.contains("console.log"));
    }

    #[test]
    fn test_cache_busting_renames_bundles() {
        let dir = TempDir::new().unwrap();
        write_src(dir.path(), "js/app.js", "console.log(1);\n");

        let mut ctx = BuildContext::test_context(dir.path(), BuildMode::Production);
        ctx.config.cache_busting = true;
        run(&ctx).unwrap();

        let output = ctx.config.output_dir();
        assert!(output.join("js/app.202401011200.js").exists());
        assert!(!output.join("js/app.js").exists());
    }

    #[test]
    fn test_production_minifies() {
        let dir = TempDir::new().unwrap();
        write_src(
            dir.path(),
            "app.js",
            "function add(first, second) {\n    return first + second;\n}\nconsole.log(add(1, 2));\n",
        );

        let ctx = BuildContext::test_context(dir.path(), BuildMode::Production);
        run(&ctx).unwrap();

        let out = fs::read_to_string(ctx.config.output_dir().join("app.js")).unwrap();
        assert!(!out.contains("first"), "parameters should be mangled");
        assert!(!out.contains("\n    "));
    }

    #[test]
    fn test_invalid_source_fails_pipeline() {
        let dir = TempDir::new().unwrap();
        write_src(dir.path(), "bad.js", "const = ;");

        let ctx = BuildContext::test_context(dir.path(), BuildMode::Development);
        assert!(run(&ctx).is_err());
    }
}
