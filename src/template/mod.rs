//! Layout template cache.
//!
//! Layouts live at `src/layouts/<name>.hbs`. The cache is an explicit
//! context object owned by one markup pass: [`TemplateCache::fresh`]
//! builds a new cache (eagerly loading the mandatory `base` partial,
//! which every page uses), and [`TemplateCache::get`] lazily reads each
//! other layout at most once for the lifetime of the cache.
//!
//! The invalidation contract is constructive: there is no `clear()`,
//! a pass that wants to observe template edits builds a fresh cache.
//! Creating it once at the start of every markup pass - never per file -
//! bounds filesystem reads to one per distinct layout per pass while
//! still letting dev-mode rebuilds see layout changes.

pub mod render;

use crate::config::LAYOUT_EXT;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The partial included by every layout, loaded eagerly.
pub const BASE_PARTIAL: &str = "base";

/// Template loading errors. A missing layout aborts the current pass.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("layout `{layout}` not found at {}", path.display())]
    NotFound { layout: String, path: PathBuf },

    #[error("IO error when reading layout `{0}`")]
    Io(String, #[source] std::io::Error),
}

/// Mapping from layout name to raw template text, valid for one pass.
#[derive(Debug)]
pub struct TemplateCache {
    dir: PathBuf,
    base: String,
    templates: FxHashMap<String, String>,
}

impl TemplateCache {
    /// Build a fresh cache for one markup pass.
    ///
    /// Reads the mandatory `base` partial immediately; a site without it
    /// cannot render any page, so failing here fails the pass up front.
    pub fn fresh(layouts_dir: &Path) -> Result<Self, TemplateError> {
        let base = read_layout(layouts_dir, BASE_PARTIAL)?;
        Ok(Self {
            dir: layouts_dir.to_path_buf(),
            base,
            templates: FxHashMap::default(),
        })
    }

    /// The raw text of the `base` partial.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Get a layout's raw text, reading it from disk on first use.
    pub fn get(&mut self, layout: &str) -> Result<&str, TemplateError> {
        match self.templates.entry(layout.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let text = read_layout(&self.dir, layout)?;
                Ok(entry.insert(text))
            }
        }
    }
}

fn read_layout(dir: &Path, layout: &str) -> Result<String, TemplateError> {
    let path = dir.join(format!("{layout}.{LAYOUT_EXT}"));
    fs::read_to_string(&path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            TemplateError::NotFound {
                layout: layout.to_string(),
                path,
            }
        } else {
            TemplateError::Io(layout.to_string(), err)
        }
    })
}

/// Year-range helper: `year_range(None, 2020)` is `"2020"`,
/// `year_range(Some(1981), 2020)` is `"1981-2020"`. A `from` in the
/// current year or the future collapses to the current year alone.
pub fn year_range(from: Option<u16>, current: u16) -> String {
    match from {
        Some(from) if from < current => format!("{from}-{current}"),
        _ => current.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn layouts(entries: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, text) in entries {
            fs::write(dir.path().join(format!("{name}.hbs")), text).unwrap();
        }
        dir
    }

    #[test]
    fn test_fresh_requires_base_partial() {
        let dir = layouts(&[("default", "<main>{{content}}</main>")]);
        let err = TemplateCache::fresh(dir.path()).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { layout, .. } if layout == "base"));
    }

    #[test]
    fn test_get_missing_layout_is_not_found() {
        let dir = layouts(&[("base", "<html>")]);
        let mut cache = TemplateCache::fresh(dir.path()).unwrap();
        let err = cache.get("missing").unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { layout, .. } if layout == "missing"));
    }

    #[test]
    fn test_get_reads_at_most_once_per_pass() {
        let dir = layouts(&[("base", "<html>"), ("default", "v1")]);
        let mut cache = TemplateCache::fresh(dir.path()).unwrap();
        assert_eq!(cache.get("default").unwrap(), "v1");

        // Edit after first read: same pass keeps serving the cached text
        fs::write(dir.path().join("default.hbs"), "v2").unwrap();
        assert_eq!(cache.get("default").unwrap(), "v1");

        // A fresh cache (next pass) observes the edit
        let mut next = TemplateCache::fresh(dir.path()).unwrap();
        assert_eq!(next.get("default").unwrap(), "v2");
    }

    #[test]
    fn test_fresh_reloads_base_between_passes() {
        let dir = layouts(&[("base", "old base")]);
        let cache = TemplateCache::fresh(dir.path()).unwrap();
        assert_eq!(cache.base(), "old base");

        fs::write(dir.path().join("base.hbs"), "new base").unwrap();
        let next = TemplateCache::fresh(dir.path()).unwrap();
        assert_eq!(next.base(), "new base");
    }

    #[test]
    fn test_year_range() {
        assert_eq!(year_range(None, 2020), "2020");
        assert_eq!(year_range(Some(1981), 2020), "1981-2020");
        assert_eq!(year_range(Some(2020), 2020), "2020");
        assert_eq!(year_range(Some(2031), 2020), "2020");
    }
}
