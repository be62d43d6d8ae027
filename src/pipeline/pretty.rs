//! Pretty-URL path rewriting.
//!
//! `dir/name.ext` becomes `dir/name/index.html` so pages are reachable
//! at extension-less URLs. Two classes of paths pass through unchanged:
//! files already named `index.*`, and override serve paths from the
//! route table (platforms address those by literal filename, and a
//! rewritten copy would break every later exclusion lookup).

use crate::routes;
use crate::utils::to_slash;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// Rewrite an output-relative path to its pretty form.
pub fn rewrite(rel: &Path, exclusions: &FxHashSet<String>) -> PathBuf {
    let Some(stem) = rel.file_stem().and_then(|s| s.to_str()) else {
        return rel.to_path_buf();
    };
    if stem == "index" || is_excluded(rel, exclusions) {
        return rel.to_path_buf();
    }
    let dir = rel.parent().unwrap_or(Path::new(""));
    dir.join(stem).join("index.html")
}

/// Whether a relative output path matches an override serve path.
pub fn is_excluded(rel: &Path, exclusions: &FxHashSet<String>) -> bool {
    exclusions.contains(&routes::normalize_key(&to_slash(rel)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclusions(paths: &[&str]) -> FxHashSet<String> {
        paths.iter().map(|p| routes::normalize_key(p)).collect()
    }

    #[test]
    fn test_rewrites_to_directory_index() {
        let none = FxHashSet::default();
        assert_eq!(
            rewrite(Path::new("about.html"), &none),
            PathBuf::from("about/index.html")
        );
        assert_eq!(
            rewrite(Path::new("docs/setup.html"), &none),
            PathBuf::from("docs/setup/index.html")
        );
    }

    #[test]
    fn test_index_files_unchanged() {
        let none = FxHashSet::default();
        assert_eq!(
            rewrite(Path::new("index.html"), &none),
            PathBuf::from("index.html")
        );
        assert_eq!(
            rewrite(Path::new("blog/index.html"), &none),
            PathBuf::from("blog/index.html")
        );
    }

    #[test]
    fn test_override_serve_paths_unchanged() {
        let set = exclusions(&["/404.html"]);
        assert_eq!(
            rewrite(Path::new("404.html"), &set),
            PathBuf::from("404.html")
        );
        // Non-override siblings still rewrite
        assert_eq!(
            rewrite(Path::new("about.html"), &set),
            PathBuf::from("about/index.html")
        );
    }

    #[test]
    fn test_exclusion_matches_spelling_variants() {
        // The table said "./404.html"; the pipeline looks up "404.html"
        let set = exclusions(&["./404.html"]);
        assert!(is_excluded(Path::new("404.html"), &set));
    }
}
