//! Request-URL resolution against the generated output tree.
//!
//! The pipeline writes pages at `<name>/index.html`, so an extension-less
//! request resolves by probing the directory index after the literal path.

use crate::utils::normalize_path;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Resolve a request URL to a file under the serve root.
///
/// Returns the literal file when it exists, otherwise the pretty-URL
/// directory index. Requests that decode to a non-relative path or walk
/// above the root are rejected.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let rel = request_path(url)?;
    let local = serve_root.join(rel);

    if local.is_file() {
        return Some(local);
    }
    let index = local.join("index.html");
    index.is_file().then_some(index)
}

/// Percent-decode a request URL into a root-relative path, dropping the
/// query string and fragment. Traversal is decided lexically after
/// decoding, so encoded `..` sequences cannot slip through.
fn request_path(url: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(url).decode_utf8().ok()?;
    let raw = decoded.split(['?', '#']).next().unwrap_or_default();
    let rel = normalize_path(Path::new(raw.trim_matches('/')));

    rel.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then_some(rel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn output() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("about")).unwrap();
        fs::write(dir.path().join("index.html"), "home").unwrap();
        fs::write(dir.path().join("about/index.html"), "about").unwrap();
        fs::write(dir.path().join("site.css"), "css").unwrap();
        dir
    }

    #[test]
    fn test_resolves_files_and_directory_indexes() {
        let dir = output();
        assert!(resolve_path("/site.css", dir.path()).is_some());
        let index = resolve_path("/about/", dir.path()).unwrap();
        assert!(index.ends_with("about/index.html"));
        let root = resolve_path("/", dir.path()).unwrap();
        assert!(root.ends_with("index.html"));
    }

    #[test]
    fn test_extension_less_url_hits_directory_index() {
        let dir = output();
        let page = resolve_path("/about", dir.path()).unwrap();
        assert!(page.ends_with("about/index.html"));
    }

    #[test]
    fn test_query_string_ignored() {
        let dir = output();
        assert!(resolve_path("/site.css?v=2", dir.path()).is_some());
    }

    #[test]
    fn test_traversal_rejected() {
        let dir = output();
        assert!(resolve_path("/../etc/passwd", dir.path()).is_none());
        assert!(resolve_path("/%2e%2e/secret", dir.path()).is_none());
        assert!(resolve_path("/about/../../secret", dir.path()).is_none());
    }

    #[test]
    fn test_missing_is_none() {
        let dir = output();
        assert!(resolve_path("/nope", dir.path()).is_none());
    }
}
