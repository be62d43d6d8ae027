//! Redirect stub compiler.
//!
//! Every alias route in the table becomes a tiny HTML file containing a
//! meta refresh to the target plus a canonical link, so search engines
//! credit the destination. Routes ending in `.html`/`.htm` materialize
//! at that exact filename; anything else is treated as a directory
//! route and lands at `route/index.html`.
//!
//! When the hosting platform interprets routes.json natively the whole
//! task is a no-op (the static pipeline ships the table instead).

use crate::routes::RouteTable;
use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fs;
use std::path::{Path, PathBuf};

/// Characters left unescaped in redirect target URLs, matching the
/// JavaScript `encodeURI` reserved and unreserved sets.
const URI_KEEP: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#');

/// Percent-encode a redirect target the way `encodeURI` would.
fn encode_uri(target: &str) -> String {
    utf8_percent_encode(target, URI_KEEP).to_string()
}

/// The redirect stub markup for one alias route.
fn stub(serve: &str, canonical_url: &str) -> String {
    let encoded = encode_uri(serve);
    format!(
        "<meta http-equiv=refresh content=\"0;url={encoded}\">\
         <link rel=canonical href=\"{canonical_url}{encoded}\">"
    )
}

/// Output location for an alias route.
fn stub_path(output_dir: &Path, route: &str) -> PathBuf {
    let rel = route.trim_start_matches('/');
    let path = output_dir.join(rel);
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => path,
        _ => path.join("index.html"),
    }
}

/// Compile every alias route into its stub file.
///
/// Writes are not transactional: the first filesystem failure aborts
/// the task and already-written stubs stay behind (a clean rebuild
/// resets the tree).
pub fn compile_redirects(
    routes: &RouteTable,
    canonical_url: &str,
    output_dir: &Path,
    host_handles_routes: bool,
) -> Result<()> {
    if host_handles_routes {
        crate::debug!("redirects"; "host handles routes, skipping stub compilation");
        return Ok(());
    }

    for route in &routes.routes {
        let path = stub_path(output_dir, &route.route);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, stub(&route.serve, canonical_url))
            .with_context(|| format!("failed to write redirect stub {}", path.display()))?;
    }

    crate::debug!("redirects"; "compiled {} redirect stub(s)", routes.routes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table(json: &str) -> RouteTable {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_stub_contents() {
        assert_eq!(
            stub("/new-page", "https://example.com"),
            "<meta http-equiv=refresh content=\"0;url=/new-page\">\
             <link rel=canonical href=\"https://example.com/new-page\">"
        );
    }

    #[test]
    fn test_encode_uri_matches_javascript() {
        assert_eq!(encode_uri("/a b"), "/a%20b");
        assert_eq!(encode_uri("/q?x=1&y=2#frag"), "/q?x=1&y=2#frag");
        assert_eq!(encode_uri("/caf\u{e9}"), "/caf%C3%A9");
    }

    #[test]
    fn test_directory_route_lands_at_index() {
        let dir = TempDir::new().unwrap();
        let routes = table(r#"{ "routes": [{ "route": "/old", "serve": "/new-page" }] }"#);

        compile_redirects(&routes, "https://example.com", dir.path(), false).unwrap();

        let out = fs::read_to_string(dir.path().join("old/index.html")).unwrap();
        assert!(out.contains("0;url=/new-page"));
        assert!(out.contains("href=\"https://example.com/new-page\""));
    }

    #[test]
    fn test_html_route_keeps_exact_filename() {
        let dir = TempDir::new().unwrap();
        let routes =
            table(r#"{ "routes": [{ "route": "/legacy/page.html", "serve": "/page" }] }"#);

        compile_redirects(&routes, "https://example.com", dir.path(), false).unwrap();
        assert!(dir.path().join("legacy/page.html").exists());
        assert!(!dir.path().join("legacy/page.html/index.html").exists());
    }

    #[test]
    fn test_host_handled_routes_write_nothing() {
        let dir = TempDir::new().unwrap();
        let routes = table(r#"{ "routes": [{ "route": "/old", "serve": "/new" }] }"#);

        compile_redirects(&routes, "https://example.com", dir.path(), true).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_empty_table_is_noop() {
        let dir = TempDir::new().unwrap();
        compile_redirects(&RouteTable::default(), "https://example.com", dir.path(), false)
            .unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
