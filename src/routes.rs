//! Route table loading and the override exclusion set.
//!
//! `src/routes.json` declares alias routes compiled into redirect stubs
//! and platform error overrides whose serve paths are permanently
//! excluded from pretty-URL rewriting and timestamp renaming:
//!
//! ```json
//! {
//!     "routes": [{ "route": "/old", "serve": "/new-page" }],
//!     "platformErrorOverrides": [{ "serve": "/404.html", "statusCode": 404 }]
//! }
//! ```

use crate::debug;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use serde_json::Value;
use std::{fs, path::Path};

/// An alias route: requests for `route` should land on `serve`.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub route: String,
    pub serve: String,
}

/// A platform error page override. Only `serve` matters to the build
/// pipeline; the remaining fields are platform configuration carried
/// through untouched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformErrorOverride {
    pub serve: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// The declarative route table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<Route>,

    #[serde(default)]
    pub platform_error_overrides: Vec<PlatformErrorOverride>,
}

impl RouteTable {
    /// Load the route table. A missing file is an empty table; a
    /// malformed one is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("routes"; "no route table at {}, using empty table", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Canonicalized override serve paths, for exclusion lookups in the
    /// path rewriter and the cache-busting namer.
    pub fn exclusion_set(&self) -> FxHashSet<String> {
        self.platform_error_overrides
            .iter()
            .map(|o| normalize_key(&o.serve))
            .collect()
    }
}

/// Canonical form for exclusion-set keys: strip any `./` prefix, ensure
/// exactly one leading `/`. Applied both when building the set and when
/// probing it, so override paths always match regardless of how the
/// caller spelled them.
pub fn normalize_key(path: &str) -> String {
    let trimmed = path
        .trim_start_matches("./")
        .trim_start_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_key_variants_agree() {
        assert_eq!(normalize_key("/404.html"), "/404.html");
        assert_eq!(normalize_key("404.html"), "/404.html");
        assert_eq!(normalize_key("./404.html"), "/404.html");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let table = RouteTable::load(&dir.path().join("routes.json")).unwrap();
        assert!(table.routes.is_empty());
        assert!(table.platform_error_overrides.is_empty());
    }

    #[test]
    fn test_load_table() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("routes.json");
        fs::write(
            &file,
            r#"{
                "routes": [{ "route": "/old", "serve": "/new-page" }],
                "platformErrorOverrides": [{ "serve": "/404.html", "statusCode": 404 }]
            }"#,
        )
        .unwrap();

        let table = RouteTable::load(&file).unwrap();
        assert_eq!(table.routes.len(), 1);
        assert_eq!(table.routes[0].route, "/old");
        assert_eq!(table.routes[0].serve, "/new-page");
        assert_eq!(table.platform_error_overrides[0].serve, "/404.html");
        assert_eq!(
            table.platform_error_overrides[0].extra["statusCode"],
            serde_json::json!(404)
        );
    }

    #[test]
    fn test_exclusion_set_is_normalized() {
        let table: RouteTable = serde_json::from_str(
            r#"{ "platformErrorOverrides": [{ "serve": "./404.html" }, { "serve": "/50x.html" }] }"#,
        )
        .unwrap();
        let set = table.exclusion_set();
        assert!(set.contains("/404.html"));
        assert!(set.contains("/50x.html"));
    }

    #[test]
    fn test_malformed_table_is_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("routes.json");
        fs::write(&file, "{ not json").unwrap();
        assert!(RouteTable::load(&file).is_err());
    }
}
