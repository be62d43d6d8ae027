//! Site configuration management for `staticsite.json`.
//!
//! The file is a flat JSON record:
//!
//! ```json
//! {
//!     "canonicalUrl": "https://example.com",
//!     "outputFolder": "build/",
//!     "defaultLayout": "default",
//!     "cacheBusting": true,
//!     "hostHandlesRoutes": false,
//!     "devServerPort": 3000
//! }
//! ```
//!
//! Only `canonicalUrl` is required; every other field has a default.
//! The resolved [`SiteConfig`] is immutable for the rest of the process.

mod error;

pub use error::ConfigError;

use crate::log;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Source tree root, relative to the project root. One fixed layout
/// convention: pages, scripts, styles and static files all live here.
pub const SOURCE_DIR: &str = "src";

/// Layout templates directory, relative to the project root.
pub const LAYOUTS_DIR: &str = "src/layouts";

/// Route table file, relative to the project root.
pub const ROUTES_FILE: &str = "src/routes.json";

/// Extension used by layout templates.
pub const LAYOUT_EXT: &str = "hbs";

// ============================================================================
// raw record
// ============================================================================

/// The record as written on disk: everything optional, validated and
/// defaulted by [`SiteConfig::resolve`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    canonical_url: Option<String>,
    output_folder: Option<String>,
    default_layout: Option<String>,
    cache_busting: Option<bool>,
    host_handles_routes: Option<bool>,
    dev_server_port: Option<u16>,
}

// ============================================================================
// resolved configuration
// ============================================================================

/// Resolved site configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Project root (parent directory of the config file).
    pub root: PathBuf,

    /// Canonical site URL, used in redirect stubs. Required.
    pub canonical_url: String,

    /// Output folder relative to the root, always ending in `/`.
    pub output_folder: String,

    /// Layout applied to pages without a `layout` front-matter key.
    pub default_layout: String,

    /// Rename compiled bundles and substitute `{{timestamp}}` tokens.
    pub cache_busting: bool,

    /// The hosting platform interprets routes.json natively, so the
    /// redirect compiler is a no-op and routes.json ships as-is.
    pub host_handles_routes: bool,

    /// Development server port override.
    pub dev_server_port: Option<u16>,
}

impl SiteConfig {
    /// Load and resolve the configuration from a file path.
    ///
    /// A `dev_server_port` from the command line takes precedence over
    /// the file's value and is applied here, during resolution. Unknown
    /// fields are warned about but do not fail the load.
    pub fn load(path: &Path, dev_server_port: Option<u16>) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (raw, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            log!(
                "warning";
                "unknown fields in staticsite.json, ignoring: {}",
                ignored.join(", ")
            );
        }

        let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        Self::resolve(raw, root, dev_server_port)
    }

    /// Parse JSON content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(RawConfig, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let mut deserializer = serde_json::Deserializer::from_str(content);
        let raw = serde_ignored::deserialize(&mut deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((raw, ignored))
    }

    /// Validate required fields and apply defaults.
    fn resolve(
        raw: RawConfig,
        root: PathBuf,
        port_override: Option<u16>,
    ) -> Result<Self, ConfigError> {
        let canonical_url = raw
            .canonical_url
            .ok_or(ConfigError::MissingField("canonicalUrl"))?;

        let mut output_folder = raw.output_folder.unwrap_or_else(|| "build/".to_string());
        if !output_folder.ends_with('/') {
            output_folder.push('/');
        }

        Ok(Self {
            root,
            canonical_url,
            output_folder,
            default_layout: raw.default_layout.unwrap_or_else(|| "default".to_string()),
            cache_busting: raw.cache_busting.unwrap_or(false),
            host_handles_routes: raw.host_handles_routes.unwrap_or(false),
            dev_server_port: port_override.or(raw.dev_server_port),
        })
    }

    /// Absolute path of the output root.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output_folder)
    }

    /// Absolute path of the source root.
    pub fn source_dir(&self) -> PathBuf {
        self.root.join(SOURCE_DIR)
    }

    /// Absolute path of the layouts directory.
    pub fn layouts_dir(&self) -> PathBuf {
        self.root.join(LAYOUTS_DIR)
    }

    /// Absolute path of the route table file.
    pub fn routes_file(&self) -> PathBuf {
        self.root.join(ROUTES_FILE)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
impl SiteConfig {
    /// Minimal valid config rooted at `root`, for pipeline tests.
    pub fn test_config(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            canonical_url: "https://example.com".to_string(),
            output_folder: "build/".to_string(),
            default_layout: "default".to_string(),
            cache_busting: false,
            host_handles_routes: false,
            dev_server_port: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_str(content: &str) -> Result<SiteConfig, ConfigError> {
        let (raw, _) = SiteConfig::parse_with_ignored(content).unwrap();
        SiteConfig::resolve(raw, PathBuf::from("."), None)
    }

    #[test]
    fn test_missing_canonical_url_is_fatal() {
        let err = resolve_str("{}").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("canonicalUrl")));
    }

    #[test]
    fn test_defaults_applied() {
        let config = resolve_str(r#"{"canonicalUrl": "https://example.com"}"#).unwrap();
        assert_eq!(config.output_folder, "build/");
        assert_eq!(config.default_layout, "default");
        assert!(!config.cache_busting);
        assert!(!config.host_handles_routes);
        assert!(config.dev_server_port.is_none());
    }

    #[test]
    fn test_output_folder_gains_trailing_separator() {
        let config = resolve_str(
            r#"{"canonicalUrl": "https://example.com", "outputFolder": "dist"}"#,
        )
        .unwrap();
        assert_eq!(config.output_folder, "dist/");

        // Already normalized stays unchanged
        let config = resolve_str(
            r#"{"canonicalUrl": "https://example.com", "outputFolder": "dist/"}"#,
        )
        .unwrap();
        assert_eq!(config.output_folder, "dist/");
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) = SiteConfig::parse_with_ignored(
            r#"{"canonicalUrl": "https://example.com", "allowSymlinks": true}"#,
        )
        .unwrap();
        assert_eq!(ignored, vec!["allowSymlinks".to_string()]);
    }

    #[test]
    fn test_cli_port_takes_precedence_over_file() {
        let (raw, _) = SiteConfig::parse_with_ignored(
            r#"{"canonicalUrl": "https://example.com", "devServerPort": 3000}"#,
        )
        .unwrap();
        let config = SiteConfig::resolve(raw, PathBuf::from("."), Some(8080)).unwrap();
        assert_eq!(config.dev_server_port, Some(8080));

        let (raw, _) = SiteConfig::parse_with_ignored(
            r#"{"canonicalUrl": "https://example.com", "devServerPort": 3000}"#,
        )
        .unwrap();
        let config = SiteConfig::resolve(raw, PathBuf::from("."), None).unwrap();
        assert_eq!(config.dev_server_port, Some(3000));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = SiteConfig::parse_with_ignored("{").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_explicit_fields() {
        let config = resolve_str(
            r#"{
                "canonicalUrl": "https://example.com",
                "defaultLayout": "post",
                "cacheBusting": true,
                "hostHandlesRoutes": true,
                "devServerPort": 3000
            }"#,
        )
        .unwrap();
        assert_eq!(config.default_layout, "post");
        assert!(config.cache_busting);
        assert!(config.host_handles_routes);
        assert_eq!(config.dev_server_port, Some(3000));
    }
}
