//! Shared utilities - pure helpers with no pipeline knowledge.

pub mod path;

pub use path::{normalize_path, to_slash};
