//! Collaborator interfaces for the per-type pipelines.
//!
//! The orchestrator only depends on these narrow traits: pure functions
//! of input text (plus a build mode) to output text or a failure, with
//! no retained cross-call state. The bundled implementations cover the
//! default toolchain; swapping one out never touches the pipelines.

pub mod html;
pub mod markdown;
pub mod script;
pub mod style;

use crate::task::BuildMode;
use thiserror::Error;

/// A collaborator rejected its input. Aborts that file's branch.
#[derive(Debug, Error)]
#[error("{kind} transform failed: {message}")]
pub struct TransformError {
    pub kind: &'static str,
    pub message: String,
}

impl TransformError {
    pub fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Script Transformer: source text to compiled (optionally minified) JS.
pub trait ScriptTransformer: Send + Sync {
    fn compile(&self, source: &str, mode: BuildMode) -> Result<String, TransformError>;
}

/// Style Transformer: stylesheet text to CSS, expanded or compressed.
pub trait StyleTransformer: Send + Sync {
    fn compile(&self, source: &str, mode: BuildMode) -> Result<String, TransformError>;
}

/// Markup Parser: markdown text to HTML.
pub trait MarkupParser: Send + Sync {
    fn to_html(&self, markdown: &str) -> Result<String, TransformError>;
}

/// Minifier: final HTML text to minified HTML.
pub trait Minifier: Send + Sync {
    fn minify(&self, html: &str) -> Result<String, TransformError>;
}
