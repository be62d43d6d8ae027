//! Stylesheet transformer built on lightningcss.
//!
//! Development builds reprint expanded; production builds minify.
//! Both parse the sheet, so invalid CSS fails the branch either way.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use super::{StyleTransformer, TransformError};
use crate::task::BuildMode;

/// The default style collaborator.
pub struct LightningStyles;

impl StyleTransformer for LightningStyles {
    fn compile(&self, source: &str, mode: BuildMode) -> Result<String, TransformError> {
        let stylesheet = StyleSheet::parse(source, ParserOptions::default())
            .map_err(|e| TransformError::new("style", e.to_string()))?;
        let result = stylesheet
            .to_css(PrinterOptions {
                minify: mode == BuildMode::Production,
                ..PrinterOptions::default()
            })
            .map_err(|e| TransformError::new("style", e.to_string()))?;
        Ok(result.code)
    }
}
