//! JavaScript transformer built on oxc.
//!
//! Development builds pass sources through after a parse check so a
//! syntax error still fails the branch; production builds minify and
//! mangle.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::{ScriptTransformer, TransformError};
use crate::task::BuildMode;

/// The default script collaborator.
pub struct OxcScripts;

impl ScriptTransformer for OxcScripts {
    fn compile(&self, source: &str, mode: BuildMode) -> Result<String, TransformError> {
        match mode {
            BuildMode::Development => {
                parse_check(source)?;
                Ok(source.to_string())
            }
            BuildMode::Production => minify_js(source),
        }
    }
}

fn parse_check(source: &str) -> Result<(), TransformError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if let Some(error) = ret.errors.first() {
        return Err(TransformError::new("script", error.to_string()));
    }
    Ok(())
}

fn minify_js(source: &str) -> Result<String, TransformError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if let Some(error) = ret.errors.first() {
        return Err(TransformError::new("script", error.to_string()));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}
