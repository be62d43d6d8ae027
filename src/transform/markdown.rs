//! Markdown parser built on pulldown-cmark.

use pulldown_cmark::{Options, Parser, html};

use super::{MarkupParser, TransformError};

/// The default markup collaborator.
pub struct CmarkMarkdown;

impl MarkupParser for CmarkMarkdown {
    fn to_html(&self, markdown: &str) -> Result<String, TransformError> {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let parser = Parser::new_ext(markdown, options);
        let mut out = String::with_capacity(markdown.len() * 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_basics() {
        let out = CmarkMarkdown.to_html("# Title\n\nSome *text*.\n").unwrap();
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<em>text</em>"));
    }

    #[test]
    fn test_tables_enabled() {
        let out = CmarkMarkdown
            .to_html("| a | b |\n|---|---|\n| 1 | 2 |\n")
            .unwrap();
        assert!(out.contains("<table>"));
    }
}
