//! Conservative HTML minifier.
//!
//! Collapses every whitespace run to a single space and strips
//! comments, leaving `<pre>`, `<script>`, `<style>` and `<textarea>`
//! contents untouched. Collapsing to one space (instead of removing
//! whitespace outright) cannot change inline rendering, and the
//! transform is idempotent, so rebuilding an unchanged tree stays
//! byte-identical.

use super::{Minifier, TransformError};

/// Elements whose raw text must be copied verbatim.
const RAW_TEXT: [&str; 4] = ["pre", "script", "style", "textarea"];

/// The default minifier collaborator.
pub struct ConservativeHtml;

impl Minifier for ConservativeHtml {
    fn minify(&self, html: &str) -> Result<String, TransformError> {
        Ok(minify_html(html))
    }
}

fn minify_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            // Drop the comment; an unterminated one swallows the rest
            rest = match after.find("-->") {
                Some(end) => &after[end + 3..],
                None => "",
            };
            continue;
        }

        if rest.starts_with('<')
            && let Some(tag) = raw_text_tag(rest)
        {
            let end = raw_text_end(rest, tag);
            out.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        }

        let mut chars = rest.char_indices();
        let (_, ch) = chars.next().expect("rest is non-empty");
        if ch.is_ascii_whitespace() {
            out.push(' ');
            let skip = rest
                .find(|c: char| !c.is_ascii_whitespace())
                .unwrap_or(rest.len());
            rest = &rest[skip..];
        } else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    out
}

/// If `rest` starts with an opening raw-text tag, return its name.
fn raw_text_tag(rest: &str) -> Option<&'static str> {
    let after = &rest[1..];
    RAW_TEXT.into_iter().find(|tag| {
        after.len() > tag.len()
            && after[..tag.len()].eq_ignore_ascii_case(tag)
            && matches!(after.as_bytes()[tag.len()], b'>' | b' ' | b'\t' | b'\n' | b'/')
    })
}

/// Byte offset just past the matching `</tag>`, or the end of input.
fn raw_text_end(rest: &str, tag: &str) -> usize {
    let closer = format!("</{tag}");
    let lower = rest.to_ascii_lowercase();
    match lower[1..].find(&closer) {
        Some(pos) => {
            let close_start = pos + 1;
            match rest[close_start..].find('>') {
                Some(gt) => close_start + gt + 1,
                None => rest.len(),
            }
        }
        None => rest.len(),
    }
}
