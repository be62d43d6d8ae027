//! Front matter parsing for markup sources.
//!
//! A page may open with a `---` fenced block of `key: value` lines:
//!
//! ```text
//! ---
//! layout: post
//! title: "Hello"
//! ---
//! body...
//! ```
//!
//! `layout` selects the template; every key (including `layout`) is
//! also exposed as a render variable. Values may be bare or wrapped in
//! single or double quotes. A page without a block gets defaults.

use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct FrontMatter {
    pub layout: Option<String>,
    pub vars: FxHashMap<String, String>,
}

/// Split a source file into its front matter and body.
///
/// An unterminated fence is treated as body text, not an error; the
/// page just renders with defaults.
pub fn split(text: &str) -> (FrontMatter, &str) {
    let Some(after_open) = strip_fence(text) else {
        return (FrontMatter::default(), text);
    };

    let mut matter = FrontMatter::default();
    let mut offset = 0;
    for raw in after_open.split_inclusive('\n') {
        offset += raw.len();
        let line = raw.trim_end_matches(['\n', '\r']);
        if line == "---" {
            return (matter, &after_open[offset..]);
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            let value = unquote(value.trim());
            if key.is_empty() {
                continue;
            }
            if key == "layout" {
                matter.layout = Some(value.to_string());
            }
            matter.vars.insert(key.to_string(), value.to_string());
        }
    }

    // No closing fence: the whole file is body
    (FrontMatter::default(), text)
}

/// Strip the opening `---` line, if the file starts with one.
fn strip_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("---")?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    rest.strip_prefix('\n')
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
