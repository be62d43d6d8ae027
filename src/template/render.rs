//! Placeholder template renderer.
//!
//! Layouts use a small mustache-style vocabulary:
//!
//! - `{{> base}}` includes the base partial (expanded before anything
//!   else, so the partial's own placeholders render too)
//! - `{{content}}` / `{{{content}}}` inserts the page body
//! - `{{year}}` / `{{year from=1981}}` calls the year helper
//! - any other `{{name}}` looks up the render context variables
//!   (front-matter fields and `site.*` configuration values); unknown
//!   names render as empty
//!
//! Helpers are plain functions carried in the context - there is no
//! shared helper registry to mutate, so two concurrent passes can never
//! observe each other's helpers.

use regex::Regex;
use rustc_hash::FxHashMap;
use std::sync::LazyLock;

/// A pure helper: receives the optional `from=`-style argument value.
pub type Helper = fn(Option<&str>) -> String;

/// Everything one render needs, passed explicitly.
pub struct RenderContext<'a> {
    /// The page body inserted at `{{content}}`.
    pub content: &'a str,
    /// Variable lookups for plain `{{name}}` placeholders.
    pub vars: &'a FxHashMap<String, String>,
    /// Helper functions, by name.
    pub helpers: &'a FxHashMap<&'static str, Helper>,
}

/// `{{> name}}` partial inclusion.
static PARTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{>[ \t]*([A-Za-z0-9_-]+)[ \t]*\}\}").expect("static regex")
});

/// `{{name}}`, `{{{name}}}`, `{{name key=value}}` placeholders.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\{?[ \t]*([A-Za-z0-9_.-]+)(?:[ \t]+[A-Za-z0-9_]+=([^ \t}]+))?[ \t]*\}?\}\}")
        .expect("static regex")
});

/// Render a layout: expand the base partial, then substitute every
/// placeholder in one pass over the combined text.
pub fn render(layout: &str, base_partial: &str, ctx: &RenderContext<'_>) -> String {
    let expanded = PARTIAL.replace_all(layout, |caps: &regex::Captures<'_>| {
        if &caps[1] == super::BASE_PARTIAL {
            base_partial.to_string()
        } else {
            // Only the base partial exists in this layout convention
            String::new()
        }
    });

    PLACEHOLDER
        .replace_all(&expanded, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            let arg = caps.get(2).map(|m| m.as_str());
            resolve(name, arg, ctx)
        })
        .into_owned()
}

fn resolve(name: &str, arg: Option<&str>, ctx: &RenderContext<'_>) -> String {
    if name == "content" {
        return ctx.content.to_string();
    }
    if let Some(helper) = ctx.helpers.get(name) {
        return helper(arg);
    }
    ctx.vars.get(name).cloned().unwrap_or_default()
}

/// The default helper set: `{{year}}` / `{{year from=NNNN}}`.
pub fn default_helpers() -> FxHashMap<&'static str, Helper> {
    let mut helpers: FxHashMap<&'static str, Helper> = FxHashMap::default();
    helpers.insert("year", |from| {
        let from = from.and_then(|v| v.parse::<u16>().ok());
        super::year_range(from, crate::stamp::current_year())
    });
    helpers
}
