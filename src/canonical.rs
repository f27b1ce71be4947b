//! Reduces an HTML fragment to a comparison-stable string.
//!
//! Two fragments that differ only cosmetically canonicalize to the same
//! string:
//! - whitespace runs in text collapse to one space and text is trimmed at
//!   element boundaries; non-breaking spaces are kept as written
//! - attributes are ordered by name; whitespace in their values collapses and
//!   is trimmed
//! - boolean attributes (`checked`, `checked=""`, `checked="checked"`) all
//!   render as the bare name
//! - serialization style (`<br>` vs `<br/>`, quoting, entity spelling,
//!   comments) is fixed by re-emitting through [`pretty_print`]
//!
//! Canonicalizing an already canonical string returns it unchanged.

use ego_tree::Tree;

use crate::dom::{self, AttrValue, Element, HtmlNode};
use crate::pretty::pretty_print;

/// Attributes whose presence alone is meaningful.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "default",
    "defer",
    "disabled",
    "formnovalidate",
    "hidden",
    "ismap",
    "itemscope",
    "loop",
    "multiple",
    "muted",
    "nomodule",
    "novalidate",
    "open",
    "playsinline",
    "readonly",
    "required",
    "reversed",
    "selected",
];

/// Attributes holding a space-separated list of tokens.
pub const TOKEN_LIST_ATTRIBUTES: &[&str] = &[
    "accept-charset",
    "accesskey",
    "class",
    "dropzone",
    "headers",
    "rel",
    "rev",
];

/// Canonical form of `html`.
pub fn canonicalize(html: &str) -> String {
    let mut tree = dom::parse(html);
    normalize(&mut tree);

    let serialized = dom::serialize(tree.root());
    let normalized = serialized.replace("\r\n", "\n").replace('\r', "\n");
    let canonical = pretty_print(normalized.trim());
    log::trace!("canonicalized {html:?} to {canonical:?}");
    canonical
}

fn normalize(tree: &mut Tree<HtmlNode>) {
    for value in tree.values_mut() {
        match value {
            HtmlNode::Element(element) => normalize_attributes(element),
            HtmlNode::Text(text) => *text = normalize_text(text),
            HtmlNode::Fragment => {}
        }
    }
}

fn normalize_attributes(element: &mut Element) {
    for attr in &mut element.attrs {
        if BOOLEAN_ATTRIBUTES.contains(&attr.name.as_str()) {
            attr.value = AttrValue::Present;
            continue;
        }
        let collapsed = match &attr.value {
            AttrValue::Text(value) if TOKEN_LIST_ATTRIBUTES.contains(&attr.name.as_str()) => {
                value.split_whitespace().collect::<Vec<_>>().join(" ")
            }
            AttrValue::Text(value) => collapse(value, char::is_whitespace),
            AttrValue::Present => String::new(),
        };
        attr.value = AttrValue::Text(collapsed);
    }
    element.attrs.sort_by(|a, b| a.name.cmp(&b.name));
}

fn is_html_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Collapses runs of ASCII spacing to one space and trims it at both ends.
/// Other whitespace, the non-breaking space in particular, is left alone.
pub fn normalize_text(text: &str) -> String {
    collapse(text, is_html_space)
}

fn collapse(value: &str, is_space: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_space = false;
    for c in value.trim_matches(&is_space).chars() {
        if is_space(c) {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    out
}
