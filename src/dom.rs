//! Element tree built from the flat token stream.
//!
//! The tree keeps the markup's own structure: no implied `html`/`body`/`tbody`
//! tags, no foster-parenting, and a `<p>` may hold a `<div>`. Both sides of an
//! element comparison are built this way. [`parse_document`] hands the same
//! tree to scraper so selectors can run over it.

use ego_tree::iter::Edge;
use ego_tree::{NodeId, NodeRef, Tree};
use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, TreeSink};
use html5ever::{LocalName, Namespace, QualName};
use scraper::{Html, HtmlTreeSink};

use crate::tokenizer::{tokenize, HtmlToken, RAW_TEXT_ELEMENTS};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Elements that never have content and are never closed.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Value of an attribute that is present on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// An explicit value, decoded. Empty for an attribute written bare.
    Text(String),
    /// Boolean attribute: only its presence matters.
    Present,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
}

impl Element {
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    pub fn is_raw_text(&self) -> bool {
        RAW_TEXT_ELEMENTS.contains(&self.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    /// Root of every tree.
    Fragment,
    Element(Element),
    Text(String),
}

/// Builds a tree from `html`.
///
/// Start tags open an element unless they are void or self-closing. An end
/// tag closes the nearest open element of the same name along with anything
/// opened inside it, and is ignored when no such element is open. Comments and
/// declarations are dropped; adjacent text is merged.
pub fn parse(html: &str) -> Tree<HtmlNode> {
    let mut tree = Tree::new(HtmlNode::Fragment);
    let mut open: Vec<(NodeId, String)> = Vec::new();

    for token in tokenize(html) {
        let parent = open
            .last()
            .map(|(id, _)| *id)
            .unwrap_or_else(|| tree.root().id());
        let Some(mut parent) = tree.get_mut(parent) else {
            continue;
        };

        match token {
            HtmlToken::StartTag(tag) => {
                let element = Element {
                    name: tag.name,
                    attrs: tag
                        .attrs
                        .into_iter()
                        .map(|(name, value)| Attribute {
                            name,
                            value: AttrValue::Text(value),
                        })
                        .collect(),
                };
                let closes_immediately = element.is_void() || tag.self_closing;
                let name = element.name.clone();
                let id = parent.append(HtmlNode::Element(element)).id();
                if !closes_immediately {
                    open.push((id, name));
                }
            }
            HtmlToken::EndTag { name, .. } => {
                if let Some(depth) = open.iter().rposition(|(_, open_name)| *open_name == name) {
                    open.truncate(depth);
                }
            }
            HtmlToken::Text { text, .. } => {
                if let Some(mut last) = parent.last_child() {
                    if let HtmlNode::Text(existing) = last.value() {
                        existing.push_str(&text);
                        continue;
                    }
                }
                parent.append(HtmlNode::Text(text));
            }
        }
    }

    tree
}

/// Parses `html` with [`parse`] into a scraper document, for selector lookups.
///
/// The document keeps the written structure, so an element found in it
/// serializes to markup that [`parse`] rebuilds into the same shape.
pub fn parse_document(html: &str) -> Html {
    let tree = parse(html);
    let sink = HtmlTreeSink::new(Html::new_document());
    let document = sink.get_document();
    append_children(&sink, &document, tree.root());
    sink.finish()
}

fn append_children(sink: &HtmlTreeSink, parent: &NodeId, node: NodeRef<'_, HtmlNode>) {
    for child in node.children() {
        match child.value() {
            HtmlNode::Element(element) => {
                let handle = sink.create_element(
                    qualified(HTML_NAMESPACE, &element.name),
                    element.attrs.iter().map(to_html5ever).collect(),
                    ElementFlags::default(),
                );
                sink.append(parent, NodeOrText::AppendNode(handle));
                append_children(sink, &handle, child);
            }
            HtmlNode::Text(text) => {
                sink.append(parent, NodeOrText::AppendText(StrTendril::from(text.as_str())));
            }
            HtmlNode::Fragment => {}
        }
    }
}

fn qualified(namespace: &str, name: &str) -> QualName {
    QualName::new(None, Namespace::from(namespace), LocalName::from(name))
}

fn to_html5ever(attr: &Attribute) -> html5ever::Attribute {
    let value = match &attr.value {
        AttrValue::Text(value) => value.as_str(),
        AttrValue::Present => "",
    };
    html5ever::Attribute {
        name: qualified("", &attr.name),
        value: StrTendril::from(value),
    }
}

/// Serializes a tree (or any subtree) back to markup.
///
/// Attributes render as `name="value"`, or as the bare name when they are
/// boolean or empty. Void elements render as `<name/>`. Empty text nodes are
/// skipped.
pub fn serialize(node: NodeRef<'_, HtmlNode>) -> String {
    let mut out = String::new();

    for edge in node.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                HtmlNode::Fragment => {}
                HtmlNode::Element(element) => {
                    out.push('<');
                    out.push_str(&element.name);
                    for attr in &element.attrs {
                        out.push(' ');
                        out.push_str(&attr.name);
                        match &attr.value {
                            AttrValue::Text(value) if !value.is_empty() => {
                                out.push_str("=\"");
                                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                                out.push('"');
                            }
                            _ => {}
                        }
                    }
                    out.push_str(if element.is_void() { "/>" } else { ">" });
                }
                HtmlNode::Text(text) if !text.is_empty() => {
                    if parent_is_raw_text(node) {
                        out.push_str(text);
                    } else {
                        out.push_str(&html_escape::encode_text(text));
                    }
                }
                HtmlNode::Text(_) => {}
            },
            Edge::Close(node) => {
                if let HtmlNode::Element(element) = node.value() {
                    if !element.is_void() {
                        out.push_str("</");
                        out.push_str(&element.name);
                        out.push('>');
                    }
                }
            }
        }
    }

    out
}

fn parent_is_raw_text(node: NodeRef<'_, HtmlNode>) -> bool {
    node.parent().is_some_and(|parent| match parent.value() {
        HtmlNode::Element(element) => element.is_raw_text(),
        _ => false,
    })
}
