//! Flat token stream over html5ever's tokenizer.
//!
//! Only the tokenizer runs: no tree-construction rules are applied, so tags
//! come out in the order and nesting they were written in. Entities are
//! already decoded. Comments, doctypes and the tokenizer's own parse errors
//! are dropped.

use std::cell::{Cell, RefCell};

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// Elements whose content is text up to the matching end tag, never markup or
/// entities.
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "script", "style", "xmp",
];

/// Elements whose content is text up to the matching end tag, with entities
/// decoded.
pub const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    /// In source order, duplicates removed. A bare attribute has the empty value.
    pub attrs: Vec<(String, String)>,
    pub self_closing: bool,
    pub line: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlToken {
    StartTag(StartTag),
    EndTag { name: String, line: u64 },
    /// Decoded text. `raw` is set inside raw-text elements like `<script>`,
    /// where the text must be written back without escaping.
    Text { text: String, raw: bool },
}

#[derive(Default)]
struct Collector {
    tokens: RefCell<Vec<HtmlToken>>,
    in_raw_text: Cell<bool>,
}

impl Collector {
    fn push_text(&self, text: &str) {
        let raw = self.in_raw_text.get();
        let mut tokens = self.tokens.borrow_mut();
        if let Some(HtmlToken::Text { text: last, raw: last_raw }) = tokens.last_mut() {
            if *last_raw == raw {
                last.push_str(text);
                return;
            }
        }
        tokens.push(HtmlToken::Text {
            text: text.to_string(),
            raw,
        });
    }

    fn push_tag(&self, tag: Tag, line: u64) -> TokenSinkResult<()> {
        let name = tag.name.to_string();
        match tag.kind {
            TagKind::StartTag => {
                let next = if tag.self_closing {
                    TokenSinkResult::Continue
                } else {
                    raw_state(&name)
                };
                self.in_raw_text.set(matches!(
                    &next,
                    TokenSinkResult::RawData(RawKind::Rawtext | RawKind::ScriptData)
                ));
                let attrs = tag
                    .attrs
                    .into_iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();
                self.tokens.borrow_mut().push(HtmlToken::StartTag(StartTag {
                    name,
                    attrs,
                    self_closing: tag.self_closing,
                    line,
                }));
                next
            }
            TagKind::EndTag => {
                self.in_raw_text.set(false);
                self.tokens
                    .borrow_mut()
                    .push(HtmlToken::EndTag { name, line });
                TokenSinkResult::Continue
            }
        }
    }
}

fn raw_state(name: &str) -> TokenSinkResult<()> {
    if name == "script" {
        TokenSinkResult::RawData(RawKind::ScriptData)
    } else if RAW_TEXT_ELEMENTS.contains(&name) {
        TokenSinkResult::RawData(RawKind::Rawtext)
    } else if ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&name) {
        TokenSinkResult::RawData(RawKind::Rcdata)
    } else {
        TokenSinkResult::Continue
    }
}

impl TokenSink for Collector {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => return self.push_tag(tag, line_number),
            Token::CharacterTokens(text) => self.push_text(&text),
            Token::NullCharacterToken => self.push_text("\u{fffd}"),
            Token::ParseError(err) => log::trace!("tokenizer: {err} (line {line_number})"),
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}

/// Tokenizes all of `html`.
pub fn tokenize(html: &str) -> Vec<HtmlToken> {
    let tokenizer = Tokenizer::new(Collector::default(), TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from(html));
    let _ = tokenizer.feed(&input);
    tokenizer.end();
    tokenizer.sink.tokens.take()
}
