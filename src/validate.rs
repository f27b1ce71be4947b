//! Well-formedness checks run before any element is looked at.

use std::borrow::Cow;

use crate::dom::VOID_ELEMENTS;
use crate::error::AssertElementError;
use crate::mode::ValidationMode;
use crate::tokenizer::{tokenize, HtmlToken};

/// Prepended for strict validation when `content` has no doctype.
pub const DEFAULT_DOCTYPE: &str = "<!DOCTYPE html>";

/// A full HTML5 conformance checker.
pub trait StrictValidator {
    /// All violations in `document`, joined into one diagnostic, or `None`
    /// when it conforms. `document` always starts with a doctype.
    fn check(&self, document: &str) -> Option<String>;
}

/// Strict validation through html5ever's parse-error stream: any error the
/// tree builder reports is a violation.
#[cfg(feature = "strict")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5Validator;

#[cfg(feature = "strict")]
impl StrictValidator for Html5Validator {
    fn check(&self, document: &str) -> Option<String> {
        let parsed = scraper::Html::parse_document(document);
        if parsed.errors.is_empty() {
            return None;
        }
        log::debug!("strict validation found {} parse errors", parsed.errors.len());
        Some(parsed.errors.join("; "))
    }
}

/// Runs a [`ValidationMode`] against a document.
///
/// Strict mode needs a [`StrictValidator`]. The default one is
/// [`Html5Validator`] when the `strict` feature is enabled, and none
/// otherwise.
#[derive(Clone, Copy)]
pub struct Validator {
    strict: Option<&'static dyn StrictValidator>,
}

impl Default for Validator {
    fn default() -> Self {
        #[cfg(feature = "strict")]
        let strict: Option<&'static dyn StrictValidator> = Some(&Html5Validator);
        #[cfg(not(feature = "strict"))]
        let strict: Option<&'static dyn StrictValidator> = None;
        Self { strict }
    }
}

impl Validator {
    /// Strict validation through `strict`.
    pub fn with_strict(strict: &'static dyn StrictValidator) -> Self {
        Self {
            strict: Some(strict),
        }
    }

    /// No strict validator: strict mode fails as a configuration error.
    pub fn without_strict() -> Self {
        Self { strict: None }
    }

    pub fn has_strict(&self) -> bool {
        self.strict.is_some()
    }

    /// Checks `content` against `mode`.
    ///
    /// Fails with [`AssertElementError::MalformedHtml`] when the content
    /// violates the policy, and with
    /// [`AssertElementError::StrictValidatorUnavailable`] when strict
    /// validation is requested but there is no strict validator.
    pub fn validate(&self, content: &str, mode: ValidationMode) -> Result<(), AssertElementError> {
        log::debug!("validating {} bytes of HTML in {mode} mode", content.len());

        let diagnostic = match mode {
            ValidationMode::None => return Ok(()),
            ValidationMode::Standard => check_well_formed(content),
            ValidationMode::Strict => {
                let strict = self
                    .strict
                    .ok_or(AssertElementError::StrictValidatorUnavailable)?;
                strict.check(&with_doctype(content))
            }
        };

        match diagnostic {
            Some(diagnostic) => Err(AssertElementError::MalformedHtml { mode, diagnostic }),
            None => Ok(()),
        }
    }
}

/// [`Validator::validate`] with the default validator.
pub fn validate(content: &str, mode: ValidationMode) -> Result<(), AssertElementError> {
    Validator::default().validate(content, mode)
}

/// Browser-tolerant check: elements may be left open, but every end tag must
/// close an element that is open.
pub fn check_well_formed(content: &str) -> Option<String> {
    let mut open: Vec<String> = Vec::new();

    for token in tokenize(content) {
        match token {
            HtmlToken::StartTag(tag) => {
                if !tag.self_closing && !VOID_ELEMENTS.contains(&tag.name.as_str()) {
                    open.push(tag.name);
                }
            }
            HtmlToken::EndTag { name, line } => {
                match open.iter().rposition(|open_name| *open_name == name) {
                    Some(depth) => open.truncate(depth),
                    None => return Some(format!("Unexpected end tag `{name}` (Line {line})")),
                }
            }
            HtmlToken::Text { .. } => {}
        }
    }

    None
}

/// `content`, with [`DEFAULT_DOCTYPE`] in front unless it already starts with a
/// doctype (compared case-insensitively).
pub fn with_doctype(content: &str) -> Cow<'_, str> {
    let has_doctype = content
        .trim_start()
        .get(..9)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("<!doctype"));
    if has_doctype {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(format!("{DEFAULT_DOCTYPE}{content}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Rejects any document mentioning `<blink>`; records nothing else.
    struct NoBlink;

    impl StrictValidator for NoBlink {
        fn check(&self, document: &str) -> Option<String> {
            assert!(document.starts_with(DEFAULT_DOCTYPE));
            document
                .contains("<blink>")
                .then(|| "Element `blink` is obsolete".to_string())
        }
    }

    static NO_BLINK: NoBlink = NoBlink;

    #[test]
    fn test_none_skips_everything() {
        assert!(validate("</div></div>", ValidationMode::None).is_ok());
    }

    #[test]
    fn test_standard_tolerates_unclosed_tags() {
        assert!(validate("<div><p>one<p>two<br></div>", ValidationMode::Standard).is_ok());
        assert!(validate("<ul><li>a<li>b", ValidationMode::Standard).is_ok());
        assert!(validate("<div/><img src=\"a.png\"/>", ValidationMode::Standard).is_ok());
        assert!(validate("<p><div>x</div></p>", ValidationMode::Standard).is_ok());
    }

    #[test]
    fn test_standard_rejects_stray_end_tag() {
        let err = validate("<div>\n  <p>x</p>\n</span></div>", ValidationMode::Standard)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Response content is not valid HTML: Unexpected end tag `span` (Line 3)"
        );
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_standard_rejects_void_end_tag() {
        assert!(check_well_formed("<p>a</br></p>").is_some());
    }

    #[test]
    fn test_end_tags_inside_script_are_text() {
        assert_eq!(check_well_formed("<script>document.write('</div>')</script>"), None);
    }

    #[test]
    fn test_closing_outer_element_closes_inner() {
        assert_eq!(check_well_formed("<div><span><b>x</div>"), None);
        assert!(check_well_formed("<div><span>x</div></span>").is_some());
    }

    #[test]
    fn test_with_doctype() {
        assert_eq!(with_doctype("<p>x</p>"), "<!DOCTYPE html><p>x</p>");
        assert_eq!(with_doctype("<!doctype html><p>x</p>"), "<!doctype html><p>x</p>");
        assert_eq!(with_doctype("  \n<!DocType html>"), "  \n<!DocType html>");
    }

    #[test]
    fn test_strict_unavailable_is_configuration_error() {
        let validator = Validator::without_strict();
        assert!(!validator.has_strict());

        let err = validator
            .validate("<p>x</p>", ValidationMode::Strict)
            .unwrap_err();
        assert!(matches!(err, AssertElementError::StrictValidatorUnavailable));
        assert!(err.is_configuration_error());

        // Other modes don't need it.
        assert!(validator.validate("<p>x</p>", ValidationMode::Standard).is_ok());
    }

    #[test]
    fn test_injected_strict_validator() {
        let validator = Validator::with_strict(&NO_BLINK);
        assert!(validator.validate("<p>x</p>", ValidationMode::Strict).is_ok());

        let err = validator
            .validate("<p><blink>x</blink></p>", ValidationMode::Strict)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Response content failed strict HTML5 validation: Element `blink` is obsolete"
        );
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_default_strict_follows_feature() {
        assert_eq!(Validator::default().has_strict(), cfg!(feature = "strict"));
    }

    #[cfg(feature = "strict")]
    #[test]
    fn test_strict_accepts_conforming_document() {
        let html = "<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>";
        assert!(validate(html, ValidationMode::Strict).is_ok());
        assert!(validate("<div id=\"a\"><p>x</p></div>", ValidationMode::Strict).is_ok());
    }

    #[cfg(feature = "strict")]
    #[test]
    fn test_strict_rejects_what_standard_tolerates() {
        let html = "<table><div>x</div></table>";
        assert!(validate(html, ValidationMode::Standard).is_ok());

        let err = validate(html, ValidationMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            AssertElementError::MalformedHtml {
                mode: ValidationMode::Strict,
                ..
            }
        ));
        assert!(err
            .to_string()
            .starts_with("Response content failed strict HTML5 validation: "));
    }
}
