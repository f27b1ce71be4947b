use std::fmt;

use pretty_assertions::Comparison;
use thiserror::Error;

use crate::mode::ValidationMode;

/// Everything that can make an element assertion fail.
///
/// Most variants are test failures caused by the content under test.
/// [`StrictValidatorUnavailable`](Self::StrictValidatorUnavailable) and
/// [`InvalidMode`](Self::InvalidMode) are configuration errors instead, see
/// [`is_configuration_error`](Self::is_configuration_error).
#[derive(Debug, Error)]
pub enum AssertElementError {
    #[error("No element found: {selector}")]
    SelectorNoMatch { selector: String },

    #[error(
        "More than one element found ({count}): {selector}\nFound elements:\n{}",
        numbered(.previews)
    )]
    SelectorAmbiguous {
        selector: String,
        count: usize,
        previews: Vec<String>,
    },

    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("{}: {diagnostic}", .mode.failure_prefix())]
    MalformedHtml {
        mode: ValidationMode,
        diagnostic: String,
    },

    #[error(
        "strict validation requires a strict validator, which is off without the `strict` feature of assert-element.\n\
         Enable it with: assert-element = {{ version = \"*\", features = [\"strict\"] }}\n\
         Or use ValidationMode::Standard for standard validation."
    )]
    StrictValidatorUnavailable,

    #[error("Invalid HTML validation mode {value:?} for {key} (expected one of: true, standard, strict, false, none)")]
    InvalidMode { key: String, value: String },

    #[error("Response body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error(
        "Element content mismatch\n\n\
         actual (canonical):\n{actual}\n\n\
         expected (canonical):\n{expected}\n\n\
         diff (left: actual, right: expected):\n{}",
        Comparison::new(&TagLines(.actual), &TagLines(.expected))
    )]
    ContentMismatch { actual: String, expected: String },
}

impl AssertElementError {
    /// True when the error signals misconfiguration rather than a defect in
    /// the content under test.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::StrictValidatorUnavailable | Self::InvalidMode { .. }
        )
    }
}

/// Canonical markup with one tag per line, so a diff points at the tag that
/// differs. Display only: canonical forms have no whitespace between tags.
struct TagLines<'a>(&'a str);

impl fmt::Debug for TagLines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.replace("><", ">\n<"))
    }
}

fn numbered(previews: &[String]) -> String {
    previews
        .iter()
        .enumerate()
        .map(|(i, preview)| format!("  {}. {}", i + 1, preview))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ambiguous_message_lists_previews() {
        let err = AssertElementError::SelectorAmbiguous {
            selector: ".x".to_string(),
            count: 2,
            previews: vec![
                r#"<div class="x"></div>"#.to_string(),
                r#"<div class="x">b</div>"#.to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "More than one element found (2): .x\nFound elements:\n  1. <div class=\"x\"></div>\n  2. <div class=\"x\">b</div>"
        );
    }

    #[test]
    fn test_malformed_message_depends_on_mode() {
        let standard = AssertElementError::MalformedHtml {
            mode: ValidationMode::Standard,
            diagnostic: "boom".to_string(),
        };
        assert_eq!(
            standard.to_string(),
            "Response content is not valid HTML: boom"
        );

        let strict = AssertElementError::MalformedHtml {
            mode: ValidationMode::Strict,
            diagnostic: "boom".to_string(),
        };
        assert_eq!(
            strict.to_string(),
            "Response content failed strict HTML5 validation: boom"
        );
    }

    #[test]
    fn test_configuration_errors() {
        assert!(AssertElementError::StrictValidatorUnavailable.is_configuration_error());
        assert!(AssertElementError::InvalidMode {
            key: "K".to_string(),
            value: "maybe".to_string(),
        }
        .is_configuration_error());
        assert!(!AssertElementError::SelectorNoMatch {
            selector: "#a".to_string(),
        }
        .is_configuration_error());
    }

    #[test]
    fn test_mismatch_shows_both_forms() {
        let err = AssertElementError::ContentMismatch {
            actual: "<p>a</p>".to_string(),
            expected: "<p>b</p>".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("actual (canonical):\n<p>a</p>"));
        assert!(message.contains("expected (canonical):\n<p>b</p>"));
    }

    #[test]
    fn test_mismatch_diff_is_line_per_tag() {
        let actual = "<ul class=\"a\"><li>One</li><li>Two</li></ul>";
        assert_eq!(
            format!("{:?}", TagLines(actual)),
            "<ul class=\"a\">\n<li>One</li>\n<li>Two</li>\n</ul>"
        );

        let err = AssertElementError::ContentMismatch {
            actual: actual.to_string(),
            expected: "<ul class=\"a\"><li>One</li><li>Three</li></ul>".to_string(),
        };
        let message = err.to_string();
        let diff = message
            .split("diff (left: actual, right: expected):\n")
            .nth(1)
            .unwrap();
        assert!(!diff.contains("\\\""));
        assert!(diff.contains("<li>One</li>"));
        assert!(diff.lines().count() >= 4);
    }
}
