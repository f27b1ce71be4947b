//! Test assertions that an element of an HTML document matches expected markup.
//!
//! The element is picked with a CSS selector and must match exactly once. Both
//! the element and the expected markup are canonicalized before comparison, so
//! differences that don't change the markup's meaning (whitespace, attribute
//! order and quoting, `checked` vs `checked="checked"`, `<br>` vs `<br/>`) are
//! ignored. Before anything is compared the whole document is validated,
//! strictly or loosely depending on the [`ValidationMode`].
//!
//! # Example
//! ```ignore
//! use assert_element::assert_element_contains;
//!
//! let page = r#"<main><div id="greeting">
//!     Hello   <b>World</b>
//! </div></main>"#;
//!
//! assert_element_contains!(page, "#greeting", r#"<div id="greeting">Hello <b>World</b></div>"#);
//! ```
//!
//! Response types take part by implementing [`HtmlSource`]:
//! ```ignore
//! use assert_element::{Body, HtmlSource};
//!
//! impl HtmlSource for MyResponse {
//!     fn body(&self) -> Body<'_> {
//!         Body::Bytes(&self.content)
//!     }
//! }
//! ```
//!
//! The validation mode comes from, in order: the assertion itself, the test
//! suite's [`AssertElement::html_mode`], the `ASSERT_ELEMENT_HTML_MODE`
//! setting, and finally [`ValidationMode::Standard`].

/// Asserts that the element matching a selector is equivalent to the expected HTML.
///
/// # Examples
/// ```ignore
/// use assert_element::assert_element_contains;
///
/// assert_element_contains!(
///     "<ul><li id='first'>One</li><li>Two</li></ul>",
///     "#first",
///     "<li id=\"first\">One</li>"
/// );
///
/// // With an explicit validation mode
/// use assert_element::ValidationMode;
/// assert_element_contains!(
///     "<div id='x'>a</span></div>",
///     "#x",
///     "<div id=\"x\">a</div>",
///     ValidationMode::None
/// );
/// ```
#[macro_export]
macro_rules! assert_element_contains {
    (@run $source:expr, $selector:expr, $expected:expr, $mode:expr) => {{
        match (&$source, &$selector, &$expected) {
            (source, selector, expected) => {
                if let Err(err) = $crate::assert_element_contains(source, selector, expected, $mode) {
                    if err.is_configuration_error() {
                        panic!(
                            "\n\
                            assert_element configuration error:\n\
                            {}\
                        ",
                            err
                        );
                    }
                    panic!(
                        "\n\
                        element assertion failed for selector {:?}:\n\
                        {}\
                    ",
                        selector, err
                    );
                }
            }
        }
    }};
    ($source:expr, $selector:expr, $expected:expr $(,)?) => {
        $crate::assert_element_contains!(@run $source, $selector, $expected, ::core::option::Option::None)
    };
    ($source:expr, $selector:expr, $expected:expr, $mode:expr $(,)?) => {
        $crate::assert_element_contains!(@run $source, $selector, $expected, ::core::option::Option::Some($mode))
    };
}

/// Asserts that the element matching a selector exists exactly once but is not
/// equivalent to the given HTML.
///
/// Any failure other than a content mismatch (no match, several matches,
/// invalid markup) still fails the assertion.
///
/// # Examples
/// ```ignore
/// use assert_element::assert_element_not_contains;
///
/// assert_element_not_contains!(
///     "<p id='msg'>Hello</p>",
///     "#msg",
///     "<p id=\"msg\">Goodbye</p>"
/// );
/// ```
#[macro_export]
macro_rules! assert_element_not_contains {
    (@run $source:expr, $selector:expr, $expected:expr, $mode:expr) => {{
        match (&$source, &$selector, &$expected) {
            (source, selector, expected) => {
                match $crate::assert_element_contains(source, selector, expected, $mode) {
                    Err($crate::AssertElementError::ContentMismatch { .. }) => {}
                    Ok(()) => panic!(
                        "\n\
                        element matching {:?} was equivalent but expected to be different:\n\n\
                        HTML:\n\
                        {}\
                    ",
                        selector, expected
                    ),
                    Err(err) => panic!(
                        "\n\
                        element assertion failed for selector {:?}:\n\
                        {}\
                    ",
                        selector, err
                    ),
                }
            }
        }
    }};
    ($source:expr, $selector:expr, $expected:expr $(,)?) => {
        $crate::assert_element_not_contains!(@run $source, $selector, $expected, ::core::option::Option::None)
    };
    ($source:expr, $selector:expr, $expected:expr, $mode:expr $(,)?) => {
        $crate::assert_element_not_contains!(@run $source, $selector, $expected, ::core::option::Option::Some($mode))
    };
}

mod assert;
mod canonical;
mod dom;
mod error;
mod mode;
mod pretty;
mod source;
mod tokenizer;
mod validate;

pub use assert::{
    assert_element_contains, check_element, find_unique_element, AssertElement,
    ElementAssertions, MAX_PREVIEWS, PREVIEW_LENGTH,
};
pub use canonical::{canonicalize, normalize_text, BOOLEAN_ATTRIBUTES};
pub use error::AssertElementError;
pub use mode::{
    EnvSettings, NoSettings, ParseModeError, SettingsProvider, ValidationMode, HTML_MODE_SETTING,
};
pub use pretty::pretty_print;
pub use source::{Body, HtmlSource};
#[cfg(feature = "strict")]
pub use validate::Html5Validator;
pub use validate::{
    check_well_formed, validate, with_doctype, StrictValidator, Validator, DEFAULT_DOCTYPE,
};
