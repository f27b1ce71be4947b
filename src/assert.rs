//! Looks an element up by selector and compares it against expected markup.

use scraper::{ElementRef, Html, Selector};

use crate::canonical::canonicalize;
use crate::dom::parse_document;
use crate::error::AssertElementError;
use crate::mode::{EnvSettings, SettingsProvider, ValidationMode};
use crate::source::HtmlSource;
use crate::validate::Validator;

/// Number of matches listed when a selector is ambiguous.
pub const MAX_PREVIEWS: usize = 5;
/// Length, in characters, each listed match is cut to.
pub const PREVIEW_LENGTH: usize = 100;

/// Element assertions with a per-suite default validation mode.
///
/// Implement it on a test fixture to give a whole suite its own mode, the way
/// a test class attribute would. The mode an assertion runs with is the first
/// of: the `mode` argument, [`html_mode`](Self::html_mode), the
/// [`HTML_MODE_SETTING`](crate::HTML_MODE_SETTING) read from
/// [`settings`](Self::settings), and finally [`ValidationMode::Standard`].
pub trait AssertElement {
    fn html_mode(&self) -> Option<ValidationMode> {
        None
    }

    fn settings(&self) -> &dyn SettingsProvider {
        &EnvSettings
    }

    /// Validator used before any element is looked at.
    fn validator(&self) -> Validator {
        Validator::default()
    }

    fn resolve_mode(
        &self,
        mode: Option<ValidationMode>,
    ) -> Result<ValidationMode, AssertElementError> {
        let class = self.html_mode();
        let global = match mode.or(class) {
            Some(_) => None,
            None => ValidationMode::from_settings(self.settings())?,
        };
        let resolved = ValidationMode::resolve(mode, class, global);
        log::debug!("using {resolved} HTML validation");
        Ok(resolved)
    }

    /// Asserts that the single element matching `selector` in `source` is
    /// equivalent to `expected` once both are canonicalized.
    fn assert_element_contains<S>(
        &self,
        source: &S,
        selector: &str,
        expected: &str,
        mode: Option<ValidationMode>,
    ) -> Result<(), AssertElementError>
    where
        S: HtmlSource + ?Sized,
    {
        let mode = self.resolve_mode(mode)?;
        compare_element(&self.validator(), source, selector, expected, mode)
    }
}

/// The stock [`AssertElement`] implementation.
pub struct ElementAssertions {
    html_mode: Option<ValidationMode>,
    settings: Box<dyn SettingsProvider>,
    validator: Validator,
}

impl Default for ElementAssertions {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementAssertions {
    /// No suite default; the process environment supplies settings.
    pub fn new() -> Self {
        Self {
            html_mode: None,
            settings: Box::new(EnvSettings),
            validator: Validator::default(),
        }
    }

    /// Strict HTML5 validation unless an assertion asks otherwise.
    pub fn strict() -> Self {
        Self::new().with_mode(ValidationMode::Strict)
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.html_mode = Some(mode);
        self
    }

    pub fn with_settings(mut self, settings: impl SettingsProvider + 'static) -> Self {
        self.settings = Box::new(settings);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }
}

impl AssertElement for ElementAssertions {
    fn html_mode(&self) -> Option<ValidationMode> {
        self.html_mode
    }

    fn settings(&self) -> &dyn SettingsProvider {
        self.settings.as_ref()
    }

    fn validator(&self) -> Validator {
        self.validator
    }
}

/// [`AssertElement::assert_element_contains`] with no suite default.
pub fn assert_element_contains<S>(
    source: &S,
    selector: &str,
    expected: &str,
    mode: Option<ValidationMode>,
) -> Result<(), AssertElementError>
where
    S: HtmlSource + ?Sized,
{
    ElementAssertions::new().assert_element_contains(source, selector, expected, mode)
}

/// Runs the comparison with an already resolved `mode` and the default
/// [`Validator`].
///
/// Validation and selection errors are reported before anything is
/// canonicalized.
pub fn check_element<S>(
    source: &S,
    selector: &str,
    expected: &str,
    mode: ValidationMode,
) -> Result<(), AssertElementError>
where
    S: HtmlSource + ?Sized,
{
    compare_element(&Validator::default(), source, selector, expected, mode)
}

fn compare_element<S>(
    validator: &Validator,
    source: &S,
    selector: &str,
    expected: &str,
    mode: ValidationMode,
) -> Result<(), AssertElementError>
where
    S: HtmlSource + ?Sized,
{
    let content = source.html()?;
    validator.validate(&content, mode)?;

    // Built the same way as the expected side, so the element keeps the
    // structure it was written with.
    let document = parse_document(&content);
    let element = find_unique_element(&document, selector)?;

    let actual = canonicalize(&element.html());
    let expected = canonicalize(expected);
    if actual != expected {
        return Err(AssertElementError::ContentMismatch { actual, expected });
    }
    Ok(())
}

/// The one element in `document` matching `selector`.
pub fn find_unique_element<'a>(
    document: &'a Html,
    selector: &str,
) -> Result<ElementRef<'a>, AssertElementError> {
    let parsed = Selector::parse(selector).map_err(|err| AssertElementError::InvalidSelector {
        selector: selector.to_string(),
        reason: err.to_string(),
    })?;

    let matches: Vec<ElementRef<'a>> = document.select(&parsed).collect();
    log::debug!("selector {selector:?} matched {} elements", matches.len());

    match matches.as_slice() {
        [] => Err(AssertElementError::SelectorNoMatch {
            selector: selector.to_string(),
        }),
        [element] => Ok(*element),
        _ => Err(AssertElementError::SelectorAmbiguous {
            selector: selector.to_string(),
            count: matches.len(),
            previews: previews(&matches),
        }),
    }
}

fn previews(matches: &[ElementRef<'_>]) -> Vec<String> {
    let mut previews: Vec<String> = matches
        .iter()
        .take(MAX_PREVIEWS)
        .map(|element| preview(&element.html()))
        .collect();
    if matches.len() > MAX_PREVIEWS {
        previews.push(format!("... and {} more", matches.len() - MAX_PREVIEWS));
    }
    previews
}

/// `html` on one line, cut to [`PREVIEW_LENGTH`] characters.
fn preview(html: &str) -> String {
    html.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_LENGTH)
        .collect()
}
