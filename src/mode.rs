//! Validation policy and the process-wide settings it can be read from.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::AssertElementError;

/// Name of the process-wide setting holding the default validation mode.
pub const HTML_MODE_SETTING: &str = "ASSERT_ELEMENT_HTML_MODE";

/// How strictly a document is checked before elements are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationMode {
    /// Skip validation entirely.
    None,
    /// Browser-like well-formedness: unclosed tags are tolerated, stray end
    /// tags are not.
    #[default]
    Standard,
    /// Full HTML5 grammar conformance.
    Strict,
}

impl ValidationMode {
    /// Picks the first mode present in precedence order: per call, per test
    /// class, process-wide. Falls back to [`ValidationMode::Standard`].
    pub fn resolve(
        call: Option<ValidationMode>,
        class: Option<ValidationMode>,
        global: Option<ValidationMode>,
    ) -> ValidationMode {
        call.or(class).or(global).unwrap_or_default()
    }

    /// Reads [`HTML_MODE_SETTING`] from `settings`.
    pub fn from_settings(
        settings: &dyn SettingsProvider,
    ) -> Result<Option<ValidationMode>, AssertElementError> {
        let Some(raw) = settings.lookup(HTML_MODE_SETTING) else {
            return Ok(None);
        };
        raw.parse()
            .map(Some)
            .map_err(|_| AssertElementError::InvalidMode {
                key: HTML_MODE_SETTING.to_string(),
                value: raw,
            })
    }

    pub(crate) fn failure_prefix(&self) -> &'static str {
        match self {
            ValidationMode::Strict => "Response content failed strict HTML5 validation",
            _ => "Response content is not valid HTML",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationMode::None => "none",
            ValidationMode::Standard => "standard",
            ValidationMode::Strict => "strict",
        };
        f.write_str(name)
    }
}

/// Returned when a string is not a recognised validation mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown validation mode {0:?}")]
pub struct ParseModeError(pub String);

impl FromStr for ValidationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "standard" | "1" => Ok(ValidationMode::Standard),
            "false" | "none" | "off" | "0" => Ok(ValidationMode::None),
            "strict" => Ok(ValidationMode::Strict),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Source of process-wide configuration values.
pub trait SettingsProvider {
    fn lookup(&self, key: &str) -> Option<String>;

    fn get(&self, key: &str, default: &str) -> String {
        self.lookup(key).unwrap_or_else(|| default.to_string())
    }
}

/// Reads settings from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSettings;

impl SettingsProvider for EnvSettings {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A provider with no settings at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSettings;

impl SettingsProvider for NoSettings {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

impl SettingsProvider for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings(value: &str) -> HashMap<String, String> {
        HashMap::from([(HTML_MODE_SETTING.to_string(), value.to_string())])
    }

    #[rstest]
    #[case(Some(ValidationMode::None), Some(ValidationMode::Strict), Some(ValidationMode::Strict), ValidationMode::None)]
    #[case(None, Some(ValidationMode::Strict), Some(ValidationMode::None), ValidationMode::Strict)]
    #[case(None, None, Some(ValidationMode::None), ValidationMode::None)]
    #[case(None, None, None, ValidationMode::Standard)]
    fn test_resolve_precedence(
        #[case] call: Option<ValidationMode>,
        #[case] class: Option<ValidationMode>,
        #[case] global: Option<ValidationMode>,
        #[case] expected: ValidationMode,
    ) {
        assert_eq!(ValidationMode::resolve(call, class, global), expected);
    }

    #[rstest]
    #[case("true", ValidationMode::Standard)]
    #[case("Standard", ValidationMode::Standard)]
    #[case("false", ValidationMode::None)]
    #[case("none", ValidationMode::None)]
    #[case(" STRICT ", ValidationMode::Strict)]
    fn test_parse_mode(#[case] raw: &str, #[case] expected: ValidationMode) {
        assert_eq!(raw.parse::<ValidationMode>(), Ok(expected));
    }

    #[test]
    fn test_parse_mode_rejects_unknown() {
        let err = "maybe".parse::<ValidationMode>().unwrap_err();
        assert_eq!(err, ParseModeError("maybe".to_string()));
        assert_eq!(err.to_string(), "unknown validation mode \"maybe\"");

        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn test_from_settings() {
        assert_eq!(
            ValidationMode::from_settings(&settings("strict")).unwrap(),
            Some(ValidationMode::Strict)
        );
        assert_eq!(ValidationMode::from_settings(&NoSettings).unwrap(), None);

        let err = ValidationMode::from_settings(&settings("sometimes")).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("\"sometimes\""));
    }

    #[test]
    fn test_get_with_default() {
        assert_eq!(NoSettings.get(HTML_MODE_SETTING, "true"), "true");
        assert_eq!(
            SettingsProvider::get(&settings("false"), HTML_MODE_SETTING, "true"),
            "false"
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in [
            ValidationMode::None,
            ValidationMode::Standard,
            ValidationMode::Strict,
        ] {
            assert_eq!(mode.to_string().parse::<ValidationMode>(), Ok(mode));
        }
    }
}
