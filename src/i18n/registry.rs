//! Locale registry: single source of truth for the configured locales.
//!
//! The registry is built once at startup from configuration and is immutable
//! thereafter. It is shared read-only between the resolver, the switcher and
//! the page handlers.

use crate::config::ConfigError;
use crate::i18n::Locale;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Configuration for a supported locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    /// Locale code used as the leading URL segment (e.g. "en", "ka")
    pub code: String,

    /// Human-readable label shown in the locale switcher (e.g. "ქართული")
    pub label: String,
}

impl LocaleConfig {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }

    /// Create a config using the built-in label for well-known codes.
    pub fn with_default_label(code: impl Into<String>) -> Self {
        let code = code.into();
        let label = builtin_label(&code)
            .map(str::to_string)
            .unwrap_or_else(|| code.clone());
        Self { code, label }
    }
}

/// The ordered set of supported locales, exactly one of which is the default.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    default_index: usize,
}

/// A primary language subtag optionally followed by region/script subtags.
const LOCALE_CODE_PATTERN: &str = r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{1,8})*$";

static LOCALE_CODE: OnceLock<Regex> = OnceLock::new();

/// Compiled locale code pattern, built on first use.
fn locale_code_pattern() -> Result<&'static Regex, ConfigError> {
    if let Some(pattern) = LOCALE_CODE.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(LOCALE_CODE_PATTERN)
        .map_err(|e| ConfigError::LocaleCodePattern(e.to_string()))?;
    Ok(LOCALE_CODE.get_or_init(|| pattern))
}

impl LocaleRegistry {
    /// Build a registry from an ordered locale list and a default code.
    ///
    /// # Errors
    /// * `NoLocales` if `locales` is empty
    /// * `InvalidLocaleCode` if a code is not a language tag
    /// * `LocaleCodePattern` if the code pattern itself fails to compile
    /// * `DuplicateLocale` if a code appears twice
    /// * `UnknownDefault` if `default_code` is not in the list
    pub fn new(locales: Vec<LocaleConfig>, default_code: &str) -> Result<Self, ConfigError> {
        if locales.is_empty() {
            return Err(ConfigError::NoLocales);
        }

        let pattern = locale_code_pattern()?;
        let mut seen = HashSet::new();
        for locale in &locales {
            if !pattern.is_match(&locale.code) {
                return Err(ConfigError::InvalidLocaleCode(locale.code.clone()));
            }
            if !seen.insert(locale.code.as_str()) {
                return Err(ConfigError::DuplicateLocale(locale.code.clone()));
            }
        }

        let default_index = locales
            .iter()
            .position(|locale| locale.code == default_code)
            .ok_or_else(|| ConfigError::UnknownDefault(default_code.to_string()))?;

        Ok(Self {
            locales,
            default_index,
        })
    }

    /// Look up a supported locale by its exact code.
    pub fn get(&self, code: &str) -> Option<Locale> {
        self.get_config(code).map(|config| Locale::new(config.code.as_str()))
    }

    /// Look up the full configuration of a supported locale.
    pub fn get_config(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// The default locale used for unqualified requests.
    pub fn default_locale(&self) -> Locale {
        Locale::new(self.locales[self.default_index].code.as_str())
    }

    /// All configured locales in configured order.
    pub fn list(&self) -> &[LocaleConfig] {
        &self.locales
    }
}

impl Default for LocaleRegistry {
    /// English (default) and Georgian.
    fn default() -> Self {
        Self {
            locales: default_locales(),
            default_index: 0,
        }
    }
}

fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig::new("en", "English"),
        LocaleConfig::new("ka", "ქართული"),
    ]
}

fn builtin_label(code: &str) -> Option<&'static str> {
    match code {
        "en" => Some("English"),
        "ka" => Some("ქართული"),
        _ => None,
    }
}
