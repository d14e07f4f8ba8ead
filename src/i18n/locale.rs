//! Locale type: a validated, supported locale code.
//!
//! A `Locale` can only be obtained from a `LocaleRegistry`, so holding one
//! means the code is part of the configured locale set.

use std::fmt;

/// A supported locale (e.g. "en", "ka").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    code: String,
}

impl Locale {
    /// Only the registry creates locales; see `LocaleRegistry::get`.
    pub(crate) fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// The locale code as it appears in URL paths.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.code == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        self.code == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_and_display() {
        let locale = Locale::new("ka");
        assert_eq!(locale.code(), "ka");
        assert_eq!(locale.to_string(), "ka");
    }

    #[test]
    fn test_compare_with_str() {
        let locale = Locale::new("en");
        assert!(locale == "en");
        assert!(locale != "ka");
    }

    #[test]
    fn test_locale_equality() {
        assert_eq!(Locale::new("en"), Locale::new("en"));
        assert_ne!(Locale::new("en"), Locale::new("ka"));
    }
}
