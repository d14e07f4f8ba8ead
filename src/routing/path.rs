//! Decomposition of a request path into an optional locale segment and a remainder.

use crate::i18n::{Locale, LocaleRegistry};

/// A request path split into `/{locale}{remainder}{suffix}`.
///
/// `suffix` is any `?query` and/or `#fragment`, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalePath {
    locale: Option<Locale>,
    remainder: String,
    suffix: String,
}

impl LocalePath {
    /// Parse a raw path (optionally with query/fragment). Never fails.
    ///
    /// # Arguments
    /// * `raw` - The request path, e.g. `/ka/about?x=1`
    /// * `registry` - The configured locales the first segment is checked against
    ///
    /// The path is qualified only when its first segment equals a supported
    /// code exactly; otherwise the whole path is the remainder, so nothing is
    /// dropped when a locale is later prepended. A value that does not start
    /// with `/` cannot be decomposed and yields an empty remainder.
    pub fn parse(raw: &str, registry: &LocaleRegistry) -> Self {
        let split = raw.find(['?', '#']).unwrap_or(raw.len());
        let (path, suffix) = raw.split_at(split);
        let suffix = suffix.to_string();

        let Some(rest) = path.strip_prefix('/') else {
            return Self {
                locale: None,
                remainder: String::new(),
                suffix,
            };
        };

        let segment = rest.split('/').next().unwrap_or_default();
        match registry.get(segment) {
            Some(locale) => Self {
                locale: Some(locale),
                remainder: rest[segment.len()..].to_string(),
                suffix,
            },
            // The bare root has nothing to carry over.
            None if rest.is_empty() => Self {
                locale: None,
                remainder: String::new(),
                suffix,
            },
            None => Self {
                locale: None,
                remainder: path.to_string(),
                suffix,
            },
        }
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub fn is_qualified(&self) -> bool {
        self.locale.is_some()
    }

    /// Path after the locale segment; empty or starting with `/`.
    pub fn remainder(&self) -> &str {
        &self.remainder
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Build `/{code}{remainder}{suffix}`.
    pub fn with_locale(&self, code: &str) -> String {
        format!("/{}{}{}", code, self.remainder, self.suffix)
    }
}
