//! The locale resolver: a pure decision over (request signals, configuration).

use crate::config::ConfigError;
use crate::i18n::{Locale, LocaleRegistry};
use crate::routing::negotiation::negotiate;
use crate::routing::LocalePath;
use std::sync::Arc;

/// Immutable routing configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    registry: Arc<LocaleRegistry>,
    excluded_prefixes: Vec<String>,
    locale_detection: bool,
}

impl RoutingConfig {
    /// # Errors
    /// `InvalidExcludedPrefix` for a prefix that is empty, relative, or `/`
    /// (which would let every request bypass locale routing).
    pub fn new(
        registry: LocaleRegistry,
        excluded_prefixes: Vec<String>,
        locale_detection: bool,
    ) -> Result<Self, ConfigError> {
        if let Some(bad) = excluded_prefixes
            .iter()
            .find(|prefix| !prefix.starts_with('/') || prefix.as_str() == "/")
        {
            return Err(ConfigError::InvalidExcludedPrefix(bad.clone()));
        }

        Ok(Self {
            registry: Arc::new(registry),
            excluded_prefixes,
            locale_detection,
        })
    }

    pub fn registry(&self) -> &Arc<LocaleRegistry> {
        &self.registry
    }

    pub fn excluded_prefixes(&self) -> &[String] {
        &self.excluded_prefixes
    }

    pub fn locale_detection(&self) -> bool {
        self.locale_detection
    }

    fn is_excluded(&self, path: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// What the resolver needs to know about an inbound request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSignals<'a> {
    /// Path and query, e.g. `/about?x=1`
    pub path: &'a str,
    pub accept_language: Option<&'a str>,
    pub locale_cookie: Option<&'a str>,
}

impl<'a> RequestSignals<'a> {
    pub fn path(path: &'a str) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn with_accept_language(mut self, header: &'a str) -> Self {
        self.accept_language = Some(header);
        self
    }

    pub fn with_locale_cookie(mut self, value: &'a str) -> Self {
        self.locale_cookie = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Path matched an excluded prefix; locale routing does not apply.
    Bypass,

    /// Path already carries a supported locale.
    PassThrough { locale: Locale },

    /// Path is unqualified; redirect to the locale-qualified `location`.
    Redirect { location: String, locale: Locale },
}

/// Decide whether to pass a request through or redirect it.
///
/// # Arguments
/// * `request` - Path (with query) and the optional negotiation signals
/// * `config` - The immutable routing configuration
///
/// # Returns
/// * `Bypass` if the path starts with an excluded prefix
/// * `PassThrough` if the first segment is a supported locale code
/// * `Redirect` to `/{locale}{path}` otherwise, where `locale` is the default
///   unless detection is enabled and the request names a supported one
pub fn resolve(request: &RequestSignals<'_>, config: &RoutingConfig) -> RoutingDecision {
    if config.is_excluded(request.path) {
        return RoutingDecision::Bypass;
    }

    let path = LocalePath::parse(request.path, &config.registry);
    if let Some(locale) = path.locale() {
        return RoutingDecision::PassThrough {
            locale: locale.clone(),
        };
    }

    let locale = if config.locale_detection {
        negotiate(
            request.locale_cookie,
            request.accept_language,
            &config.registry,
        )
        .unwrap_or_else(|| config.registry.default_locale())
    } else {
        config.registry.default_locale()
    };

    RoutingDecision::Redirect {
        location: path.with_locale(locale.code()),
        locale,
    }
}
