use crate::i18n::{LocaleConfig, LocaleRegistry};
use crate::routing::RoutingConfig;
use anyhow::{Context, Result};
use thiserror::Error;

/// Fatal configuration problems. The process must refuse to start on any of these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no supported locales configured")]
    NoLocales,

    #[error("locale '{0}' is listed more than once")]
    DuplicateLocale(String),

    #[error("'{0}' is not a valid locale code")]
    InvalidLocaleCode(String),

    #[error("locale code pattern failed to compile: {0}")]
    LocaleCodePattern(String),

    #[error("default locale '{0}' is not one of the supported locales")]
    UnknownDefault(String),

    #[error("excluded path prefix '{0}' must start with '/' and not be the root")]
    InvalidExcludedPrefix(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    // Locales
    pub locales: Vec<LocaleConfig>,
    pub default_locale: String,
    pub locale_detection: bool,

    // Routing
    pub excluded_path_prefixes: Vec<String>,

    // Rendering
    pub messages_dir: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Locales - "code[:label]" entries, comma separated
            locales: std::env::var("SUPPORTED_LOCALES")
                .map(|v| parse_locales(&v))
                .unwrap_or_else(|_| parse_locales("en:English,ka:ქართული")),
            default_locale: std::env::var("DEFAULT_LOCALE")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| "en".to_string()),
            locale_detection: match std::env::var("LOCALE_DETECTION") {
                Ok(v) => parse_bool(&v)
                    .with_context(|| format!("LOCALE_DETECTION has invalid value '{}'", v))?,
                Err(_) => false,
            },

            // Routing
            excluded_path_prefixes: std::env::var("EXCLUDED_PATH_PREFIXES")
                .map(|v| parse_list(&v))
                .unwrap_or_else(|_| parse_list("/api,/static,/assets,/health,/favicon.ico")),

            // Rendering
            messages_dir: std::env::var("MESSAGES_DIR")
                .unwrap_or_else(|_| "messages".to_string()),

            // Server
            port: match std::env::var("PORT") {
                Ok(v) => v
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT has invalid value '{}'", v))?,
                Err(_) => 8080,
            },
        })
    }

    /// Validate the locale settings and build the immutable routing configuration.
    pub fn routing(&self) -> Result<RoutingConfig, ConfigError> {
        let registry = LocaleRegistry::new(self.locales.clone(), &self.default_locale)?;
        RoutingConfig::new(
            registry,
            self.excluded_path_prefixes.clone(),
            self.locale_detection,
        )
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_locales(value: &str) -> Vec<LocaleConfig> {
    parse_list(value)
        .into_iter()
        .map(|entry| match entry.split_once(':') {
            Some((code, label)) if !label.trim().is_empty() => {
                LocaleConfig::new(code.trim(), label.trim())
            }
            Some((code, _)) => LocaleConfig::with_default_label(code.trim()),
            None => LocaleConfig::with_default_label(entry.as_str()),
        })
        .collect()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{}'", other),
    }
}
