//! Per-locale message bundles loaded from `{dir}/{code}.json`.

use crate::i18n::{Locale, LocaleRegistry};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// A flat or nested JSON object of messages for one locale.
#[derive(Debug, Clone)]
pub struct MessageBundle {
    locale: Locale,
    messages: Map<String, Value>,
}

impl MessageBundle {
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Look up a message by dotted key (e.g. "nav.home").
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        let mut current = self.messages.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        current.as_str()
    }

    pub fn messages(&self) -> &Map<String, Value> {
        &self.messages
    }
}

#[derive(Debug, Error)]
pub enum MessagesError {
    #[error("no message bundle for locale '{locale}'")]
    Missing { locale: String },

    #[error("message bundle for locale '{locale}' is malformed: {reason}")]
    Malformed { locale: String, reason: String },
}

/// Loads message bundles from a directory on demand.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    dir: PathBuf,
}

impl MessageCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn bundle_path(&self, locale: &Locale) -> PathBuf {
        self.dir.join(format!("{}.json", locale.code()))
    }

    /// Supported locales with no bundle file on disk, for startup diagnostics.
    pub fn missing_bundles(&self, registry: &LocaleRegistry) -> Vec<Locale> {
        registry
            .list()
            .iter()
            .filter_map(|config| registry.get(&config.code))
            .filter(|locale| !self.bundle_path(locale).is_file())
            .collect()
    }

    /// Load the bundle for a resolved locale.
    ///
    /// An absent or unreadable file is `Missing`; content that is not a JSON
    /// object is `Malformed`. Callers must not render with empty messages.
    pub async fn load(&self, locale: &Locale) -> Result<MessageBundle, MessagesError> {
        let path = self.bundle_path(locale);
        debug!("Loading message bundle {}", path.display());

        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            warn!("Message bundle {} unavailable: {}", path.display(), e);
            MessagesError::Missing {
                locale: locale.code().to_string(),
            }
        })?;

        let value: Value = serde_json::from_str(&raw).map_err(|e| {
            warn!("Message bundle {} is not valid JSON: {}", path.display(), e);
            MessagesError::Malformed {
                locale: locale.code().to_string(),
                reason: e.to_string(),
            }
        })?;

        match value {
            Value::Object(messages) => Ok(MessageBundle {
                locale: locale.clone(),
                messages,
            }),
            _ => Err(MessagesError::Malformed {
                locale: locale.code().to_string(),
                reason: "top-level value is not an object".to_string(),
            }),
        }
    }
}
