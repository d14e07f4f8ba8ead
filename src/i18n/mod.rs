//! Internationalization (i18n) module: the configured locale set and the
//! per-locale message bundles.
//!
//! # Architecture
//!
//! - `registry`: ordered set of supported locales with exactly one default
//! - `locale`: validated `Locale` type handed out by the registry
//! - `messages`: message bundle loading for the rendering layer
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_router::i18n::{LocaleConfig, LocaleRegistry};
//!
//! let registry = LocaleRegistry::new(
//!     vec![LocaleConfig::new("en", "English"), LocaleConfig::new("ka", "ქართული")],
//!     "en",
//! )?;
//! let georgian = registry.get("ka");
//! ```

mod locale;
mod messages;
mod registry;

pub use locale::Locale;
pub use messages::{MessageBundle, MessageCatalog, MessagesError};
pub use registry::{LocaleConfig, LocaleRegistry};
