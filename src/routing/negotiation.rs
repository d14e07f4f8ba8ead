//! Locale negotiation from request signals (preference cookie, `Accept-Language`).

use crate::i18n::{Locale, LocaleRegistry};

/// Name of the cookie holding a user's stored locale preference.
pub const LOCALE_COOKIE: &str = "locale";

/// Pick a supported locale from the stored preference or the
/// `Accept-Language` header.
///
/// # Arguments
/// * `cookie` - Value of the `locale` cookie, if sent
/// * `accept_language` - Raw `Accept-Language` header, if sent
/// * `registry` - The configured locales
///
/// # Returns
/// The cookie's locale if supported, else the best supported header match,
/// else `None`.
pub fn negotiate(
    cookie: Option<&str>,
    accept_language: Option<&str>,
    registry: &LocaleRegistry,
) -> Option<Locale> {
    if let Some(locale) = cookie.and_then(|value| registry.get(value.trim())) {
        return Some(locale);
    }

    let header = accept_language?;
    parse_accept_language(header)
        .into_iter()
        .find_map(|tag| match_tag(&tag, registry))
}

/// Language tags from an `Accept-Language` header, highest quality first.
///
/// Ties keep header order; `q=0` entries and the `*` wildcard are dropped.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut entries: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|raw| {
            let mut parts = raw.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let quality = parts
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            if quality <= 0.0 {
                return None;
            }

            Some((tag.to_string(), quality))
        })
        .collect();

    // Stable sort keeps header order for equal weights
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.into_iter().map(|(tag, _)| tag).collect()
}

/// Match a language tag against the registry: exact code first, then the
/// primary subtag (`ka-GE` → `ka`). Case-insensitive.
fn match_tag(tag: &str, registry: &LocaleRegistry) -> Option<Locale> {
    let find = |wanted: &str| {
        registry
            .list()
            .iter()
            .find(|config| config.code.eq_ignore_ascii_case(wanted))
            .and_then(|config| registry.get(&config.code))
    };

    find(tag).or_else(|| {
        let primary = tag.split('-').next()?;
        find(primary)
    })
}
