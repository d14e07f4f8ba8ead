//! Locale switch control: lets a user change locale without losing their place.
//!
//! Selecting a locale rewrites the current path's locale segment and hands the
//! new path to a `Navigator`. Navigation runs as a spawned task; a newer
//! selection aborts the in-flight one, so the last requested locale wins.

use crate::i18n::{Locale, LocaleRegistry};
use crate::routing::LocalePath;
use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// One entry in the switcher's selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleOption {
    pub code: String,
    pub label: String,
}

/// A pending locale change: the target locale plus the current path without
/// its locale segment. Consumed immediately by navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    target: Locale,
    path: LocalePath,
}

impl NavigationIntent {
    pub fn target(&self) -> &Locale {
        &self.target
    }

    pub fn remainder(&self) -> &str {
        self.path.remainder()
    }

    /// The path to navigate to, query and fragment included.
    pub fn href(&self) -> String {
        self.path.with_locale(self.target.code())
    }
}

/// Client-side router seam: replaces the current location with `href`.
pub trait Navigator: Send + Sync + 'static {
    fn replace(&self, href: String) -> BoxFuture<'static, anyhow::Result<()>>;
}

/// Selection entries for every configured locale, in configured order.
pub fn options(registry: &LocaleRegistry) -> Vec<LocaleOption> {
    registry
        .list()
        .iter()
        .map(|config| LocaleOption {
            code: config.code.clone(),
            label: config.label.clone(),
        })
        .collect()
}

/// Compute the navigation for a selection.
///
/// # Arguments
/// * `registry` - The configured locales
/// * `active` - The locale the page is currently rendered in
/// * `current_path` - The current path, query and fragment included
/// * `selected` - The locale code the user picked
///
/// # Returns
/// * `Some(NavigationIntent)` for a supported locale other than `active`
/// * `None` if `selected` is the active locale or is not supported
///
/// A path without a recognizable locale segment is treated as the remainder,
/// so the selected locale is prepended instead of failing.
pub fn plan_switch(
    registry: &LocaleRegistry,
    active: &Locale,
    current_path: &str,
    selected: &str,
) -> Option<NavigationIntent> {
    if active == selected {
        return None;
    }

    let Some(target) = registry.get(selected) else {
        warn!("Ignoring selection of unsupported locale '{}'", selected);
        return None;
    };

    Some(NavigationIntent {
        target,
        path: LocalePath::parse(current_path, registry),
    })
}

/// `<select>` markup for the switcher with the active locale selected.
pub fn render_select(registry: &LocaleRegistry, active: &Locale) -> String {
    let mut html = String::from(r#"<select name="locale" class="locale-switcher">"#);
    for option in options(registry) {
        let selected = if *active == option.code.as_str() {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            escape_html(&option.code),
            selected,
            escape_html(&option.label)
        ));
    }
    html.push_str("</select>");
    html
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Bookkeeping for the latest navigation. Generations start at 1; 0 means
/// nothing was ever started.
#[derive(Default)]
struct InFlight {
    generation: u64,
    abort: Option<AbortHandle>,
}

/// Publishes a navigation's generation when its task ends, whether it
/// completed, failed, panicked or was aborted.
struct FinishedGuard {
    finished: Arc<watch::Sender<u64>>,
    generation: u64,
}

impl Drop for FinishedGuard {
    fn drop(&mut self) {
        let generation = self.generation;
        self.finished.send_modify(|done| *done = (*done).max(generation));
    }
}

/// The switch control bound to a client-side `Navigator`.
///
/// Only the latest selection is ever tracked: its generation drives both
/// `is_pending` and `settled`, so a superseded navigation can neither
/// re-enable the control nor finish after its replacement.
pub struct LocaleSwitcher<N: Navigator> {
    registry: Arc<LocaleRegistry>,
    navigator: Arc<N>,
    in_flight: Mutex<InFlight>,
    finished: Arc<watch::Sender<u64>>,
}

impl<N: Navigator> LocaleSwitcher<N> {
    pub fn new(registry: Arc<LocaleRegistry>, navigator: N) -> Self {
        let (finished, _) = watch::channel(0);
        Self {
            registry,
            navigator: Arc::new(navigator),
            in_flight: Mutex::new(InFlight::default()),
            finished: Arc::new(finished),
        }
    }

    /// Handle a selection event. Must be called within a tokio runtime.
    ///
    /// # Arguments
    /// * `active` - The locale the page is currently rendered in
    /// * `current_path` - The current path, query and fragment included
    /// * `selected` - The locale code the user picked
    ///
    /// Selecting the active locale is a no-op. Otherwise the in-flight
    /// navigation, if any, is aborted and a new one starts in the background.
    pub fn select(&self, active: &Locale, current_path: &str, selected: &str) {
        let Some(intent) = plan_switch(&self.registry, active, current_path, selected) else {
            return;
        };

        let href = intent.href();
        let navigator = Arc::clone(&self.navigator);

        let mut in_flight = self.in_flight();
        if let Some(previous) = in_flight.abort.take() {
            if *self.finished.borrow() < in_flight.generation {
                debug!("Superseding in-flight navigation");
            }
            previous.abort();
        }

        in_flight.generation += 1;
        let guard = FinishedGuard {
            finished: Arc::clone(&self.finished),
            generation: in_flight.generation,
        };

        debug!("Navigating to {}", href);
        let handle = tokio::spawn(async move {
            let _guard = guard;
            if let Err(e) = navigator.replace(href.clone()).await {
                warn!("Navigation to {} failed: {}", href, e);
            }
        });
        in_flight.abort = Some(handle.abort_handle());
    }

    /// Check whether the latest navigation is still running.
    ///
    /// # Returns
    /// `true` from `select` until that navigation ends; the control stays
    /// disabled meanwhile. Superseded navigations do not count.
    pub fn is_pending(&self) -> bool {
        let latest = self.in_flight().generation;
        *self.finished.borrow() < latest
    }

    /// Wait until the latest navigation ends.
    ///
    /// A selection made while waiting becomes the new latest one, and this
    /// keeps waiting for it.
    pub async fn settled(&self) {
        let mut finished = self.finished.subscribe();
        loop {
            let latest = self.in_flight().generation;
            if finished.wait_for(|done| *done >= latest).await.is_err() {
                return;
            }
            if self.in_flight().generation == latest {
                return;
            }
        }
    }

    fn in_flight(&self) -> MutexGuard<'_, InFlight> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LocaleConfig;
    use futures::FutureExt;
    use std::time::Duration;

    /// Records completed navigations in order. Navigation to `hold` never
    /// completes; navigation to `slow` takes the given time.
    #[derive(Default)]
    struct RecordingNavigator {
        completed: Arc<Mutex<Vec<String>>>,
        hold: Option<String>,
        slow: Option<(String, Duration)>,
        fail: bool,
    }

    impl RecordingNavigator {
        fn holding(href: &str) -> Self {
            Self {
                hold: Some(href.to_string()),
                ..Self::default()
            }
        }

        fn slow(href: &str, delay: Duration) -> Self {
            Self {
                slow: Some((href.to_string(), delay)),
                ..Self::default()
            }
        }
    }

    impl Navigator for RecordingNavigator {
        fn replace(&self, href: String) -> BoxFuture<'static, anyhow::Result<()>> {
            let completed = Arc::clone(&self.completed);
            let hold = self.hold.as_deref() == Some(href.as_str());
            let delay = self
                .slow
                .as_ref()
                .filter(|(slow, _)| *slow == href)
                .map(|(_, delay)| *delay);
            let fail = self.fail;
            async move {
                if hold {
                    futures::future::pending::<()>().await;
                }
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                if fail {
                    anyhow::bail!("router unavailable");
                }
                completed.lock().unwrap().push(href);
                Ok(())
            }
            .boxed()
        }
    }

    fn registry() -> Arc<LocaleRegistry> {
        Arc::new(
            LocaleRegistry::new(
                vec![
                    LocaleConfig::new("en", "English"),
                    LocaleConfig::new("ka", "ქართული"),
                    LocaleConfig::new("de", "Deutsch"),
                ],
                "en",
            )
            .unwrap(),
        )
    }

    fn locale(code: &str) -> Locale {
        registry().get(code).unwrap()
    }

    // ==================== Path Rewrite Tests ====================

    #[test]
    fn test_plan_switch_rewrites_segment_and_keeps_query() {
        let intent = plan_switch(&registry(), &locale("en"), "/en/foo/bar?x=1", "ka").unwrap();
        assert_eq!(intent.href(), "/ka/foo/bar?x=1");
        assert_eq!(intent.target().code(), "ka");
        assert_eq!(intent.remainder(), "/foo/bar");
    }

    #[test]
    fn test_plan_switch_keeps_fragment() {
        let intent = plan_switch(&registry(), &locale("ka"), "/ka/docs#install", "en").unwrap();
        assert_eq!(intent.href(), "/en/docs#install");
    }

    #[test]
    fn test_plan_switch_same_locale_is_noop() {
        assert!(plan_switch(&registry(), &locale("en"), "/en/foo", "en").is_none());
    }

    #[test]
    fn test_plan_switch_unsupported_locale_is_noop() {
        assert!(plan_switch(&registry(), &locale("en"), "/en/foo", "fr").is_none());
    }

    #[test]
    fn test_plan_switch_path_without_locale_prepends() {
        let intent = plan_switch(&registry(), &locale("en"), "/about?x=1", "ka").unwrap();
        assert_eq!(intent.href(), "/ka/about?x=1");
    }

    #[test]
    fn test_plan_switch_malformed_path() {
        let intent = plan_switch(&registry(), &locale("en"), "garbage", "ka").unwrap();
        assert_eq!(intent.href(), "/ka");
    }

    #[test]
    fn test_plan_switch_bare_locale_path() {
        let intent = plan_switch(&registry(), &locale("en"), "/en", "de").unwrap();
        assert_eq!(intent.href(), "/de");
    }

    // ==================== Options & Markup ====================

    #[test]
    fn test_options_in_configured_order() {
        let options = options(&registry());
        let codes: Vec<_> = options.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, vec!["en", "ka", "de"]);
        assert_eq!(options[1].label, "ქართული");
    }

    #[test]
    fn test_render_select_marks_active() {
        let html = render_select(&registry(), &locale("ka"));
        assert!(html.contains(r#"<option value="ka" selected>ქართული</option>"#));
        assert!(html.contains(r#"<option value="en">English</option>"#));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<b>"A" & 'B'</b>"#), "&lt;b&gt;&quot;A&quot; &amp; &#39;B&#39;&lt;/b&gt;");
    }

    // ==================== Navigation Tests ====================

    #[tokio::test]
    async fn test_select_navigates() {
        let navigator = RecordingNavigator::default();
        let completed = Arc::clone(&navigator.completed);
        let switcher = LocaleSwitcher::new(registry(), navigator);

        switcher.select(&locale("en"), "/en/foo/bar?x=1", "ka");
        switcher.settled().await;

        assert!(!switcher.is_pending());
        assert_eq!(*completed.lock().unwrap(), vec!["/ka/foo/bar?x=1"]);
    }

    #[tokio::test]
    async fn test_select_active_locale_never_navigates() {
        let navigator = RecordingNavigator::default();
        let completed = Arc::clone(&navigator.completed);
        let switcher = LocaleSwitcher::new(registry(), navigator);

        switcher.select(&locale("en"), "/en/foo", "en");
        assert!(!switcher.is_pending());
        switcher.settled().await;

        assert!(completed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pending_while_navigation_in_flight() {
        let switcher = LocaleSwitcher::new(registry(), RecordingNavigator::holding("/ka/slow"));

        switcher.select(&locale("en"), "/en/slow", "ka");
        tokio::task::yield_now().await;

        assert!(switcher.is_pending());
    }

    #[tokio::test]
    async fn test_last_selection_wins() {
        let navigator = RecordingNavigator::holding("/ka/about");
        let completed = Arc::clone(&navigator.completed);
        let switcher = LocaleSwitcher::new(registry(), navigator);

        switcher.select(&locale("en"), "/en/about", "ka");
        assert!(switcher.is_pending());
        switcher.select(&locale("en"), "/en/about", "de");
        switcher.settled().await;

        assert!(!switcher.is_pending());
        assert_eq!(*completed.lock().unwrap(), vec!["/de/about"]);
    }

    #[tokio::test]
    async fn test_failed_navigation_clears_pending() {
        let navigator = RecordingNavigator {
            fail: true,
            ..RecordingNavigator::default()
        };
        let completed = Arc::clone(&navigator.completed);
        let switcher = LocaleSwitcher::new(registry(), navigator);

        switcher.select(&locale("en"), "/en", "ka");
        switcher.settled().await;

        assert!(!switcher.is_pending());
        assert!(completed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_selection_while_awaiting_settle_supersedes() {
        let navigator = RecordingNavigator::slow("/ka/about", Duration::from_millis(200));
        let completed = Arc::clone(&navigator.completed);
        let switcher = Arc::new(LocaleSwitcher::new(registry(), navigator));

        switcher.select(&locale("en"), "/en/about", "ka");
        let waiter = {
            let switcher = Arc::clone(&switcher);
            tokio::spawn(async move { switcher.settled().await })
        };
        tokio::task::yield_now().await;

        // Waiting for the navigation must not re-enable the control
        assert!(switcher.is_pending());

        switcher.select(&locale("en"), "/en/about", "de");
        waiter.await.unwrap();
        assert!(!switcher.is_pending());

        // Give the superseded navigation time to finish if it was not aborted
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(*completed.lock().unwrap(), vec!["/de/about"]);
    }

    #[tokio::test]
    async fn test_pending_until_latest_navigation_ends() {
        let switcher = LocaleSwitcher::new(
            registry(),
            RecordingNavigator::slow("/de/x", Duration::from_millis(50)),
        );

        assert!(!switcher.is_pending());
        switcher.select(&locale("en"), "/en/x", "ka");
        switcher.select(&locale("en"), "/en/x", "de");
        assert!(switcher.is_pending());

        switcher.settled().await;
        assert!(!switcher.is_pending());
    }
}
