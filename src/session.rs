//! A price-update session: settings, storage and workflow status passed
//! around explicitly instead of living in globals.
//!
//! The session is the only place where the pure engine meets the outside
//! world. It reads content from a [`TextSource`], gates applies on the
//! configured safety threshold, snapshots content for undo and records
//! completed replacements in the history.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::engine::{GateVerdict, PreviewResult, apply_replacement, find_matches, preview};
use crate::error::{PriceError, PriceResult};
use crate::price::{FormatOptions, extract_price, format_price, is_canonical};
use crate::rule::ReplacementRule;
use crate::source::TextSource;
use crate::store::{HistoryEntry, KeyValueStore, Settings, UndoSnapshot, history, undo};
use crate::workflow::Workflow;

/// Summary of a completed apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub match_count: usize,
    pub new_value: String,
    pub url: String,
    pub domain: String,
}

pub struct Session {
    settings: Settings,
    store: Box<dyn KeyValueStore>,
    workflow: Workflow,
    new_price: Option<String>,
}

impl Session {
    /// Start a session, loading settings from `store`.
    pub fn start(store: Box<dyn KeyValueStore>) -> PriceResult<Self> {
        let settings = Settings::load(store.as_ref())?;
        Ok(Self {
            settings,
            store,
            workflow: Workflow::new(),
            new_price: None,
        })
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Change settings and persist them as one step.
    ///
    /// `change` edits a copy; the session adopts it only once the store has
    /// saved it, so a failed edit or save leaves the live settings as they were.
    pub fn update_settings<R>(&mut self, change: impl FnOnce(&mut Settings) -> PriceResult<R>) -> PriceResult<R> {
        let mut draft = self.settings.clone();
        let out = change(&mut draft)?;
        draft.save(self.store.as_mut())?;
        self.settings = draft;
        Ok(out)
    }

    pub const fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn new_price(&self) -> Option<&str> {
        self.new_price.as_deref()
    }

    /// Take a raw scraped or typed price as the value to write.
    ///
    /// `cleanup` defaults to the configured cleanup regex. Returns the
    /// normalized price.
    pub fn load_price(&mut self, raw: &str, cleanup: Option<&str>) -> PriceResult<String> {
        self.workflow.begin_fetch()?;
        let cleanup = cleanup.unwrap_or(&self.settings.default_regex_cleanup).to_owned();
        match extract_price(raw, Some(&cleanup)) {
            Ok(price) => {
                if !is_canonical(&price) {
                    warn!(raw, price = %price, "new price is not numeric; it will be written verbatim");
                }
                info!(price = %price, "new price loaded");
                self.new_price = Some(price.clone());
                self.workflow.price_loaded()?;
                Ok(price)
            }
            Err(e) => {
                self.workflow.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Preview `rule` against the source's current content.
    pub fn find(&mut self, source: &dyn TextSource, rule: &ReplacementRule) -> PriceResult<PreviewResult> {
        self.workflow.begin_find()?;
        let result = source.get_content().and_then(|content| {
            preview(
                &content,
                rule,
                self.new_price.as_deref(),
                self.settings.safety_threshold,
                &source.id(),
            )
        });
        match result {
            Ok(preview) => {
                info!(
                    matches = preview.match_count(),
                    verdict = %preview.verdict.message(),
                    "preview ready"
                );
                self.workflow.find_completed()?;
                Ok(preview)
            }
            Err(e) => {
                self.workflow.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Apply `rule` to the source, if the safety gate allows it.
    ///
    /// Refusals (no price, no matches, threshold exceeded) leave the
    /// workflow at `ready`; any other failure moves it to `error`.
    pub fn apply(&mut self, source: &mut dyn TextSource, rule: &ReplacementRule) -> PriceResult<ApplyReport> {
        self.workflow.begin_apply()?;
        match self.run_apply(source, rule) {
            Ok(report) => {
                self.workflow.apply_completed()?;
                Ok(report)
            }
            Err(e @ (PriceError::NoPrice | PriceError::NoMatches | PriceError::ThresholdExceeded { .. })) => {
                warn!(error = %e, "apply refused");
                self.workflow.apply_refused()?;
                Err(e)
            }
            Err(e) => {
                self.workflow.fail(e.to_string());
                Err(e)
            }
        }
    }

    fn run_apply(&mut self, source: &mut dyn TextSource, rule: &ReplacementRule) -> PriceResult<ApplyReport> {
        let price = self.new_price.clone().ok_or(PriceError::NoPrice)?;

        let url = source.url();
        let domain = host_of(&url)?;
        if !self.settings.is_domain_allowed(&domain) {
            return Err(PriceError::DomainNotAllowed { domain });
        }

        let content = source.get_content()?;
        let match_count = find_matches(&content, rule)?.len();
        GateVerdict::evaluate(match_count, self.settings.safety_threshold).check()?;

        let options = FormatOptions::from_rule(rule);
        let new_content = apply_replacement(&content, rule, &price, &options)?;

        let tab_id = source.id();
        let previous = undo::get(self.store.as_ref(), &tab_id)?;
        undo::save(self.store.as_mut(), UndoSnapshot::capture(tab_id.clone(), content, url.clone()))?;
        if let Err(e) = source.set_content(&new_content) {
            // Nothing changed, so the earlier apply stays undoable.
            match previous {
                Some(snapshot) => undo::save(self.store.as_mut(), snapshot)?,
                None => undo::clear(self.store.as_mut(), &tab_id)?,
            }
            return Err(e);
        }

        history::add(
            self.store.as_mut(),
            HistoryEntry::record(
                url.clone(),
                rule.old_price_pattern.clone(),
                price.clone(),
                match_count,
                domain.clone(),
            ),
        )?;

        info!(match_count, domain = %domain, "replacement applied");
        Ok(ApplyReport {
            match_count,
            new_value: format_price(&price, &options),
            url,
            domain,
        })
    }

    /// Restore the source's content from its undo snapshot.
    ///
    /// Returns `false` without touching anything when there is no snapshot.
    pub fn undo(&mut self, source: &mut dyn TextSource) -> PriceResult<bool> {
        let tab_id = source.id();
        let Some(snapshot) = undo::get(self.store.as_ref(), &tab_id)? else {
            debug!(tab_id = %tab_id, "nothing to undo");
            return Ok(false);
        };
        if let Err(e) = source.set_content(&snapshot.content) {
            self.workflow.fail(e.to_string());
            return Err(e);
        }
        undo::clear(self.store.as_mut(), &tab_id)?;
        self.workflow.undo_completed();
        info!(tab_id = %tab_id, taken = %snapshot.timestamp, "undo restored snapshot");
        Ok(true)
    }

    pub fn undo_snapshot(&self, tab_id: &str) -> PriceResult<Option<UndoSnapshot>> {
        undo::get(self.store.as_ref(), tab_id)
    }

    pub fn history(&self) -> PriceResult<Vec<HistoryEntry>> {
        history::list(self.store.as_ref())
    }

    pub fn clear_history(&mut self) -> PriceResult<()> {
        history::clear(self.store.as_mut())
    }
}

/// Host of a source URL; local files count as `localhost`.
fn host_of(source_url: &str) -> PriceResult<String> {
    let parsed = url::Url::parse(source_url).map_err(|e| PriceError::TextSourceUnavailable {
        reason: format!("invalid URL {source_url}: {e}"),
    })?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_lowercase()),
        _ if parsed.scheme() == "file" => Ok("localhost".to_owned()),
        _ => Err(PriceError::TextSourceUnavailable {
            reason: format!("URL has no host: {source_url}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use crate::store::MemoryStore;
    use crate::workflow::Status;

    fn session() -> Session {
        Session::start(Box::new(MemoryStore::new())).expect("start")
    }

    fn page(content: &str) -> MemorySource {
        MemorySource::new("tab-1", "http://localhost:8080/admin", content)
    }

    /// A store that reads fine but refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> PriceResult<Option<serde_json::Value>> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: serde_json::Value) -> PriceResult<()> {
            Err(PriceError::Io {
                path: key.into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn list(&self) -> PriceResult<Vec<String>> {
            Ok(Vec::new())
        }

        fn clear(&mut self, _key: &str) -> PriceResult<()> {
            Ok(())
        }
    }

    /// A page whose writes can be switched off.
    struct LockablePage {
        inner: MemorySource,
        locked: bool,
    }

    impl TextSource for LockablePage {
        fn id(&self) -> String {
            self.inner.id()
        }

        fn url(&self) -> String {
            self.inner.url()
        }

        fn get_content(&self) -> PriceResult<String> {
            self.inner.get_content()
        }

        fn set_content(&mut self, content: &str) -> PriceResult<()> {
            if self.locked {
                return Err(PriceError::TextSourceUnavailable {
                    reason: "page is read-only".to_owned(),
                });
            }
            self.inner.set_content(content)
        }
    }

    #[test]
    fn test_load_price_uses_default_cleanup() {
        let mut s = session();
        assert_eq!(s.load_price("€ 14,50", None).expect("load"), "14.50");
        assert_eq!(s.workflow().status(), Status::Ready);
    }

    #[test]
    fn test_find_apply_undo_cycle() {
        let mut s = session();
        let mut source = page("<b>12.90</b> and 12.90");
        let rule = ReplacementRule::literal("12.90").with_anchors(Some("<b>"), Some("</b>"));

        s.load_price("14.50", None).expect("load");
        let preview = s.find(&source, &rule).expect("find");
        assert_eq!(preview.match_count(), 1);

        let report = s.apply(&mut source, &rule).expect("apply");
        assert_eq!(report.match_count, 1);
        assert_eq!(report.domain, "localhost");
        assert_eq!(source.content(), "<b>14.50</b> and 12.90");
        assert_eq!(s.workflow().status(), Status::Success);
        assert_eq!(s.history().expect("history").len(), 1);

        assert!(s.undo(&mut source).expect("undo"));
        assert_eq!(source.content(), "<b>12.90</b> and 12.90");
        assert_eq!(s.workflow().status(), Status::Idle);
        assert!(!s.undo(&mut source).expect("second undo is a no-op"));
    }

    #[test]
    fn test_failed_settings_save_keeps_live_settings() {
        let mut s = Session::start(Box::new(ReadOnlyStore)).expect("start");
        let err = s
            .update_settings(|settings| {
                settings.safety_threshold = 1;
                Ok(settings.add_domain("example.com"))
            })
            .expect_err("save fails");
        assert!(matches!(err, PriceError::Io { .. }));
        assert_eq!(s.settings(), &Settings::default());
    }

    #[test]
    fn test_failed_settings_change_is_discarded() {
        let mut s = session();
        let err = s
            .update_settings(|settings| {
                settings.templates.clear();
                settings.import_templates("{not json")
            })
            .expect_err("bad import");
        assert!(matches!(err, PriceError::Json(_)));
        assert_eq!(s.settings().templates.len(), 3);
    }

    #[test]
    fn test_failed_write_keeps_previous_undo_slot() {
        let mut s = session();
        let mut source = LockablePage {
            inner: page("1.00"),
            locked: false,
        };

        s.load_price("2", None).expect("load");
        s.apply(&mut source, &ReplacementRule::literal("1.00")).expect("first apply");

        source.locked = true;
        s.load_price("3", None).expect("load");
        let err = s.apply(&mut source, &ReplacementRule::literal("2.00")).expect_err("write fails");
        assert!(matches!(err, PriceError::TextSourceUnavailable { .. }));
        assert_eq!(s.workflow().status(), Status::Error);
        assert_eq!(source.inner.content(), "2.00");

        let snapshot = s.undo_snapshot("tab-1").expect("snapshot").expect("slot kept");
        assert_eq!(snapshot.content, "1.00");
        assert_eq!(s.history().expect("history").len(), 1);
    }

    #[test]
    fn test_failed_first_write_leaves_no_undo_slot() {
        let mut s = session();
        let mut source = LockablePage {
            inner: page("1.00"),
            locked: true,
        };
        s.load_price("2", None).expect("load");
        s.apply(&mut source, &ReplacementRule::literal("1.00")).expect_err("write fails");
        assert!(s.undo_snapshot("tab-1").expect("snapshot").is_none());
    }

    #[test]
    fn test_threshold_refusal_keeps_ready_and_content() {
        let mut s = session();
        s.update_settings(|settings| {
            settings.safety_threshold = 2;
            Ok(())
        })
        .expect("threshold");
        let mut source = page("1.00 1.00 1.00");
        let rule = ReplacementRule::literal("1.00");

        s.load_price("2", None).expect("load");
        s.find(&source, &rule).expect("find");
        let err = s.apply(&mut source, &rule).expect_err("gated");
        assert!(matches!(err, PriceError::ThresholdExceeded { count: 3, threshold: 2 }));
        assert_eq!(s.workflow().status(), Status::Ready);
        assert_eq!(source.content(), "1.00 1.00 1.00");
        assert!(s.undo_snapshot("tab-1").expect("snapshot").is_none());
    }

    #[test]
    fn test_zero_matches_never_applied() {
        let mut s = session();
        let mut source = page("nothing");
        s.load_price("2", None).expect("load");
        let err = s.apply(&mut source, &ReplacementRule::literal("1.00")).expect_err("empty");
        assert!(matches!(err, PriceError::NoMatches));
        assert!(s.history().expect("history").is_empty());
    }

    #[test]
    fn test_domain_not_allowed_is_error_state() {
        let mut s = session();
        let mut source = MemorySource::new("tab-9", "https://shop.example.com/p/1", "1.00");
        s.load_price("2", None).expect("load");
        let err = s.apply(&mut source, &ReplacementRule::literal("1.00")).expect_err("domain");
        assert!(matches!(err, PriceError::DomainNotAllowed { ref domain } if domain == "shop.example.com"));
        assert_eq!(s.workflow().status(), Status::Error);

        s.update_settings(|settings| Ok(settings.add_domain("example.com")))
            .expect("add domain");
        s.apply(&mut source, &ReplacementRule::literal("1.00")).expect("retry");
        assert_eq!(source.content(), "2.00");
    }

    #[test]
    fn test_invalid_regex_moves_to_error() {
        let mut s = session();
        let source = page("1.00");
        let err = s.find(&source, &ReplacementRule::regex("(")).expect_err("invalid");
        assert!(matches!(err, PriceError::InvalidPattern { .. }));
        assert_eq!(s.workflow().status(), Status::Error);
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("file:///tmp/page.html").expect("file"), "localhost");
        assert_eq!(host_of("http://127.0.0.1:3000/").expect("ip"), "127.0.0.1");
        assert!(host_of("not a url").is_err());
    }
}
