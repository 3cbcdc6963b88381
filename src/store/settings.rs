//! User settings and saved rule templates.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PriceError, PriceResult};
use crate::rule::{FormatOption, ReplacementRule};
use crate::store::{self, KeyValueStore};

const SETTINGS_KEY: &str = "settings";

/// Session-wide configuration. Loaded once, saved only on request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub allowed_domains: Vec<String>,
    pub default_selector: String,
    pub default_regex_cleanup: String,
    pub safety_threshold: usize,
    pub templates: Vec<ReplacementRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            allowed_domains: vec!["localhost".to_owned(), "127.0.0.1".to_owned()],
            default_selector: ".price".to_owned(),
            default_regex_cleanup: r"[€$£\s]".to_owned(),
            safety_threshold: 10,
            templates: builtin_templates(),
        }
    }
}

fn builtin_templates() -> Vec<ReplacementRule> {
    vec![
        ReplacementRule {
            id: "json-price".to_owned(),
            name: "JSON Price Field".to_owned(),
            old_price_pattern: r#""price":\s*"?([\d.,]+)"?"#.to_owned(),
            is_regex: true,
            format_option: FormatOption::Dot,
            ..ReplacementRule::default()
        },
        ReplacementRule {
            id: "html-price".to_owned(),
            name: "HTML Price Span".to_owned(),
            old_price_pattern: r"([\d.,]+)".to_owned(),
            is_regex: true,
            context_anchor_before: Some(r#"<span class="price">"#.to_owned()),
            context_anchor_after: Some("</span>".to_owned()),
            format_option: FormatOption::Keep,
            ..ReplacementRule::default()
        },
        ReplacementRule {
            id: "simple-decimal".to_owned(),
            name: "Simple Decimal".to_owned(),
            old_price_pattern: "12.90".to_owned(),
            is_regex: false,
            format_option: FormatOption::Dot,
            ..ReplacementRule::default()
        },
    ]
}

impl Settings {
    /// Stored settings merged over the defaults; defaults when none are stored.
    pub fn load(store: &dyn KeyValueStore) -> PriceResult<Self> {
        let settings = store::load::<Self>(store, SETTINGS_KEY)?.unwrap_or_default();
        info!(
            templates = settings.templates.len(),
            threshold = settings.safety_threshold,
            "settings loaded"
        );
        Ok(settings)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> PriceResult<()> {
        store::save(store, SETTINGS_KEY, self)?;
        debug!("settings saved");
        Ok(())
    }

    pub fn template(&self, id: &str) -> PriceResult<&ReplacementRule> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| PriceError::TemplateNotFound { id: id.to_owned() })
    }

    /// Insert `template`, replacing any template with the same id.
    pub fn save_template(&mut self, template: ReplacementRule) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    /// Remove the template with `id`. Returns whether one was removed.
    pub fn delete_template(&mut self, id: &str) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        self.templates.len() != before
    }

    /// Templates as a pretty JSON array.
    pub fn export_templates(&self) -> PriceResult<String> {
        Ok(serde_json::to_string_pretty(&self.templates)?)
    }

    /// Replace the template list with the JSON array in `json`.
    pub fn import_templates(&mut self, json: &str) -> PriceResult<usize> {
        let templates: Vec<ReplacementRule> = serde_json::from_str(json)?;
        self.templates = templates;
        Ok(self.templates.len())
    }

    /// Add a domain, trimmed and lower-cased. Returns false for duplicates
    /// and blanks.
    pub fn add_domain(&mut self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        if domain.is_empty() || self.allowed_domains.iter().any(|d| normalize_domain(d) == domain) {
            return false;
        }
        self.allowed_domains.push(domain);
        true
    }

    /// Remove a domain, compared the same way [`Self::add_domain`] stores it.
    pub fn remove_domain(&mut self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        let before = self.allowed_domains.len();
        self.allowed_domains.retain(|d| normalize_domain(d) != domain);
        self.allowed_domains.len() != before
    }

    /// Whether `host` is an allowed domain or a subdomain of one.
    pub fn is_domain_allowed(&self, host: &str) -> bool {
        let host = normalize_domain(host);
        self.allowed_domains.iter().map(|d| normalize_domain(d)).any(|d| {
            !d.is_empty()
                && (host == d
                    || host
                        .strip_suffix(d.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.')))
        })
    }
}

/// Stored and user-typed domains may carry stray case or whitespace.
fn normalize_domain(domain: &str) -> String {
    domain.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_selector, ".price");
        assert_eq!(settings.default_regex_cleanup, r"[€$£\s]");
        assert_eq!(settings.safety_threshold, 10);
        assert_eq!(settings.templates.len(), 3);
    }

    #[test]
    fn test_partial_stored_settings_merge_over_defaults() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, json!({"safetyThreshold": 3})).expect("set");
        let settings = Settings::load(&store).expect("load");
        assert_eq!(settings.safety_threshold, 3);
        assert_eq!(settings.default_selector, ".price");
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.add_domain("  Shop.Example.COM ");
        settings.save(&mut store).expect("save");
        assert_eq!(Settings::load(&store).expect("load"), settings);
    }

    #[test]
    fn test_template_upsert_and_delete() {
        let mut settings = Settings::default();
        let mut rule = ReplacementRule::literal("9.99");
        rule.id = "simple-decimal".to_owned();
        settings.save_template(rule);
        assert_eq!(settings.templates.len(), 3);
        assert_eq!(settings.template("simple-decimal").expect("found").old_price_pattern, "9.99");

        assert!(settings.delete_template("json-price"));
        assert!(!settings.delete_template("json-price"));
        assert!(matches!(
            settings.template("json-price"),
            Err(PriceError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_export_import_roundtrip() {
        let original = Settings::default();
        let exported = original.export_templates().expect("export");

        let mut other = Settings {
            templates: Vec::new(),
            ..Settings::default()
        };
        assert_eq!(other.import_templates(&exported).expect("import"), 3);
        assert_eq!(other.templates, original.templates);
    }

    #[test]
    fn test_import_rejects_malformed() {
        let mut settings = Settings::default();
        assert!(settings.import_templates("{\"not\": \"an array\"}").is_err());
        assert_eq!(settings.templates.len(), 3);
    }

    #[test]
    fn test_domain_matching() {
        let mut settings = Settings::default();
        assert!(settings.add_domain("example.com"));
        assert!(!settings.add_domain("EXAMPLE.com"));
        assert!(settings.is_domain_allowed("example.com"));
        assert!(settings.is_domain_allowed("shop.example.com"));
        assert!(!settings.is_domain_allowed("badexample.com"));
        assert!(settings.remove_domain("example.com"));
        assert!(!settings.is_domain_allowed("example.com"));
    }

    #[test]
    fn test_domain_case_and_whitespace_insensitive() {
        let mut settings = Settings::default();
        assert!(settings.add_domain("example.com"));
        assert!(settings.remove_domain(" Example.COM "));
        assert!(!settings.is_domain_allowed("example.com"));

        let stored: Settings =
            serde_json::from_value(json!({ "allowedDomains": ["Shop.Example.com "] })).expect("settings");
        assert!(stored.is_domain_allowed("shop.example.com"));
        assert!(stored.is_domain_allowed("eu.SHOP.example.com"));

        let mut stored = stored;
        assert!(!stored.add_domain("shop.example.com"));
        assert!(stored.remove_domain("shop.example.com"));
        assert!(stored.allowed_domains.is_empty());
    }
}
