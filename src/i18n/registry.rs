//! Localizer registry: one localizer per supported language.
//!
//! The registry is built once from the configured language list and never
//! changes. Building it cannot fail: a language without messages still gets a
//! localizer, which resolves through the catalog fallback chain at lookup time.

use crate::i18n::catalog::{normalize_tag, Catalog};
use crate::i18n::message::PluralForm;
use crate::i18n::template::{render_delimited, TemplateData};
use crate::i18n::LocalizeError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Parameters for a single lookup.
#[derive(Debug, Clone, Copy)]
pub struct LocalizeConfig<'a> {
    pub message_id: &'a str,
    pub template_data: Option<&'a TemplateData>,
    pub plural_count: Option<i64>,
}

impl<'a> LocalizeConfig<'a> {
    /// Look up `message_id` with no template data and no plural count.
    pub fn new(message_id: &'a str) -> Self {
        Self {
            message_id,
            template_data: None,
            plural_count: None,
        }
    }

    /// Values for the message's placeholders.
    pub fn with_template_data(mut self, data: Option<&'a TemplateData>) -> Self {
        self.template_data = data;
        self
    }

    /// Select a plural form by count. The count is also exposed to the
    /// template as `PluralCount` unless the data already sets it.
    pub fn with_plural_count(mut self, count: i64) -> Self {
        self.plural_count = Some(count);
        self
    }
}

/// Read-only view of the catalog for one language.
#[derive(Debug, Clone)]
pub struct Localizer {
    catalog: Arc<Catalog>,
    language: String,
}

impl Localizer {
    /// Bind `catalog` to `language`. The tag is normalized.
    pub fn new(catalog: Arc<Catalog>, language: &str) -> Self {
        Self {
            catalog,
            language: normalize_tag(language),
        }
    }

    /// Normalized language tag this localizer serves.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Resolve and render a message.
    pub fn localize(&self, config: &LocalizeConfig<'_>) -> Result<String, LocalizeError> {
        let not_found = || LocalizeError::MessageNotFound {
            id: config.message_id.to_string(),
            language: self.language.clone(),
        };

        let (_, message) = self
            .catalog
            .resolve(&self.language, config.message_id)
            .ok_or_else(not_found)?;
        let template = message
            .template(config.plural_count.map(PluralForm::for_count))
            .ok_or_else(not_found)?;
        let (left, right) = message.delimiters();

        match config.plural_count {
            None => render_delimited(template, config.template_data, left, right),
            Some(count) => {
                let mut data = config.template_data.cloned().unwrap_or_default();
                data.entry("PluralCount").or_insert_with(|| Value::from(count));
                render_delimited(template, Some(&data), left, right)
            }
        }
    }
}

/// All localizers, keyed by normalized language tag.
#[derive(Debug, Clone)]
pub struct LocalizerRegistry {
    default: Localizer,
    localizers: HashMap<String, Localizer>,
}

impl LocalizerRegistry {
    /// Build a localizer for every code in `language_codes`.
    ///
    /// The default language is always registered, even if the list omits it,
    /// so language selection always has a fallback target.
    pub fn build(catalog: Arc<Catalog>, language_codes: &[String], default_language: &str) -> Self {
        let default = Localizer::new(Arc::clone(&catalog), default_language);

        let mut localizers = HashMap::new();
        localizers.insert(default.language().to_string(), default.clone());
        for code in language_codes {
            let tag = normalize_tag(code);
            if tag.is_empty() {
                continue;
            }
            localizers
                .entry(tag.clone())
                .or_insert_with(|| Localizer::new(Arc::clone(&catalog), &tag));
        }

        Self {
            default,
            localizers,
        }
    }

    /// Localizer for `code` after normalization, if supported.
    pub fn get(&self, code: &str) -> Option<&Localizer> {
        self.localizers.get(&normalize_tag(code))
    }

    /// Localizer for the default language.
    pub fn default_localizer(&self) -> &Localizer {
        &self.default
    }

    /// Localizer for `code`, or the default one when `code` is unsupported.
    ///
    /// # Returns
    /// The localizer and whether the default was substituted.
    pub fn resolve(&self, code: &str) -> (&Localizer, bool) {
        match self.get(code) {
            Some(localizer) => (localizer, false),
            None => (&self.default, true),
        }
    }

    /// Whether `code` has its own localizer.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Supported language tags, sorted.
    pub fn supported_languages(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.localizers.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Arc<Catalog> {
        let mut catalog = Catalog::new("en");
        catalog
            .add_messages(
                "en",
                br#"{
                    "success": "Success",
                    "greeting": "Hello {{.Name}}",
                    "apples": {"one": "One apple", "other": "{{.PluralCount}} apples"},
                    "angle": {"leftDelim": "<<", "rightDelim": ">>", "other": "Hi <<.Name>>"},
                    "lower": {"leftdelim": "<<", "rightdelim": ">>", "other": "Bye <<.Name>>"}
                }"#,
            )
            .unwrap();
        catalog
            .add_messages("zh", r#"{"success": "成功"}"#.as_bytes())
            .unwrap();
        Arc::new(catalog)
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn data(value: serde_json::Value) -> TemplateData {
        value.as_object().cloned().expect("object")
    }

    // ==================== Registry Tests ====================

    #[test]
    fn test_build_registers_every_code() {
        let registry = LocalizerRegistry::build(catalog(), &codes(&["en", "zh", "it", "hi"]), "en");
        assert_eq!(registry.supported_languages(), vec!["en", "hi", "it", "zh"]);
    }

    #[test]
    fn test_build_always_includes_default() {
        let registry = LocalizerRegistry::build(catalog(), &codes(&["zh"]), "en");
        assert!(registry.is_supported("en"));
        assert!(registry.is_supported("zh"));
    }

    #[test]
    fn test_get_normalizes_code() {
        let registry = LocalizerRegistry::build(catalog(), &codes(&["en", "zh_CN"]), "en");
        assert_eq!(registry.get("ZH-cn").map(Localizer::language), Some("zh-cn"));
    }

    #[test]
    fn test_resolve_unsupported_uses_default() {
        let registry = LocalizerRegistry::build(catalog(), &codes(&["en", "zh"]), "en");

        let (localizer, fell_back) = registry.resolve("fr");
        assert!(fell_back);
        assert_eq!(localizer.language(), "en");

        let (localizer, fell_back) = registry.resolve("zh");
        assert!(!fell_back);
        assert_eq!(localizer.language(), "zh");
    }

    // ==================== Localizer Tests ====================

    #[test]
    fn test_localize_plain() {
        let localizer = Localizer::new(catalog(), "zh");
        assert_eq!(localizer.localize(&LocalizeConfig::new("success")).unwrap(), "成功");
    }

    #[test]
    fn test_localize_falls_back_per_key_to_catalog_default() {
        let localizer = Localizer::new(catalog(), "zh");
        let d = data(json!({"Name": "Ada"}));
        let config = LocalizeConfig::new("greeting").with_template_data(Some(&d));

        assert_eq!(localizer.localize(&config).unwrap(), "Hello Ada");
    }

    #[test]
    fn test_localize_missing_message() {
        let localizer = Localizer::new(catalog(), "it");
        let err = localizer.localize(&LocalizeConfig::new("nope")).unwrap_err();

        assert_eq!(
            err,
            LocalizeError::MessageNotFound {
                id: "nope".to_string(),
                language: "it".to_string()
            }
        );
    }

    #[test]
    fn test_localize_plural_forms() {
        let localizer = Localizer::new(catalog(), "en");

        let one = LocalizeConfig::new("apples").with_plural_count(1);
        let many = LocalizeConfig::new("apples").with_plural_count(5);

        assert_eq!(localizer.localize(&one).unwrap(), "One apple");
        assert_eq!(localizer.localize(&many).unwrap(), "5 apples");
    }

    #[test]
    fn test_localize_plural_count_does_not_override_data() {
        let localizer = Localizer::new(catalog(), "en");
        let d = data(json!({"PluralCount": "several"}));
        let config = LocalizeConfig::new("apples")
            .with_template_data(Some(&d))
            .with_plural_count(9);

        assert_eq!(localizer.localize(&config).unwrap(), "several apples");
    }

    #[test]
    fn test_localize_custom_delimiters() {
        let localizer = Localizer::new(catalog(), "en");
        let d = data(json!({"Name": "Ada"}));
        let config = LocalizeConfig::new("angle").with_template_data(Some(&d));

        assert_eq!(localizer.localize(&config).unwrap(), "Hi Ada");
    }

    #[test]
    fn test_localize_lowercase_delimiter_fields() {
        let localizer = Localizer::new(catalog(), "en");
        let d = data(json!({"Name": "Ada"}));
        let config = LocalizeConfig::new("lower").with_template_data(Some(&d));

        assert_eq!(localizer.localize(&config).unwrap(), "Bye Ada");
    }
}
