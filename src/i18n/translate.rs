//! The lookup service.
//!
//! `I18n` is the only way to reach a localizer, and it can only be built from a
//! loaded catalog, so a lookup before initialization cannot be expressed.

use crate::config::Config;
use crate::i18n::{
    Catalog, LocalizeConfig, LocalizeError, Localizer, LocalizerRegistry, LookupMetrics,
    TemplateData,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Loaded locale bundles plus one localizer per supported language.
#[derive(Debug)]
pub struct I18n {
    catalog: Arc<Catalog>,
    registry: LocalizerRegistry,
    metrics: LookupMetrics,
}

impl I18n {
    /// Load the locale directory and build the localizer registry.
    ///
    /// # Errors
    /// Fails if the configuration is invalid or the locale directory cannot
    /// be enumerated. Individual malformed files are skipped, not fatal.
    pub fn initialize(config: &Config) -> Result<Self> {
        config.validate()?;
        let catalog = Catalog::load_dir(&config.locale_dir, &config.default_language)?;
        Ok(Self::from_catalog(catalog, &config.supported_languages))
    }

    /// Build the service around an already loaded catalog. The catalog's
    /// default language is the fallback for unsupported language codes.
    pub fn from_catalog(catalog: Catalog, supported_languages: &[String]) -> Self {
        let catalog = Arc::new(catalog);
        let registry = LocalizerRegistry::build(
            Arc::clone(&catalog),
            supported_languages,
            catalog.default_language(),
        );

        Self {
            catalog,
            registry,
            metrics: LookupMetrics::new(),
        }
    }

    /// Translate `message_id` into `lang`.
    ///
    /// Never fails: on any lookup or template error the error is logged and
    /// `message_id` itself is returned.
    pub fn translate(
        &self,
        lang: &str,
        message_id: &str,
        template_data: Option<&TemplateData>,
    ) -> String {
        let config = LocalizeConfig::new(message_id).with_template_data(template_data);
        self.translate_with(lang, &config)
    }

    /// Translate a message with plural variants, choosing the form by `count`.
    pub fn translate_plural(
        &self,
        lang: &str,
        message_id: &str,
        count: i64,
        template_data: Option<&TemplateData>,
    ) -> String {
        let config = LocalizeConfig::new(message_id)
            .with_template_data(template_data)
            .with_plural_count(count);
        self.translate_with(lang, &config)
    }

    /// Like [`I18n::translate`], but returns the error instead of the key.
    pub fn localize(
        &self,
        lang: &str,
        config: &LocalizeConfig<'_>,
    ) -> Result<String, LocalizeError> {
        self.metrics.record_lookup();

        let localizer = self.localizer(lang);
        let result = localizer.localize(config);
        if result.is_err() {
            self.metrics.record_miss();
        }
        result
    }

    /// Localizer for `lang`, or the default language's when unsupported.
    pub fn localizer(&self, lang: &str) -> &Localizer {
        let (localizer, fell_back) = self.registry.resolve(lang);
        if fell_back {
            self.metrics.record_language_fallback();
            debug!(
                "Language '{}' is not supported, using '{}'",
                lang,
                localizer.language()
            );
        }
        localizer
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &LocalizerRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }

    fn translate_with(&self, lang: &str, config: &LocalizeConfig<'_>) -> String {
        match self.localize(lang, config) {
            Ok(text) => text,
            Err(e) => {
                warn!("Translation failed for message {}: {}", config.message_id, e);
                config.message_id.to_string()
            }
        }
    }
}
