//! Translation quality validation for message templates.
//!
//! Machine translation tends to translate, drop, or invent placeholder names.
//! The validator compares the placeholders of a source template with those of
//! its translation.

use crate::i18n::template::placeholders;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that will break lookups of the translated message
    pub errors: Vec<String>,

    /// Suspicious but usable translations
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translated message templates.
pub struct PlaceholderValidator;

impl PlaceholderValidator {
    /// Validate that a translated template keeps the source placeholders.
    ///
    /// This function checks that:
    /// - every source placeholder appears in the translation (error)
    /// - the translation adds no placeholders of its own (warning)
    /// - a non-empty source does not translate to empty text (error)
    /// - a non-empty source was actually translated (warning)
    pub fn validate(source: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        if !source.trim().is_empty() {
            if translated.trim().is_empty() {
                report
                    .errors
                    .push("Translation is empty for non-empty source".to_string());
                return report;
            }
            if source == translated {
                report
                    .warnings
                    .push("Translation is identical to the source".to_string());
            }
        }

        let source_names = placeholders(source);
        let translated_names = placeholders(translated);

        for name in &source_names {
            if !translated_names.contains(name) {
                report
                    .errors
                    .push(format!("Placeholder {{{{.{}}}}} missing from translation", name));
            }
        }

        for name in &translated_names {
            if !source_names.contains(name) {
                report
                    .warnings
                    .push(format!("Translation introduces placeholder {{{{.{}}}}}", name));
            }
        }

        report
    }
}
