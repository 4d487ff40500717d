use thiserror::Error;

/// Why a message could not be localized.
///
/// These never escape [`crate::i18n::I18n::translate`]; they are logged and
/// the message key is returned instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalizeError {
    #[error("message \"{id}\" not found for language \"{language}\"")]
    MessageNotFound { id: String, language: String },

    #[error("template data has no value for \"{name}\"")]
    MissingTemplateData { name: String },

    #[error("invalid template: {reason}")]
    InvalidTemplate { reason: String },
}
