use crate::i18n::normalize_tag;
use crate::retry::RetryConfig;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Locale loading and lookup settings
#[derive(Debug, Clone)]
pub struct Config {
    // Locale files
    pub locale_dir: PathBuf,

    // Languages
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

impl Config {
    pub fn new(
        locale_dir: impl Into<PathBuf>,
        default_language: &str,
        supported_languages: &[&str],
    ) -> Self {
        Self {
            locale_dir: locale_dir.into(),
            default_language: default_language.to_string(),
            supported_languages: supported_languages.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let config = Self {
            // Locale files
            locale_dir: std::env::var("LOCALE_DIR")
                .unwrap_or_else(|_| "etc/locale".to_string())
                .into(),

            // Languages
            default_language: std::env::var("DEFAULT_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string()),
            supported_languages: std::env::var("SUPPORTED_LANGUAGES")
                .map(|v| parse_language_list(&v))
                .unwrap_or_else(|_| default_supported_languages()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the language set is usable as a fallback chain.
    ///
    /// Codes are compared in normalized form, so `EN` matches `en` and
    /// `zh_CN` matches `zh-CN`, the same way the registry keys them.
    pub fn validate(&self) -> Result<()> {
        if self.supported_languages.is_empty() {
            bail!("SUPPORTED_LANGUAGES must name at least one language");
        }
        let default_tag = normalize_tag(&self.default_language);
        if !self
            .supported_languages
            .iter()
            .any(|code| normalize_tag(code) == default_tag)
        {
            bail!(
                "Default language '{}' is not in the supported set {:?}",
                self.default_language,
                self.supported_languages
            );
        }
        Ok(())
    }
}

/// Settings for the batch message-file translator
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub source_language: String,
    /// Pause between consecutive API calls
    pub request_delay: Duration,
    pub retry: RetryConfig,
}

impl TranslatorConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: std::env::var("TRANSLATOR_API_KEY")
                .context("TRANSLATOR_API_KEY not set")?,
            model: std::env::var("TRANSLATOR_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            api_url: std::env::var("TRANSLATOR_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            source_language: std::env::var("SOURCE_LANGUAGE").unwrap_or_else(|_| "zh".to_string()),
            request_delay: Duration::from_millis(
                std::env::var("TRANSLATE_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1000),
            ),
            retry: RetryConfig::api_call(),
        })
    }
}

fn default_supported_languages() -> Vec<String> {
    ["en", "zh", "it", "hi"].iter().map(|s| s.to_string()).collect()
}

/// Split a comma-separated language list, dropping blanks and codes that
/// normalize to one already listed. The first spelling is kept.
fn parse_language_list(raw: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let tag = normalize_tag(code);
        if !seen.contains(&tag) {
            seen.push(tag);
            codes.push(code.to_string());
        }
    }
    codes
}
