//! Batch translation of locale message files through an OpenAI-compatible
//! chat-completions API.

use crate::config::TranslatorConfig;
use crate::i18n::PlaceholderValidator;
use crate::retry::with_retry_if;
use anyhow::{bail, Context, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

/// Message fields that carry metadata rather than text, copied untranslated.
/// Matched case-insensitively, like the loader does.
const UNTRANSLATED_FIELDS: [&str; 4] = ["id", "hash", "leftdelim", "rightdelim"];

#[derive(Debug, Serialize)]
struct TranslationRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Failure of a single translation API call.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("failed to reach translation API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translation response contained no choices")]
    EmptyResponse,
}

impl TranslateError {
    /// Retry 429 (rate limit), 5xx and network errors. Other 4xx client
    /// errors will not succeed on a second try.
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslateError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            TranslateError::Transport(_) => true,
            TranslateError::EmptyResponse => false,
        }
    }
}

fn build_system_prompt(source_language: &str, target_language: &str) -> String {
    format!(
        r#"You translate user interface messages from language code "{}" to language code "{}".

Rules:
- Reply with the translated text only, without quotes or explanations
- Keep template placeholders such as {{{{.Name}}}} exactly as written; never translate the name inside the braces
- Keep punctuation, line breaks and leading/trailing symbols
- Keep product names, URLs and code identifiers unchanged"#,
        source_language, target_language
    )
}

/// Whether translating `text` needs an API call at all.
fn needs_api_call(config: &TranslatorConfig, text: &str, target_language: &str) -> bool {
    !text.trim().is_empty() && target_language != config.source_language
}

/// Give the model's reply the same leading and trailing whitespace as the
/// source text, e.g. `"Name: "` stays `"...: "`.
fn match_surrounding_whitespace(source: &str, translated: &str) -> String {
    let leading = &source[..source.len() - source.trim_start().len()];
    let trailing = &source[source.trim_end().len()..];
    format!("{}{}{}", leading, translated.trim(), trailing)
}

/// Translate one piece of text.
///
/// Blank text, and text whose target is the source language, is returned
/// unchanged without calling the API.
pub async fn translate_text(
    client: &reqwest::Client,
    config: &TranslatorConfig,
    text: &str,
    target_language: &str,
) -> Result<String> {
    if !needs_api_call(config, text, target_language) {
        return Ok(text.to_string());
    }

    let request = TranslationRequest {
        model: config.model.clone(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: build_system_prompt(&config.source_language, target_language),
            },
            Message {
                role: "user".to_string(),
                content: text.to_string(),
            },
        ],
        temperature: 0.2,
    };

    let translated = with_retry_if(
        &config.retry,
        &format!("Translation to {}", target_language),
        || async {
            let response = client
                .post(&config.api_url)
                .bearer_auth(&config.api_key)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
                return Err(TranslateError::Api { status, body });
            }

            let chat_response: ChatResponse = response.json().await?;
            chat_response
                .choices
                .into_iter()
                .next()
                .map(|c| match_surrounding_whitespace(text, &c.message.content))
                .ok_or(TranslateError::EmptyResponse)
        },
        TranslateError::is_retryable,
    )
    .await
    .with_context(|| format!("Failed to translate {:?} to {}", text, target_language))?;

    let validation = PlaceholderValidator::validate(text, &translated);
    if validation.has_errors() {
        warn!(
            "Translation validation errors for {:?} -> {:?}: {:?}",
            text, translated, validation.errors
        );
    }
    if validation.has_warnings() {
        warn!(
            "Translation validation warnings for {:?} -> {:?}: {:?}",
            text, translated, validation.warnings
        );
    }

    Ok(translated)
}

/// Translate every text value of a locale file.
///
/// Strings at any depth of nested objects are translated one API call at a
/// time, with `config.request_delay` between calls. Metadata fields, arrays
/// and other non-string values are copied unchanged. The first failed call
/// aborts the whole job.
pub async fn translate_messages(
    client: &reqwest::Client,
    config: &TranslatorConfig,
    source: &Value,
    target_language: &str,
) -> Result<Value> {
    let mut output = source.clone();

    let mut pointers = Vec::new();
    collect_text_pointers(source, String::new(), &mut pointers);
    let total = pointers.len();
    info!("Translating {} messages to {}", total, target_language);

    let mut calls = 0;
    for (done, pointer) in pointers.iter().enumerate() {
        let Some(slot) = output.pointer_mut(pointer) else {
            continue;
        };
        let Some(text) = slot.as_str().map(str::to_string) else {
            continue;
        };

        if needs_api_call(config, &text, target_language) {
            if calls > 0 && !config.request_delay.is_zero() {
                sleep(config.request_delay).await;
            }
            calls += 1;
        }

        let translated = translate_text(client, config, &text, target_language).await?;
        *slot = Value::String(translated);
        info!("Translated {}/{}: {}", done + 1, total, pointer);
    }

    Ok(output)
}

/// JSON pointers of every string value that should be translated.
fn collect_text_pointers(value: &Value, pointer: String, out: &mut Vec<String>) {
    match value {
        Value::String(_) => out.push(pointer),
        Value::Object(map) => {
            for (key, child) in map {
                if UNTRANSLATED_FIELDS.contains(&key.to_ascii_lowercase().as_str()) {
                    continue;
                }
                collect_text_pointers(child, format!("{}/{}", pointer, escape_pointer(key)), out);
            }
        }
        _ => {}
    }
}

/// Escape a key as a JSON pointer reference token (RFC 6901).
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Read a locale file that must hold a JSON object.
pub fn read_message_file(path: &Path) -> Result<Value> {
    let data =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    if !value.is_object() {
        bail!("{} must contain a JSON object", path.display());
    }
    Ok(value)
}

/// Write a locale file as pretty-printed JSON.
pub fn write_message_file(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize messages")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// `<dir of source>/<target>.json`
pub fn default_output_path(source: &Path, target_language: &str) -> PathBuf {
    source.with_file_name(format!("{}.json", target_language))
}
