//! Look up one localized message from the configured locale directory.
//!
//! Usage:
//!   cargo run -- [lang] [message-id] [Name=value ...]
//!   cargo run -- zh welcome Name=Ada
//!
//! Optional environment variables:
//! - LOCALE_DIR (defaults to etc/locale)
//! - DEFAULT_LANGUAGE (defaults to en)
//! - SUPPORTED_LANGUAGES (defaults to en,zh,it,hi)

use anyhow::Result;
use i18n_tools::{config::Config, i18n::I18n, i18n::TemplateData};
use serde_json::Value;
use tracing::info;

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_tools=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let i18n = I18n::initialize(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let lang = args.first().map(String::as_str).unwrap_or("en");
    let message_id = args.get(1).map(String::as_str).unwrap_or("success");
    let data = parse_template_args(args.iter().skip(2).map(String::as_str));

    let text = if data.is_empty() {
        i18n.translate(lang, message_id, None)
    } else {
        i18n.translate(lang, message_id, Some(&data))
    };
    println!("{}", text);

    info!("Lookup metrics: {:?}", i18n.metrics().report());
    Ok(())
}

/// `Name=value` pairs; values that parse as JSON scalars keep their type.
fn parse_template_args<'a>(args: impl Iterator<Item = &'a str>) -> TemplateData {
    args.filter_map(|arg| arg.split_once('='))
        .map(|(name, raw)| {
            let value = match serde_json::from_str::<Value>(raw) {
                Ok(v) if !v.is_object() && !v.is_array() => v,
                _ => Value::String(raw.to_string()),
            };
            (name.to_string(), value)
        })
        .collect()
}
