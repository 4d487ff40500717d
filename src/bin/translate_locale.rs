//! Translate a locale message file into another language.
//!
//! Usage:
//!   cargo run --bin translate-locale -- <source.json> <target-lang> [output.json]
//!   cargo run --bin translate-locale -- etc/locale/zh.json hi
//!
//! Without an output path the result is written next to the source as
//! `<target-lang>.json`.
//!
//! Required environment variables:
//! - TRANSLATOR_API_KEY
//!
//! Optional:
//! - TRANSLATOR_MODEL (defaults to gpt-4o-mini)
//! - TRANSLATOR_API_URL (defaults to the OpenAI chat completions endpoint)
//! - SOURCE_LANGUAGE (defaults to zh)
//! - TRANSLATE_DELAY_MS (defaults to 1000)

use anyhow::{bail, Context, Result};
use i18n_tools::{config::TranslatorConfig, translation};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_tools=info".parse()?)
                .add_directive("translate_locale=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        bail!("usage: translate-locale <source.json> <target-lang> [output.json]");
    }
    let source_path = PathBuf::from(&args[0]);
    let target_language = args[1].as_str();
    let output_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| translation::default_output_path(&source_path, target_language));

    let config = TranslatorConfig::from_env()?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;

    info!(
        "Translating {} from {} to {}",
        source_path.display(),
        config.source_language,
        target_language
    );
    let source = translation::read_message_file(&source_path)?;
    let translated =
        translation::translate_messages(&client, &config, &source, target_language).await?;
    translation::write_message_file(&output_path, &translated)?;

    info!("✓ Wrote {}", output_path.display());
    Ok(())
}
