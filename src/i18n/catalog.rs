//! Message catalog: every loaded locale file, grouped by language tag.
//!
//! The catalog is filled once at startup by [`Catalog::load_dir`] and is
//! read-only afterwards. It is shared between localizers behind an `Arc`.

use crate::i18n::message::{parse_message_file, Message};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct Catalog {
    default_language: String,
    messages: HashMap<String, HashMap<String, Message>>,
}

impl Catalog {
    /// Create an empty catalog whose per-key fallback is `default_language`.
    pub fn new(default_language: &str) -> Self {
        Self {
            default_language: normalize_tag(default_language),
            messages: HashMap::new(),
        }
    }

    /// Load every `*.json` file directly inside `dir`.
    ///
    /// Files that fail to read or parse are logged and skipped. Failing to
    /// enumerate the directory itself is an error, since there is nothing to
    /// serve without it.
    pub fn load_dir(dir: &Path, default_language: &str) -> Result<Self> {
        let mut catalog = Catalog::new(default_language);
        let files = discover_locale_files(dir)?;

        let mut skipped = 0;
        for path in &files {
            match catalog.load_file(path) {
                Ok(count) => debug!("Loaded {} messages from {}", count, path.display()),
                Err(e) => {
                    skipped += 1;
                    error!("Failed to load locale file {}: {:#}", path.display(), e);
                }
            }
        }

        info!(
            "Loaded {} locale files ({} skipped) from {}: languages {:?}",
            files.len() - skipped,
            skipped,
            dir.display(),
            catalog.languages()
        );

        Ok(catalog)
    }

    /// Load one locale file, deriving its language from the file name.
    ///
    /// # Returns
    /// The number of messages the file contributed.
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let language = language_from_path(path)
            .with_context(|| format!("Cannot derive a language tag from {}", path.display()))?;
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        self.add_messages(&language, &bytes)
    }

    /// Parse locale JSON and merge it into `language`. Later keys win.
    pub fn add_messages(&mut self, language: &str, bytes: &[u8]) -> Result<usize> {
        let parsed = parse_message_file(bytes)?;
        let count = parsed.len();

        let entries = self.messages.entry(normalize_tag(language)).or_default();
        for message in parsed {
            entries.insert(message.id.clone(), message);
        }

        Ok(count)
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Languages with at least one loaded file, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.messages.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.messages.contains_key(&normalize_tag(language))
    }

    pub fn message_count(&self, language: &str) -> usize {
        self.messages
            .get(&normalize_tag(language))
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// Exact lookup with no fallback.
    pub fn message(&self, language: &str, id: &str) -> Option<&Message> {
        self.messages.get(&normalize_tag(language))?.get(id)
    }

    /// Look `id` up along the fallback chain for `language`: the exact tag,
    /// its base tag (`zh-cn` -> `zh`), then the catalog default.
    ///
    /// # Returns
    /// The tag the message was found under, and the message.
    pub fn resolve(&self, language: &str, id: &str) -> Option<(&str, &Message)> {
        fallback_chain(&normalize_tag(language), &self.default_language)
            .into_iter()
            .find_map(|tag| {
                self.messages
                    .get_key_value(&tag)
                    .and_then(|(key, entries)| entries.get(id).map(|m| (key.as_str(), m)))
            })
    }
}

fn fallback_chain(tag: &str, default_language: &str) -> Vec<String> {
    let mut chain = vec![tag.to_string()];
    if let Some((base, _)) = tag.split_once('-') {
        chain.push(base.to_string());
    }
    if !chain.iter().any(|t| t == default_language) {
        chain.push(default_language.to_string());
    }
    chain
}

/// Canonical form of a language tag: lowercase, `-` separated.
pub(crate) fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

/// Language tag of a locale file: the last `.`-separated part of the stem,
/// so both `en.json` and `active.en.json` belong to `en`.
pub(crate) fn language_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let tag = stem.rsplit('.').next()?;
    if tag.is_empty() {
        None
    } else {
        Some(normalize_tag(tag))
    }
}

fn discover_locale_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to enumerate locale directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to enumerate locale directory {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).expect("Failed to write locale file");
    }

    // ==================== Loading Tests ====================

    #[test]
    fn test_load_dir_reads_all_json_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "en.json", r#"{"success": "Success"}"#);
        write(&dir, "zh.json", r#"{"success": "成功"}"#);
        write(&dir, "notes.txt", "not a locale");

        let catalog = Catalog::load_dir(dir.path(), "en").unwrap();

        assert_eq!(catalog.languages(), vec!["en", "zh"]);
        assert_eq!(
            catalog.message("zh", "success").and_then(|m| m.template(None)),
            Some("成功")
        );
    }

    #[test]
    fn test_load_dir_skips_malformed_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "en.json", r#"{"success": "Success"}"#);
        write(&dir, "it.json", r#"{"success": "Successo""#);

        let catalog = Catalog::load_dir(dir.path(), "en").unwrap();

        assert_eq!(catalog.languages(), vec!["en"]);
        assert!(!catalog.has_language("it"));
        assert_eq!(catalog.message_count("en"), 1);
    }

    #[test]
    fn test_load_dir_partially_invalid_file_contributes_nothing() {
        let dir = TempDir::new().unwrap();
        write(&dir, "hi.json", r#"{"good": "ठीक", "bad": 42}"#);

        let catalog = Catalog::load_dir(dir.path(), "en").unwrap();

        assert!(catalog.message("hi", "good").is_none());
    }

    #[test]
    fn test_load_dir_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = Catalog::load_dir(&missing, "en");

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to enumerate locale directory"));
    }

    #[test]
    fn test_load_dir_empty_directory() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::load_dir(dir.path(), "en").unwrap();
        assert!(catalog.languages().is_empty());
    }

    #[test]
    fn test_load_dir_merges_files_for_same_language() {
        let dir = TempDir::new().unwrap();
        write(&dir, "active.en.json", r#"{"a": "A1", "b": "B"}"#);
        write(&dir, "en.json", r#"{"a": "A2"}"#);

        let catalog = Catalog::load_dir(dir.path(), "en").unwrap();

        assert_eq!(catalog.message_count("en"), 2);
        // "en.json" sorts after "active.en.json" and overrides it
        assert_eq!(
            catalog.message("en", "a").and_then(|m| m.template(None)),
            Some("A2")
        );
    }

    // ==================== Resolution Tests ====================

    #[test]
    fn test_resolve_exact_language() {
        let mut catalog = Catalog::new("en");
        catalog.add_messages("en", br#"{"k": "en"}"#).unwrap();
        catalog.add_messages("it", br#"{"k": "it"}"#).unwrap();

        let (tag, message) = catalog.resolve("it", "k").unwrap();
        assert_eq!(tag, "it");
        assert_eq!(message.template(None), Some("it"));
    }

    #[test]
    fn test_resolve_base_language() {
        let mut catalog = Catalog::new("en");
        catalog.add_messages("zh", br#"{"k": "zh"}"#).unwrap();

        let (tag, _) = catalog.resolve("zh_CN", "k").unwrap();
        assert_eq!(tag, "zh");
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let mut catalog = Catalog::new("en");
        catalog.add_messages("en", br#"{"only_en": "English"}"#).unwrap();
        catalog.add_messages("it", br#"{"k": "it"}"#).unwrap();

        let (tag, _) = catalog.resolve("it", "only_en").unwrap();
        assert_eq!(tag, "en");
    }

    #[test]
    fn test_resolve_missing_everywhere() {
        let mut catalog = Catalog::new("en");
        catalog.add_messages("en", br#"{"k": "v"}"#).unwrap();
        assert!(catalog.resolve("en", "nope").is_none());
    }

    // ==================== Tag Tests ====================

    #[test]
    fn test_language_from_path() {
        assert_eq!(language_from_path(Path::new("etc/locale/en.json")), Some("en".to_string()));
        assert_eq!(
            language_from_path(Path::new("active.zh-CN.json")),
            Some("zh-cn".to_string())
        );
        assert_eq!(language_from_path(Path::new("en..json")), None);
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag(" zh_CN "), "zh-cn");
        assert_eq!(normalize_tag("EN"), "en");
    }

    #[test]
    fn test_fallback_chain_no_duplicates() {
        assert_eq!(fallback_chain("en", "en"), vec!["en"]);
        assert_eq!(fallback_chain("en-gb", "en"), vec!["en-gb", "en"]);
        assert_eq!(fallback_chain("zh-cn", "en"), vec!["zh-cn", "zh", "en"]);
    }
}
