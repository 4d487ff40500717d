//! Internationalization (i18n) module: locale bundles and message lookup.
//!
//! Locale files are loaded once into an immutable [`Catalog`], one
//! [`Localizer`] per supported language is bound to it, and [`I18n`] serves
//! lookups that never fail: a missing message or a broken template degrades
//! to the message key itself.
//!
//! # Architecture
//!
//! - `catalog`: Bundle loader; reads `*.json` locale files into a catalog
//! - `error`: Lookup failures returned by localizers
//! - `message`: Message definitions (plain strings, plural forms, nested groups)
//! - `template`: `{{.Name}}` placeholder rendering
//! - `registry`: One localizer per supported language code
//! - `translate`: The `I18n` lookup service and its fallback rules
//! - `metrics`: Per-instance lookup counters
//! - `validator`: Placeholder checks for machine-translated messages
//!
//! # Example
//!
//! ```rust,ignore
//! use i18n_tools::config::Config;
//! use i18n_tools::i18n::I18n;
//!
//! let i18n = I18n::initialize(&Config::from_env()?)?;
//! let text = i18n.translate("en", "success", None);
//! ```

mod catalog;
mod error;
mod message;
mod metrics;
mod registry;
mod template;
mod translate;
mod validator;

pub use catalog::Catalog;
pub(crate) use catalog::normalize_tag;
pub use error::LocalizeError;
pub use message::{Message, PluralForm};
pub use metrics::{LookupMetrics, MetricsReport};
pub use registry::{LocalizeConfig, Localizer, LocalizerRegistry};
pub use template::{placeholders, render, TemplateData};
pub use translate::I18n;
pub use validator::{PlaceholderValidator, ValidationReport};
