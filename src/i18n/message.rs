//! Message definitions as they appear in locale files.
//!
//! A locale file is a JSON object. Each value is either:
//! - a plain string, which becomes the `other` form of the message,
//! - an object with at least one reserved field holding a string (`description`,
//!   `one`, `other`, ...), which is a structured message,
//! - any other object, which is a group whose children get `.`-joined keys.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

const DESCRIPTION: &str = "description";
const HASH: &str = "hash";
const LEFT_DELIM: &str = "leftdelim";
const RIGHT_DELIM: &str = "rightdelim";

/// Field names that mark an object as a message rather than a group.
/// Matched case-insensitively, so `leftDelim` and `leftdelim` are the same.
const RESERVED_KEYS: [&str; 11] = [
    "id",
    DESCRIPTION,
    HASH,
    LEFT_DELIM,
    RIGHT_DELIM,
    "zero",
    "one",
    "two",
    "few",
    "many",
    "other",
];

/// CLDR plural category used to pick a message variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralForm {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralForm {
    pub const ALL: [PluralForm; 6] = [
        PluralForm::Zero,
        PluralForm::One,
        PluralForm::Two,
        PluralForm::Few,
        PluralForm::Many,
        PluralForm::Other,
    ];

    /// Field name of this form in a locale file.
    pub fn key(&self) -> &'static str {
        match self {
            PluralForm::Zero => "zero",
            PluralForm::One => "one",
            PluralForm::Two => "two",
            PluralForm::Few => "few",
            PluralForm::Many => "many",
            PluralForm::Other => "other",
        }
    }

    /// Pick the form for a count. Exact small counts map to their own form;
    /// everything else is `Other`.
    pub fn for_count(count: i64) -> PluralForm {
        match count {
            0 => PluralForm::Zero,
            1 => PluralForm::One,
            2 => PluralForm::Two,
            _ => PluralForm::Other,
        }
    }
}

/// One message entry for one language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub id: String,
    pub description: Option<String>,
    pub hash: Option<String>,
    pub left_delim: Option<String>,
    pub right_delim: Option<String>,
    /// Variants indexed in `PluralForm::ALL` order
    forms: [Option<String>; 6],
}

impl Message {
    /// A message with only an `other` form.
    pub fn plain(id: impl Into<String>, other: impl Into<String>) -> Self {
        let mut message = Message {
            id: id.into(),
            ..Default::default()
        };
        message.set_form(PluralForm::Other, other.into());
        message
    }

    pub fn form(&self, form: PluralForm) -> Option<&str> {
        self.forms[form_index(form)].as_deref()
    }

    pub fn set_form(&mut self, form: PluralForm, template: String) {
        self.forms[form_index(form)] = Some(template);
    }

    /// Template for the requested form, falling back to `other`, then to the
    /// first variant defined at all.
    pub fn template(&self, form: Option<PluralForm>) -> Option<&str> {
        form.and_then(|f| self.form(f))
            .or_else(|| self.form(PluralForm::Other))
            .or_else(|| PluralForm::ALL.iter().find_map(|f| self.form(*f)))
    }

    /// Placeholder delimiters, `{{` and `}}` unless overridden. Each side
    /// defaults on its own when a file sets only one of them.
    pub fn delimiters(&self) -> (&str, &str) {
        (
            self.left_delim.as_deref().unwrap_or("{{"),
            self.right_delim.as_deref().unwrap_or("}}"),
        )
    }

    fn from_object(id: String, object: &Map<String, Value>) -> Result<Self> {
        let mut message = Message {
            id,
            ..Default::default()
        };

        for (field, value) in object {
            let name = field.to_ascii_lowercase();
            if !RESERVED_KEYS.contains(&name.as_str()) {
                continue;
            }
            let text = value.as_str().with_context(|| {
                format!(
                    "field \"{}\" of message \"{}\" must be a string",
                    field, message.id
                )
            })?;

            match name.as_str() {
                DESCRIPTION => message.description = Some(text.to_string()),
                HASH => message.hash = Some(text.to_string()),
                LEFT_DELIM => message.left_delim = Some(text.to_string()),
                RIGHT_DELIM => message.right_delim = Some(text.to_string()),
                "id" => {}
                other => {
                    if let Some(form) = PluralForm::ALL.iter().find(|f| f.key() == other) {
                        message.set_form(*form, text.to_string());
                    }
                }
            }
        }

        Ok(message)
    }
}

fn form_index(form: PluralForm) -> usize {
    PluralForm::ALL
        .iter()
        .position(|f| *f == form)
        .unwrap_or(PluralForm::ALL.len() - 1)
}

fn is_message(object: &Map<String, Value>) -> bool {
    object.iter().any(|(field, value)| {
        value.is_string() && RESERVED_KEYS.contains(&field.to_ascii_lowercase().as_str())
    })
}

/// Parse the contents of one locale file into flat message entries.
///
/// The whole file is rejected on the first problem, so a malformed file never
/// contributes a partial set of messages.
pub fn parse_message_file(bytes: &[u8]) -> Result<Vec<Message>> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse locale JSON")?;
    let Value::Object(root) = value else {
        bail!("Locale file must contain a JSON object at the top level");
    };

    let mut messages = Vec::new();
    collect_messages(&root, None, &mut messages)?;
    Ok(messages)
}

fn collect_messages(
    object: &Map<String, Value>,
    prefix: Option<&str>,
    out: &mut Vec<Message>,
) -> Result<()> {
    for (key, value) in object {
        let id = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };

        match value {
            Value::String(text) => out.push(Message::plain(id, text.as_str())),
            Value::Object(child) if is_message(child) => {
                out.push(Message::from_object(id, child)?)
            }
            Value::Object(child) => collect_messages(child, Some(&id), out)?,
            other => bail!(
                "message \"{}\" has unsupported value {}; expected a string or object",
                id,
                other
            ),
        }
    }
    Ok(())
}
