//! Placeholder rendering for message templates.
//!
//! Templates use `{{.Name}}` placeholders. Whitespace inside the braces and the
//! leading dot are optional, so `{{ .Name }}` and `{{Name}}` are equivalent.
//! Rendering is strict: a placeholder without data, or a stray `{{` that does
//! not form a placeholder, is an error rather than silently left in the output.

use crate::i18n::LocalizeError;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Named values substituted into a template.
pub type TemplateData = Map<String, Value>;

const DEFAULT_LEFT: &str = "{{";
const DEFAULT_RIGHT: &str = "}}";

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_pattern(left: &str, right: &str) -> String {
    format!(
        r"{}\s*\.?([A-Za-z_][A-Za-z0-9_]*)\s*{}",
        regex::escape(left),
        regex::escape(right)
    )
}

fn default_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(&placeholder_pattern(DEFAULT_LEFT, DEFAULT_RIGHT))
            .expect("default placeholder pattern is valid")
    })
}

/// Render a template with the default `{{` `}}` delimiters.
pub fn render(template: &str, data: Option<&TemplateData>) -> Result<String, LocalizeError> {
    render_with(template, data, default_regex(), DEFAULT_LEFT)
}

/// Render a template whose message overrides the placeholder delimiters.
pub fn render_delimited(
    template: &str,
    data: Option<&TemplateData>,
    left: &str,
    right: &str,
) -> Result<String, LocalizeError> {
    if left == DEFAULT_LEFT && right == DEFAULT_RIGHT {
        return render(template, data);
    }
    if left.is_empty() || right.is_empty() {
        return Err(LocalizeError::InvalidTemplate {
            reason: "placeholder delimiters must not be empty".to_string(),
        });
    }

    let regex = Regex::new(&placeholder_pattern(left, right)).map_err(|e| {
        LocalizeError::InvalidTemplate {
            reason: e.to_string(),
        }
    })?;
    render_with(template, data, &regex, left)
}

fn render_with(
    template: &str,
    data: Option<&TemplateData>,
    regex: &Regex,
    left: &str,
) -> Result<String, LocalizeError> {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;

    for caps in regex.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let literal = &template[last..whole.start()];
        check_literal(literal, left)?;
        output.push_str(literal);

        let value = data.and_then(|d| d.get(name.as_str())).ok_or_else(|| {
            LocalizeError::MissingTemplateData {
                name: name.as_str().to_string(),
            }
        })?;
        output.push_str(&value_text(value));

        last = whole.end();
    }

    let tail = &template[last..];
    check_literal(tail, left)?;
    output.push_str(tail);

    Ok(output)
}

fn check_literal(literal: &str, left: &str) -> Result<(), LocalizeError> {
    match literal.find(left) {
        Some(pos) => Err(LocalizeError::InvalidTemplate {
            reason: format!(
                "malformed placeholder near \"{}\"",
                literal[pos..].chars().take(24).collect::<String>()
            ),
        }),
        None => Ok(()),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Placeholder names used by a template, in first-use order without repeats.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in default_regex().captures_iter(template) {
        if let Some(name) = caps.get(1) {
            if !names.iter().any(|n| n == name.as_str()) {
                names.push(name.as_str().to_string());
            }
        }
    }
    names
}
