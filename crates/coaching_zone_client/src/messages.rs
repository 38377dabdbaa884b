//! Webhook message types. Client → webhook payload and the decoding of the
//! webhook's reply into a canonical answer.
//!
//! The reply shape has grown informally over time; all of these are accepted:
//! a plain string, `{ answer|output|text|message, sources|links?, category? }`,
//! or a list of `{ output, category? }`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::category::Categories;
use crate::history::Source;

/// Answer-text field names, in precedence order.
pub const TEXT_FIELDS: [&str; 4] = ["answer", "output", "text", "message"];
/// Citation list field names, in precedence order.
pub const SOURCE_FIELDS: [&str; 2] = ["sources", "links"];
/// Text field of each element in the list-shaped reply.
pub const SEQUENCE_TEXT_FIELD: &str = "output";
pub const CATEGORY_FIELD: &str = "category";

/// Shown when the webhook replied without usable text.
pub const NO_ANSWER_PLACEHOLDER: &str = "(Keine Antwort erhalten)";

/// Client → webhook: question payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AskPayload<'a> {
    pub question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category_hint_matches: Vec<String>,
}

impl<'a> AskPayload<'a> {
    pub fn new(question: &'a str, category: Option<&'a str>, hints: Vec<String>) -> Self {
        Self {
            question,
            category,
            category_hint_matches: hints,
        }
    }
}

/// Webhook reply after the boundary decode step.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Text(String),
    Object(Map<String, Value>),
    Sequence(Vec<Value>),
}

impl RawResponse {
    /// Decode an untyped payload. Scalars other than strings (numbers, bools,
    /// null) carry no answer and decode to an empty text.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => RawResponse::Text(s),
            Value::Object(map) => RawResponse::Object(map),
            Value::Array(items) => RawResponse::Sequence(items),
            Value::Null | Value::Bool(_) | Value::Number(_) => RawResponse::Text(String::new()),
        }
    }
}

/// Canonical answer record produced from any reply shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAnswer {
    pub text: String,
    pub sources: Vec<Source>,
    /// Category suggested by the webhook, already validated against the set.
    pub category: Option<String>,
}

/// Shape-level extraction, before placeholder and category validation.
fn extract(raw: RawResponse) -> (String, Vec<Source>, Option<String>) {
    match raw {
        RawResponse::Sequence(items) => {
            // Outer `Some` when the first element carries generated text.
            let head_category = match items.first().and_then(Value::as_object) {
                Some(head) if head.contains_key(SEQUENCE_TEXT_FIELD) => {
                    Some(string_field(head, CATEGORY_FIELD))
                }
                _ => None,
            };
            match head_category {
                Some(category) => {
                    let text = items
                        .iter()
                        .filter_map(|item| item.get(SEQUENCE_TEXT_FIELD).and_then(Value::as_str))
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                        .join("\n\n");
                    (text, Vec::new(), category)
                }
                None => {
                    let dump = serde_json::to_string_pretty(&Value::Array(items)).unwrap_or_default();
                    (dump, Vec::new(), None)
                }
            }
        }
        RawResponse::Object(map) => {
            let text = TEXT_FIELDS
                .iter()
                .find_map(|f| string_field(&map, f))
                .unwrap_or_default();
            let sources = SOURCE_FIELDS
                .iter()
                .find_map(|f| map.get(*f).and_then(Value::as_array))
                .map(|list| list.iter().filter_map(source_from_value).collect())
                .unwrap_or_default();
            (text, sources, string_field(&map, CATEGORY_FIELD))
        }
        RawResponse::Text(s) => (s, Vec::new(), None),
    }
}

/// Non-empty string value of `field`.
fn string_field(map: &Map<String, Value>, field: &str) -> Option<String> {
    map.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A citation is `{ url, title? }` or a bare URL string; anything else is dropped.
fn source_from_value(value: &Value) -> Option<Source> {
    match value {
        Value::String(url) if !url.is_empty() => Some(Source {
            title: None,
            url: url.clone(),
        }),
        Value::Object(map) => Some(Source {
            title: string_field(map, "title"),
            url: string_field(map, "url")?,
        }),
        _ => None,
    }
}

/// Normalize a reply into `{ text, sources, category }`. Never fails: empty
/// text becomes [`NO_ANSWER_PLACEHOLDER`], and a suggested category outside
/// `categories` is discarded.
pub fn normalize(raw: RawResponse, categories: &Categories) -> NormalizedAnswer {
    let (text, sources, category) = extract(raw);
    let text = if text.is_empty() {
        NO_ANSWER_PLACEHOLDER.to_string()
    } else {
        text
    };
    let category = match category {
        Some(key) if categories.contains(&key) => Some(key),
        Some(key) => {
            tracing::debug!(category = %key, "ignoring unknown category from webhook");
            None
        }
        None => None,
    };
    NormalizedAnswer {
        text,
        sources,
        category,
    }
}
