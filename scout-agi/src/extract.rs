//! Pulls a JSON array of results out of free-form agent replies.
//!
//! Agents answer with a bare array, an object wrapping one, or prose with a
//! fenced or inline JSON block. Anything else is [`Extraction::NotFound`].

use crate::client::AgentMessage;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static FENCED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\[.*\]|\{.*\})\s*```").expect("valid fence pattern")
});

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(\[.*\]|\{.*\})").expect("valid bracket pattern"));

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Parsed(Vec<Value>),
    NotFound,
}

impl Extraction {
    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Parsed(_))
    }

    pub fn into_results(self) -> Vec<Value> {
        match self {
            Extraction::Parsed(items) => items,
            Extraction::NotFound => Vec::new(),
        }
    }
}

/// Extract a result array from one message body.
pub fn extract_results(content: &Value) -> Extraction {
    match content {
        Value::String(text) => match parse_embedded(text) {
            Some(parsed) => from_structured(parsed),
            None => Extraction::NotFound,
        },
        other => from_structured(other.clone()),
    }
}

/// First extractable array among messages that can carry an answer.
pub fn extract_from_messages(messages: &[AgentMessage]) -> Extraction {
    for message in messages.iter().filter(|m| m.carries_result()) {
        let extraction = extract_results(&message.content);
        if extraction.is_found() {
            return extraction;
        }
        tracing::debug!(message.kind = %message.kind, "No results in message");
    }
    Extraction::NotFound
}

fn from_structured(value: Value) -> Extraction {
    match value {
        Value::Array(items) => Extraction::Parsed(items),
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("results") {
                return Extraction::Parsed(items.clone());
            }
            // preserve_order keeps this in document order
            map.into_iter()
                .find_map(|(_, v)| match v {
                    Value::Array(items) => Some(Extraction::Parsed(items)),
                    _ => None,
                })
                .unwrap_or(Extraction::NotFound)
        }
        _ => Extraction::NotFound,
    }
}

fn parse_embedded(text: &str) -> Option<Value> {
    let candidate = FENCED
        .captures(text)
        .or_else(|| BRACKETED.captures(text))
        .and_then(|c| c.get(1))
        .map_or(text, |m| m.as_str());

    match serde_json::from_str(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to parse embedded JSON");
            None
        }
    }
}
