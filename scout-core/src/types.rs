use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of remote search a result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    #[serde(rename = "producthunt")]
    ProductHunt,
    CostEffective,
    Google,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::ProductHunt => "producthunt",
            SearchType::CostEffective => "cost_effective",
            SearchType::Google => "google",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a cached result set came from.
///
/// Serialized as `agi` / `mock` to stay readable by older cache files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultSource {
    #[serde(rename = "agi")]
    Remote,
    #[serde(rename = "mock")]
    Synthetic,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSource::Remote => "agi",
            ResultSource::Synthetic => "mock",
        }
    }
}

/// One search hit as returned by the remote agent or a synthetic generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultRecord {
    pub name: String,
    pub url: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<u64>,
}

impl SearchResultRecord {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), url: url.into(), description: description.into(), upvotes: None }
    }

    pub fn with_upvotes(mut self, upvotes: u64) -> Self {
        self.upvotes = Some(upvotes);
        self
    }

    /// Build a record from the loosely-shaped JSON an agent returns.
    ///
    /// Accepts `title` for `name`, `snippet` for `description` and `votes` for
    /// `upvotes`. Missing names become `"Unknown"`.
    pub fn from_value(value: &Value) -> Self {
        let text = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| value.get(*k).and_then(Value::as_str))
                .find(|s| !s.is_empty())
                .map(str::to_string)
        };
        let upvotes = ["upvotes", "votes"]
            .iter()
            .filter_map(|k| value.get(*k))
            .find_map(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())));

        Self {
            name: text(&["name", "title"]).unwrap_or_else(|| "Unknown".to_string()),
            url: text(&["url"]).unwrap_or_default(),
            description: text(&["description", "snippet"]).unwrap_or_default(),
            upvotes,
        }
    }
}

/// A competitor as presented to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub url: String,
    pub description: String,
}

impl Competitor {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), url: url.into(), description: description.into() }
    }
}

impl From<SearchResultRecord> for Competitor {
    fn from(record: SearchResultRecord) -> Self {
        Self { name: record.name, url: record.url, description: record.description }
    }
}

impl From<&SearchResultRecord> for Competitor {
    fn from(record: &SearchResultRecord) -> Self {
        Self {
            name: record.name.clone(),
            url: record.url.clone(),
            description: record.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_type_serializes_with_wire_names() {
        assert_eq!(serde_json::to_value(SearchType::ProductHunt).unwrap(), json!("producthunt"));
        assert_eq!(
            serde_json::to_value(SearchType::CostEffective).unwrap(),
            json!("cost_effective")
        );
        assert_eq!(SearchType::Google.to_string(), "google");
    }

    #[test]
    fn result_source_keeps_legacy_names() {
        assert_eq!(serde_json::to_value(ResultSource::Remote).unwrap(), json!("agi"));
        let parsed: ResultSource = serde_json::from_value(json!("mock")).unwrap();
        assert_eq!(parsed, ResultSource::Synthetic);
    }

    #[test]
    fn record_from_loose_json_uses_fallback_keys() {
        let record = SearchResultRecord::from_value(&json!({
            "title": "Fitbod",
            "url": "https://fitbod.me",
            "snippet": "Workout planner",
            "votes": 42
        }));
        assert_eq!(record.name, "Fitbod");
        assert_eq!(record.description, "Workout planner");
        assert_eq!(record.upvotes, Some(42));

        let empty = SearchResultRecord::from_value(&json!({}));
        assert_eq!(empty.name, "Unknown");
        assert_eq!(empty.url, "");
        assert_eq!(empty.upvotes, None);
    }
}
