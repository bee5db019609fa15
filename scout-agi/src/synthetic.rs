//! Deterministic stand-in results used when the remote agent is unavailable.

use scout_core::SearchResultRecord;

const PRODUCT_TEMPLATES: [(&str, &str); 5] = [
    ("Scout", "AI companion that researches adjacent products"),
    ("Pulse", "Trend tracker surfacing emerging demand signals"),
    ("LaunchPad", "Go-to-market toolkit for lean teams"),
    ("InsightGrid", "Competitive intelligence dashboards"),
    ("CompEdge", "Workflow automation for niche operators"),
];

const WEB_TEMPLATES: [(&str, &str); 5] = [
    ("Guide", "Deep-dive blog outlining market landscape"),
    ("Toolkit", "Open-source starter kit for rapid experiments"),
    ("Navigator", "Comparison article highlighting incumbents"),
    ("Radar", "Newsletter summarizing recent launches"),
    ("Stack", "Case study showcasing customer acquisition"),
];

/// Lower-case, runs of non-alphanumerics collapsed to `-`, trimmed.
/// Falls back to `result` when nothing is left.
pub fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() { "result".to_string() } else { out }
}

/// Product-Hunt-style records with descending upvotes.
pub fn product_results(query: &str) -> Vec<SearchResultRecord> {
    let query_slug = slug(query);
    PRODUCT_TEMPLATES
        .iter()
        .zip(0u64..)
        .map(|((name, description), index)| {
            SearchResultRecord::new(
                format!("{name} for {query}"),
                format!("https://example.com/{}-{query_slug}-{}", slug(name), index + 1),
                format!("{description} tailored to \"{query}\"."),
            )
            .with_upvotes(120 - index * 10)
        })
        .collect()
}

/// Web-search-style records.
pub fn web_results(query: &str) -> Vec<SearchResultRecord> {
    let query_slug = slug(query);
    WEB_TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, (name, description))| {
            SearchResultRecord::new(
                format!("{query} {name}"),
                format!("https://research.example.com/{query_slug}-{}-{}", slug(name), index + 1),
                format!("{description} related to \"{query}\"."),
            )
        })
        .collect()
}
