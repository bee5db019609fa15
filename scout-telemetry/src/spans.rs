//! Span helpers for common idea-scout operations

use tracing::Span;

/// Create a span covering one remote search cycle
///
/// # Arguments
/// * `search_type` - Wire name of the search (e.g. "producthunt")
/// * `query` - The user query being searched
///
/// # Example
/// ```
/// use scout_telemetry::search_span;
/// let span = search_span("producthunt", "ai fitness coach");
/// let _enter = span.enter();
/// ```
pub fn search_span(search_type: &str, query: &str) -> Span {
    tracing::info_span!(
        "agi.search",
        search.type = search_type,
        search.query = query,
        session.id = tracing::field::Empty,
        otel.kind = "client"
    )
}

/// Create a span for a session pool operation
pub fn pool_span(operation: &str, task: &str) -> Span {
    tracing::debug_span!("pool.op", pool.operation = operation, pool.task = task)
}

/// Create a span for chat-completion calls
///
/// # Example
/// ```
/// use scout_telemetry::model_call_span;
/// let span = model_call_span("gpt-4o-mini");
/// let _enter = span.enter();
/// ```
pub fn model_call_span(model_name: &str) -> Span {
    tracing::info_span!("model.call", model.name = model_name, otel.kind = "client")
}

/// Record the session a search ended up running on.
pub fn record_session_id(session_id: &str) {
    Span::current().record("session.id", session_id);
}
