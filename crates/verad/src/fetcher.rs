//! Upstream message fetcher.
//!
//! Pulls the full message corpus from the upstream API and normalizes
//! its loose schema: payloads arrive either as a bare array or wrapped
//! in `items`, field names vary across deployments, and timestamps are
//! frequently absent or unparseable. The fetcher tolerates all of that;
//! only an empty usable corpus is an error.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use vera_common::Message;

/// Fetcher errors. An error here means the daemon keeps serving
/// refusals from the old snapshot (or no snapshot) until recovery.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream request failed: {0}")]
    Network(String),

    #[error("unexpected upstream format: {0}")]
    Format(String),

    #[error("upstream returned no usable message text")]
    Empty,
}

/// Fetch and normalize the corpus from the upstream API.
pub async fn fetch_messages(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Message>, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?
        .error_for_status()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let payload: Value = response
        .json()
        .await
        .map_err(|e| FetchError::Format(e.to_string()))?;

    let messages = normalize_payload(&payload)?;
    debug!("Fetched {} usable messages from upstream", messages.len());
    Ok(messages)
}

/// Normalize an upstream payload into the corpus snapshot.
///
/// Accepts `[...]` or `{"items": [...]}`; per record, text falls back
/// from `text` to `message` and the member name from `member_name` to
/// `user_name` to `memberName`. Records with no text are dropped.
pub fn normalize_payload(payload: &Value) -> Result<Vec<Message>, FetchError> {
    let records = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.as_slice())
            .ok_or_else(|| FetchError::Format("list expected".to_string()))?,
        _ => return Err(FetchError::Format("list expected".to_string())),
    };

    let mut messages = Vec::with_capacity(records.len());
    for record in records {
        let text = string_field(record, &["text", "message"]).unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let member_name =
            string_field(record, &["member_name", "user_name", "memberName"]).unwrap_or_default();

        let id = messages.len();
        let mut message = Message::new(id, member_name.trim(), text);
        if let Some(ts) = string_field(record, &["timestamp"]) {
            message.timestamp = Some(ts);
        }
        messages.push(message);
    }

    if messages.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(messages)
}

fn string_field(record: &Value, names: &[&str]) -> Option<String> {
    for name in names {
        match record.get(name) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Null) | None => continue,
            // Odd upstream types get stringified rather than dropped.
            Some(other) => return Some(other.to_string()),
        }
    }
    None
}
