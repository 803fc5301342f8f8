//! Message types - the read-only evidence corpus.
//!
//! Messages arrive wholesale from the upstream source and are treated
//! as an immutable snapshot for the lifetime of an answer engine.

use serde::{Deserialize, Serialize};

/// A single member-attributed message.
///
/// The timestamp is carried through from upstream but is documented as
/// unreliable; nothing in the answer pipeline reads it. Ordering and
/// tie-breaking always use corpus position, never time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Position in the corpus snapshot; stable for the snapshot lifetime.
    pub id: usize,
    /// Display name of the member this message is attributed to.
    pub member_name: String,
    /// Message body; the only evidence the pipeline may cite.
    pub text: String,
    /// Untrusted upstream timestamp, kept for debugging only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    pub fn new(id: usize, member_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            member_name: member_name.into(),
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}
