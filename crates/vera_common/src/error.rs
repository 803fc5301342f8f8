//! Refusal taxonomy.
//!
//! Every variant renders to the same fixed user-visible literal; the
//! distinctions exist for diagnostics and tests, never for callers.

use thiserror::Error;

/// Why the policy declined to answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefusalReason {
    #[error("no member name could be extracted or matched")]
    MemberUnresolved,

    #[error("name '{0}' matches more than one member")]
    AmbiguousMember(String),

    #[error("member '{0}' has no attributed messages")]
    NoMessages(String),

    #[error("no message contains extractable evidence for this question")]
    EvidenceNotFound,

    #[error("message corpus is unavailable")]
    CorpusUnavailable,
}
