//! Vera Common - the evidence-constrained answer pipeline.
//!
//! Zero generated knowledge: every non-refusal answer traces to a
//! literal substring of one member-attributed message. When evidence is
//! weak, absent, or ambiguous, the pipeline refuses with a single fixed
//! literal rather than guessing.

pub mod engine;
pub mod error;
pub mod extract;
pub mod intent;
pub mod member;
pub mod message;
pub mod ranker;
pub mod resolver;

pub use engine::{Answer, AnswerEngine, REFUSAL};
pub use error::RefusalReason;
pub use intent::Intent;
pub use member::{Member, MemberDirectory};
pub use message::Message;
