//! Answer policy - the pipeline orchestrator.
//!
//! RESOLVE -> FILTER -> CLASSIFY -> RANK -> EXTRACT -> DECIDE, with a
//! conservative refusal at every weak point. Internally answers are a
//! typed enum; the fixed refusal literal only appears at render time so
//! tests and callers can distinguish outcomes without string matching.

use tracing::debug;

use crate::error::RefusalReason;
use crate::extract::{self, Extraction};
use crate::intent::{self, Intent};
use crate::member::MemberDirectory;
use crate::message::Message;
use crate::ranker;
use crate::resolver::{self, NameResolution};

/// The exact user-visible refusal string. Never paraphrased; callers
/// detect refusals by comparing against this literal.
pub const REFUSAL: &str = "I don't know based on the available messages.";

/// Open-ended snippets are cut at this many characters.
const SNIPPET_MAX_CHARS: usize = 280;

/// Outcome of asking a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Evidence-backed answer with its source message id.
    Found { value: String, source_id: usize },
    /// No sufficient evidence; the reason is internal diagnostics only.
    Refused(RefusalReason),
}

impl Answer {
    /// Serialize for the boundary: the value, or the fixed literal.
    pub fn render(&self) -> String {
        match self {
            Answer::Found { value, .. } => value.clone(),
            Answer::Refused(_) => REFUSAL.to_string(),
        }
    }

    pub fn is_refusal(&self) -> bool {
        matches!(self, Answer::Refused(_))
    }
}

/// One immutable corpus snapshot plus its member directory.
///
/// Shared read-only across concurrent requests; `ask` is a pure
/// function of (question, snapshot) and never performs I/O.
pub struct AnswerEngine {
    directory: MemberDirectory,
    corpus: Vec<Message>,
}

impl AnswerEngine {
    /// Build an engine over a corpus snapshot. The directory is derived
    /// from the snapshot's attribution names.
    pub fn new(corpus: Vec<Message>) -> Self {
        let directory = MemberDirectory::from_messages(&corpus);
        Self { directory, corpus }
    }

    pub fn member_count(&self) -> usize {
        self.directory.len()
    }

    pub fn message_count(&self) -> usize {
        self.corpus.len()
    }

    /// Answer a question from the snapshot, or refuse.
    pub fn ask(&self, question: &str) -> Answer {
        if self.corpus.is_empty() {
            debug!("refusing: empty corpus snapshot");
            return Answer::Refused(RefusalReason::CorpusUnavailable);
        }

        // RESOLVE: never guess a member from context.
        let (mentioned, member) = match resolver::resolve(question, &self.directory) {
            NameResolution::Resolved { mentioned, member } => (mentioned, member),
            NameResolution::Ambiguous { mentioned } => {
                debug!(name = %mentioned, "refusing: ambiguous member");
                return Answer::Refused(RefusalReason::AmbiguousMember(mentioned));
            }
            NameResolution::Unresolved { mentioned } => {
                debug!(name = ?mentioned, "refusing: member unresolved");
                return Answer::Refused(RefusalReason::MemberUnresolved);
            }
        };

        // FILTER: the member's own messages, corpus order preserved.
        // Attribution is matched on the trimmed form, the same form the
        // directory canonicalizes at construction.
        let own: Vec<&Message> = self
            .corpus
            .iter()
            .filter(|m| m.member_name.trim() == member.canonical_name)
            .collect();
        if own.is_empty() {
            debug!(member = %member.canonical_name, "refusing: no messages");
            return Answer::Refused(RefusalReason::NoMessages(member.canonical_name));
        }

        // CLASSIFY, then RANK locally to this member.
        let classified = intent::classify(question, Some(member.canonical_name.as_str()));
        let candidates = ranker::rank(question, &own);
        debug!(
            member = %member.canonical_name,
            mentioned = %mentioned,
            intent = classified.intent.as_str(),
            candidates = candidates.len(),
            "pipeline ready"
        );

        // EXTRACT / DECIDE.
        if classified.intent.is_factual() {
            return match extract::extract(&classified, &member.canonical_name, &candidates) {
                Some(Extraction { value, source_id }) => Answer::Found { value, source_id },
                None => {
                    debug!(intent = classified.intent.as_str(), "refusing: no evidence");
                    Answer::Refused(RefusalReason::EvidenceNotFound)
                }
            };
        }

        // Snippet fallback is reserved for open-ended questions only.
        debug_assert_eq!(classified.intent, Intent::OpenEnded);
        let top = &candidates[0];
        Answer::Found {
            value: snippet(&top.message.text),
            source_id: top.message.id,
        }
    }
}

/// Verbatim excerpt of a message, truncated on a char boundary.
fn snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(SNIPPET_MAX_CHARS - 3).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(entries: &[(&str, &str)]) -> AnswerEngine {
        let corpus = entries
            .iter()
            .enumerate()
            .map(|(i, (name, text))| Message::new(i, *name, *text))
            .collect();
        AnswerEngine::new(corpus)
    }

    #[test]
    fn test_empty_corpus_refuses_everything() {
        let engine = AnswerEngine::new(vec![]);
        let answer = engine.ask("Where is Ayesha traveling next?");
        assert_eq!(answer, Answer::Refused(RefusalReason::CorpusUnavailable));
        assert_eq!(answer.render(), REFUSAL);
    }

    #[test]
    fn test_unknown_member_refuses() {
        let engine = engine(&[("Ayesha Khan", "Traveling to Dubai next week.")]);
        let answer = engine.ask("When is Michael's hotel reservation scheduled for?");
        assert_eq!(answer, Answer::Refused(RefusalReason::MemberUnresolved));
    }

    #[test]
    fn test_factual_intent_without_evidence_refuses_instead_of_snippet() {
        let engine = engine(&[("Vikram Desai", "Lunch downtown was great.")]);
        let answer = engine.ask("How many cars does Vikram Desai have?");
        assert_eq!(answer, Answer::Refused(RefusalReason::EvidenceNotFound));
    }

    #[test]
    fn test_open_ended_gets_snippet_from_top_candidate() {
        let engine = engine(&[
            ("Ayesha Khan", "Gym membership renewed."),
            ("Ayesha Khan", "My travel plans: flying to Dubai next Friday."),
        ]);
        let answer = engine.ask("Tell me about Ayesha's recent travel plans.");
        match answer {
            Answer::Found { value, source_id } => {
                assert_eq!(source_id, 1);
                assert_eq!(value, "My travel plans: flying to Dubai next Friday.");
            }
            other => panic!("expected snippet, got {:?}", other),
        }
    }

    #[test]
    fn test_padded_attribution_still_counts_as_evidence() {
        // Upstream attribution with stray whitespace must resolve to
        // the same member the directory canonicalized, and that
        // member's messages must survive the filter.
        let engine = engine(&[("Ayesha Khan ", "Traveling to Dubai next week.")]);
        let answer = engine.ask("Where is Ayesha traveling next?");
        assert_eq!(answer.render(), "Dubai");
    }

    #[test]
    fn test_answers_are_deterministic() {
        let engine = engine(&[
            ("Ayesha Khan", "Traveling to Dubai next week."),
            ("Ayesha Khan", "Might also visit Muscat in June."),
        ]);
        let first = engine.ask("Where is Ayesha traveling next?").render();
        let second = engine.ask("Where is Ayesha traveling next?").render();
        assert_eq!(first, second);
    }

    #[test]
    fn test_snippet_truncates_long_text() {
        let long = "word ".repeat(100);
        let engine = engine(&[("Ayesha Khan", long.as_str())]);
        let answer = engine.ask("Tell me about Ayesha.");
        match answer {
            Answer::Found { value, .. } => {
                assert_eq!(value.chars().count(), SNIPPET_MAX_CHARS);
                assert!(value.ends_with("..."));
            }
            other => panic!("expected snippet, got {:?}", other),
        }
    }

    #[test]
    fn test_refusal_monotonicity_over_corpus_mutation() {
        let with_evidence = engine(&[
            ("Vikram Desai", "We now have 3 cars at home."),
            ("Vikram Desai", "Lunch was great."),
        ]);
        let question = "How many cars does Vikram Desai have?";
        assert_eq!(with_evidence.ask(question).render(), "3");

        // Remove the only evidentiary message: the answer must flip to
        // the refusal literal.
        let without = engine(&[("Vikram Desai", "Lunch was great.")]);
        assert_eq!(without.ask(question).render(), REFUSAL);

        // Re-adding restores the original answer.
        let restored = engine(&[
            ("Vikram Desai", "Lunch was great."),
            ("Vikram Desai", "We now have 3 cars at home."),
        ]);
        assert_eq!(restored.ask(question).render(), "3");
    }
}
