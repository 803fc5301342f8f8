//! Relevance ranker - orders one member's messages against a question.
//!
//! Builds a TF-IDF model per request, strictly over the filtered
//! member's own messages. Ranking is local by design: scores from one
//! member's vocabulary are never comparable to another's, and a popular
//! member must not dilute a quiet one. The whole thing is a pure
//! function of (question, messages) so repeated calls are byte-stable.

use std::collections::BTreeMap;

use crate::message::Message;

/// A message with its relevance score for one question.
#[derive(Debug, Clone)]
pub struct RankedCandidate<'a> {
    pub message: &'a Message,
    pub score: f64,
}

/// Common English words that carry no signal for overlap scoring.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "but", "by", "can", "could", "did", "do", "does", "for", "from",
    "had", "has", "have", "he", "her", "here", "him", "his", "how", "i", "if", "in", "into", "is",
    "it", "its", "just", "like", "me", "my", "no", "not", "of", "on", "or", "our", "out", "over",
    "she", "so", "some", "than", "that", "the", "their", "them", "then", "there", "these", "they",
    "this", "to", "up", "was", "we", "were", "what", "when", "where", "which", "who", "will",
    "with", "would", "you", "your",
];

/// Lowercased alphanumeric terms, stop words and single chars dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !STOP_WORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Rank `messages` by TF-IDF cosine similarity against `question`.
///
/// Output is ordered by descending score with corpus position as the
/// tie-break. With fewer than two messages there is no meaningful
/// document-frequency discount, so ranking degrades to corpus order
/// with zero scores rather than erroring.
pub fn rank<'a>(question: &str, messages: &[&'a Message]) -> Vec<RankedCandidate<'a>> {
    if messages.len() < 2 {
        return messages
            .iter()
            .map(|m| RankedCandidate {
                message: m,
                score: 0.0,
            })
            .collect();
    }

    let docs: Vec<Vec<String>> = messages.iter().map(|m| tokenize(&m.text)).collect();
    let n = docs.len() as f64;

    // Document frequency over the member-local corpus.
    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &docs {
        let mut seen: Vec<&str> = Vec::new();
        for term in doc {
            if !seen.contains(&term.as_str()) {
                seen.push(term);
                *df.entry(term).or_insert(0) += 1;
            }
        }
    }

    // Smoothed IDF, as in the classic formulation: ln((1+n)/(1+df)) + 1.
    let idf = |term: &str| -> f64 {
        let d = df.get(term).copied().unwrap_or(0) as f64;
        ((1.0 + n) / (1.0 + d)).ln() + 1.0
    };

    // Query vector over the corpus vocabulary only; terms the member
    // never used contribute nothing.
    let mut query: BTreeMap<String, f64> = BTreeMap::new();
    for term in tokenize(question) {
        if df.contains_key(term.as_str()) {
            *query.entry(term).or_insert(0.0) += 1.0;
        }
    }
    for (term, tf) in query.clone() {
        query.insert(term.clone(), tf * idf(&term));
    }
    let query_norm = query.values().map(|w| w * w).sum::<f64>().sqrt();

    let mut scored: Vec<RankedCandidate<'a>> = Vec::with_capacity(messages.len());
    for (i, doc) in docs.iter().enumerate() {
        let mut weights: BTreeMap<&str, f64> = BTreeMap::new();
        for term in doc {
            *weights.entry(term).or_insert(0.0) += 1.0;
        }
        for (term, tf) in weights.clone() {
            weights.insert(term, tf * idf(term));
        }
        let doc_norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();

        let dot: f64 = query
            .iter()
            .filter_map(|(term, qw)| weights.get(term.as_str()).map(|dw| qw * dw))
            .sum();

        let score = if query_norm > 0.0 && doc_norm > 0.0 {
            dot / (query_norm * doc_norm)
        } else {
            0.0
        };
        scored.push(RankedCandidate {
            message: messages[i],
            score,
        });
    }

    // Stable: descending score, corpus order breaks ties.
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.message.id.cmp(&b.message.id))
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corpus(texts: &[&str]) -> Vec<Message> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Message::new(i, "Ayesha Khan", *t))
            .collect()
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let terms = tokenize("I am traveling to Dubai on the 5th!");
        assert_eq!(terms, vec!["traveling", "dubai", "5th"]);
    }

    #[test]
    fn test_relevant_message_ranks_first() {
        let msgs = corpus(&[
            "Lunch was great today.",
            "My trip to Dubai is booked, traveling next week.",
            "Need to renew my gym membership.",
        ]);
        let refs: Vec<&Message> = msgs.iter().collect();
        let ranked = rank("Where is Ayesha traveling next?", &refs);
        assert_eq!(ranked[0].message.id, 1);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_single_message_keeps_order_without_error() {
        let msgs = corpus(&["Only one message here."]);
        let refs: Vec<&Message> = msgs.iter().collect();
        let ranked = rank("anything at all", &refs);
        assert_eq!(ranked.len(), 1);
        assert_relative_eq!(ranked[0].score, 0.0);
    }

    #[test]
    fn test_no_overlap_scores_zero_and_keeps_corpus_order() {
        let msgs = corpus(&["alpha beta", "gamma delta"]);
        let refs: Vec<&Message> = msgs.iter().collect();
        let ranked = rank("completely unrelated question", &refs);
        assert_relative_eq!(ranked[0].score, 0.0);
        assert_eq!(ranked[0].message.id, 0);
        assert_eq!(ranked[1].message.id, 1);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let msgs = corpus(&[
            "Dubai flight booked for March 3.",
            "Dinner reservations downtown.",
            "Dubai hotel confirmed.",
        ]);
        let refs: Vec<&Message> = msgs.iter().collect();
        let first: Vec<usize> = rank("trip to Dubai", &refs)
            .iter()
            .map(|c| c.message.id)
            .collect();
        let second: Vec<usize> = rank("trip to Dubai", &refs)
            .iter()
            .map(|c| c.message.id)
            .collect();
        assert_eq!(first, second);
    }
}
