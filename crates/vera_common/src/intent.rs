//! Question classifier - rule-ordered intent detection.
//!
//! A fixed, prioritized table of phrase patterns is scanned in order
//! and the first hit wins. The order itself is part of the contract:
//! numeric before temporal before locative before preference, with
//! open-ended as the fallthrough. Reordering the table changes
//! behavior, so it lives in one place and the tests pin it down.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::member::normalize;

/// Semantic type of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// "how many X" - wants a count.
    Numeric,
    /// "when" / "what date" - wants a date-like expression.
    When,
    /// "where" - wants a place.
    Where,
    /// "prefer" / "favorite" - wants a stated preference.
    Preference,
    /// Everything else; answered with a verbatim snippet.
    OpenEnded,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Numeric => "numeric",
            Intent::When => "when",
            Intent::Where => "where",
            Intent::Preference => "preference",
            Intent::OpenEnded => "open_ended",
        }
    }

    /// Factual intents refuse when extraction fails; open-ended ones
    /// fall back to a snippet instead.
    pub fn is_factual(&self) -> bool {
        !matches!(self, Intent::OpenEnded)
    }
}

/// Classifier output: intent plus extractor guidance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedQuestion {
    pub intent: Intent,
    /// For numeric questions, the noun being counted ("cars").
    pub noun_hint: Option<String>,
    /// Terms that must co-occur with the member in a single message for
    /// it to count as evidence (e.g. a destination for a WHEN question).
    pub required_terms: Vec<String>,
}

/// Priority-ordered phrase table; first match wins.
const INTENT_RULES: &[(&[&str], Intent)] = &[
    (&["how many", "number of", "count of"], Intent::Numeric),
    (&["when", "what date", "what day", "scheduled for"], Intent::When),
    (&["where", "which city", "which country"], Intent::Where),
    (
        &["prefer", "preference", "favorite", "favourite", "love", "like"],
        Intent::Preference,
    ),
];

static COUNTED_NOUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:how many|number of|count of)\s+([a-z]+)").expect("counted noun regex")
});

/// Destination phrase in the question itself: "trip to London",
/// "traveling to Dubai". Capitalized so ordinary prepositions don't
/// produce junk terms.
static DESTINATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:to|in|at)\s+(\p{Lu}\p{L}*(?:\s+\p{Lu}\p{L}*)*)").expect("destination regex")
});

/// Classify a question and derive extractor guidance.
///
/// `member_name` is the already-resolved subject; a "destination" that
/// is really the member's own name is not a co-occurrence constraint.
pub fn classify(question: &str, member_name: Option<&str>) -> ClassifiedQuestion {
    let lower = question.to_lowercase();

    let intent = INTENT_RULES
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| lower.contains(p)))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::OpenEnded);

    let noun_hint = match intent {
        Intent::Numeric => COUNTED_NOUN
            .captures(&lower)
            .map(|c| c[1].to_string()),
        _ => None,
    };

    // Destination-aware gating applies to temporal questions only: a
    // WHEN answer about a trip to a named place is evidence only if
    // member and place share a message.
    let mut required_terms = Vec::new();
    if intent == Intent::When {
        if let Some(dest) = destination_from_question(question, member_name) {
            required_terms.push(dest);
        }
    }

    ClassifiedQuestion {
        intent,
        noun_hint,
        required_terms,
    }
}

/// Pull a place name out of the question, skipping the member's name.
fn destination_from_question(question: &str, member_name: Option<&str>) -> Option<String> {
    let member_norm = member_name.map(normalize);
    for cap in DESTINATION.captures_iter(question) {
        let place = cap[1].to_string();
        if let Some(ref member) = member_norm {
            if names_overlap(member, &normalize(&place)) {
                continue;
            }
        }
        return Some(place);
    }
    None
}

/// True if `candidate` is the member's name or one of its tokens.
pub(crate) fn names_overlap(member_norm: &str, candidate_norm: &str) -> bool {
    candidate_norm == member_norm || member_norm.split(' ').any(|tok| tok == candidate_norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_with_noun_hint() {
        let c = classify("How many cars does Vikram Desai have?", Some("Vikram Desai"));
        assert_eq!(c.intent, Intent::Numeric);
        assert_eq!(c.noun_hint.as_deref(), Some("cars"));
    }

    #[test]
    fn test_when_with_destination_constraint() {
        let c = classify(
            "When is Layla planning her trip to London?",
            Some("Layla Kawaguchi"),
        );
        assert_eq!(c.intent, Intent::When);
        assert_eq!(c.required_terms, vec!["London".to_string()]);
    }

    #[test]
    fn test_when_without_destination() {
        let c = classify("When is the reservation scheduled for?", None);
        assert_eq!(c.intent, Intent::When);
        assert!(c.required_terms.is_empty());
    }

    #[test]
    fn test_member_name_is_not_a_destination() {
        // "at Ayesha" style captures must not become constraints.
        let c = classify("When is the dinner at Ayesha planned?", Some("Ayesha Khan"));
        assert_eq!(c.intent, Intent::When);
        assert!(c.required_terms.is_empty());
    }

    #[test]
    fn test_where_intent() {
        let c = classify("Where is Ayesha traveling next?", Some("Ayesha Khan"));
        assert_eq!(c.intent, Intent::Where);
    }

    #[test]
    fn test_preference_intent() {
        let c = classify(
            "What does Hans Müller prefer for hotel rooms?",
            Some("Hans Müller"),
        );
        assert_eq!(c.intent, Intent::Preference);
    }

    #[test]
    fn test_open_ended_fallback() {
        let c = classify("Tell me about Ayesha's recent travel plans.", Some("Ayesha Khan"));
        assert_eq!(c.intent, Intent::OpenEnded);
    }

    #[test]
    fn test_rule_order_numeric_beats_when() {
        // "how many" and "when" both present: numeric is earlier in the
        // table and must win.
        let c = classify("How many trips did Ayesha book when abroad?", Some("Ayesha Khan"));
        assert_eq!(c.intent, Intent::Numeric);
    }

    #[test]
    fn test_rule_order_when_beats_preference() {
        let c = classify("When did Hans say he would like to check in?", Some("Hans Müller"));
        assert_eq!(c.intent, Intent::When);
    }
}
