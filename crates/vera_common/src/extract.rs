//! Fact extractors - one deterministic rule set per intent.
//!
//! Each extractor walks the ranked candidates in order and returns the
//! first literal match; nothing is aggregated or reconciled across
//! messages. A returned value is always a verbatim substring (or direct
//! regex capture) of the source message, so every answer traces back to
//! concrete evidence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::intent::{names_overlap, ClassifiedQuestion, Intent};
use crate::member::normalize;
use crate::ranker::RankedCandidate;

/// A successful extraction: the literal value and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub value: String,
    pub source_id: usize,
}

/// Spelled-out small numbers accepted alongside digits.
const SMALL_NUMBERS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve",
];

/// Countable-noun synonym groups; a hint matching any member of a group
/// accepts every member of that group in evidence.
const NOUN_SYNONYMS: &[&[&str]] = &[
    &["car", "cars", "vehicle", "vehicles"],
    &["child", "children", "kid", "kids"],
    &["pet", "pets"],
    &["dog", "dogs", "puppy", "puppies"],
    &["cat", "cats", "kitten", "kittens"],
];

/// Absolute date-like expressions, in priority order inside one text:
/// ISO, slashed/dashed numeric, month-name + day.
static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{4}-\d{2}-\d{2}|\d{1,2}[/-]\d{1,2}(?:[/-]\d{2,4})?|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\s+\d{1,2}(?:,\s*\d{2,4})?)\b",
    )
    .expect("date regex")
});

/// Relative expressions: "next week", "this Friday".
static RELATIVE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(next|this|coming)\s+(week|month|year|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
    )
    .expect("relative date regex")
});

/// Bare month name, the weakest temporal signal.
static MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\b")
        .expect("month regex")
});

/// Capitalized place after a locative preposition.
static PLACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:to|in|at)\s+(\p{Lu}\p{L}*(?:\s+\p{Lu}\p{L}*)*)").expect("place regex")
});

/// Preference-declaration vocabulary, from the audited corpus.
const PREFERENCE_WORDS: &[&str] = &[
    "prefer", "prefers", "preference", "preferences", "favorite", "favourite", "love", "loves",
    "like", "likes",
];

/// Composable co-occurrence gate: every term must appear in this one
/// text, case-insensitively. Terms spread across a member's corpus do
/// not satisfy the gate; that is the point.
pub fn contains_all_terms(text: &str, terms: &[String]) -> bool {
    let lower = text.to_lowercase();
    terms.iter().all(|t| lower.contains(&t.to_lowercase()))
}

/// Run the extractor for a factual intent over ranked candidates.
///
/// Returns `None` both when no candidate matches and when the intent is
/// open-ended (which has no extractor; the policy handles its snippet
/// fallback separately).
pub fn extract(
    question: &ClassifiedQuestion,
    member_name: &str,
    candidates: &[RankedCandidate<'_>],
) -> Option<Extraction> {
    match question.intent {
        Intent::Numeric => extract_numeric(question.noun_hint.as_deref(), candidates),
        Intent::When => extract_when(&question.required_terms, candidates),
        Intent::Where => extract_where(member_name, candidates),
        Intent::Preference => extract_preference(candidates),
        Intent::OpenEnded => None,
    }
}

/// "<number> ... <counted noun>" within one sentence. The hinted noun
/// (or a synonym) must be near the number; an unrelated count in the
/// same message is not evidence.
fn extract_numeric(
    noun_hint: Option<&str>,
    candidates: &[RankedCandidate<'_>],
) -> Option<Extraction> {
    let hint = noun_hint?;
    let accepted = noun_forms(hint);

    for candidate in candidates {
        for sentence in split_sentences(&candidate.message.text) {
            if let Some(value) = numeric_in_sentence(sentence, &accepted) {
                return Some(Extraction {
                    value,
                    source_id: candidate.message.id,
                });
            }
        }
    }
    None
}

fn numeric_in_sentence(sentence: &str, accepted: &[String]) -> Option<String> {
    let words: Vec<&str> = sentence
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for (i, word) in words.iter().enumerate() {
        if !is_quantity(word) {
            continue;
        }
        // Allow up to two filler words between number and noun
        // ("three small cars").
        let window = words.iter().skip(i + 1).take(3);
        for following in window {
            if accepted.contains(&following.to_lowercase()) {
                return Some((*word).to_string());
            }
        }
    }
    None
}

fn is_quantity(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_digit()) || SMALL_NUMBERS.contains(&word.to_lowercase().as_str())
}

/// Accepted surface forms for a counted noun: its synonym group when it
/// belongs to one, otherwise the noun with naive singular/plural forms.
fn noun_forms(hint: &str) -> Vec<String> {
    let lower = hint.to_lowercase();
    for group in NOUN_SYNONYMS {
        if group.contains(&lower.as_str()) {
            return group.iter().map(|s| s.to_string()).collect();
        }
    }
    let mut forms = vec![lower.clone(), format!("{lower}s")];
    if let Some(singular) = lower.strip_suffix('s') {
        forms.push(singular.to_string());
    }
    forms
}

/// Date-like expression from the first candidate that passes the
/// co-occurrence gate. A date in some other message of the member does
/// not count when the gate fails everywhere.
fn extract_when(
    required_terms: &[String],
    candidates: &[RankedCandidate<'_>],
) -> Option<Extraction> {
    for candidate in candidates {
        let text = &candidate.message.text;
        if !contains_all_terms(text, required_terms) {
            continue;
        }
        let value = DATE
            .find(text)
            .or_else(|| RELATIVE_DATE.find(text))
            .or_else(|| MONTH.find(text))
            .map(|m| m.as_str().to_string());
        if let Some(value) = value {
            return Some(Extraction {
                value,
                source_id: candidate.message.id,
            });
        }
    }
    None
}

/// Capitalized place after "to/in/at", skipping the member's own name.
fn extract_where(member_name: &str, candidates: &[RankedCandidate<'_>]) -> Option<Extraction> {
    let member_norm = normalize(member_name);
    for candidate in candidates {
        for cap in PLACE.captures_iter(&candidate.message.text) {
            let place = cap[1].to_string();
            if names_overlap(&member_norm, &normalize(&place)) {
                continue;
            }
            return Some(Extraction {
                value: place,
                source_id: candidate.message.id,
            });
        }
    }
    None
}

/// The full declarative sentence carrying preference phrasing, verbatim.
/// The accepted answer format is the sentence, not a synthesized object.
fn extract_preference(candidates: &[RankedCandidate<'_>]) -> Option<Extraction> {
    for candidate in candidates {
        for sentence in split_sentences(&candidate.message.text) {
            let words: Vec<String> = sentence
                .to_lowercase()
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
                .map(|w| w.to_string())
                .collect();
            if PREFERENCE_WORDS.iter().any(|p| words.contains(&p.to_string())) {
                return Some(Extraction {
                    value: sentence.to_string(),
                    source_id: candidate.message.id,
                });
            }
        }
    }
    None
}

/// Sentence boundaries at `.`, `!`, `?`; terminators stay attached so
/// returned sentences read verbatim.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                out.push(sentence);
            }
            start = end;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}
