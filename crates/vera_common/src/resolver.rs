//! Member resolver - maps question text to a directory entry.
//!
//! Pulls capitalized token runs out of the question ("Vikram Desai",
//! "Amira's" -> "Amira"), strips possessives and trailing punctuation,
//! then matches the normalized form against the directory. Matching is
//! exact on the normalized form; a name the directory does not carry
//! stays unresolved and the policy refuses downstream.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::member::{normalize, Member, MemberDirectory, Resolution};

/// Capitalized word runs, unicode-aware so "Müller" is one token.
/// Apostrophes stay inside a token so possessives survive to cleanup.
static NAME_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\p{Lu}[\p{Ll}'’]*(?:\s+\p{Lu}[\p{Ll}'’]*)*").expect("name regex")
});

/// Sentence-leading words that look like names but never are.
const QUESTION_WORDS: &[&str] = &[
    "when", "where", "what", "which", "who", "whose", "why", "how", "is", "are", "was", "were",
    "do", "does", "did", "can", "could", "will", "would", "should", "tell", "give", "show", "list",
    "the", "a", "an", "please",
];

/// Outcome of resolving a question against the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameResolution {
    /// Exactly one member matched; surface form kept for echoing.
    Resolved { mentioned: String, member: Member },
    /// A mentioned name matched several members identically.
    Ambiguous { mentioned: String },
    /// A name was mentioned but matched nobody, or none was found.
    Unresolved { mentioned: Option<String> },
}

/// Candidate names in the question, longest first so "Vikram Desai"
/// is tried before "Vikram".
pub fn candidate_names(question: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for run in NAME_RUN.find_iter(question) {
        let tokens: Vec<String> = run
            .as_str()
            .split_whitespace()
            .map(clean_token)
            .filter(|t| !t.is_empty())
            .skip_while(|t| QUESTION_WORDS.contains(&normalize(t).as_str()))
            .collect();
        if tokens.is_empty() {
            continue;
        }
        // The full run plus each suffix-trimmed prefix, so a stray
        // trailing capital ("Does Ayesha Travel") still leaves "Ayesha".
        for end in (1..=tokens.len()).rev() {
            let candidate = tokens[..end].join(" ");
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
    }
    out.sort_by(|a, b| {
        b.split_whitespace()
            .count()
            .cmp(&a.split_whitespace().count())
    });
    out
}

/// Strip possessive suffixes (ASCII and unicode apostrophe) and
/// trailing punctuation from one token, preserving the surface form.
fn clean_token(token: &str) -> String {
    let trimmed = token.trim_end_matches(|c: char| c.is_ascii_punctuation() || c == '’');
    for suffix in ["'s", "’s", "'", "’"] {
        if let Some(stripped) = trimmed.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    trimmed.to_string()
}

/// Resolve the question's subject against the directory.
///
/// The first candidate with a unique match wins. If nothing matches but
/// some candidate was ambiguous, that is reported as ambiguity rather
/// than absence, so the caller can log the right reason.
pub fn resolve(question: &str, directory: &MemberDirectory) -> NameResolution {
    let candidates = candidate_names(question);
    let mut ambiguous: Option<String> = None;

    for candidate in &candidates {
        match directory.resolve_normalized(&normalize(candidate)) {
            Resolution::Match(member) => {
                return NameResolution::Resolved {
                    mentioned: candidate.clone(),
                    member: member.clone(),
                };
            }
            Resolution::Ambiguous => {
                ambiguous.get_or_insert_with(|| candidate.clone());
            }
            Resolution::NoMatch => {}
        }
    }

    if let Some(mentioned) = ambiguous {
        return NameResolution::Ambiguous { mentioned };
    }
    NameResolution::Unresolved {
        mentioned: candidates.into_iter().next(),
    }
}
