//! Member directory - the closed set of people questions may refer to.
//!
//! Built from the corpus itself: every distinct attribution name becomes
//! a member, with the leading name token registered as an alias so that
//! "Ayesha" finds "Ayesha Khan". Lookup is exact on a normalized form;
//! there is deliberately no fuzzy matching, and a normalized form shared
//! by more than one member never resolves.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::message::Message;

/// A known member: canonical name plus alternate surface forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Identity; the exact attribution string from the corpus.
    pub canonical_name: String,
    /// Alternate surface forms that should resolve to this member.
    pub aliases: BTreeSet<String>,
}

/// Outcome of a directory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Exactly one member carries this normalized form.
    Match(&'a Member),
    /// More than one member normalizes to this form; never guess.
    Ambiguous,
    /// Nobody in the directory carries this form.
    NoMatch,
}

/// Lookup table from normalized name forms to members.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    members: Vec<Member>,
    /// normalized form -> indices into `members` (plural = ambiguous)
    index: BTreeMap<String, Vec<usize>>,
}

impl MemberDirectory {
    /// Build the directory from a corpus snapshot.
    ///
    /// Members appear in first-seen corpus order. For multi-token names
    /// the leading token is added as an alias.
    pub fn from_messages(messages: &[Message]) -> Self {
        let mut dir = Self::default();
        let mut seen: BTreeSet<String> = BTreeSet::new();

        for msg in messages {
            let name = msg.member_name.trim();
            if name.is_empty() || !seen.insert(name.to_string()) {
                continue;
            }

            let mut aliases = BTreeSet::new();
            if let Some(first) = name.split_whitespace().next() {
                if first != name {
                    aliases.insert(first.to_string());
                }
            }

            let idx = dir.members.len();
            dir.members.push(Member {
                canonical_name: name.to_string(),
                aliases,
            });

            dir.insert_form(&normalize(name), idx);
            for alias in dir.members[idx].aliases.clone() {
                dir.insert_form(&normalize(&alias), idx);
            }
        }

        dir
    }

    fn insert_form(&mut self, form: &str, idx: usize) {
        if form.is_empty() {
            return;
        }
        let slot = self.index.entry(form.to_string()).or_default();
        if !slot.contains(&idx) {
            slot.push(idx);
        }
    }

    /// Look up an already-normalized name form.
    pub fn resolve_normalized(&self, form: &str) -> Resolution<'_> {
        match self.index.get(form) {
            Some(indices) if indices.len() == 1 => Resolution::Match(&self.members[indices[0]]),
            Some(_) => Resolution::Ambiguous,
            None => Resolution::NoMatch,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Normalize a name for directory matching.
///
/// Lowercases, folds common Latin diacritics (so "Müller" and "Muller"
/// meet in the middle), and collapses every non-alphabetic run to a
/// single space. The original surface form is never altered for output.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.chars().flat_map(|c| c.to_lowercase()) {
        let folded = fold_diacritic(c);
        if folded.is_ascii_alphabetic() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(folded);
        } else {
            pending_space = true;
        }
    }
    out
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è'..='ë' | 'ē' | 'ė' | 'ę' => 'e',
        'ì'..='ï' | 'ī' | 'į' => 'i',
        'ñ' | 'ń' => 'n',
        'ò'..='ö' | 'ø' | 'ō' => 'o',
        'š' | 'ś' => 's',
        'ù'..='ü' | 'ū' | 'ů' => 'u',
        'ý' | 'ÿ' => 'y',
        'ž' | 'ź' | 'ż' => 'z',
        'ß' => 's',
        _ => c,
    }
}
