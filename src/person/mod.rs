//! Person Validator (§4.6): re-evaluates PERSON candidates with
//! conservative, accumulated evidence gating.
//!
//! No teacher file validates named-entity candidates against a
//! confidence threshold, so this stage is built fresh in the corpus's
//! idiom: a small scoring function over owned evidence signals, mirroring
//! how `scanner::relation::RelationCortex` accumulates a confidence score
//! across several independent checks before accepting a relation.

use crate::corpus::{CorpusClass, CorpusStore};
use crate::types::{EntitySource, EntityType, RawEntity, Span};

const HONORIFICS: &[&str] = &["dr.", "mr.", "ms.", "mrs.", "prof.", "director", "ceo", "senator", "president"];
const ROLE_VERBS: &[&str] = &["said", "reported", "announced", "founded", "stated", "added", "noted"];
const STOPWORD_BLACKLIST: &[&str] = &[
    "the", "market", "here", "real", "estate", "and", "with", "this", "that", "report", "today",
];

const HONORIFIC_WINDOW_BYTES: usize = 16;
const ROLE_VERB_WINDOW_BYTES: usize = 48;
const ADDRESS_CONTEXT_WINDOW_BYTES: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonRejectionReason {
    Blacklisted,
    SingleLowercaseToken,
    AddressOrUrlContext,
    BelowConfidenceThreshold,
}

pub struct PersonValidationOutcome {
    pub accepted: Vec<RawEntity>,
    pub rejected: Vec<(RawEntity, PersonRejectionReason)>,
}

pub struct PersonValidator<'a> {
    corpus: &'a CorpusStore,
    min_confidence: f64,
}

impl<'a> PersonValidator<'a> {
    pub fn new(corpus: &'a CorpusStore, min_confidence: f64) -> Self {
        PersonValidator { corpus, min_confidence }
    }

    /// Validates every PERSON candidate against `document`. `ml_candidates`
    /// is an optional supplemental source (§9 Open Question resolution):
    /// it is folded into the same evidence gate, never given a bypass.
    pub fn validate_all(
        &self,
        person_candidates: Vec<RawEntity>,
        document: &str,
        ml_candidates: &[RawEntity],
    ) -> PersonValidationOutcome {
        let mut pool = person_candidates;
        pool.extend(ml_candidates.iter().cloned());
        pool.sort_by_key(|e| e.span.start);

        let merged = merge_adjacent_name_tokens(&pool, document);

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for candidate in merged {
            match self.score(&candidate, document) {
                Ok(confidence) if confidence >= self.min_confidence => {
                    accepted.push(candidate);
                }
                Ok(_) => rejected.push((candidate, PersonRejectionReason::BelowConfidenceThreshold)),
                Err(reason) => rejected.push((candidate, reason)),
            }
        }

        PersonValidationOutcome { accepted, rejected }
    }

    /// Returns accumulated confidence, or an outright-rejection reason for
    /// signals that are disqualifying regardless of score (P7).
    fn score(&self, candidate: &RawEntity, document: &str) -> Result<f64, PersonRejectionReason> {
        let surface_lower = candidate.surface_text.to_ascii_lowercase();
        let is_multi_token = candidate.surface_text.contains(' ');

        if self.corpus.is_blacklisted("person", &surface_lower)
            || STOPWORD_BLACKLIST.contains(&surface_lower.as_str())
        {
            return Err(PersonRejectionReason::Blacklisted);
        }

        if in_address_or_url_context(candidate.span, document) {
            return Err(PersonRejectionReason::AddressOrUrlContext);
        }

        let starts_uppercase = candidate
            .surface_text
            .chars()
            .next()
            .map(|c| c.is_uppercase())
            .unwrap_or(false);

        if !is_multi_token && !starts_uppercase {
            return Err(PersonRejectionReason::SingleLowercaseToken);
        }

        let mut confidence = if starts_uppercase { 0.2 } else { 0.0 };

        if is_multi_token {
            let tokens: Vec<&str> = candidate.surface_text.split_whitespace().collect();
            if let [first, last] = tokens.as_slice() {
                let first_known = self.corpus.contains_lower(CorpusClass::FirstNames, &first.to_ascii_lowercase());
                let last_known = self.corpus.contains_lower(CorpusClass::LastNames, &last.to_ascii_lowercase());
                if first_known && last_known {
                    confidence += 0.6;
                }
            }
        }

        if has_preceding_honorific(candidate.span, document) {
            confidence += 0.3;
        }

        if has_following_role_verb(candidate.span, document) {
            confidence += 0.15;
        }

        if self.corpus.contains_lower(CorpusClass::Org, &surface_lower) {
            confidence -= 0.3;
        }

        Ok(confidence.clamp(0.0, 1.0))
    }
}

/// Folds adjacent single-token PERSON candidates (first-name automaton hit
/// immediately followed by a last-name automaton hit, separated only by a
/// single space) into one two-token candidate, so `"John Smith"` is
/// scored as a name phrase rather than two unrelated tokens (§4.6).
fn merge_adjacent_name_tokens(candidates: &[RawEntity], document: &str) -> Vec<RawEntity> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < candidates.len() {
        let current = &candidates[i];
        if current.entity_type != EntityType::Person {
            i += 1;
            continue;
        }
        if i + 1 < candidates.len() {
            let next = &candidates[i + 1];
            if next.entity_type == EntityType::Person
                && next.span.start > current.span.end
                && document.get(current.span.end..next.span.start) == Some(" ")
            {
                let span = Span::new(current.span.start, next.span.end);
                out.push(RawEntity {
                    surface_text: span.slice(document).to_string(),
                    span,
                    entity_type: EntityType::Person,
                    subtype: None,
                    source: EntitySource::Validator,
                });
                i += 2;
                continue;
            }
        }
        out.push(current.clone());
        i += 1;
    }
    out
}

fn has_preceding_honorific(span: Span, document: &str) -> bool {
    let window_start = span.start.saturating_sub(HONORIFIC_WINDOW_BYTES);
    let Some(prefix) = safe_slice(document, window_start, span.start) else {
        return false;
    };
    let prefix_lower = prefix.to_ascii_lowercase();
    HONORIFICS.iter().any(|h| prefix_lower.contains(h))
}

fn has_following_role_verb(span: Span, document: &str) -> bool {
    let window_end = (span.end + ROLE_VERB_WINDOW_BYTES).min(document.len());
    let Some(suffix) = safe_slice(document, span.end, window_end) else {
        return false;
    };
    let suffix_lower = suffix.to_ascii_lowercase();
    ROLE_VERBS.iter().any(|v| suffix_lower.contains(v))
}

fn in_address_or_url_context(span: Span, document: &str) -> bool {
    let window_start = span.start.saturating_sub(ADDRESS_CONTEXT_WINDOW_BYTES);
    let window_end = (span.end + ADDRESS_CONTEXT_WINDOW_BYTES).min(document.len());
    let Some(context) = safe_slice(document, window_start, window_end) else {
        return false;
    };
    context.contains("http://") || context.contains("https://") || context.contains("www.") || context.contains('@')
}

/// Slices `document[start..end]`, widening outward to the nearest char
/// boundary rather than panicking — these windows are heuristic context,
/// not entity spans, so approximate boundaries are acceptable.
fn safe_slice(document: &str, mut start: usize, mut end: usize) -> Option<&str> {
    while start < document.len() && !document.is_char_boundary(start) {
        start -= 1;
    }
    while end < document.len() && !document.is_char_boundary(end) {
        end += 1;
    }
    document.get(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntitySource;
    use std::io::Write;

    fn corpus_with(dir: &std::path::Path, name: &str, contents: &str) -> CorpusStore {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        CorpusStore::load(dir).unwrap()
    }

    fn person_token(start: usize, end: usize, surface: &str) -> RawEntity {
        RawEntity {
            span: Span::new(start, end),
            entity_type: EntityType::Person,
            subtype: None,
            surface_text: surface.to_string(),
            source: EntitySource::Automaton,
        }
    }

    #[test]
    fn honorific_and_name_corpus_match_pushes_past_threshold() {
        let tmp = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(tmp.path().join("first_names.txt")).unwrap();
        f.write_all(b"John\n").unwrap();
        let mut f2 = std::fs::File::create(tmp.path().join("last_names.txt")).unwrap();
        f2.write_all(b"Smith\n").unwrap();
        let corpus = CorpusStore::load(tmp.path()).unwrap();

        let text = "Dr. John Smith spoke today.";
        let john_start = text.find("John").unwrap();
        let smith_end = john_start + "John Smith".len();
        let candidates = vec![person_token(john_start, john_start + 4, "John")];
        // last name token appended so the merge step can find it
        let mut all = candidates;
        all.push(person_token(john_start + 5, smith_end, "Smith"));

        let validator = PersonValidator::new(&corpus, 0.7);
        let outcome = validator.validate_all(all, text, &[]);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].surface_text, "John Smith");
    }

    #[test]
    fn single_lowercase_token_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let corpus = corpus_with(&tmp.path(), "first_names.txt", "john\n");
        let text = "the market report mentions john briefly";
        let start = text.find("john").unwrap();
        let candidate = person_token(start, start + 4, "john");

        let validator = PersonValidator::new(&corpus, 0.7);
        let outcome = validator.validate_all(vec![candidate], text, &[]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected[0].1, PersonRejectionReason::SingleLowercaseToken);
    }

    #[test]
    fn blacklisted_token_is_rejected_outright() {
        let tmp = tempfile::tempdir().unwrap();
        let corpus = corpus_with(&tmp.path(), "blacklist.person.txt", "market\n");
        let text = "Market reported gains.";
        let candidate = person_token(0, 6, "Market");

        let validator = PersonValidator::new(&corpus, 0.0);
        let outcome = validator.validate_all(vec![candidate], text, &[]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected[0].1, PersonRejectionReason::Blacklisted);
    }
}
