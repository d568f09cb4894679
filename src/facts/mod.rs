//! Fact Extractor (§4.10): applies a small set of rule templates over the
//! canonicalized entity stream to produce subject-predicate-object
//! triples.
//!
//! Grounded in `scanner::triple::TripleCortex`'s subject/predicate/object
//! state machine (`seen_subject → seen_predicate_cue → seen_object →
//! emit`), generalized here from a single relation family to the four
//! closed templates §4.10 specifies.

use crate::types::{CanonicalEntity, EntityType, Fact, FactObject, Predicate, Span};

const MAX_CONTEXT_WINDOW_BYTES: usize = 240;
const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?'];

const EMPLOY_CUES: &[&str] = &["ceo of", "founder of", "director of", "president of", "employed by", "works at"];
const AFFILIATION_CUES: &[&str] = &["of", "at", "with"];
const APPLIES_TO_CUES: &[&str] = &["wide", "long", "tall", "deep", "high"];
const EVENT_CUES: &[&str] = &["on", "announced", "scheduled", "dated"];

struct MentionRef<'a> {
    entity: &'a CanonicalEntity,
    start: usize,
    end: usize,
}

/// Extracts facts from `entities`, using `document` only to read the
/// small cue windows between mentions (the entities themselves carry
/// their own spans).
pub fn extract_facts(entities: &[CanonicalEntity], document: &str) -> Vec<Fact> {
    let mut refs: Vec<MentionRef> = entities
        .iter()
        .flat_map(|e| e.mentions.iter().map(move |m| MentionRef { entity: e, start: m.start, end: m.end }))
        .collect();
    refs.sort_by_key(|r| r.start);

    let mut facts = Vec::new();

    for i in 0..refs.len() {
        let subject = &refs[i];
        for j in (i + 1)..refs.len() {
            let object = &refs[j];
            if object.start.saturating_sub(subject.end) > MAX_CONTEXT_WINDOW_BYTES {
                break;
            }
            let Some(between) = document.get(subject.end..object.start) else { continue };
            if contains_sentence_terminator(between) {
                break;
            }
            let between_lower = between.to_ascii_lowercase();

            if let Some(fact) = try_employs(subject, object, &between_lower, document) {
                facts.push(fact);
            }
            if let Some(fact) = try_affiliated_with(subject, object, &between_lower, document) {
                facts.push(fact);
            }
            if let Some(fact) = try_applies_to(subject, object, &between_lower, document) {
                facts.push(fact);
            }
            if let Some(fact) = try_marks_event(subject, object, &between_lower, document) {
                facts.push(fact);
            }
        }
    }

    facts
}

fn contains_sentence_terminator(between: &str) -> bool {
    between.chars().any(|c| SENTENCE_TERMINATORS.contains(&c))
}

fn context_span(subject: &MentionRef, object: &MentionRef) -> Span {
    Span::new(subject.start, object.end)
}

fn try_employs(subject: &MentionRef, object: &MentionRef, between_lower: &str, document: &str) -> Option<Fact> {
    if subject.entity.entity_type != EntityType::Org || object.entity.entity_type != EntityType::Person {
        return None;
    }
    if !EMPLOY_CUES.iter().any(|cue| between_lower.contains(cue)) {
        return None;
    }
    let _ = document;
    Some(Fact {
        subject_id: subject.entity.id.clone(),
        predicate: Predicate::Employs,
        object: FactObject::EntityId(object.entity.id.clone()),
        context: context_span(subject, object),
        confidence: 0.75,
    })
}

fn try_affiliated_with(subject: &MentionRef, object: &MentionRef, between_lower: &str, _document: &str) -> Option<Fact> {
    if subject.entity.entity_type != EntityType::Person || object.entity.entity_type != EntityType::Org {
        return None;
    }
    if !AFFILIATION_CUES.iter().any(|cue| between_lower.contains(&format!(" {cue} ")) || between_lower.contains(&format!("{cue} "))) {
        return None;
    }
    Some(Fact {
        subject_id: subject.entity.id.clone(),
        predicate: Predicate::AffiliatedWith,
        object: FactObject::EntityId(object.entity.id.clone()),
        context: context_span(subject, object),
        confidence: 0.7,
    })
}

fn try_applies_to(subject: &MentionRef, object: &MentionRef, between_lower: &str, document: &str) -> Option<Fact> {
    if subject.entity.entity_type != EntityType::Measurement {
        return None;
    }
    let trimmed = between_lower.trim();
    let cue_matches = trimmed.is_empty() || APPLIES_TO_CUES.iter().any(|cue| trimmed.contains(cue));
    if !cue_matches {
        return None;
    }
    let object_surface = document.get(object.start..object.end)?;
    Some(Fact {
        subject_id: subject.entity.id.clone(),
        predicate: Predicate::AppliesTo,
        object: FactObject::Literal(object_surface.to_string()),
        context: context_span(subject, object),
        // No corpus-anchored noun phrase detection; object is a raw
        // literal slice, so confidence is reduced per §4.10's "ambiguous
        // antecedent" guidance.
        confidence: 0.5,
    })
}

fn try_marks_event(subject: &MentionRef, object: &MentionRef, between_lower: &str, _document: &str) -> Option<Fact> {
    if subject.entity.entity_type != EntityType::Date {
        return None;
    }
    if !EVENT_CUES.iter().any(|cue| between_lower.contains(cue)) {
        return None;
    }
    Some(Fact {
        subject_id: subject.entity.id.clone(),
        predicate: Predicate::MarksEvent,
        object: FactObject::EntityId(object.entity.id.clone()),
        context: context_span(subject, object),
        confidence: 0.6,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mention;

    fn canonical(id: &str, entity_type: EntityType, start: usize, end: usize, surface: &str) -> CanonicalEntity {
        CanonicalEntity {
            id: id.to_string(),
            entity_type,
            subtype: None,
            canonical_surface: surface.to_string(),
            normalized_form: None,
            mentions: vec![Mention { start, end, surface: surface.to_string() }],
        }
    }

    #[test]
    fn person_affiliated_with_org_is_emitted() {
        let document = "John Smith, CEO of Acme Inc., spoke today.";
        let person = canonical("person001", EntityType::Person, 0, 10, "John Smith");
        let org = canonical("org001", EntityType::Org, 19, 28, "Acme Inc");
        let facts = extract_facts(&[person, org], document);
        assert!(facts.iter().any(|f| f.predicate == Predicate::AffiliatedWith));
    }

    #[test]
    fn org_employs_person_is_emitted_for_ceo_of_cue() {
        let document = "Acme Inc, CEO of the division, John Smith announced growth.";
        let org = canonical("org001", EntityType::Org, 0, 8, "Acme Inc");
        let person = canonical("person001", EntityType::Person, 32, 42, "John Smith");
        let facts = extract_facts(&[org, person], document);
        assert!(facts.iter().any(|f| f.predicate == Predicate::Employs));
    }

    #[test]
    fn no_fact_across_sentence_boundary() {
        let document = "Acme Inc. John Smith works elsewhere.";
        let org = canonical("org001", EntityType::Org, 0, 8, "Acme Inc");
        let person = canonical("person001", EntityType::Person, 10, 20, "John Smith");
        let facts = extract_facts(&[org, person], document);
        assert!(facts.is_empty());
    }
}
