//! Canonicalizer (§4.8): groups mention-equivalent entities into
//! `CanonicalEntity` records and assigns stable, dense, per-type IDs in
//! document order.
//!
//! Grounded in `scanner::implicit::ImplicitCortex`'s mention-grouping
//! step (multiple automaton hits of the same canonical surface folded
//! into one record); generalized here across all entity types with the
//! per-type equivalence rules §4.8 specifies.

use std::collections::HashMap;

use crate::range::LinkedRange;
use crate::types::{CanonicalEntity, EntityType, Mention, RangeDetails, RawEntity};

pub struct CanonicalizationOutcome {
    pub entities: Vec<CanonicalEntity>,
    /// Range metadata keyed by the owning `CanonicalEntity`'s id; absent
    /// for ordinary (non-range) entities.
    pub range_details: HashMap<String, RangeDetails>,
}

/// Strips honorifics and surrounding whitespace for PERSON equivalence
/// (§4.8: case-insensitive full-name equality after honorific stripping).
fn person_equivalence_key(surface: &str) -> String {
    const HONORIFIC_PREFIXES: &[&str] = &["dr.", "mr.", "ms.", "mrs.", "prof."];
    let mut s = surface.trim();
    for prefix in HONORIFIC_PREFIXES {
        if s.to_ascii_lowercase().starts_with(prefix) {
            s = s[prefix.len()..].trim_start();
            break;
        }
    }
    s.to_ascii_lowercase()
}

/// Case-insensitive, punctuation-trimmed equality for ORG/GPE/LOC.
fn trimmed_lower_key(surface: &str) -> String {
    surface.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace()).to_ascii_lowercase()
}

/// Whitespace-normalized equality for the remaining numeric/structured
/// types (§4.8).
fn whitespace_normalized_key(surface: &str) -> String {
    surface.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_lowercase()
}

fn equivalence_key(entity_type: EntityType, surface: &str) -> String {
    match entity_type {
        EntityType::Person => person_equivalence_key(surface),
        EntityType::Org | EntityType::Gpe | EntityType::Loc => trimmed_lower_key(surface),
        _ => whitespace_normalized_key(surface),
    }
}

/// `RawEntity` plus the range metadata it carries, if it came from the
/// Range Linker.
struct Grouped {
    entity: RawEntity,
    range_details: Option<RangeDetails>,
}

pub fn canonicalize(
    mut passthrough: Vec<RawEntity>,
    linked_ranges: Vec<LinkedRange>,
) -> CanonicalizationOutcome {
    let mut all: Vec<Grouped> = Vec::with_capacity(passthrough.len() + linked_ranges.len());
    all.extend(passthrough.drain(..).map(|entity| Grouped { entity, range_details: None }));
    all.extend(linked_ranges.into_iter().map(|lr| Grouped {
        entity: lr.entity,
        range_details: Some(lr.details),
    }));
    all.sort_by_key(|g| g.entity.span.start);

    let mut next_seq: HashMap<EntityType, usize> = HashMap::new();
    // Keyed by (type, equivalence_key), in order of first appearance.
    let mut groups: HashMap<(EntityType, String), usize> = HashMap::new();
    let mut entities: Vec<CanonicalEntity> = Vec::new();
    let mut range_details = HashMap::new();

    for grouped in all {
        let entity = &grouped.entity;
        let key = (entity.entity_type, equivalence_key(entity.entity_type, &entity.surface_text));

        let index = *groups.entry(key).or_insert_with(|| {
            let seq = next_seq.entry(entity.entity_type).or_insert(0);
            *seq += 1;
            let id = format!("{}{:03}", entity.entity_type.id_abbrev(), seq);
            entities.push(CanonicalEntity {
                id,
                entity_type: entity.entity_type,
                subtype: entity.subtype.clone(),
                canonical_surface: entity.surface_text.clone(),
                normalized_form: normalized_form(entity),
                mentions: Vec::new(),
            });
            entities.len() - 1
        });

        entities[index].mentions.push(Mention::from(entity));

        if let Some(details) = grouped.range_details {
            range_details.insert(entities[index].id.clone(), details);
        }
    }

    CanonicalizationOutcome { entities, range_details }
}

/// The display form for a canonical entity. MEASUREMENT always mirrors
/// the original substring verbatim (P4, unit-preservation invariant);
/// PERSON uses the fullest observed surface; everything else defaults to
/// the first-seen surface (already `canonical_surface`), so no separate
/// normalized form is recorded.
fn normalized_form(entity: &RawEntity) -> Option<String> {
    match entity.entity_type {
        EntityType::Measurement => Some(entity.surface_text.clone()),
        EntityType::Person => Some(entity.surface_text.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntitySource, Span};

    fn entity(start: usize, end: usize, entity_type: EntityType, surface: &str) -> RawEntity {
        RawEntity {
            span: Span::new(start, end),
            entity_type,
            subtype: None,
            surface_text: surface.to_string(),
            source: EntitySource::Pattern,
        }
    }

    #[test]
    fn ids_are_dense_and_assigned_in_document_order() {
        let passthrough = vec![
            entity(0, 4, EntityType::Org, "Acme"),
            entity(10, 14, EntityType::Org, "Beta"),
        ];
        let outcome = canonicalize(passthrough, vec![]);
        assert_eq!(outcome.entities[0].id, "org001");
        assert_eq!(outcome.entities[1].id, "org002");
    }

    #[test]
    fn repeated_surface_folds_into_one_canonical_entity_with_two_mentions() {
        let passthrough = vec![
            entity(0, 4, EntityType::Org, "Acme"),
            entity(20, 24, EntityType::Org, "ACME"),
        ];
        let outcome = canonicalize(passthrough, vec![]);
        assert_eq!(outcome.entities.len(), 1);
        assert_eq!(outcome.entities[0].mentions.len(), 2);
    }

    #[test]
    fn honorific_is_stripped_for_person_equivalence() {
        let passthrough = vec![
            entity(0, 14, EntityType::Person, "Dr. John Smith"),
            entity(30, 40, EntityType::Person, "John Smith"),
        ];
        let outcome = canonicalize(passthrough, vec![]);
        assert_eq!(outcome.entities.len(), 1);
        assert_eq!(outcome.entities[0].mentions.len(), 2);
    }

    #[test]
    fn measurement_normalized_form_is_original_surface() {
        let passthrough = vec![entity(0, 9, EntityType::Measurement, "37 inches")];
        let outcome = canonicalize(passthrough, vec![]);
        assert_eq!(outcome.entities[0].normalized_form.as_deref(), Some("37 inches"));
    }
}
