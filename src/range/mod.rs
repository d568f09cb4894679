//! Range Linker (§4.7): fuses two adjacent, compatible-typed entities
//! separated only by whitespace and a single RANGE_INDICATOR into one
//! RangeEntity.
//!
//! Grounded in `scanner::relation::RelationCortex`'s adjacency-fusion
//! pass, which walks an ordered mention list and merges a fixed-distance
//! run into one relation record; here the run length is always exactly
//! three (lower, indicator, upper) and the fusion rule is type/subtype
//! equality rather than a relation verb.

use crate::types::{EntityType, RangeDetails, RawEntity, Span};

/// A `RawEntity` that is the fused result of linking two operands; carries
/// the range metadata alongside the entity so the Canonicalizer (§4.8)
/// can attach it to the resulting `CanonicalEntity`.
pub struct LinkedRange {
    pub entity: RawEntity,
    pub details: RangeDetails,
}

/// Walks `accepted` (already non-overlapping, sorted by `span.start`) and
/// fuses every lower/indicator/upper run it finds. Entities not part of a
/// fused range pass through unchanged; RANGE_INDICATOR entities that were
/// NOT consumed by a fusion are dropped, since a standalone range
/// indicator with no numeric neighbors on both sides carries no meaning
/// as an accepted entity type on its own.
pub fn link_ranges(accepted: Vec<RawEntity>, document: &str) -> (Vec<RawEntity>, Vec<LinkedRange>) {
    let mut passthrough = Vec::new();
    let mut linked = Vec::new();

    let mut i = 0;
    while i < accepted.len() {
        if i + 2 < accepted.len()
            && is_linkable_run(&accepted[i], &accepted[i + 1], &accepted[i + 2], document)
        {
            let lower = &accepted[i];
            let indicator = &accepted[i + 1];
            let upper = &accepted[i + 2];

            let span = Span::new(lower.span.start, upper.span.end);
            let is_bare_lower = lower.surface_text.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
            let unit_family = upper.subtype.clone().or_else(|| lower.subtype.clone());
            let inherited_unit = if is_bare_lower { Some(unit_suffix(&upper.surface_text)) } else { None };

            let fused = RawEntity {
                surface_text: span.slice(document).to_string(),
                span,
                entity_type: upper.entity_type,
                subtype: upper.subtype.clone(),
                source: crate::types::EntitySource::Validator,
            };
            let details = RangeDetails {
                lower_surface: lower.surface_text.clone(),
                upper_surface: upper.surface_text.clone(),
                indicator_surface: indicator.surface_text.clone(),
                unit_family,
                inherited_unit,
            };
            linked.push(LinkedRange { entity: fused, details });
            i += 3;
        } else if accepted[i].entity_type == EntityType::RangeIndicator {
            // Unconsumed indicator: drop, not part of the accepted output.
            i += 1;
        } else {
            passthrough.push(accepted[i].clone());
            i += 1;
        }
    }

    (passthrough, linked)
}

fn is_linkable_run(lower: &RawEntity, indicator: &RawEntity, upper: &RawEntity, document: &str) -> bool {
    if indicator.entity_type != EntityType::RangeIndicator {
        return false;
    }
    if lower.entity_type != upper.entity_type || lower.subtype != upper.subtype {
        return false;
    }
    // The only content between the operands and the indicator must be
    // whitespace (or nothing, for the tight numeric idiom where the
    // indicator is a bare "-"/"–" with no surrounding space at all).
    is_whitespace_only_gap(document, lower.span.end, indicator.span.start)
        && is_whitespace_only_gap(document, indicator.span.end, upper.span.start)
}

fn is_whitespace_only_gap(document: &str, start: usize, end: usize) -> bool {
    start <= end && document.get(start..end).map(|s| s.chars().all(char::is_whitespace)).unwrap_or(false)
}

/// The unit portion of a matched measurement/percent surface, i.e.
/// everything after the leading numeral — used only to record the
/// inherited-unit metadata, never to rewrite a surface (P4).
fn unit_suffix(upper_surface: &str) -> String {
    upper_surface
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == '-')
        .trim_start()
        .to_string()
}
