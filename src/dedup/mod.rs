//! Deduplicator / Overlap Resolver (§4.5): sort-then-sweep reduction of
//! raw candidates to a non-overlapping accepted set.
//!
//! Grounded in `scanner::document::DocumentCortex`'s mention-merging pass,
//! which already performs a longest-span-wins sweep over mixed-source
//! mentions; this module generalizes that sweep to the full typed
//! candidate set and records why a candidate was rejected for diagnostics.

use crate::types::RawEntity;

/// Why a candidate did not make it into the accepted set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Its span intersects an already-accepted span.
    OverlapsAccepted,
}

pub struct DedupOutcome {
    pub accepted: Vec<RawEntity>,
    pub rejected: Vec<(RawEntity, RejectionReason)>,
}

/// Reduces `candidates` to a non-overlapping accepted set.
///
/// Sort key: `(-(end-start), start, type_tiebreak)` — longest span first,
/// then earliest start, then a fixed type order — so that ties resolve
/// deterministically (P6) and the longer of two overlapping candidates
/// always wins (preventing `"37 inches"` from out-competing the tight
/// range `"30-37 inches"` whose upper operand has the identical span —
/// equal length ties fall back to `start`, then `entity_type`, both equal
/// here too, so whichever the stable sort saw first survives, and the two
/// candidates are interchangeable for downstream purposes regardless).
pub fn dedup(mut candidates: Vec<RawEntity>) -> DedupOutcome {
    candidates.sort_by(|a, b| {
        b.span
            .len()
            .cmp(&a.span.len())
            .then(a.span.start.cmp(&b.span.start))
            .then(a.entity_type.tiebreak_rank().cmp(&b.entity_type.tiebreak_rank()))
    });

    let mut accepted: Vec<RawEntity> = Vec::new();
    let mut rejected = Vec::new();

    for candidate in candidates {
        let overlaps = accepted.iter().any(|a| a.span.overlaps(&candidate.span));
        if overlaps {
            rejected.push((candidate, RejectionReason::OverlapsAccepted));
        } else {
            accepted.push(candidate);
        }
    }

    accepted.sort_by(|a, b| a.span.start.cmp(&b.span.start));

    DedupOutcome { accepted, rejected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntitySource, EntityType, Span};

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
    fn longest_span_wins_over_overlapping_shorter_candidate() {
        let candidates = vec![
            entity(4, 16, EntityType::Measurement, "30-37 inches"),
            entity(7, 16, EntityType::Measurement, "37 inches"),
        ];
        let outcome = dedup(candidates);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].surface_text, "30-37 inches");
        assert_eq!(outcome.rejected.len(), 1);
    }

    #[test]
    fn non_overlapping_candidates_both_accepted() {
        let candidates = vec![
            entity(0, 4, EntityType::Org, "Acme"),
            entity(10, 20, EntityType::Money, "$50 million"),
        ];
        let outcome = dedup(candidates);
        assert_eq!(outcome.accepted.len(), 2);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn accepted_set_is_sorted_by_start() {
        let candidates = vec![
            entity(10, 20, EntityType::Money, "$50 million"),
            entity(0, 4, EntityType::Org, "Acme"),
        ];
        let outcome = dedup(candidates);
        assert_eq!(outcome.accepted[0].span.start, 0);
        assert_eq!(outcome.accepted[1].span.start, 10);
    }
}
