//! Extractor (§4.4): runs the Automaton Builder and Pattern Engine over a
//! single document and collects every raw candidate.
//!
//! Grounded in `scanner::document::DocumentCortex`, which already fans a
//! document out across its cortex family and merges the results; here the
//! fan-out is a single `rayon::join` between the two independent
//! candidate sources, matching §4.4's "automaton scanning and pattern
//! scanning run concurrently" requirement without a full task-graph
//! abstraction the spec doesn't ask for.

use crate::automaton::AutomatonSet;
use crate::corpus::{CorpusClass, CorpusStore};
use crate::patterns::PatternSet;
use crate::types::{EntitySource, EntityType, RawEntity, Span};

/// Scans a document with every automaton class and the given pattern set,
/// returning candidates ordered by `(span.start, -span.length, entity_type)`.
pub fn extract(text: &str, automatons: &AutomatonSet, corpus: &CorpusStore, patterns: &PatternSet) -> Vec<RawEntity> {
    // ASCII-only fold: matches §4.2's "ASCII-lowercase fold" and the
    // byte-level-ASCII-aware scanning scope (§2 Non-goals). `to_lowercase()`
    // performs full Unicode case folding, which is not length-preserving
    // (e.g. U+0130 'İ' -> "i̇"), so it would desynchronize the offsets the
    // automaton reports against `text`'s own byte layout.
    let lower = text.to_ascii_lowercase();

    let (automaton_hits, pattern_hits) =
        rayon::join(|| scan_automatons(text, &lower, automatons, corpus), || patterns.scan(text));

    let mut all = automaton_hits;
    all.extend(pattern_hits);
    all.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(b.span.len().cmp(&a.span.len()))
            .then(a.entity_type.tiebreak_rank().cmp(&b.entity_type.tiebreak_rank()))
    });
    all
}

fn scan_automatons(text: &str, lower: &str, automatons: &AutomatonSet, corpus: &CorpusStore) -> Vec<RawEntity> {
    let mut out = Vec::new();
    for (class, class_stem, entity_type, automaton) in [
        (CorpusClass::Org, "org", EntityType::Org, &automatons.org),
        (CorpusClass::Gpe, "gpe", EntityType::Gpe, &automatons.gpe),
        (CorpusClass::Loc, "loc", EntityType::Loc, &automatons.loc),
    ] {
        let _ = class;
        if let Some(automaton) = automaton {
            for (start, end, meta, surface) in automaton.find_in(text, lower) {
                // §4.1: a blacklisted term must never be matched as this
                // class, regardless of corpus membership (e.g. "market" as
                // an ORG, pruning common-word collisions).
                if corpus.is_blacklisted(class_stem, &surface) {
                    continue;
                }
                out.push(RawEntity {
                    span: Span::new(start, end),
                    entity_type,
                    subtype: meta.subcategory.clone(),
                    surface_text: surface,
                    source: EntitySource::Automaton,
                });
            }
        }
    }

    // First/last-name hits are PERSON candidates, not independent entity
    // classes; they feed the Person Validator (§4.6) rather than being
    // accepted outright here.
    for automaton in [&automatons.first_names, &automatons.last_names] {
        if let Some(automaton) = automaton {
            for (start, end, _meta, surface) in automaton.find_in(text, lower) {
                out.push(RawEntity {
                    span: Span::new(start, end),
                    entity_type: EntityType::Person,
                    subtype: None,
                    surface_text: surface,
                    source: EntitySource::Automaton,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusStore;
    use crate::patterns::PatternEngine;
    use std::io::Write;

    fn corpus_with(dir: &std::path::Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn merges_automaton_and_pattern_candidates_sorted_by_span() {
        let tmp = tempfile::tempdir().unwrap();
        corpus_with(tmp.path(), "org.txt", "Acme Inc\n");
        let corpus = CorpusStore::load(tmp.path()).unwrap();
        let automatons = AutomatonSet::build(&corpus).unwrap();
        let engine = PatternEngine::build().unwrap();
        let set = engine.get("default").unwrap();

        let text = "Acme Inc announced a $50 million round.";
        let hits = extract(text, &automatons, &corpus, set);

        assert!(hits.iter().any(|e| e.entity_type == EntityType::Org));
        assert!(hits.iter().any(|e| e.entity_type == EntityType::Money));
        for pair in hits.windows(2) {
            assert!(pair[0].span.start <= pair[1].span.start);
        }
    }
}
