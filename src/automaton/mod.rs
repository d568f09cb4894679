//! Automaton Builder (§4.2): one Aho-Corasick automaton per entity class,
//! built once from the Corpus Store and shared read-only across documents.
//!
//! Grounded in `scanner::implicit::ImplicitCortex`: lowercase patterns
//! compiled with `MatchKind::LeftmostLongest`, matched against a
//! lowercased copy of the input so offsets remain byte-accurate into the
//! original (case-insensitive-by-construction, per §4.2).

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

use crate::corpus::{CorpusClass, CorpusStore};
use crate::error::ConfigError;

/// Per-pattern metadata carried alongside each automaton, keyed by
/// `aho_corasick`'s pattern ID.
#[derive(Debug, Clone)]
pub struct PatternMeta {
    pub canonical_surface: String,
    pub subcategory: Option<String>,
}

/// A single compiled dictionary matcher plus its pattern metadata table.
pub struct ClassAutomaton {
    automaton: AhoCorasick,
    meta: Vec<PatternMeta>,
}

impl ClassAutomaton {
    fn build(terms: &[crate::corpus::Term]) -> Option<Self> {
        if terms.is_empty() {
            return None;
        }
        let patterns: Vec<&str> = terms.iter().map(|t| t.lower.as_str()).collect();
        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .ascii_case_insensitive(false) // input is pre-lowercased; patterns already lowercase
            .build(&patterns)
            .expect("corpus patterns are plain literals and always compile");
        let meta = terms
            .iter()
            .map(|t| PatternMeta {
                canonical_surface: t.surface.clone(),
                subcategory: t.subcategory.clone(),
            })
            .collect();
        Some(ClassAutomaton { automaton, meta })
    }

    /// Finds every occurrence in `text`, returning byte spans into the
    /// *original* (non-lowercased) text alongside the matched pattern's
    /// metadata. `lower_text` MUST be the ASCII-lowercase fold of `text`
    /// produced by the caller once per document.
    pub fn find_in<'a>(
        &'a self,
        text: &str,
        lower_text: &str,
    ) -> impl Iterator<Item = (usize, usize, &'a PatternMeta, String)> + 'a {
        let text = text.to_string();
        self.automaton.find_iter(lower_text).map(move |m| {
            let meta = &self.meta[m.pattern().as_usize()];
            let surface = text[m.start()..m.end()].to_string();
            (m.start(), m.end(), meta, surface)
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.meta.len()
    }
}

/// The full set of compiled automatons, one per corpus-backed entity
/// class. Immutable after construction; shared via `Arc` by the [`crate::engine::Engine`].
pub struct AutomatonSet {
    pub org: Option<ClassAutomaton>,
    pub gpe: Option<ClassAutomaton>,
    pub loc: Option<ClassAutomaton>,
    pub first_names: Option<ClassAutomaton>,
    pub last_names: Option<ClassAutomaton>,
}

impl AutomatonSet {
    pub fn build(corpus: &CorpusStore) -> Result<Self, ConfigError> {
        Ok(AutomatonSet {
            org: ClassAutomaton::build(corpus.terms(CorpusClass::Org)),
            gpe: ClassAutomaton::build(corpus.terms(CorpusClass::Gpe)),
            loc: ClassAutomaton::build(corpus.terms(CorpusClass::Loc)),
            first_names: ClassAutomaton::build(corpus.terms(CorpusClass::FirstNames)),
            last_names: ClassAutomaton::build(corpus.terms(CorpusClass::LastNames)),
        })
    }
}
