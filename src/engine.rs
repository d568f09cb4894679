//! Engine façade (§4.11): the crate's sole public entry point. Owns the
//! immutable corpus, automatons, and pattern sets; drives every document
//! through the ten pipeline stages in sequence.
//!
//! Grounded in `scanner::core::DocumentScanner`, the teacher's top-level
//! facade that owns its cortex family and exposes one `scan` method; here
//! the facade owns the Corpus Store / Automaton Builder / Pattern Engine
//! instead and exposes `process_document`/`process_batch`.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::artifact::{Artifact, DocumentRequest};
use crate::automaton::AutomatonSet;
use crate::canonical;
use crate::config::EngineConfig;
use crate::corpus::CorpusStore;
use crate::dedup;
use crate::diagnostics::Diagnostics;
use crate::error::{ConfigError, DocumentError};
use crate::extractor;
use crate::facts;
use crate::patterns::PatternEngine;
use crate::person::PersonValidator;
use crate::range;
use crate::rewriter;
use crate::types::{EntityType, RawEntity};

/// A per-document deadline, checked cooperatively at the top of each
/// stage. `Instant`-based per §5.
struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    fn new(limit_ms: u64) -> Self {
        Deadline { started: Instant::now(), limit: Duration::from_millis(limit_ms) }
    }

    fn expired(&self) -> bool {
        self.started.elapsed() >= self.limit
    }
}

pub struct Engine {
    corpus: CorpusStore,
    automatons: AutomatonSet,
    patterns: PatternEngine,
    config: EngineConfig,
    pool: rayon::ThreadPool,
}

impl Engine {
    /// Builds the engine once: loads the corpus, compiles every automaton
    /// and pattern set, and sizes the document worker pool. Any failure
    /// here is fatal to startup (§7 `ConfigError`).
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let corpus = CorpusStore::load(&config.corpus_dir)?;
        let automatons = AutomatonSet::build(&corpus)?;
        let patterns = PatternEngine::build()?;
        if patterns.get(&config.pattern_set_name).is_none() {
            return Err(ConfigError::EmptyPatternSet(config.pattern_set_name.clone()));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .build()
            .map_err(|_| ConfigError::EmptyPatternSet("worker pool".to_string()))?;

        debug!(worker_count = config.worker_count, "engine constructed");
        Ok(Engine { corpus, automatons, patterns, config, pool })
    }

    /// Processes a batch of documents in parallel (document granularity),
    /// per §5.
    pub fn process_batch(&self, requests: &[DocumentRequest]) -> Vec<Artifact> {
        self.pool.install(|| {
            use rayon::prelude::*;
            requests.par_iter().map(|request| self.process_document(request.clone())).collect()
        })
    }

    /// Runs one document through every pipeline stage, never propagating
    /// an error across documents (§7): a stage failure is folded into
    /// that document's `diagnostics` and processing continues with
    /// whatever partial output has accumulated.
    pub fn process_document(&self, request: DocumentRequest) -> Artifact {
        let pattern_set_name = request.pattern_set.clone();
        let mut diagnostics = Diagnostics::new(pattern_set_name.clone());

        if request.text.len() > self.config.max_document_bytes {
            warn!(document_id = %request.document_id, "document exceeds max_document_bytes");
            let err = DocumentError::TooLarge { actual: request.text.len(), limit: self.config.max_document_bytes };
            diagnostics.record_rejection(err.to_string());
            return Artifact {
                document_id: request.document_id,
                rewritten_text: String::new(),
                entities: Vec::new(),
                facts: Vec::new(),
                diagnostics,
            };
        }

        let Some(pattern_set) = self.patterns.get(&pattern_set_name) else {
            let err = DocumentError::UnknownPatternSet(pattern_set_name.clone());
            warn!(document_id = %request.document_id, %err, "falling back to default pattern set");
            diagnostics.record_rejection(err.to_string());
            return self.run_pipeline(request, self.patterns.get("default").expect("default set always exists"), diagnostics);
        };

        self.run_pipeline(request, pattern_set, diagnostics)
    }

    fn run_pipeline(
        &self,
        request: DocumentRequest,
        pattern_set: &crate::patterns::PatternSet,
        mut diagnostics: Diagnostics,
    ) -> Artifact {
        let document = request.text.as_str();
        let deadline = Deadline::new(request.deadline_ms.unwrap_or(self.config.per_document_deadline_ms));

        if deadline.expired() {
            return self.truncated_artifact(request.document_id, Vec::new(), String::new(), diagnostics);
        }
        let candidates = extractor::extract(document, &self.automatons, &self.corpus, pattern_set);

        if deadline.expired() {
            return self.truncated_artifact(request.document_id, Vec::new(), String::new(), diagnostics);
        }
        let outcome = dedup::dedup(candidates);
        for (_, reason) in &outcome.rejected {
            diagnostics.record_rejection(format!("{reason:?}"));
        }

        if deadline.expired() {
            // Dedup already ran: its survivors are the best completed
            // output we have, canonicalized with no range fusion yet.
            let canonical_outcome = canonical::canonicalize(outcome.accepted, Vec::new());
            for entity in &canonical_outcome.entities {
                diagnostics.record_accepted(entity.entity_type);
            }
            return self.truncated_artifact(request.document_id, canonical_outcome.entities, String::new(), diagnostics);
        }
        let (person_candidates, non_person): (Vec<RawEntity>, Vec<RawEntity>) =
            outcome.accepted.into_iter().partition(|e| e.entity_type == EntityType::Person);
        let validator = PersonValidator::new(&self.corpus, self.config.person_min_confidence);
        let person_outcome = validator.validate_all(person_candidates, document, &[]);
        for (_, reason) in &person_outcome.rejected {
            diagnostics.record_rejection(format!("{reason:?}"));
        }

        let mut accepted = non_person;
        accepted.extend(person_outcome.accepted);
        accepted.sort_by_key(|e| e.span.start);

        if deadline.expired() {
            let canonical_outcome = canonical::canonicalize(accepted, Vec::new());
            for entity in &canonical_outcome.entities {
                diagnostics.record_accepted(entity.entity_type);
            }
            return self.truncated_artifact(request.document_id, canonical_outcome.entities, String::new(), diagnostics);
        }
        let (passthrough, linked_ranges) = range::link_ranges(accepted, document);

        if deadline.expired() {
            let canonical_outcome = canonical::canonicalize(passthrough, linked_ranges);
            for entity in &canonical_outcome.entities {
                diagnostics.record_accepted(entity.entity_type);
            }
            return self.truncated_artifact(request.document_id, canonical_outcome.entities, String::new(), diagnostics);
        }
        let canonical_outcome = canonical::canonicalize(passthrough, linked_ranges);
        for entity in &canonical_outcome.entities {
            diagnostics.record_accepted(entity.entity_type);
        }

        if deadline.expired() {
            // Rewriting and fact extraction haven't run; the canonical
            // entities already computed are still carried forward.
            return self.truncated_artifact(request.document_id, canonical_outcome.entities, String::new(), diagnostics);
        }
        let rewrite_outcome = rewriter::rewrite(document, &canonical_outcome.entities);
        for rejected in &rewrite_outcome.rejected {
            let _ = rejected;
            diagnostics.record_rejection("SurfaceContainsDelimiter");
        }

        let facts = facts::extract_facts(&canonical_outcome.entities, document);

        Artifact {
            document_id: request.document_id,
            rewritten_text: rewrite_outcome.rewritten_text,
            entities: canonical_outcome.entities,
            facts,
            diagnostics,
        }
    }

    fn truncated_artifact(
        &self,
        document_id: String,
        entities: Vec<crate::types::CanonicalEntity>,
        rewritten_text: String,
        mut diagnostics: Diagnostics,
    ) -> Artifact {
        diagnostics.truncated = true;
        Artifact { document_id, rewritten_text, entities, facts: Vec::new(), diagnostics }
    }
}
