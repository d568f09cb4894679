//! The §6 output artifact: `document_id`, `rewritten_text`, `entities`,
//! `facts`, `diagnostics` — the engine's sole JSON-serializable product.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::types::{CanonicalEntity, Fact};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub document_id: String,
    pub rewritten_text: String,
    pub entities: Vec<CanonicalEntity>,
    pub facts: Vec<Fact>,
    pub diagnostics: Diagnostics,
}

/// The per-document input (§6): `{ document_id, text, pattern_set, deadline_ms? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub document_id: String,
    pub text: String,
    #[serde(default = "default_pattern_set")]
    pub pattern_set: String,
    pub deadline_ms: Option<u64>,
}

fn default_pattern_set() -> String {
    "default".to_string()
}
