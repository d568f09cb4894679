//! Per-document diagnostics (§6): always populated, even for a
//! zero-entity or truncated document.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::EntityType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub truncated: bool,
    pub pattern_set_used: String,
    pub counts_by_type: HashMap<String, usize>,
    pub rejected_counts: HashMap<String, usize>,
}

impl Diagnostics {
    pub fn new(pattern_set_used: impl Into<String>) -> Self {
        Diagnostics {
            truncated: false,
            pattern_set_used: pattern_set_used.into(),
            counts_by_type: HashMap::new(),
            rejected_counts: HashMap::new(),
        }
    }

    pub fn record_accepted(&mut self, entity_type: EntityType) {
        *self.counts_by_type.entry(entity_type.id_abbrev().to_string()).or_insert(0) += 1;
    }

    pub fn record_rejection(&mut self, reason: impl Into<String>) {
        *self.rejected_counts.entry(reason.into()).or_insert(0) += 1;
    }
}
