//! Pattern Engine (§4.3): compiles and runs named sets of regular
//! expressions for typed entities.
//!
//! Grounded in `scanner::syntax::SyntaxCortex` and `scanner::temporal::TemporalCortex`,
//! which both compile every `Regex` once (in a constructor / `build()`
//! step) and never on a hot path. The `regex` crate is guaranteed
//! linear-time, satisfying §4.3's no-backtracking requirement without any
//! extra care in the patterns themselves.

mod families;

use regex::Regex;

use crate::error::ConfigError;
use crate::types::{EntitySource, EntityType, RawEntity, Span};

/// How a compiled pattern's match translates into one or more
/// [`RawEntity`] candidates.
enum PatternKind {
    /// The whole entity is capture group `group` of the match.
    Simple { group: usize, entity_type: EntityType, subtype: Option<&'static str> },
    /// A "tight" numeric range idiom (`"30-37 inches"`, `"10-15%"`) where
    /// the lower operand carries no explicit unit. One regex match is
    /// split into three [`RawEntity`] candidates — lower operand, range
    /// indicator, upper operand — so that the ordinary Range Linker
    /// (§4.7) can fuse them exactly as it would two independently-typed
    /// operands, recording the inherited unit as metadata (§4.7).
    TightRange {
        lower_group: usize,
        indicator_group: usize,
        upper_group: usize,
        entity_type: EntityType,
        subtype: Option<&'static str>,
    },
}

struct CompiledPattern {
    name: &'static str,
    regex: Regex,
    kind: PatternKind,
}

/// A named, closed collection of typed regex patterns applied together.
pub struct PatternSet {
    name: String,
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Runs every pattern in the set over `text`, producing raw
    /// candidates. Patterns do not interact with each other here; overlap
    /// resolution is the Deduplicator's job (§4.5).
    pub fn scan(&self, text: &str) -> Vec<RawEntity> {
        let mut out = Vec::new();
        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(text) {
                match &pattern.kind {
                    PatternKind::Simple { group, entity_type, subtype } => {
                        if let Some(m) = caps.get(*group) {
                            out.push(RawEntity {
                                span: Span::new(m.start(), m.end()),
                                entity_type: *entity_type,
                                subtype: subtype.map(|s| s.to_string()),
                                surface_text: m.as_str().to_string(),
                                source: EntitySource::Pattern,
                            });
                        }
                    }
                    PatternKind::TightRange {
                        lower_group,
                        indicator_group,
                        upper_group,
                        entity_type,
                        subtype,
                    } => {
                        let (Some(lower), Some(indicator), Some(upper)) = (
                            caps.get(*lower_group),
                            caps.get(*indicator_group),
                            caps.get(*upper_group),
                        ) else {
                            continue;
                        };
                        out.push(RawEntity {
                            span: Span::new(lower.start(), lower.end()),
                            entity_type: *entity_type,
                            subtype: subtype.map(|s| s.to_string()),
                            surface_text: lower.as_str().to_string(),
                            source: EntitySource::Pattern,
                        });
                        out.push(RawEntity {
                            span: Span::new(indicator.start(), indicator.end()),
                            entity_type: EntityType::RangeIndicator,
                            subtype: None,
                            surface_text: indicator.as_str().to_string(),
                            source: EntitySource::Pattern,
                        });
                        out.push(RawEntity {
                            span: Span::new(upper.start(), upper.end()),
                            entity_type: *entity_type,
                            subtype: subtype.map(|s| s.to_string()),
                            surface_text: upper.as_str().to_string(),
                            source: EntitySource::Pattern,
                        });
                    }
                }
            }
        }
        out
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Holds every named pattern set the engine knows about (§4.3). The
/// `default` set is always the complete mandatory family list — the
/// engine never silently selects a reduced set.
pub struct PatternEngine {
    sets: std::collections::HashMap<String, PatternSet>,
}

impl PatternEngine {
    pub fn build() -> Result<Self, ConfigError> {
        let complete = families::build_complete_set("default")?;
        let mut sets = std::collections::HashMap::new();
        sets.insert("default".to_string(), complete);
        let complete_named = families::build_complete_set("complete")?;
        sets.insert("complete".to_string(), complete_named);
        Ok(PatternEngine { sets })
    }

    pub fn get(&self, pattern_set_name: &str) -> Option<&PatternSet> {
        self.sets.get(pattern_set_name)
    }
}

// Internal constructor used by `families` to assemble a `CompiledPattern`
// without exposing the enum outside this module tree.
pub(crate) fn simple(
    name: &'static str,
    regex: &str,
    group: usize,
    entity_type: EntityType,
    subtype: Option<&'static str>,
) -> Result<CompiledPattern, ConfigError> {
    Ok(CompiledPattern {
        name,
        regex: Regex::new(regex).map_err(|source| ConfigError::PatternCompile {
            set: "default".to_string(),
            name: name.to_string(),
            source,
        })?,
        kind: PatternKind::Simple { group, entity_type, subtype },
    })
}

pub(crate) fn tight_range(
    name: &'static str,
    regex: &str,
    lower_group: usize,
    indicator_group: usize,
    upper_group: usize,
    entity_type: EntityType,
    subtype: Option<&'static str>,
) -> Result<CompiledPattern, ConfigError> {
    Ok(CompiledPattern {
        name,
        regex: Regex::new(regex).map_err(|source| ConfigError::PatternCompile {
            set: "default".to_string(),
            name: name.to_string(),
            source,
        })?,
        kind: PatternKind::TightRange {
            lower_group,
            indicator_group,
            upper_group,
            entity_type,
            subtype,
        },
    })
}

pub(crate) fn named_set(name: impl Into<String>, patterns: Vec<CompiledPattern>) -> PatternSet {
    PatternSet { name: name.into(), patterns }
}

#[allow(dead_code)]
pub(crate) fn pattern_name(p: &CompiledPattern) -> &'static str {
    p.name
}
