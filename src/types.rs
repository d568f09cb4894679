//! Shared data model: spans, entity types, and the candidate/canonical
//! entity records that flow through the pipeline.
//!
//! Grounded in the teacher's mention records (`scanner::implicit::ImplicitMention`,
//! `scanner::temporal::TemporalMention`): a flat struct of `start`/`end`/`text`
//! plus class-specific metadata, `Serialize`/`Deserialize` for the sidecar
//! artifact.

use serde::{Deserialize, Serialize};

/// A half-open byte interval `[start, end)` into the source document.
///
/// Both bounds MUST fall on UTF-8 code-point boundaries; callers that slice
/// `document[span.start..span.end]` rely on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end, "span must be non-empty: {start}..{end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn slice<'a>(&self, document: &'a str) -> &'a str {
        &document[self.start..self.end]
    }
}

/// The closed set of entity types the engine recognizes. Dispatch on this
/// enum is always exhaustive — adding a type means updating every `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Person,
    Org,
    Gpe,
    Loc,
    Date,
    Time,
    Money,
    Percent,
    Measurement,
    Phone,
    Url,
    Regulation,
    RangeIndicator,
}

impl EntityType {
    /// Stable ID prefix used by the Canonicalizer (§4.8).
    pub fn id_abbrev(&self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Org => "org",
            EntityType::Gpe => "gpe",
            EntityType::Loc => "loc",
            EntityType::Date => "date",
            EntityType::Time => "time",
            EntityType::Money => "money",
            EntityType::Percent => "percent",
            EntityType::Measurement => "meas",
            EntityType::Phone => "phone",
            EntityType::Url => "url",
            EntityType::Regulation => "reg",
            EntityType::RangeIndicator => "rangeind",
        }
    }

    /// A fixed, total order used as the final tie-break key in the
    /// deduplication sort (§4.5). Arbitrary but deterministic.
    pub fn tiebreak_rank(&self) -> u8 {
        match self {
            EntityType::Person => 0,
            EntityType::Org => 1,
            EntityType::Gpe => 2,
            EntityType::Loc => 3,
            EntityType::Money => 4,
            EntityType::Percent => 5,
            EntityType::Measurement => 6,
            EntityType::Date => 7,
            EntityType::Time => 8,
            EntityType::Phone => 9,
            EntityType::Url => 10,
            EntityType::Regulation => 11,
            EntityType::RangeIndicator => 12,
        }
    }
}

/// Where a [`RawEntity`] came from. Used for diagnostics and for the Person
/// Validator, which only re-scores candidates that could plausibly be a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitySource {
    Automaton,
    Pattern,
    Validator,
}

/// A candidate entity straight out of extraction, before dedup/validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    pub span: Span,
    pub entity_type: EntityType,
    pub subtype: Option<String>,
    pub surface_text: String,
    pub source: EntitySource,
}

impl RawEntity {
    /// Verifies the `surface_text == document[span]` invariant (P1).
    pub fn is_span_faithful(&self, document: &str) -> bool {
        document
            .get(self.span.start..self.span.end)
            .map(|s| s == self.surface_text)
            .unwrap_or(false)
    }
}

/// A single surface occurrence folded into a [`CanonicalEntity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub start: usize,
    pub end: usize,
    pub surface: String,
}

impl From<&RawEntity> for Mention {
    fn from(e: &RawEntity) -> Self {
        Mention {
            start: e.span.start,
            end: e.span.end,
            surface: e.surface_text.clone(),
        }
    }
}

/// A document-scoped, ID-bearing grouping of mention-equivalent entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub id: String,
    pub entity_type: EntityType,
    pub subtype: Option<String>,
    pub canonical_surface: String,
    pub normalized_form: Option<String>,
    pub mentions: Vec<Mention>,
}

/// Range-specific fields recorded alongside a [`CanonicalEntity`] whose
/// mentions were produced by the Range Linker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeDetails {
    pub lower_surface: String,
    pub upper_surface: String,
    pub indicator_surface: String,
    pub unit_family: Option<String>,
    pub inherited_unit: Option<String>,
}

/// The closed set of fact predicates (§4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Employs,
    AffiliatedWith,
    AppliesTo,
    MarksEvent,
}

/// The object side of a fact: either another canonical entity, or a literal
/// (free-text noun phrase) when no entity anchors it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactObject {
    EntityId(String),
    Literal(String),
}

/// A derived subject-predicate-object triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub subject_id: String,
    pub predicate: Predicate,
    pub object: FactObject,
    pub context: Span,
    pub confidence: f64,
}
