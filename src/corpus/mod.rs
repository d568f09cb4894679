//! Corpus Store (§4.1): loads named-entity dictionaries from flat text
//! files and exposes membership/iteration queries.
//!
//! File format: one term per line, UTF-8, trimmed. `#`-prefixed lines and
//! blank lines are ignored. An optional `## subcategory: <name>` header
//! applies to all following lines until the next header.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::error::ConfigError;

/// The entity classes the Corpus Store understands. Subcategories (e.g.
/// GPE's country/us_state/city) are free-form strings attached per term,
/// not a further enum — new subcategories need no code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorpusClass {
    FirstNames,
    LastNames,
    Org,
    Gpe,
    Loc,
}

impl CorpusClass {
    fn from_stem(stem: &str) -> Option<Self> {
        match stem.split('.').next().unwrap_or(stem) {
            "first_names" => Some(CorpusClass::FirstNames),
            "last_names" => Some(CorpusClass::LastNames),
            "org" => Some(CorpusClass::Org),
            "gpe" => Some(CorpusClass::Gpe),
            "loc" => Some(CorpusClass::Loc),
            _ => None,
        }
    }
}

/// A single loaded term: original casing plus the lowercase-folded copy
/// used for case-insensitive matching.
#[derive(Debug, Clone)]
pub struct Term {
    pub surface: String,
    pub lower: String,
    pub subcategory: Option<String>,
}

#[derive(Debug, Default)]
struct ClassEntries {
    terms: Vec<Term>,
    seen: std::collections::HashSet<String>,
}

/// Loads and holds all corpus dictionaries. Built once at engine
/// construction, shared read-only (`Arc`) across document workers.
#[derive(Debug, Default)]
pub struct CorpusStore {
    classes: HashMap<CorpusClass, ClassEntries>,
    /// `blacklist.<class-stem>.txt` files: terms that must never be matched
    /// as that class, regardless of corpus membership.
    blacklists: HashMap<String, std::collections::HashSet<String>>,
}

const SUBCATEGORY_HEADER_PREFIX: &str = "## subcategory:";

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn parse_terms(text: &str) -> Vec<(String, Option<String>)> {
    let mut out = Vec::new();
    let mut current_subcategory: Option<String> = None;
    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(name) = line.strip_prefix(SUBCATEGORY_HEADER_PREFIX) {
            current_subcategory = Some(name.trim().to_string());
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        if line.len() < 2 {
            continue;
        }
        if is_all_digits(line) {
            continue;
        }
        out.push((line.to_string(), current_subcategory.clone()));
    }
    out
}

impl CorpusStore {
    /// Loads every recognized dictionary file under `dir`. A missing
    /// directory is a fatal [`ConfigError`]; a missing *file* for a known
    /// class simply leaves that class empty (with a one-time warning),
    /// per §4.1's failure semantics.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ConfigError::CorpusDirMissing(dir.display().to_string()));
        }

        let mut store = CorpusStore::default();
        let mut found_any_for: std::collections::HashSet<CorpusClass> =
            std::collections::HashSet::new();

        for entry in WalkDir::new(dir).max_depth(1).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::CorpusFileUnreadable {
                path: path.display().to_string(),
                source,
            })?;

            if let Some(class_stem) = stem.strip_prefix("blacklist.") {
                let mut set = std::collections::HashSet::new();
                for (term, _) in parse_terms(&text) {
                    set.insert(term.to_ascii_lowercase());
                }
                store.blacklists.entry(class_stem.to_string()).or_default().extend(set);
                continue;
            }

            let Some(class) = CorpusClass::from_stem(stem) else {
                continue;
            };
            found_any_for.insert(class);

            let entries = store.classes.entry(class).or_default();
            for (surface, subcategory) in parse_terms(&text) {
                let lower = surface.to_ascii_lowercase();
                if entries.seen.insert(lower.clone()) {
                    entries.terms.push(Term {
                        surface,
                        lower,
                        subcategory,
                    });
                }
            }
        }

        for class in [
            CorpusClass::FirstNames,
            CorpusClass::LastNames,
            CorpusClass::Org,
            CorpusClass::Gpe,
            CorpusClass::Loc,
        ] {
            if !found_any_for.contains(&class) {
                warn!(?class, "corpus class has no backing file; treating as empty");
                store.classes.entry(class).or_default();
            }
        }

        Ok(store)
    }

    pub fn terms(&self, class: CorpusClass) -> &[Term] {
        self.classes.get(&class).map(|c| c.terms.as_slice()).unwrap_or(&[])
    }

    pub fn is_blacklisted(&self, class_stem: &str, term: &str) -> bool {
        self.blacklists
            .get(class_stem)
            .map(|set| set.contains(&term.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    pub fn contains_lower(&self, class: CorpusClass, lower_term: &str) -> bool {
        self.classes
            .get(&class)
            .map(|c| c.terms.iter().any(|t| t.lower == lower_term))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn loads_terms_and_ignores_comments_and_blanks() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "first_names.txt",
            "# comment\n\nJohn\njohn\nMary\n12\nA\n",
        );

        let store = CorpusStore::load(tmp.path()).unwrap();
        let terms = store.terms(CorpusClass::FirstNames);
        // "john" deduped against "John" (case-insensitive), "12" (digits-only)
        // and "A" (too short) rejected.
        assert_eq!(terms.len(), 2);
        assert!(terms.iter().any(|t| t.lower == "john"));
        assert!(terms.iter().any(|t| t.lower == "mary"));
    }

    #[test]
    fn subcategory_headers_tag_following_lines() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "gpe.txt",
            "## subcategory: country\nFrance\n## subcategory: city\nParis\n",
        );

        let store = CorpusStore::load(tmp.path()).unwrap();
        let terms = store.terms(CorpusClass::Gpe);
        let france = terms.iter().find(|t| t.lower == "france").unwrap();
        let paris = terms.iter().find(|t| t.lower == "paris").unwrap();
        assert_eq!(france.subcategory.as_deref(), Some("country"));
        assert_eq!(paris.subcategory.as_deref(), Some("city"));
    }

    #[test]
    fn missing_corpus_file_yields_empty_class_not_error() {
        let tmp = tempfile::tempdir().unwrap();
        // Directory exists but has no org.txt at all.
        let store = CorpusStore::load(tmp.path()).unwrap();
        assert!(store.terms(CorpusClass::Org).is_empty());
    }

    #[test]
    fn missing_corpus_dir_is_fatal() {
        let err = CorpusStore::load("/definitely/not/a/real/path/xyz").unwrap_err();
        assert!(matches!(err, ConfigError::CorpusDirMissing(_)));
    }

    #[test]
    fn blacklist_file_is_queryable_by_class_stem() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "blacklist.org.txt", "market\nhere\n");

        let store = CorpusStore::load(tmp.path()).unwrap();
        assert!(store.is_blacklisted("org", "Market"));
        assert!(!store.is_blacklisted("org", "Acme"));
    }
}
