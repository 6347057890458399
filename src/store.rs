//! Word-metadata store (words.json) and manual assertions.
//!
//! The store is a JSON object keyed by surface form. Resolution results are
//! written into the known fields of each record; anything else a record
//! carries is left untouched.

use crate::models::{Affix, Assertion, AssertionKind, Resolution, WordRecord};
use crate::resolve::Resolver;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

pub type WordStore = BTreeMap<String, WordRecord>;
pub type AssertionTable = BTreeMap<String, Assertion>;

/// Source text recorded for words neither the matcher nor an assertion covers.
pub const DEFAULT_FALLBACK_SOURCE: &str =
    "Scholarly consensus (Charles 1912, Knibb 1978, Nickelsburg 2001); form not in Dillmann 1865";

pub const VERIFICATION_MANUAL: &str = "manual_assertion";
pub const VERIFICATION_FALLBACK: &str = "scholarly_consensus";
pub const DEFINITION_FROM_DILLMANN: &str = "dillmann";

/// Longest Latin definition copied into a record.
pub const MAX_LATIN_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to replace store file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub fn load_store(path: &Path) -> Result<WordStore, StoreError> {
    let reader = BufReader::new(File::open(path)?);
    let store: WordStore = serde_json::from_reader(reader)?;
    tracing::info!(path = %path.display(), words = store.len(), "loaded word store");
    Ok(store)
}

/// Write the store through a temporary file in the same directory, then
/// rename it over `path`.
pub fn save_store(store: &WordStore, path: &Path) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp_file = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        serde_json::to_writer_pretty(&mut writer, store)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    temp_file.persist(path)?;

    tracing::info!(path = %path.display(), words = store.len(), "saved word store");
    Ok(())
}

pub fn load_assertions(path: &Path) -> Result<AssertionTable, StoreError> {
    let reader = BufReader::new(File::open(path)?);
    let table: AssertionTable = serde_json::from_reader(reader)?;
    tracing::info!(path = %path.display(), assertions = table.len(), "loaded manual assertions");
    Ok(table)
}

/// What happened to one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Verified,
    Asserted,
    Fallback,
}

/// Counts from one pass over the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub verified: usize,
    pub asserted: usize,
    pub unresolved: usize,
    pub added: usize,
}

/// Writes resolutions into word records.
pub struct Annotator<'r, 'd, 'a> {
    resolver: &'r Resolver<'d, 'a>,
    assertions: &'r AssertionTable,
    fallback_source: String,
}

impl<'r, 'd, 'a> Annotator<'r, 'd, 'a> {
    pub fn new(resolver: &'r Resolver<'d, 'a>, assertions: &'r AssertionTable) -> Self {
        Self {
            resolver,
            assertions,
            fallback_source: DEFAULT_FALLBACK_SOURCE.to_string(),
        }
    }

    pub fn with_fallback_source(mut self, source: impl Into<String>) -> Self {
        self.fallback_source = source.into();
        self
    }

    /// Manual assertion for `surface`: the form itself first, then the
    /// remainder after each prefix the resolver would strip.
    pub fn find_assertion(&self, surface: &str) -> Option<(&'r Assertion, Vec<Affix>)> {
        let assertions: &'r AssertionTable = self.assertions;
        if let Some(assertion) = assertions.get(surface) {
            return Some((assertion, Vec::new()));
        }
        self.resolver
            .prefix_splits(surface)
            .find_map(|(rule, rest)| assertions.get(rest).map(|a| (a, rule.components())))
    }

    /// Update one record from its resolution.
    pub fn annotate(&self, surface: &str, record: &mut WordRecord, resolution: &Resolution<'_>) -> Outcome {
        record.clear_resolution();

        if let Resolution::Matched(m) = resolution {
            let parts = m.source_parts();
            record.dillmann_verified = true;
            record.verification_type = Some(m.method.as_str().to_string());
            record.match_type = Some(m.lookup.as_str().to_string());
            record.dillmann_entry = Some(m.entry.entry_id.clone()).filter(|id| !id.is_empty());
            record.dillmann_headword = Some(m.entry.headword.clone());
            record.source = Some(parts.join(" + "));
            if m.method.is_affixed() {
                record.morphological_analysis = Some(m.analysis());
                record.compound_parts = parts;
            }
            if !m.entry.gloss.is_empty() {
                record.dillmann_latin = Some(m.entry.gloss.chars().take(MAX_LATIN_CHARS).collect());
            }
            if !m.entry.cognates.is_empty() {
                record.cognates = m.entry.cognates.clone();
            }
            if record.definition.is_none() && !m.entry.gloss.is_empty() {
                record.definition = Some(m.entry.gloss.chars().take(MAX_LATIN_CHARS).collect());
                record.definition_source = Some(DEFINITION_FROM_DILLMANN.to_string());
            }
            return Outcome::Verified;
        }

        if let Some((assertion, prefixes)) = self.find_assertion(surface) {
            let label = match assertion.kind {
                AssertionKind::ProperName => "Proper name",
                AssertionKind::ScholarlyIdentification => "Scholarly identification",
            };
            let mut parts: Vec<String> = prefixes
                .iter()
                .map(|a| format!("{}({})", a.translit, a.gloss))
                .collect();
            parts.push(match &assertion.source {
                Some(source) => format!("{}: {}; {}", label, assertion.gloss, source),
                None => format!("{}: {}", label, assertion.gloss),
            });

            record.verification_type = Some(VERIFICATION_MANUAL.to_string());
            record.asserted_entry = assertion.entry.clone();
            record.asserted_headword = assertion.headword.clone();
            record.source = Some(parts.join(" + "));
            if record.definition.is_none() {
                record.definition = Some(assertion.gloss.clone());
                record.definition_source = Some(VERIFICATION_MANUAL.to_string());
            }
            return Outcome::Asserted;
        }

        record.verification_type = Some(VERIFICATION_FALLBACK.to_string());
        record.source = Some(self.fallback_source.clone());
        Outcome::Fallback
    }

    /// Apply a batch of resolutions. Words missing from the store get a new
    /// record.
    pub fn apply<S: AsRef<str>>(
        &self,
        store: &mut WordStore,
        words: &[S],
        resolutions: &[Resolution<'_>],
    ) -> ApplyReport {
        let mut report = ApplyReport::default();
        for (word, resolution) in words.iter().zip(resolutions) {
            let word = word.as_ref();
            if !store.contains_key(word) {
                report.added += 1;
            }
            let record = store.entry(word.to_string()).or_default();
            match self.annotate(word, record, resolution) {
                Outcome::Verified => report.verified += 1,
                Outcome::Asserted => report.asserted += 1,
                Outcome::Fallback => report.unresolved += 1,
            }
        }
        tracing::info!(
            verified = report.verified,
            asserted = report.asserted,
            unresolved = report.unresolved,
            added = report.added,
            "applied resolutions to word store"
        );
        report
    }
}

/// Surface forms to resolve: every key, or only those not yet verified.
pub fn words_to_resolve(store: &WordStore, only_unverified: bool) -> Vec<String> {
    store
        .iter()
        .filter(|(_, record)| !only_unverified || !record.dillmann_verified)
        .map(|(word, _)| word.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affix::AffixTable;
    use crate::dictionary::Dictionary;
    use crate::models::{DictionaryEntry, ResolverParams};
    use crate::skeleton::SkeletonRules;

    fn dictionary() -> Dictionary {
        Dictionary::from_entries(
            vec![DictionaryEntry {
                headword: "ክልኤ".to_string(),
                entry_id: "6112".to_string(),
                gloss: "duo, ambo".to_string(),
                cognates: vec!["Heb: shnayim".to_string()],
                ..Default::default()
            }],
            SkeletonRules::default(),
        )
        .unwrap()
    }

    fn assertions() -> AssertionTable {
        let mut table = AssertionTable::new();
        table.insert(
            "ሄኖክ".to_string(),
            Assertion {
                kind: AssertionKind::ProperName,
                entry: None,
                headword: None,
                gloss: "Enoch".to_string(),
                source: Some("Gen 5:18".to_string()),
            },
        );
        table
    }

    #[test]
    fn test_matched_record_is_verified() {
        let dict = dictionary();
        let resolver = Resolver::new(&dict, AffixTable::builtin(), ResolverParams::default());
        let table = AssertionTable::new();
        let annotator = Annotator::new(&resolver, &table);

        let mut record = WordRecord::default();
        let resolution = resolver.resolve("ወክልኤ");
        assert_eq!(annotator.annotate("ወክልኤ", &mut record, &resolution), Outcome::Verified);

        assert!(record.dillmann_verified);
        assert_eq!(record.verification_type.as_deref(), Some("prefix_stripped"));
        assert_eq!(record.match_type.as_deref(), Some("exact"));
        assert_eq!(record.dillmann_entry.as_deref(), Some("6112"));
        assert_eq!(record.dillmann_headword.as_deref(), Some("ክልኤ"));
        assert_eq!(record.source.as_deref(), Some("wa-(and) + Dillmann #6112 (s.v. ክልኤ)"));
        assert_eq!(record.morphological_analysis.as_deref(), Some("wa-[ክልኤ]"));
        assert_eq!(record.compound_parts.len(), 2);
        assert_eq!(record.dillmann_latin.as_deref(), Some("duo, ambo"));
        assert_eq!(record.cognates, vec!["Heb: shnayim"]);
        assert_eq!(record.definition.as_deref(), Some("duo, ambo"));
        assert_eq!(record.definition_source.as_deref(), Some(DEFINITION_FROM_DILLMANN));
    }

    #[test]
    fn test_unresolved_pass_clears_previous_match() {
        let dict = dictionary();
        let resolver = Resolver::new(&dict, AffixTable::builtin(), ResolverParams::default());
        let table = AssertionTable::new();
        let annotator = Annotator::new(&resolver, &table);

        let mut record = WordRecord::default();
        annotator.annotate("ክልኤ", &mut record, &resolver.resolve("ክልኤ"));
        assert!(!record.cognates.is_empty());

        assert_eq!(annotator.annotate("ክልኤ", &mut record, &Resolution::Unresolved), Outcome::Fallback);
        assert!(!record.dillmann_verified);
        assert_eq!(record.verification_type.as_deref(), Some("scholarly_consensus"));
        assert!(record.cognates.is_empty());
        assert!(record.dillmann_latin.is_none());
        // The definition came from the old match, so it goes too
        assert!(record.definition.is_none());
        assert!(record.definition_source.is_none());
    }

    #[test]
    fn test_definition_follows_new_entry() {
        let first = dictionary();
        let second = Dictionary::from_entries(
            vec![DictionaryEntry {
                headword: "ክልኤ".to_string(),
                entry_id: "6113".to_string(),
                gloss: "bini".to_string(),
                ..Default::default()
            }],
            SkeletonRules::default(),
        )
        .unwrap();
        let table = AssertionTable::new();

        let mut record = WordRecord::default();
        let resolver = Resolver::new(&first, AffixTable::builtin(), ResolverParams::default());
        Annotator::new(&resolver, &table).annotate("ክልኤ", &mut record, &resolver.resolve("ክልኤ"));
        assert_eq!(record.definition.as_deref(), Some("duo, ambo"));

        let resolver = Resolver::new(&second, AffixTable::builtin(), ResolverParams::default());
        Annotator::new(&resolver, &table).annotate("ክልኤ", &mut record, &resolver.resolve("ክልኤ"));
        assert_eq!(record.dillmann_entry.as_deref(), Some("6113"));
        assert_eq!(record.definition.as_deref(), Some("bini"));
        assert!(record.cognates.is_empty());
    }

    #[test]
    fn test_assertion_definition_replaced_by_later_match() {
        let dict = dictionary();
        let resolver = Resolver::new(&dict, AffixTable::builtin(), ResolverParams::default());
        let mut table = assertions();
        let enoch = table.remove("ሄኖክ").unwrap();
        table.insert("ክልኤ".to_string(), enoch);
        let annotator = Annotator::new(&resolver, &table);

        let mut record = WordRecord::default();
        annotator.annotate("ክልኤ", &mut record, &Resolution::Unresolved);
        assert_eq!(record.definition.as_deref(), Some("Enoch"));
        assert_eq!(record.definition_source.as_deref(), Some(VERIFICATION_MANUAL));

        annotator.annotate("ክልኤ", &mut record, &resolver.resolve("ክልኤ"));
        assert_eq!(record.definition.as_deref(), Some("duo, ambo"));
        assert_eq!(record.definition_source.as_deref(), Some(DEFINITION_FROM_DILLMANN));
    }

    #[test]
    fn test_exact_match_has_no_analysis() {
        let dict = dictionary();
        let resolver = Resolver::new(&dict, AffixTable::builtin(), ResolverParams::default());
        let table = AssertionTable::new();
        let annotator = Annotator::new(&resolver, &table);

        let mut record = WordRecord {
            definition: Some("two".to_string()),
            ..Default::default()
        };
        annotator.annotate("ክልኤ", &mut record, &resolver.resolve("ክልኤ"));
        assert_eq!(record.verification_type.as_deref(), Some("exact"));
        assert!(record.morphological_analysis.is_none());
        assert!(record.compound_parts.is_empty());
        assert_eq!(record.definition.as_deref(), Some("two"));
        assert!(record.definition_source.is_none());

        // Still kept when a later pass finds nothing
        annotator.annotate("ክልኤ", &mut record, &Resolution::Unresolved);
        assert_eq!(record.definition.as_deref(), Some("two"));
    }

    #[test]
    fn test_latin_is_truncated() {
        let long_gloss = "x".repeat(500);
        let dict = Dictionary::from_entries(
            vec![DictionaryEntry {
                headword: "ክልኤ".to_string(),
                entry_id: "6112".to_string(),
                gloss: long_gloss,
                ..Default::default()
            }],
            SkeletonRules::default(),
        )
        .unwrap();
        let resolver = Resolver::new(&dict, AffixTable::builtin(), ResolverParams::default());
        let table = AssertionTable::new();
        let annotator = Annotator::new(&resolver, &table);

        let mut record = WordRecord::default();
        annotator.annotate("ክልኤ", &mut record, &resolver.resolve("ክልኤ"));
        assert_eq!(record.dillmann_latin.map(|l| l.chars().count()), Some(MAX_LATIN_CHARS));
    }

    #[test]
    fn test_manual_assertion_never_verified() {
        let dict = dictionary();
        let resolver = Resolver::new(&dict, AffixTable::builtin(), ResolverParams::default());
        let table = assertions();
        let annotator = Annotator::new(&resolver, &table);

        // A stale algorithmic result must not survive
        let mut record = WordRecord {
            dillmann_verified: true,
            dillmann_entry: Some("1".to_string()),
            morphological_analysis: Some("old".to_string()),
            ..Default::default()
        };
        let resolution = resolver.resolve("ሄኖክ");
        assert!(!resolution.is_matched());
        assert_eq!(annotator.annotate("ሄኖክ", &mut record, &resolution), Outcome::Asserted);

        assert!(!record.dillmann_verified);
        assert_eq!(record.verification_type.as_deref(), Some("manual_assertion"));
        assert!(record.dillmann_entry.is_none());
        assert!(record.morphological_analysis.is_none());
        assert_eq!(record.source.as_deref(), Some("Proper name: Enoch; Gen 5:18"));
        assert_eq!(record.definition.as_deref(), Some("Enoch"));
    }

    #[test]
    fn test_assertion_found_after_prefix() {
        let dict = dictionary();
        let resolver = Resolver::new(&dict, AffixTable::builtin(), ResolverParams::default());
        let table = assertions();
        let annotator = Annotator::new(&resolver, &table);

        let (assertion, prefixes) = annotator.find_assertion("ወሄኖክ").unwrap();
        assert_eq!(assertion.gloss, "Enoch");
        assert_eq!(prefixes.len(), 1);
        assert_eq!(prefixes[0].form, "ወ");

        let mut record = WordRecord::default();
        annotator.annotate("ወሄኖክ", &mut record, &Resolution::Unresolved);
        assert_eq!(record.source.as_deref(), Some("wa-(and) + Proper name: Enoch; Gen 5:18"));
        assert!(!record.dillmann_verified);
    }

    #[test]
    fn test_fallback_source() {
        let dict = dictionary();
        let resolver = Resolver::new(&dict, AffixTable::builtin(), ResolverParams::default());
        let table = AssertionTable::new();
        let annotator = Annotator::new(&resolver, &table).with_fallback_source("not in Dillmann");

        let mut record = WordRecord::default();
        assert_eq!(
            annotator.annotate("ገብር", &mut record, &Resolution::Unresolved),
            Outcome::Fallback
        );
        assert_eq!(record.verification_type.as_deref(), Some("scholarly_consensus"));
        assert_eq!(record.source.as_deref(), Some("not in Dillmann"));
    }

    #[test]
    fn test_apply_adds_missing_words() {
        let dict = dictionary();
        let resolver = Resolver::new(&dict, AffixTable::builtin(), ResolverParams::default());
        let table = assertions();
        let annotator = Annotator::new(&resolver, &table);

        let mut store = WordStore::new();
        store.insert("ክልኤ".to_string(), WordRecord::default());

        let words = ["ክልኤ", "ሄኖክ", "ገብር"];
        let resolutions: Vec<Resolution> = words.iter().map(|w| resolver.resolve(w)).collect();
        let report = annotator.apply(&mut store, &words, &resolutions);

        assert_eq!(
            report,
            ApplyReport {
                verified: 1,
                asserted: 1,
                unresolved: 1,
                added: 2,
            }
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_words_to_resolve() {
        let mut store = WordStore::new();
        store.insert("ክልኤ".to_string(), WordRecord { dillmann_verified: true, ..Default::default() });
        store.insert("ገብር".to_string(), WordRecord::default());

        assert_eq!(words_to_resolve(&store, false).len(), 2);
        assert_eq!(words_to_resolve(&store, true), vec!["ገብር".to_string()]);
    }

    #[test]
    fn test_save_and_load_preserve_unknown_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(
            &path,
            r#"{"ክልኤ": {"definition": "two", "pos": "numeral", "transliteration": "kelʾe"}}"#,
        )
        .unwrap();

        let mut store = load_store(&path).unwrap();
        let dict = dictionary();
        let resolver = Resolver::new(&dict, AffixTable::builtin(), ResolverParams::default());
        let table = AssertionTable::new();
        let annotator = Annotator::new(&resolver, &table);
        let words = ["ክልኤ"];
        let resolutions = vec![resolver.resolve("ክልኤ")];
        annotator.apply(&mut store, &words, &resolutions);
        save_store(&store, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["ክልኤ"]["pos"], "numeral");
        assert_eq!(value["ክልኤ"]["transliteration"], "kelʾe");
        assert_eq!(value["ክልኤ"]["dillmann_verified"], true);
        assert_eq!(value["ክልኤ"]["dillmann_entry"], "6112");
    }

    #[test]
    fn test_load_assertions() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("assertions.json");
        std::fs::write(
            &path,
            r#"{"ሄኖክ": {"kind": "proper_name", "gloss": "Enoch"},
                "ሰምያዛ": {"kind": "scholarly_identification", "entry": "3410", "headword": "ስም", "gloss": "Semyaza"}}"#,
        )
        .unwrap();
        let table = load_assertions(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["ሰምያዛ"].kind, AssertionKind::ScholarlyIdentification);
        assert_eq!(table["ሰምያዛ"].entry.as_deref(), Some("3410"));
    }

    #[test]
    fn test_load_store_bad_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(load_store(&path), Err(StoreError::Json(_))));
    }
}
