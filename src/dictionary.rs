//! Dillmann dictionary loading and lookup indexes.

use crate::models::DictionaryEntry;
use crate::skeleton::SkeletonRules;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed entry (entry id {entry_id:?}): no headword and no forms")]
    MalformedEntry { entry_id: String },
}

/// Entry as stored in dillmann_dictionary.json
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    entry_num: String,
    #[serde(default)]
    forms: Vec<String>,
    #[serde(default)]
    latin: String,
    #[serde(default)]
    senses: Vec<String>,
    #[serde(default)]
    cognates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawDictionary {
    entries: BTreeMap<String, RawEntry>,
}

/// Candidate found through the skeleton index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonHit {
    pub entry: usize,
    pub form: String, // First form of the entry that produced the key
}

/// Statistics about a loaded dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryStats {
    pub entries: usize,
    pub indexed_forms: usize,
    pub skeleton_keys: usize,
    pub colliding_skeletons: usize,
    pub entries_without_id: usize,
    pub rejected_entries: usize,
}

/// Read-only lexicon with exact and consonantal indexes.
///
/// Entries are enumerated in headword order; every tie-break in the resolver
/// depends on that order.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
    exact: HashMap<String, usize>,
    skeletons: HashMap<String, Vec<SkeletonHit>>,
    rules: SkeletonRules,
    rejected: usize,
}

/// Trim whitespace and trailing word-space / full stop.
pub fn normalize_form(form: &str) -> String {
    form.trim()
        .trim_end_matches(['፡', '።'])
        .trim()
        .to_string()
}

/// Normalize an entry in place. Returns false if nothing is left to index.
fn normalize_entry(entry: &mut DictionaryEntry) -> bool {
    entry.headword = normalize_form(&entry.headword);
    let mut forms: Vec<String> = entry
        .forms
        .iter()
        .map(|f| normalize_form(f))
        .filter(|f| !f.is_empty())
        .collect();
    if entry.headword.is_empty() {
        if forms.is_empty() {
            return false;
        }
        forms.sort();
        entry.headword = forms.remove(0);
    }
    forms.retain(|f| *f != entry.headword);
    forms.sort();
    forms.dedup();
    entry.forms = forms;
    true
}

/// Merge a duplicate headword into the entry already present.
fn merge_entry(existing: &mut DictionaryEntry, other: DictionaryEntry) {
    if existing.entry_id.is_empty() {
        existing.entry_id = other.entry_id;
    }
    if existing.gloss.is_empty() {
        existing.gloss = other.gloss;
    }
    existing.forms.extend(other.forms);
    existing.forms.sort();
    existing.forms.dedup();
    for sense in other.senses {
        if !existing.senses.contains(&sense) {
            existing.senses.push(sense);
        }
    }
    for cognate in other.cognates {
        if !existing.cognates.contains(&cognate) {
            existing.cognates.push(cognate);
        }
    }
}

impl Dictionary {
    /// Build from in-memory entries. A malformed entry fails the whole build.
    pub fn from_entries(
        entries: impl IntoIterator<Item = DictionaryEntry>,
        rules: SkeletonRules,
    ) -> Result<Self, DictionaryError> {
        let mut by_headword: BTreeMap<String, DictionaryEntry> = BTreeMap::new();
        for mut entry in entries {
            if !normalize_entry(&mut entry) {
                return Err(DictionaryError::MalformedEntry {
                    entry_id: entry.entry_id,
                });
            }
            insert_entry(&mut by_headword, entry);
        }
        Ok(Self::assemble(by_headword, rules, 0))
    }

    /// Load dillmann_dictionary.json. Malformed entries are skipped and counted.
    pub fn load(path: &Path, rules: SkeletonRules) -> Result<Self, DictionaryError> {
        let text = std::fs::read_to_string(path)?;
        let dictionary = Self::from_json(&text, rules)?;
        tracing::info!(
            path = %path.display(),
            entries = dictionary.len(),
            rejected = dictionary.rejected,
            "loaded dictionary"
        );
        Ok(dictionary)
    }

    /// Parse the dillmann_dictionary.json layout from a string.
    pub fn from_json(text: &str, rules: SkeletonRules) -> Result<Self, DictionaryError> {
        let raw: RawDictionary = serde_json::from_str(text)?;

        let mut by_headword: BTreeMap<String, DictionaryEntry> = BTreeMap::new();
        let mut rejected = 0usize;

        for (headword, raw_entry) in raw.entries {
            let mut entry = DictionaryEntry {
                headword,
                entry_id: raw_entry.entry_num.trim().to_string(),
                forms: raw_entry.forms,
                gloss: raw_entry.latin,
                senses: raw_entry.senses,
                cognates: raw_entry.cognates,
            };
            if !normalize_entry(&mut entry) {
                tracing::warn!(entry_id = %entry.entry_id, "rejecting entry with no headword and no forms");
                rejected += 1;
                continue;
            }
            insert_entry(&mut by_headword, entry);
        }

        Ok(Self::assemble(by_headword, rules, rejected))
    }

    fn assemble(
        by_headword: BTreeMap<String, DictionaryEntry>,
        rules: SkeletonRules,
        rejected: usize,
    ) -> Self {
        let entries: Vec<DictionaryEntry> = by_headword.into_values().collect();

        // Headwords claim their key before any alternate form can
        let mut exact: HashMap<String, usize> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            exact.entry(entry.headword.clone()).or_insert(idx);
        }
        for (idx, entry) in entries.iter().enumerate() {
            for form in &entry.forms {
                exact.entry(form.clone()).or_insert(idx);
            }
        }

        let mut skeletons: HashMap<String, Vec<SkeletonHit>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            for form in entry.all_forms() {
                let hits = skeletons.entry(rules.skeleton(form)).or_default();
                if !hits.iter().any(|h| h.entry == idx) {
                    hits.push(SkeletonHit {
                        entry: idx,
                        form: form.to_string(),
                    });
                }
            }
        }

        Self {
            entries,
            exact,
            skeletons,
            rules,
            rejected,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in enumeration (headword) order.
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn entry(&self, idx: usize) -> Option<&DictionaryEntry> {
        self.entries.get(idx)
    }

    pub fn rules(&self) -> &SkeletonRules {
        &self.rules
    }

    /// Entry owning `form` as headword or alternate form.
    pub fn lookup_exact(&self, form: &str) -> Option<&DictionaryEntry> {
        self.exact.get(form).map(|&idx| &self.entries[idx])
    }

    /// Skeleton key computed with the rules this dictionary was indexed with.
    pub fn skeleton(&self, form: &str) -> String {
        self.rules.skeleton(form)
    }

    /// Candidates sharing a skeleton key, in enumeration order.
    pub fn skeleton_candidates(&self, key: &str) -> &[SkeletonHit] {
        self.skeletons.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            entries: self.entries.len(),
            indexed_forms: self.exact.len(),
            skeleton_keys: self.skeletons.len(),
            colliding_skeletons: self.skeletons.values().filter(|h| h.len() > 1).count(),
            entries_without_id: self.entries.iter().filter(|e| !e.has_entry_id()).count(),
            rejected_entries: self.rejected,
        }
    }
}

fn insert_entry(by_headword: &mut BTreeMap<String, DictionaryEntry>, entry: DictionaryEntry) {
    match by_headword.get_mut(&entry.headword) {
        Some(existing) => merge_entry(existing, entry),
        None => {
            by_headword.insert(entry.headword.clone(), entry);
        }
    }
}
