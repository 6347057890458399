//! Data structures for the Ge'ez morphological resolver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single Dillmann lexicon entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub headword: String,
    pub entry_id: String,         // Dillmann entry number, may be empty
    pub forms: Vec<String>,       // Alternate surface forms (headword excluded)
    pub gloss: String,            // Latin definition
    pub senses: Vec<String>,
    pub cognates: Vec<String>,    // "Heb: ...", "Ar: ..."
}

impl DictionaryEntry {
    /// Headword followed by every alternate form.
    pub fn all_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.headword.as_str()).chain(self.forms.iter().map(String::as_str))
    }

    pub fn has_entry_id(&self) -> bool {
        !self.entry_id.is_empty()
    }
}

/// A prefix or suffix from the closed affix set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affix {
    pub form: String,
    pub translit: String, // "wa-", "-hu"
    pub gloss: String,    // "and", "his/him (3ms)"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Affix {
    pub fn new(form: &str, translit: &str, gloss: &str) -> Self {
        Self {
            form: form.to_string(),
            translit: translit.to_string(),
            gloss: gloss.to_string(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// A prefix, possibly a compound of several simple prefixes (ወእም = ወ + እም)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    #[serde(flatten)]
    pub affix: Affix,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<Affix>,
}

impl PrefixRule {
    pub fn simple(affix: Affix) -> Self {
        Self {
            affix,
            parts: Vec::new(),
        }
    }

    /// The affixes reported as stripped when this prefix matches.
    pub fn components(&self) -> Vec<Affix> {
        if self.parts.is_empty() {
            vec![self.affix.clone()]
        } else {
            self.parts.clone()
        }
    }
}

/// Strategy that produced a match, in decreasing order of confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Consonantal,
    PrefixStripped,
    PrefixAndSuffixStripped,
    SuffixStripped,
}

impl MatchMethod {
    pub const ALL: [MatchMethod; 5] = [
        MatchMethod::Exact,
        MatchMethod::Consonantal,
        MatchMethod::PrefixStripped,
        MatchMethod::PrefixAndSuffixStripped,
        MatchMethod::SuffixStripped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::Exact => "exact",
            MatchMethod::Consonantal => "consonantal",
            MatchMethod::PrefixStripped => "prefix_stripped",
            MatchMethod::PrefixAndSuffixStripped => "prefix_and_suffix_stripped",
            MatchMethod::SuffixStripped => "suffix_stripped",
        }
    }

    pub fn is_affixed(&self) -> bool {
        !matches!(self, MatchMethod::Exact | MatchMethod::Consonantal)
    }
}

/// How the final stem was found in the dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    Exact,
    Consonantal,
}

impl Lookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lookup::Exact => "exact",
            Lookup::Consonantal => "consonantal",
        }
    }
}

/// A successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'d> {
    pub entry: &'d DictionaryEntry,
    pub stem: String,          // Part of the surface form that was looked up
    pub matched_form: String,  // Dictionary form the stem matched
    pub stripped_prefixes: Vec<Affix>,
    pub stripped_suffixes: Vec<Affix>,
    pub method: MatchMethod,
    pub lookup: Lookup,
}

impl Match<'_> {
    /// "Dillmann #2375 (s.v. ረገመ)"
    pub fn citation(&self) -> String {
        if self.entry.has_entry_id() {
            format!("Dillmann #{} (s.v. {})", self.entry.entry_id, self.entry.headword)
        } else {
            format!("Dillmann (s.v. {})", self.entry.headword)
        }
    }

    /// "wa-[ክልኤ]-hu"
    pub fn analysis(&self) -> String {
        let prefixes: String = self.stripped_prefixes.iter().map(|a| a.translit.as_str()).collect();
        let suffixes: String = self.stripped_suffixes.iter().map(|a| a.translit.as_str()).collect();
        format!("{}[{}]{}", prefixes, self.stem, suffixes)
    }

    /// Affix glosses around the citation, outermost first.
    pub fn source_parts(&self) -> Vec<String> {
        let mut parts: Vec<String> = self
            .stripped_prefixes
            .iter()
            .map(|a| format!("{}({})", a.translit, a.gloss))
            .collect();
        parts.push(self.citation());
        parts.extend(
            self.stripped_suffixes
                .iter()
                .map(|a| format!("{}({})", a.translit, a.gloss)),
        );
        parts
    }
}

/// Outcome of resolving one surface form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'d> {
    Matched(Match<'d>),
    Unresolved,
}

impl<'d> Resolution<'d> {
    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }

    pub fn as_match(&self) -> Option<&Match<'d>> {
        match self {
            Resolution::Matched(m) => Some(m),
            Resolution::Unresolved => None,
        }
    }

    pub fn method(&self) -> Option<MatchMethod> {
        self.as_match().map(|m| m.method)
    }
}

/// Resolver parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverParams {
    pub min_stem_len: usize,     // Shorter stems are never looked up
    pub require_entry_id: bool,  // Reject matches on unnumbered entries
    pub consonantal: bool,       // Enable skeleton matching
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            min_stem_len: 2,
            require_entry_id: false,
            consonantal: true,
        }
    }
}

/// Counts over a batch of resolutions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveSummary {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub by_method: BTreeMap<MatchMethod, usize>,
}

impl ResolveSummary {
    pub fn resolution_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.resolved as f64 / self.total as f64
        }
    }
}

/// One record of the word-metadata store (words.json)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    // Set when `definition` was written by this tool; absent when another tool owns it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub dillmann_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dillmann_entry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dillmann_headword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morphological_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compound_parts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dillmann_latin: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cognates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asserted_entry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asserted_headword: Option<String>,
    // Fields owned by other tools (pos, domain, transliteration, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WordRecord {
    /// Drop everything a previous resolution pass wrote, including a
    /// definition it filled in.
    pub fn clear_resolution(&mut self) {
        if self.definition_source.take().is_some() {
            self.definition = None;
        }
        self.dillmann_verified = false;
        self.verification_type = None;
        self.dillmann_entry = None;
        self.dillmann_headword = None;
        self.morphological_analysis = None;
        self.match_type = None;
        self.compound_parts.clear();
        self.dillmann_latin = None;
        self.cognates.clear();
        self.asserted_entry = None;
        self.asserted_headword = None;
    }
}

/// Kind of manual identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionKind {
    ProperName,
    ScholarlyIdentification,
}

/// A hand-made identification for a form the matcher cannot resolve.
///
/// Assertions are conjecture: they are recorded next to the word but never
/// mark it as verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub kind: AssertionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headword: Option<String>,
    pub gloss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
