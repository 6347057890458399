//! Prefix and suffix tables.
//!
//! Ge'ez attaches conjunctions, prepositions, the relative particle and
//! imperfect person markers in front of a stem, and pronominal and plural
//! endings behind it. The built-in tables below cover the affixes that occur
//! in the 1 Enoch text; a morphology file can replace them.

use crate::models::{Affix, PrefixRule};
use crate::skeleton::symbol_len;
use std::sync::OnceLock;

// (form, transliteration, gloss, note)
const SIMPLE_PREFIXES: &[(&str, &str, &str, &str)] = &[
    ("እም", "em-", "from", "preposition, Dillmann #25"),
    ("ወ", "wa-", "and", "conjunction"),
    ("በ", "ba-", "in/by", "preposition, Dillmann #472"),
    ("ለ", "la-", "for/to", "preposition, Dillmann #18"),
    ("ዘ", "za-", "which/of", "relative, Dillmann #1100"),
    ("ከ", "ka-", "as/like", "preposition, Dillmann #1280"),
    ("ኢ", "i-", "not", "negative, Dillmann #1"),
    ("አይ", "ay-", "not (neg impf)", "negative imperfect"),
    ("አ", "a-", "causative", "causative/object prefix"),
    ("ይ", "yi-", "he/it", "3ms imperfect prefix"),
    ("ት", "ti-", "she/you", "3fs/2ms imperfect prefix"),
    ("ን", "ni-", "we", "1cp imperfect prefix"),
    ("የ", "ya-", "of", "genitive"),
    ("እ", "e-", "from/various", "prefix"),
];

// (form, transliteration, gloss, component forms)
const COMPOUND_PREFIXES: &[(&str, &str, &str, &[&str])] = &[
    ("ወእምበ", "wa-em-ba-", "and from in", &["ወ", "እም", "በ"]),
    ("ወለእም", "wa-la-em-", "and for from", &["ወ", "ለ", "እም"]),
    ("ወእም", "wa-em-", "and from", &["ወ", "እም"]),
    ("በእም", "ba-em-", "in/by from", &["በ", "እም"]),
    ("ዘእም", "za-em-", "of/from", &["ዘ", "እም"]),
    ("እምበ", "em-ba-", "from in", &["እም", "በ"]),
    ("ወበ", "wa-ba-", "and in", &["ወ", "በ"]),
    ("ወለ", "wa-la-", "and for", &["ወ", "ለ"]),
    ("ወይ", "wa-yi-", "and he (impf)", &["ወ", "ይ"]),
    ("ወት", "wa-ti-", "and she/you (impf)", &["ወ", "ት"]),
    ("ወአ", "wa-a-", "and (caus)", &["ወ", "አ"]),
    ("ወዘ", "wa-za-", "and which", &["ወ", "ዘ"]),
    ("ወን", "wa-ni-", "and we (impf)", &["ወ", "ን"]),
    ("ወእ", "wa-e-", "and (from/var)", &["ወ", "እ"]),
    ("በእ", "ba-e-", "in/by (var)", &["በ", "እ"]),
];

// (form, transliteration, gloss, note)
const SUFFIXES: &[(&str, &str, &str, &str)] = &[
    ("ኩም", "-kum", "you (2mp)", "2nd masculine plural"),
    ("ሁም", "-hum", "them (3mp)", "3rd masculine plural"),
    ("ሁን", "-hun", "them (3fp)", "3rd feminine plural"),
    ("ውን", "-won", "them (3fp)", "3rd feminine plural"),
    ("እን", "-en", "us/our", "1cp suffix"),
    ("ኣን", "-an", "plural", "plural ending"),
    ("ኣት", "-at", "feminine plural", "feminine plural ending"),
    ("ውት", "-wot", "feminine plural", "feminine plural"),
    ("ያን", "-yan", "my (pl)", "1cs possessive plural"),
    ("ውም", "-wom", "them (var)", "3mp variant"),
    ("ሁ", "-hu", "his/him (3ms)", "3rd masculine singular"),
    ("ው", "-w", "him (3ms var)", "3rd masculine singular variant"),
    ("ያ", "-ya", "my (1cs)", "1st common singular possessive"),
    ("ኣ", "-a", "her (3fs)", "3rd feminine singular"),
    ("ኩ", "-ku", "I (1cs perf)", "1st common singular perfect"),
    ("ት", "-t", "feminine/abstract", "feminine or abstract marker"),
    ("ክ", "-k", "your (2ms)", "2nd masculine singular"),
    ("ና", "-na", "our/us (1cp)", "1st common plural"),
    ("ም", "-m", "plural/emphatic", "plural or emphatic marker"),
    ("ን", "-n", "plural", "plural marker"),
];

/// Prefix and suffix lists in matching order.
///
/// Both lists are kept sorted longest-first; entries of equal length keep
/// their declaration order. Matching walks them front to back, so a compound
/// like ወእም is always tried before ወ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixTable {
    prefixes: Vec<PrefixRule>,
    suffixes: Vec<Affix>,
}

impl AffixTable {
    pub fn new(mut prefixes: Vec<PrefixRule>, mut suffixes: Vec<Affix>) -> Self {
        // sort_by_key is stable
        prefixes.sort_by_key(|p| std::cmp::Reverse(symbol_len(&p.affix.form)));
        suffixes.sort_by_key(|s| std::cmp::Reverse(symbol_len(&s.form)));
        Self { prefixes, suffixes }
    }

    /// Shared instance of the built-in tables.
    pub fn builtin() -> &'static AffixTable {
        static BUILTIN: OnceLock<AffixTable> = OnceLock::new();
        BUILTIN.get_or_init(AffixTable::default)
    }

    pub fn prefixes(&self) -> &[PrefixRule] {
        &self.prefixes
    }

    pub fn suffixes(&self) -> &[Affix] {
        &self.suffixes
    }
}

impl Default for AffixTable {
    fn default() -> Self {
        Self::new(default_prefixes(), default_suffixes())
    }
}

fn simple_prefix(form: &str) -> Option<Affix> {
    SIMPLE_PREFIXES
        .iter()
        .find(|(f, ..)| *f == form)
        .map(|&(f, translit, gloss, note)| Affix::new(f, translit, gloss).with_note(note))
}

/// Built-in prefixes in declaration order, compounds first.
pub fn default_prefixes() -> Vec<PrefixRule> {
    let compounds = COMPOUND_PREFIXES.iter().map(|&(form, translit, gloss, parts)| PrefixRule {
        affix: Affix::new(form, translit, gloss),
        parts: parts.iter().filter_map(|p| simple_prefix(p)).collect(),
    });
    let simple = SIMPLE_PREFIXES.iter().map(|&(form, translit, gloss, note)| {
        PrefixRule::simple(Affix::new(form, translit, gloss).with_note(note))
    });
    compounds.chain(simple).collect()
}

/// Built-in suffixes in declaration order.
pub fn default_suffixes() -> Vec<Affix> {
    SUFFIXES
        .iter()
        .map(|&(form, translit, gloss, note)| Affix::new(form, translit, gloss).with_note(note))
        .collect()
}
