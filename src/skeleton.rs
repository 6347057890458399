//! Consonantal skeletons over the Ethiopic syllabary.
//!
//! Each consonant occupies a family of eight codepoints (seven vowel orders
//! plus a labialized form). A skeleton replaces every syllable with the first
//! member of its family, then folds historically merged consonants onto one
//! representative. Skeletons are comparison keys only; stored forms are never
//! rewritten.

use std::collections::BTreeMap;

/// First syllable of the Ethiopic block (ሀ).
pub const SYLLABARY_START: u32 = 0x1200;
/// Last syllable before combining marks and punctuation (ፚ).
pub const SYLLABARY_END: u32 = 0x135A;
/// Codepoints per consonant family.
pub const FAMILY_SIZE: u32 = 8;

/// Consonant families pronounced alike in the liturgical tradition.
pub const DEFAULT_HOMOPHONES: &[(char, char)] = &[
    ('ሐ', 'ሀ'), // ḥa -> ha
    ('ሠ', 'ሰ'), // śa -> sa
    ('ጸ', 'ፀ'), // ṣa -> ṣ́a
    ('ዐ', 'አ'), // ʿayn -> ʾalef
];

/// Whether `c` is an Ethiopic syllable (not punctuation, digit or mark).
pub fn is_syllable(c: char) -> bool {
    (SYLLABARY_START..=SYLLABARY_END).contains(&(c as u32))
}

/// First-order member of the family `c` belongs to. Non-syllables map to themselves.
pub fn family_base(c: char) -> char {
    if !is_syllable(c) {
        return c;
    }
    let cp = c as u32;
    let base = cp - (cp - SYLLABARY_START) % FAMILY_SIZE;
    char::from_u32(base).unwrap_or(c)
}

/// Number of script symbols in a form, as used for the minimum stem length.
/// Digits, punctuation and foreign letters do not count.
pub fn symbol_len(s: &str) -> usize {
    s.chars().filter(|&c| is_syllable(c)).count()
}

/// Normalization rules for building skeleton keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonRules {
    homophones: BTreeMap<char, char>, // family base -> representative base
}

impl Default for SkeletonRules {
    fn default() -> Self {
        Self::with_homophones(DEFAULT_HOMOPHONES.iter().copied())
    }
}

impl SkeletonRules {
    /// Rules with vowel stripping only.
    pub fn without_homophones() -> Self {
        Self {
            homophones: BTreeMap::new(),
        }
    }

    /// Both sides of each pair are reduced to their family base first, so
    /// `('ሑ', 'ሁ')` means the same as `('ሐ', 'ሀ')`.
    pub fn with_homophones(pairs: impl IntoIterator<Item = (char, char)>) -> Self {
        let homophones = pairs
            .into_iter()
            .map(|(from, to)| (family_base(from), family_base(to)))
            .filter(|(from, to)| from != to)
            .collect();
        Self { homophones }
    }

    pub fn homophones(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.homophones.iter().map(|(&from, &to)| (from, to))
    }

    /// Normalize one symbol: de-vowel, then de-homophone.
    pub fn normalize(&self, c: char) -> char {
        let base = family_base(c);
        self.homophones.get(&base).copied().unwrap_or(base)
    }

    /// Skeleton key of a whole form.
    pub fn skeleton(&self, form: &str) -> String {
        form.chars().map(|c| self.normalize(c)).collect()
    }
}
