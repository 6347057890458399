//! Morphological resolution of surface forms against the dictionary.
//!
//! Strategies run in decreasing order of confidence and the first success
//! wins:
//!
//! 1. exact lookup of the whole form
//! 2. consonantal-skeleton lookup of the whole form
//! 3. prefix stripping (longest prefix first), the remainder looked up exact
//!    then consonantal, then with each suffix stripped from the remainder
//! 4. suffix stripping alone on the whole form
//!
//! The resolver holds only shared references, so one instance can be used
//! from many threads at once.

use crate::affix::AffixTable;
use crate::dictionary::Dictionary;
use crate::models::{
    Affix, DictionaryEntry, Lookup, Match, MatchMethod, PrefixRule, Resolution, ResolverParams,
};
use crate::skeleton::symbol_len;

/// A dictionary hit for one stem
#[derive(Debug, Clone)]
struct Found<'d> {
    entry: &'d DictionaryEntry,
    form: String,
    lookup: Lookup,
}

pub struct Resolver<'d, 'a> {
    dictionary: &'d Dictionary,
    affixes: &'a AffixTable,
    params: ResolverParams,
}

impl<'d, 'a> Resolver<'d, 'a> {
    pub fn new(dictionary: &'d Dictionary, affixes: &'a AffixTable, params: ResolverParams) -> Self {
        Self {
            dictionary,
            affixes,
            params,
        }
    }

    pub fn dictionary(&self) -> &'d Dictionary {
        self.dictionary
    }

    pub fn params(&self) -> &ResolverParams {
        &self.params
    }

    /// Resolve one surface form. Never fails; no match is `Unresolved`.
    pub fn resolve(&self, surface: &str) -> Resolution<'d> {
        if surface.is_empty() {
            return Resolution::Unresolved;
        }

        // 1. Exact, before any normalization
        if let Some(found) = self.exact(surface) {
            return Resolution::Matched(self.build(surface, found, Vec::new(), Vec::new(), MatchMethod::Exact));
        }

        // 2. Consonantal skeleton of the whole form
        if self.long_enough(surface) {
            if let Some(found) = self.consonantal(surface) {
                return Resolution::Matched(self.build(
                    surface,
                    found,
                    Vec::new(),
                    Vec::new(),
                    MatchMethod::Consonantal,
                ));
            }
        }

        // 3. Prefix, then prefix + suffix
        for (rule, remainder) in self.prefix_splits(surface) {
            if let Some(found) = self.lookup_stem(remainder) {
                return Resolution::Matched(self.build(
                    remainder,
                    found,
                    rule.components(),
                    Vec::new(),
                    MatchMethod::PrefixStripped,
                ));
            }
            for (suffix, stem) in self.suffix_splits(remainder) {
                if let Some(found) = self.lookup_stem(stem) {
                    return Resolution::Matched(self.build(
                        stem,
                        found,
                        rule.components(),
                        vec![suffix.clone()],
                        MatchMethod::PrefixAndSuffixStripped,
                    ));
                }
            }
        }

        // 4. Suffix only
        for (suffix, stem) in self.suffix_splits(surface) {
            if let Some(found) = self.lookup_stem(stem) {
                return Resolution::Matched(self.build(
                    stem,
                    found,
                    Vec::new(),
                    vec![suffix.clone()],
                    MatchMethod::SuffixStripped,
                ));
            }
        }

        Resolution::Unresolved
    }

    /// Prefixes `surface` starts with, longest first, paired with a remainder
    /// long enough to be a stem.
    pub fn prefix_splits<'s>(
        &self,
        surface: &'s str,
    ) -> impl Iterator<Item = (&'a PrefixRule, &'s str)> {
        let affixes: &'a AffixTable = self.affixes;
        let min = self.params.min_stem_len;
        affixes.prefixes().iter().filter_map(move |rule| {
            surface
                .strip_prefix(rule.affix.form.as_str())
                .filter(|rest| long_enough(rest, min))
                .map(|rest| (rule, rest))
        })
    }

    /// Suffixes `form` ends with, longest first, paired with a stem long
    /// enough to look up.
    pub fn suffix_splits<'s>(&self, form: &'s str) -> impl Iterator<Item = (&'a Affix, &'s str)> {
        let affixes: &'a AffixTable = self.affixes;
        let min = self.params.min_stem_len;
        affixes.suffixes().iter().filter_map(move |suffix| {
            form.strip_suffix(suffix.form.as_str())
                .filter(|stem| long_enough(stem, min))
                .map(|stem| (suffix, stem))
        })
    }

    fn long_enough(&self, form: &str) -> bool {
        long_enough(form, self.params.min_stem_len)
    }

    fn acceptable(&self, entry: &DictionaryEntry) -> bool {
        !self.params.require_entry_id || entry.has_entry_id()
    }

    /// Exact then consonantal lookup of a stripped stem.
    fn lookup_stem(&self, stem: &str) -> Option<Found<'d>> {
        if !self.long_enough(stem) {
            return None;
        }
        self.exact(stem).or_else(|| self.consonantal(stem))
    }

    fn exact(&self, form: &str) -> Option<Found<'d>> {
        let dictionary: &'d Dictionary = self.dictionary;
        dictionary
            .lookup_exact(form)
            .filter(|entry| self.acceptable(entry))
            .map(|entry| Found {
                entry,
                form: form.to_string(),
                lookup: Lookup::Exact,
            })
    }

    /// Skeleton lookup. Among colliding entries, the first one with an entry
    /// id wins, otherwise the first in enumeration order.
    fn consonantal(&self, form: &str) -> Option<Found<'d>> {
        if !self.params.consonantal {
            return None;
        }
        let dictionary: &'d Dictionary = self.dictionary;
        let key = dictionary.skeleton(form);
        let candidates = dictionary.skeleton_candidates(&key);

        let numbered = candidates
            .iter()
            .find(|hit| dictionary.entries()[hit.entry].has_entry_id());
        let chosen = match numbered {
            Some(hit) => Some(hit),
            None if !self.params.require_entry_id => candidates.first(),
            None => None,
        }?;

        Some(Found {
            entry: &dictionary.entries()[chosen.entry],
            form: chosen.form.clone(),
            lookup: Lookup::Consonantal,
        })
    }

    fn build(
        &self,
        stem: &str,
        found: Found<'d>,
        stripped_prefixes: Vec<Affix>,
        stripped_suffixes: Vec<Affix>,
        method: MatchMethod,
    ) -> Match<'d> {
        Match {
            entry: found.entry,
            stem: stem.to_string(),
            matched_form: found.form,
            stripped_prefixes,
            stripped_suffixes,
            method,
            lookup: found.lookup,
        }
    }
}

fn long_enough(form: &str, min_stem_len: usize) -> bool {
    !form.is_empty() && symbol_len(form) >= min_stem_len
}

/// Resolve with the built-in affix tables and default parameters.
pub fn resolve<'d>(surface: &str, dictionary: &'d Dictionary) -> Resolution<'d> {
    Resolver::new(dictionary, AffixTable::builtin(), ResolverParams::default()).resolve(surface)
}
