//! Ge'ez Morphological Resolver Library
//!
//! Aligns Ge'ez word forms against the Dillmann lexicon. A surface form is
//! looked up exactly, then by consonantal skeleton, then with known prefixes
//! and suffixes stripped, so inflected and prefixed forms still find their
//! dictionary entry.
//!
//! # Example
//!
//! ```no_run
//! use geez_resolver::prelude::*;
//! use std::path::Path;
//!
//! let dictionary = Dictionary::load(Path::new("dillmann_dictionary.json"), SkeletonRules::default()).unwrap();
//! let resolver = Resolver::new(&dictionary, AffixTable::builtin(), ResolverParams::default());
//!
//! match resolver.resolve("ወክልኤ") {
//!     Resolution::Matched(m) => println!("{} {}", m.analysis(), m.citation()),
//!     Resolution::Unresolved => println!("not in Dillmann"),
//! }
//! ```
//!
//! # Batch Example
//!
//! ```no_run
//! use geez_resolver::prelude::*;
//! use std::path::Path;
//!
//! let dictionary = Dictionary::load(Path::new("dillmann_dictionary.json"), SkeletonRules::default()).unwrap();
//! let resolver = Resolver::new(&dictionary, AffixTable::builtin(), ResolverParams::default());
//!
//! let vocabulary = extract_from_files(&[Path::new("enoch_geez.txt")]).unwrap();
//! let resolutions = resolve_vocabulary(vocabulary.words(), &resolver, true);
//! let summary = summarize(&resolutions);
//!
//! println!("{} of {} words resolved", summary.resolved, summary.total);
//! ```

pub mod affix;
pub mod batch;
pub mod config;
pub mod dictionary;
pub mod models;
pub mod output;
pub mod resolve;
pub mod skeleton;
pub mod store;
pub mod vocabulary;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::affix::{default_prefixes, default_suffixes, AffixTable};
    pub use crate::batch::{resolve_vocabulary, summarize, unresolved_words};
    pub use crate::config::{
        load_morphology, morphology_or_default, parse_morphology, ConfigError, Morphology,
        MorphologyFile,
    };
    pub use crate::dictionary::{normalize_form, Dictionary, DictionaryError, DictionaryStats};
    pub use crate::models::{
        Affix, Assertion, AssertionKind, DictionaryEntry, Lookup, Match, MatchMethod, PrefixRule,
        Resolution, ResolveSummary, ResolverParams, WordRecord,
    };
    pub use crate::output::{
        format_resolution, print_dictionary_stats, print_summary, print_unresolved, write_csv,
        write_csv_file, write_json, write_json_file, OutputError, ResolutionReport, ResolutionRow,
    };
    pub use crate::resolve::{resolve, Resolver};
    pub use crate::skeleton::{family_base, is_syllable, SkeletonRules};
    pub use crate::store::{
        load_assertions, load_store, save_store, words_to_resolve, Annotator, ApplyReport,
        AssertionTable, StoreError, WordStore,
    };
    pub use crate::vocabulary::{extract_from_files, extract_vocabulary, tokenize, Vocabulary};
}

// Re-export commonly used types at the crate root
pub use dictionary::Dictionary;
pub use models::{Match, MatchMethod, Resolution, ResolverParams};
pub use resolve::{resolve, Resolver};
