//! Morphology file: replacement affix tables and homophone merges.
//!
//! ```json
//! {
//!   "prefixes": [{"form": "ወ", "translit": "wa-", "gloss": "and"}],
//!   "suffixes": [{"form": "ሁ", "translit": "-hu", "gloss": "his/him (3ms)"}],
//!   "homophones": [{"from": "ሐ", "to": "ሀ"}]
//! }
//! ```
//!
//! Every section is optional; a missing section keeps the built-in table.

use crate::affix::{default_prefixes, default_suffixes, AffixTable};
use crate::models::{Affix, PrefixRule};
use crate::skeleton::{is_syllable, SkeletonRules};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid affix {form:?}: {reason}")]
    InvalidAffix { form: String, reason: String },
    #[error("Invalid homophone pair {from:?} -> {to:?}: both sides must be Ethiopic syllables")]
    InvalidHomophone { from: char, to: char },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomophonePair {
    pub from: char,
    pub to: char,
}

/// On-disk layout of a morphology file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MorphologyFile {
    #[serde(default)]
    pub prefixes: Option<Vec<PrefixRule>>,
    #[serde(default)]
    pub suffixes: Option<Vec<Affix>>,
    #[serde(default)]
    pub homophones: Option<Vec<HomophonePair>>,
}

/// Affix tables and skeleton rules used for one run
#[derive(Debug, Clone, Default)]
pub struct Morphology {
    pub affixes: AffixTable,
    pub rules: SkeletonRules,
}

impl MorphologyFile {
    /// Validate and fill missing sections from the built-in tables.
    pub fn into_morphology(self) -> Result<Morphology, ConfigError> {
        let prefixes = self.prefixes.unwrap_or_else(default_prefixes);
        let suffixes = self.suffixes.unwrap_or_else(default_suffixes);

        for rule in &prefixes {
            validate_prefix(rule)?;
        }
        for suffix in &suffixes {
            validate_affix(suffix)?;
        }

        let rules = match self.homophones {
            Some(pairs) => {
                for pair in &pairs {
                    if !is_syllable(pair.from) || !is_syllable(pair.to) {
                        return Err(ConfigError::InvalidHomophone {
                            from: pair.from,
                            to: pair.to,
                        });
                    }
                }
                SkeletonRules::with_homophones(pairs.into_iter().map(|p| (p.from, p.to)))
            }
            None => SkeletonRules::default(),
        };

        Ok(Morphology {
            affixes: AffixTable::new(prefixes, suffixes),
            rules,
        })
    }
}

fn validate_affix(affix: &Affix) -> Result<(), ConfigError> {
    if affix.form.trim().is_empty() {
        return Err(ConfigError::InvalidAffix {
            form: affix.form.clone(),
            reason: "empty form".to_string(),
        });
    }
    if !affix.form.chars().all(is_syllable) {
        return Err(ConfigError::InvalidAffix {
            form: affix.form.clone(),
            reason: "form must contain Ethiopic syllables only".to_string(),
        });
    }
    Ok(())
}

fn validate_prefix(rule: &PrefixRule) -> Result<(), ConfigError> {
    validate_affix(&rule.affix)?;
    if rule.parts.is_empty() {
        return Ok(());
    }
    for part in &rule.parts {
        validate_affix(part)?;
    }
    let joined: String = rule.parts.iter().map(|p| p.form.as_str()).collect();
    if joined != rule.affix.form {
        return Err(ConfigError::InvalidAffix {
            form: rule.affix.form.clone(),
            reason: format!("components concatenate to {:?}", joined),
        });
    }
    Ok(())
}

/// Parse a morphology file from a string.
pub fn parse_morphology(text: &str) -> Result<Morphology, ConfigError> {
    let file: MorphologyFile = serde_json::from_str(text)?;
    file.into_morphology()
}

/// Load a morphology file.
pub fn load_morphology(path: &Path) -> Result<Morphology, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let morphology = parse_morphology(&text)?;
    tracing::info!(
        path = %path.display(),
        prefixes = morphology.affixes.prefixes().len(),
        suffixes = morphology.affixes.suffixes().len(),
        homophones = morphology.rules.homophones().count(),
        "loaded morphology"
    );
    Ok(morphology)
}

/// The built-in morphology, or the one in `path` when given.
pub fn morphology_or_default(path: Option<&Path>) -> Result<Morphology, ConfigError> {
    match path {
        Some(path) => load_morphology(path),
        None => Ok(Morphology::default()),
    }
}
