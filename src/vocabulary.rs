//! Vocabulary extraction from Ge'ez running text.
//!
//! Words are separated by whitespace and by the Ethiopic punctuation marks
//! U+1361 to U+1368 (word space, full stop, comma, semicolon, colon,
//! preface colon, question mark, paragraph separator).

use crate::skeleton::is_syllable;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Ethiopic word-boundary and punctuation marks.
pub const WORD_SEPARATORS: [char; 8] = ['፡', '።', '፣', '፤', '፥', '፦', '፧', '፨'];

fn is_separator(c: char) -> bool {
    c.is_whitespace() || WORD_SEPARATORS.contains(&c)
}

/// Split text into word tokens. Tokens without any Ethiopic syllable
/// (verse numbers, Latin notes, Ethiopic numerals) are dropped.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator)
        .filter(|token| token.chars().any(is_syllable))
}

/// A distinct surface form and how often it occurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub count: usize,
}

/// Distinct surface forms in first-occurrence order
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    counts: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(&mut self, text: &str) {
        for token in tokenize(text) {
            self.add(token);
        }
    }

    pub fn add(&mut self, word: &str) {
        match self.counts.get_mut(word) {
            Some(count) => *count += 1,
            None => {
                self.words.push(word.to_string());
                self.counts.insert(word.to_string(), 1);
            }
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn count(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Total number of tokens seen.
    pub fn token_count(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn entries(&self) -> Vec<VocabularyEntry> {
        self.words
            .iter()
            .map(|word| VocabularyEntry {
                word: word.clone(),
                count: self.count(word),
            })
            .collect()
    }
}

pub fn extract_vocabulary(text: &str) -> Vocabulary {
    let mut vocabulary = Vocabulary::new();
    vocabulary.add_text(text);
    vocabulary
}

/// Extract one vocabulary across several files, in file order.
pub fn extract_from_files<P: AsRef<Path>>(paths: &[P]) -> std::io::Result<Vocabulary> {
    let mut vocabulary = Vocabulary::new();
    for path in paths {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let before = vocabulary.len();
        vocabulary.add_text(&text);
        tracing::debug!(
            path = %path.display(),
            new_words = vocabulary.len() - before,
            "extracted vocabulary"
        );
    }
    tracing::info!(
        files = paths.len(),
        words = vocabulary.len(),
        tokens = vocabulary.token_count(),
        "vocabulary ready"
    );
    Ok(vocabulary)
}
