//! Text normalization and term-overlap features shared by the reference
//! matchers.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::MatcherError;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Words ignored when comparing terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Built-in English list.
    pub fn english() -> Self {
        Self {
            words: ENGLISH_STOP_WORDS.iter().map(|w| (*w).to_string()).collect(),
        }
    }

    /// One word per line; blank lines and lines starting with `#` are ignored.
    pub fn from_file(path: &Path) -> Result<Self, MatcherError> {
        let raw = fs::read_to_string(path).map_err(|source| MatcherError::Asset {
            asset: path.to_path_buf(),
            source,
        })?;
        Ok(raw.lines().collect())
    }

    pub fn extend(&mut self, other: StopWords) {
        self.words.extend(other.words);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for StopWords {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let words = iter
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(normalize)
            .collect();
        Self { words }
    }
}

fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Distinct normalized words of `text`, minus stop words.
///
/// NFKC normalization and lowercasing happen before word segmentation, so
/// compatibility forms and case variants produce the same term.
pub fn terms(text: &str, stop_words: Option<&StopWords>) -> BTreeSet<String> {
    normalize(text)
        .unicode_words()
        .filter(|word| stop_words.map_or(true, |stop| !stop.contains(word)))
        .map(str::to_string)
        .collect()
}

/// Reduce each term to its English Snowball stem. Distinct words sharing
/// a stem collapse into one term.
pub fn stem_terms(terms: BTreeSet<String>) -> BTreeSet<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    terms
        .iter()
        .map(|term| stemmer.stem(term).into_owned())
        .collect()
}

/// Number of features in [`OverlapFeatures::to_array`].
pub const FEATURE_COUNT: usize = 4;

/// Overlap statistics of an argument's and a key point's terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapFeatures {
    /// Share of key point terms found in the argument.
    pub key_point_coverage: f64,
    /// Share of argument terms found in the key point.
    pub argument_coverage: f64,
    pub jaccard: f64,
    /// Shorter over longer term count.
    pub length_ratio: f64,
}

impl OverlapFeatures {
    pub fn new(argument_terms: &BTreeSet<String>, key_point_terms: &BTreeSet<String>) -> Self {
        let shared = argument_terms.intersection(key_point_terms).count();
        let union = argument_terms.len() + key_point_terms.len() - shared;
        let shorter = argument_terms.len().min(key_point_terms.len());
        let longer = argument_terms.len().max(key_point_terms.len());
        Self {
            key_point_coverage: share(shared, key_point_terms.len()),
            argument_coverage: share(shared, argument_terms.len()),
            jaccard: share(shared, union),
            length_ratio: share(shorter, longer),
        }
    }

    pub fn to_array(self) -> [f64; FEATURE_COUNT] {
        [
            self.key_point_coverage,
            self.argument_coverage,
            self.jaccard,
            self.length_ratio,
        ]
    }
}

fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
