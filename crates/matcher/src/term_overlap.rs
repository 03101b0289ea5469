use std::collections::BTreeSet;
use std::path::PathBuf;

use model::{Dataset, Labels, Slug};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contract::{label_eligible_pairs, UntrainedMatcher};
use crate::terms::{stem_terms, terms, OverlapFeatures, StopWords};
use crate::MatcherError;

/// Settings for [`TermOverlapMatcher`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermOverlapConfig {
    /// Compare English Snowball stems instead of surface words.
    #[serde(default)]
    pub stemming: bool,
    /// Drop the built-in English stop words before comparing.
    #[serde(default)]
    pub stop_words: bool,
    /// Additional stop words, one per line, read by `prepare`.
    #[serde(default)]
    pub custom_stop_words: Option<PathBuf>,
}

/// Labels a pair with the share of key point terms that occur in the
/// argument.
#[derive(Debug, Clone)]
pub struct TermOverlapMatcher {
    config: TermOverlapConfig,
    slug: Slug,
    stop_words: Option<StopWords>,
    prepared: bool,
}

impl TermOverlapMatcher {
    /// The slug names every flag that is set. A custom stop-word file
    /// adds a hash of its path, so different files never share a slug.
    pub fn new(config: TermOverlapConfig) -> Result<Self, MatcherError> {
        let mut slug = Slug::from_parts([
            "term-overlap",
            if config.stemming { "stemming" } else { "" },
            if config.stop_words { "stop-words" } else { "" },
            if config.custom_stop_words.is_some() {
                "custom-stop-words"
            } else {
                ""
            },
        ])?;
        if let Some(path) = &config.custom_stop_words {
            slug = slug.with_number(fxhash::hash64(path));
        }
        Ok(Self {
            prepared: config.custom_stop_words.is_none(),
            stop_words: config.stop_words.then(StopWords::english),
            slug,
            config,
        })
    }

    fn terms(&self, text: &str) -> BTreeSet<String> {
        let terms = terms(text, self.stop_words.as_ref());
        if self.config.stemming {
            stem_terms(terms)
        } else {
            terms
        }
    }

    pub fn config(&self) -> &TermOverlapConfig {
        &self.config
    }
}

impl UntrainedMatcher for TermOverlapMatcher {
    fn slug(&self) -> &Slug {
        &self.slug
    }

    fn name(&self) -> Option<&str> {
        Some("Term overlap")
    }

    fn description(&self) -> Option<&str> {
        Some("Share of key point terms that also occur in the argument.")
    }

    fn prepare(&mut self) -> Result<(), MatcherError> {
        let Some(path) = &self.config.custom_stop_words else {
            return Ok(());
        };
        let mut stop_words = if self.config.stop_words {
            StopWords::english()
        } else {
            StopWords::default()
        };
        let custom = StopWords::from_file(path)?;
        debug!(
            slug = %self.slug,
            path = %path.display(),
            words = custom.len(),
            "custom_stop_words_loaded"
        );
        stop_words.extend(custom);
        self.stop_words = Some(stop_words);
        self.prepared = true;
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> Result<Labels, MatcherError> {
        if !self.prepared {
            return Err(MatcherError::NotPrepared {
                slug: self.slug.to_string(),
                asset: "custom stop words".into(),
            });
        }
        Ok(label_eligible_pairs(data, |argument, key_point| {
            let argument_terms = self.terms(&argument.text);
            let key_point_terms = self.terms(&key_point.text);
            OverlapFeatures::new(&argument_terms, &key_point_terms).key_point_coverage
        }))
    }
}
