//! Reference matchers that need no model.

use model::{Dataset, Labels, Slug};

use crate::contract::{label_eligible_pairs, UntrainedMatcher};
use crate::MatcherError;

/// Labels every eligible pair as a match.
#[derive(Debug, Clone)]
pub struct AllMatcher {
    slug: Slug,
}

impl AllMatcher {
    pub fn new() -> Self {
        Self {
            slug: Slug::from_static("all"),
        }
    }
}

impl Default for AllMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UntrainedMatcher for AllMatcher {
    fn slug(&self) -> &Slug {
        &self.slug
    }

    fn name(&self) -> Option<&str> {
        Some("All")
    }

    fn description(&self) -> Option<&str> {
        Some("Match every argument with every eligible key point.")
    }

    fn predict(&self, data: &Dataset) -> Result<Labels, MatcherError> {
        Ok(label_eligible_pairs(data, |_, _| 1.0))
    }
}

/// Labels every eligible pair as a non-match.
#[derive(Debug, Clone)]
pub struct NoneMatcher {
    slug: Slug,
}

impl NoneMatcher {
    pub fn new() -> Self {
        Self {
            slug: Slug::from_static("none"),
        }
    }
}

impl Default for NoneMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UntrainedMatcher for NoneMatcher {
    fn slug(&self) -> &Slug {
        &self.slug
    }

    fn name(&self) -> Option<&str> {
        Some("None")
    }

    fn description(&self) -> Option<&str> {
        Some("Match no argument with any key point.")
    }

    fn predict(&self, data: &Dataset) -> Result<Labels, MatcherError> {
        Ok(label_eligible_pairs(data, |_, _| 0.0))
    }
}

/// Pseudo-random labels in `[0, 1)`, reproducible for a given seed.
///
/// Each label is derived from a hash of the seed and both ids, so it does
/// not depend on dataset order or on which other pairs are predicted.
#[derive(Debug, Clone)]
pub struct RandomMatcher {
    seed: u64,
    slug: Slug,
}

impl RandomMatcher {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            slug: Slug::from_static("random").with_number(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl UntrainedMatcher for RandomMatcher {
    fn slug(&self) -> &Slug {
        &self.slug
    }

    fn name(&self) -> Option<&str> {
        Some("Random")
    }

    fn description(&self) -> Option<&str> {
        Some("Label each pair with a seeded pseudo-random value.")
    }

    fn predict(&self, data: &Dataset) -> Result<Labels, MatcherError> {
        Ok(label_eligible_pairs(data, |argument, key_point| {
            let hash = fxhash::hash64(&(self.seed, &argument.id, &key_point.id));
            // Top 53 bits fill an f64 mantissa exactly.
            (hash >> 11) as f64 / (1u64 << 53) as f64
        }))
    }
}
