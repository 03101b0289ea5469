use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Filesystem-safe identifier for a matcher or metric configuration.
///
/// A slug is the only cross-process contract for cache and model directory
/// names, so it is validated on construction: non-empty, only `[a-z0-9-]`,
/// no leading, trailing or doubled dashes.
///
/// ```rust
/// use model::Slug;
///
/// let slug = Slug::from_parts(["cascade", "0p5", "all", "none"]).unwrap();
/// assert_eq!(slug.as_str(), "cascade-0p5-all-none");
/// assert!(Slug::parse("Term Overlap").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate `value` as a slug.
    pub fn parse(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let valid_chars = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if value.is_empty()
            || !valid_chars
            || value.starts_with('-')
            || value.ends_with('-')
            || value.contains("--")
        {
            return Err(ModelError::InvalidSlug(value));
        }
        Ok(Slug(value))
    }

    /// Slug from a literal known at compile time.
    ///
    /// # Panics
    ///
    /// If `value` is not a valid slug.
    pub fn from_static(value: &'static str) -> Self {
        match Self::parse(value) {
            Ok(slug) => slug,
            Err(err) => panic!("{err}"),
        }
    }

    /// Join non-empty parts with dashes and validate the result.
    pub fn from_parts<I, S>(parts: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = parts
            .into_iter()
            .filter(|part| !part.as_ref().is_empty())
            .map(|part| part.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("-");
        Self::parse(joined)
    }

    /// Append a numeric fragment, which can never invalidate a slug.
    pub fn with_number(&self, number: u64) -> Self {
        Slug(format!("{}-{number}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for Slug {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Slug::parse(value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

/// Encode a hyperparameter so it can be embedded in a slug.
///
/// The decimal point becomes `p` and a minus sign becomes `m`, so the same
/// value always yields the same fragment and never leaves the slug alphabet.
///
/// ```rust
/// use model::slug_float;
///
/// assert_eq!(slug_float(0.5), "0p5");
/// assert_eq!(slug_float(1e-5), "0p00001");
/// assert_eq!(slug_float(-0.25), "m0p25");
/// assert_eq!(slug_float(10.0), "10");
/// ```
pub fn slug_float(value: f64) -> String {
    format!("{value}")
        .to_ascii_lowercase()
        .chars()
        .filter_map(|c| match c {
            '.' => Some('p'),
            '-' => Some('m'),
            '+' => None,
            other => Some(other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_slug_alphabet() {
        for ok in ["all", "term-overlap", "random-42", "cascade-0p5-all-none"] {
            assert!(Slug::parse(ok).is_ok(), "{ok} should be a valid slug");
        }
    }

    #[test]
    fn parse_rejects_everything_else() {
        for bad in ["", "All", "term overlap", "cascade-0.5", "-all", "all-", "a--b", "ä"] {
            assert!(
                matches!(Slug::parse(bad), Err(ModelError::InvalidSlug(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn from_parts_skips_empty_fragments() {
        let slug = Slug::from_parts(["term-overlap", "", "stop-words"]).unwrap();
        assert_eq!(slug.as_str(), "term-overlap-stop-words");
    }

    #[test]
    fn numeric_suffix() {
        assert_eq!(Slug::from_static("random").with_number(42).as_str(), "random-42");
    }

    #[test]
    fn encoded_floats_are_valid_fragments() {
        for value in [0.0, 0.3, 1e-5, 4e-5, 1.0, 123.456, -2.5, f64::NAN, f64::INFINITY] {
            let fragment = slug_float(value);
            assert!(
                Slug::parse(format!("x-{fragment}")).is_ok(),
                "{value} encoded as {fragment}"
            );
        }
    }

    #[test]
    fn distinct_values_give_distinct_fragments() {
        assert_ne!(slug_float(0.3), slug_float(0.03));
        assert_ne!(slug_float(1e-5), slug_float(1e-4));
        assert_eq!(slug_float(0.1 + 0.2), slug_float(0.1 + 0.2));
    }

    #[test]
    fn serde_validates() {
        let slug: Slug = serde_json::from_str("\"map\"").unwrap();
        assert_eq!(slug.as_str(), "map");
        assert!(serde_json::from_str::<Slug>("\"MAP\"").is_err());
    }
}
