use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ArgumentId, KeyPointId, ModelError};

/// Match strength for one pair. `1.0` is a match, `0.0` no match, anything in
/// between is a soft label.
pub type Label = f64;

/// Key of a [`Labels`] mapping: one argument paired with one key point.
///
/// Ordered by argument id, then key point id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairId {
    pub argument_id: ArgumentId,
    pub key_point_id: KeyPointId,
}

impl PairId {
    pub fn new(argument_id: impl Into<ArgumentId>, key_point_id: impl Into<KeyPointId>) -> Self {
        Self {
            argument_id: argument_id.into(),
            key_point_id: key_point_id.into(),
        }
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.argument_id, self.key_point_id)
    }
}

impl<A: Into<ArgumentId>, K: Into<KeyPointId>> From<(A, K)> for PairId {
    fn from((argument_id, key_point_id): (A, K)) -> Self {
        PairId::new(argument_id, key_point_id)
    }
}

/// Sparse mapping from argument / key point pairs to labels.
///
/// A `Labels` value need not cover every pair of a dataset, and predicted and
/// ground-truth mappings usually cover different pairs. Consumers decide what
/// a missing entry means; this type only records what is present.
///
/// `Labels` is built once (via [`Labels::try_from_pairs`] or
/// [`FromIterator`]) and never patched afterwards.
///
/// The serde form is the shared-task submission layout, an object keyed by
/// argument id holding objects keyed by key point id:
///
/// ```rust
/// use model::{Labels, PairId};
///
/// let labels = Labels::try_from_pairs([
///     (PairId::new("arg_1", "kp_1"), 0.9),
///     (PairId::new("arg_1", "kp_2"), 0.1),
/// ])
/// .unwrap();
///
/// let json = labels.to_submission_json().unwrap();
/// assert_eq!(json, r#"{"arg_1":{"kp_1":0.9,"kp_2":0.1}}"#);
/// assert_eq!(Labels::from_submission_json(&json).unwrap(), labels);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    entries: BTreeMap<PairId, Label>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping, rejecting values that are not finite or lie outside `[0, 1]`.
    pub fn try_from_pairs<I, P>(pairs: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (P, Label)>,
        P: Into<PairId>,
    {
        let mut entries = BTreeMap::new();
        for (pair, value) in pairs {
            let pair = pair.into();
            check_range(&pair, value)?;
            entries.insert(pair, value);
        }
        Ok(Self { entries })
    }

    /// First entry that is not finite or lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.entries
            .iter()
            .try_for_each(|(pair, value)| check_range(pair, *value))
    }

    pub fn get(&self, pair: &PairId) -> Option<Label> {
        self.entries.get(pair).copied()
    }

    pub fn contains(&self, pair: &PairId) -> bool {
        self.entries.contains_key(pair)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs present in this mapping, in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &PairId> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairId, Label)> {
        self.entries.iter().map(|(pair, value)| (pair, *value))
    }

    /// Encode as shared-task submission JSON.
    pub fn to_submission_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode shared-task submission JSON, validating label ranges.
    pub fn from_submission_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn check_range(pair: &PairId, value: Label) -> Result<(), ModelError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ModelError::LabelOutOfRange {
            pair: pair.clone(),
            value,
        })
    }
}

impl<P: Into<PairId>> FromIterator<(P, Label)> for Labels {
    /// Collect matcher output without range checks; see [`Labels::validate`].
    fn from_iter<T: IntoIterator<Item = (P, Label)>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .map(|(pair, value)| (pair.into(), value))
            .collect();
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a Labels {
    type Item = (&'a PairId, &'a Label);
    type IntoIter = std::collections::btree_map::Iter<'a, PairId, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Labels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut nested: BTreeMap<&str, BTreeMap<&str, Label>> = BTreeMap::new();
        for (pair, value) in &self.entries {
            nested
                .entry(pair.argument_id.as_str())
                .or_default()
                .insert(pair.key_point_id.as_str(), *value);
        }
        nested.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Labels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let nested = BTreeMap::<String, BTreeMap<String, Label>>::deserialize(deserializer)?;
        let pairs = nested.into_iter().flat_map(|(argument_id, inner)| {
            inner
                .into_iter()
                .map(move |(key_point_id, value)| (PairId::new(argument_id.clone(), key_point_id), value))
        });
        Labels::try_from_pairs(pairs).map_err(D::Error::custom)
    }
}
