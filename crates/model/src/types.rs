use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::labels::{Labels, PairId};
use crate::ModelError;

/// Identifier of an [`Argument`].
pub type ArgumentId = String;

/// Identifier of a [`KeyPoint`].
pub type KeyPointId = String;

/// Topic name or title shared by arguments and key points.
pub type Topic = String;

/// Stance towards a topic. Serialized as `1` (pro) or `-1` (con).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Stance {
    Pro,
    Con,
}

impl TryFrom<i8> for Stance {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Stance::Pro),
            -1 => Ok(Stance::Con),
            other => Err(format!("stance must be 1 or -1, got {other}")),
        }
    }
}

impl From<Stance> for i8 {
    fn from(value: Stance) -> Self {
        match value {
            Stance::Pro => 1,
            Stance::Con => -1,
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", i8::from(*self))
    }
}

/// Single argument with a stance towards its topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    pub id: ArgumentId,
    pub text: String,
    pub topic: Topic,
    pub stance: Stance,
}

/// Candidate summary claim with a stance towards its topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPoint {
    pub id: KeyPointId,
    pub text: String,
    pub topic: Topic,
    pub stance: Stance,
}

/// Whether a pair may ever be labelled: same topic and same stance.
pub fn is_eligible(argument: &Argument, key_point: &KeyPoint) -> bool {
    argument.topic == key_point.topic && argument.stance == key_point.stance
}

/// Arguments and key points, each unique by id.
///
/// Built once by a loader and read-only afterwards. Insertion order is kept
/// so that [`Dataset::eligible_pairs`] is stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset", into = "RawDataset")]
pub struct Dataset {
    arguments: Vec<Argument>,
    key_points: Vec<KeyPoint>,
    argument_index: HashMap<ArgumentId, usize>,
    key_point_index: HashMap<KeyPointId, usize>,
}

#[derive(Serialize, Deserialize)]
struct RawDataset {
    arguments: Vec<Argument>,
    key_points: Vec<KeyPoint>,
}

impl Dataset {
    pub fn new(arguments: Vec<Argument>, key_points: Vec<KeyPoint>) -> Result<Self, ModelError> {
        let mut argument_index = HashMap::with_capacity(arguments.len());
        for (pos, argument) in arguments.iter().enumerate() {
            if argument_index.insert(argument.id.clone(), pos).is_some() {
                return Err(ModelError::DuplicateArgument(argument.id.clone()));
            }
        }
        let mut key_point_index = HashMap::with_capacity(key_points.len());
        for (pos, key_point) in key_points.iter().enumerate() {
            if key_point_index.insert(key_point.id.clone(), pos).is_some() {
                return Err(ModelError::DuplicateKeyPoint(key_point.id.clone()));
            }
        }
        Ok(Self {
            arguments,
            key_points,
            argument_index,
            key_point_index,
        })
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn key_points(&self) -> &[KeyPoint] {
        &self.key_points
    }

    pub fn argument(&self, id: &str) -> Option<&Argument> {
        self.argument_index.get(id).map(|&pos| &self.arguments[pos])
    }

    pub fn key_point(&self, id: &str) -> Option<&KeyPoint> {
        self.key_point_index.get(id).map(|&pos| &self.key_points[pos])
    }

    /// Every pair sharing topic and stance, arguments outermost.
    pub fn eligible_pairs(&self) -> impl Iterator<Item = (&Argument, &KeyPoint)> + '_ {
        self.arguments.iter().flat_map(move |argument| {
            self.key_points
                .iter()
                .filter(move |key_point| is_eligible(argument, key_point))
                .map(move |key_point| (argument, key_point))
        })
    }

    /// Ids of every eligible pair, in [`Dataset::eligible_pairs`] order.
    pub fn eligible_pair_ids(&self) -> impl Iterator<Item = PairId> + '_ {
        self.eligible_pairs()
            .map(|(argument, key_point)| PairId::new(argument.id.clone(), key_point.id.clone()))
    }

    /// Resolve both sides of `pair`, if both exist and the pair is eligible.
    pub fn resolve(&self, pair: &PairId) -> Option<(&Argument, &KeyPoint)> {
        let argument = self.argument(&pair.argument_id)?;
        let key_point = self.key_point(&pair.key_point_id)?;
        is_eligible(argument, key_point).then_some((argument, key_point))
    }
}

impl TryFrom<RawDataset> for Dataset {
    type Error = ModelError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        Dataset::new(raw.arguments, raw.key_points)
    }
}

impl From<Dataset> for RawDataset {
    fn from(value: Dataset) -> Self {
        RawDataset {
            arguments: value.arguments,
            key_points: value.key_points,
        }
    }
}

/// Dataset with (possibly partial) ground-truth labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLabelledDataset", into = "RawLabelledDataset")]
pub struct LabelledDataset {
    dataset: Dataset,
    labels: Labels,
}

#[derive(Serialize, Deserialize)]
struct RawLabelledDataset {
    arguments: Vec<Argument>,
    key_points: Vec<KeyPoint>,
    #[serde(default)]
    labels: Labels,
}

impl LabelledDataset {
    /// Attach `labels` to `dataset`. Every label must reference a known,
    /// eligible pair.
    pub fn new(dataset: Dataset, labels: Labels) -> Result<Self, ModelError> {
        for pair in labels.keys() {
            let argument = dataset
                .argument(&pair.argument_id)
                .ok_or_else(|| ModelError::UnknownArgument(pair.argument_id.clone()))?;
            let key_point = dataset
                .key_point(&pair.key_point_id)
                .ok_or_else(|| ModelError::UnknownKeyPoint(pair.key_point_id.clone()))?;
            if !is_eligible(argument, key_point) {
                return Err(ModelError::IneligiblePair(pair.clone()));
            }
        }
        Ok(Self { dataset, labels })
    }

    pub fn as_dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn arguments(&self) -> &[Argument] {
        self.dataset.arguments()
    }

    pub fn key_points(&self) -> &[KeyPoint] {
        self.dataset.key_points()
    }

    pub fn eligible_pairs(&self) -> impl Iterator<Item = (&Argument, &KeyPoint)> + '_ {
        self.dataset.eligible_pairs()
    }
}

impl AsRef<Dataset> for LabelledDataset {
    fn as_ref(&self) -> &Dataset {
        &self.dataset
    }
}

impl TryFrom<RawLabelledDataset> for LabelledDataset {
    type Error = ModelError;

    fn try_from(raw: RawLabelledDataset) -> Result<Self, Self::Error> {
        let dataset = Dataset::new(raw.arguments, raw.key_points)?;
        LabelledDataset::new(dataset, raw.labels)
    }
}

impl From<LabelledDataset> for RawLabelledDataset {
    fn from(value: LabelledDataset) -> Self {
        RawLabelledDataset {
            arguments: value.dataset.arguments,
            key_points: value.dataset.key_points,
            labels: value.labels,
        }
    }
}

/// Which part of a shared-task corpus a dataset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSplit {
    Train,
    Dev,
    Test,
}

impl fmt::Display for DatasetSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Dev => "dev",
            DatasetSplit::Test => "test",
        };
        f.write_str(name)
    }
}

/// The three splits a pipeline run consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Splits {
    pub train: LabelledDataset,
    pub dev: LabelledDataset,
    pub test: LabelledDataset,
}

impl Splits {
    pub fn get(&self, split: DatasetSplit) -> &LabelledDataset {
        match split {
            DatasetSplit::Train => &self.train,
            DatasetSplit::Dev => &self.dev,
            DatasetSplit::Test => &self.test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argument(id: &str, topic: &str, stance: Stance) -> Argument {
        Argument {
            id: id.into(),
            text: format!("argument {id}"),
            topic: topic.into(),
            stance,
        }
    }

    fn key_point(id: &str, topic: &str, stance: Stance) -> KeyPoint {
        KeyPoint {
            id: id.into(),
            text: format!("key point {id}"),
            topic: topic.into(),
            stance,
        }
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                argument("a1", "T", Stance::Pro),
                argument("a2", "T", Stance::Con),
                argument("a3", "U", Stance::Pro),
            ],
            vec![
                key_point("k1", "T", Stance::Pro),
                key_point("k2", "T", Stance::Con),
                key_point("k3", "T", Stance::Pro),
            ],
        )
        .expect("valid dataset")
    }

    #[test]
    fn eligible_pairs_require_topic_and_stance() {
        let ids: Vec<String> = sample().eligible_pair_ids().map(|p| p.to_string()).collect();
        assert_eq!(ids, vec!["(a1, k1)", "(a1, k3)", "(a2, k2)"]);
    }

    #[test]
    fn opposite_stance_is_not_eligible() {
        let arg = argument("a", "T", Stance::Pro);
        let kp = key_point("k", "T", Stance::Con);
        assert!(!is_eligible(&arg, &kp));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Dataset::new(
            vec![argument("a1", "T", Stance::Pro), argument("a1", "T", Stance::Con)],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, ModelError::DuplicateArgument("a1".into()));

        let err = Dataset::new(
            vec![],
            vec![key_point("k1", "T", Stance::Pro), key_point("k1", "U", Stance::Pro)],
        )
        .unwrap_err();
        assert_eq!(err, ModelError::DuplicateKeyPoint("k1".into()));
    }

    #[test]
    fn labelled_dataset_validates_labels() {
        let ok = Labels::try_from_pairs([(("a1", "k1"), 1.0)]).unwrap();
        assert!(LabelledDataset::new(sample(), ok).is_ok());

        let unknown = Labels::try_from_pairs([(("zz", "k1"), 1.0)]).unwrap();
        assert_eq!(
            LabelledDataset::new(sample(), unknown).unwrap_err(),
            ModelError::UnknownArgument("zz".into())
        );

        let unknown_kp = Labels::try_from_pairs([(("a1", "zz"), 1.0)]).unwrap();
        assert_eq!(
            LabelledDataset::new(sample(), unknown_kp).unwrap_err(),
            ModelError::UnknownKeyPoint("zz".into())
        );

        let ineligible = Labels::try_from_pairs([(("a1", "k2"), 0.0)]).unwrap();
        assert_eq!(
            LabelledDataset::new(sample(), ineligible).unwrap_err(),
            ModelError::IneligiblePair(PairId::new("a1", "k2"))
        );
    }

    #[test]
    fn stance_serializes_as_signed_integer() {
        assert_eq!(serde_json::to_string(&Stance::Pro).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Stance::Con).unwrap(), "-1");
        assert_eq!(serde_json::from_str::<Stance>("-1").unwrap(), Stance::Con);
        assert!(serde_json::from_str::<Stance>("0").is_err());
    }

    #[test]
    fn labelled_dataset_deserialization_validates() {
        let json = r#"{
            "arguments": [{"id": "a1", "text": "t", "topic": "T", "stance": 1}],
            "key_points": [
                {"id": "k1", "text": "t", "topic": "T", "stance": 1},
                {"id": "k2", "text": "t", "topic": "T", "stance": -1}
            ],
            "labels": {"a1": {"k1": 1.0}}
        }"#;
        let data: LabelledDataset = serde_json::from_str(json).unwrap();
        assert_eq!(data.labels().len(), 1);
        assert_eq!(data.as_dataset().key_point("k2").map(|k| k.stance), Some(Stance::Con));

        let bad = json.replace(r#""k1": 1.0"#, r#""k2": 1.0"#);
        assert!(serde_json::from_str::<LabelledDataset>(&bad).is_err());
    }

    #[test]
    fn resolve_only_returns_eligible_pairs() {
        let data = sample();
        assert!(data.resolve(&PairId::new("a1", "k1")).is_some());
        assert!(data.resolve(&PairId::new("a1", "k2")).is_none());
        assert!(data.resolve(&PairId::new("missing", "k1")).is_none());
    }
}
