use model::{Argument, KeyPoint, Label, LabelledDataset, PairId};

use crate::LabelPolicy;

/// One supervised pair handed to a trained matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingExample<'a> {
    pub argument: &'a Argument,
    pub key_point: &'a KeyPoint,
    pub label: Label,
}

/// Supervised pairs of `data` under `policy`, in eligible-pair order.
///
/// Annotated pairs always keep their label. Unannotated eligible pairs are
/// dropped or filled in according to [`LabelPolicy::missing_label`].
pub fn training_examples(data: &LabelledDataset, policy: LabelPolicy) -> Vec<TrainingExample<'_>> {
    let labels = data.labels();
    let fill = policy.missing_label();
    data.eligible_pairs()
        .filter_map(|(argument, key_point)| {
            let pair = PairId::new(argument.id.as_str(), key_point.id.as_str());
            let label = labels.get(&pair).or(fill)?;
            Some(TrainingExample {
                argument,
                key_point,
                label,
            })
        })
        .collect()
}
