//! Small vaccination debate shared by the unit tests.

use model::{Argument, Dataset, KeyPoint, LabelledDataset, Labels, Stance};

fn argument(id: &str, text: &str, stance: Stance) -> Argument {
    Argument {
        id: id.into(),
        text: text.into(),
        topic: "vaccination".into(),
        stance,
    }
}

fn key_point(id: &str, text: &str, stance: Stance) -> KeyPoint {
    KeyPoint {
        id: id.into(),
        text: text.into(),
        topic: "vaccination".into(),
        stance,
    }
}

pub(crate) fn dataset() -> Dataset {
    Dataset::new(
        vec![
            argument("a1", "Vaccines save countless lives every year", Stance::Pro),
            argument(
                "a2",
                "Parents should decide, vaccination is a personal choice",
                Stance::Pro,
            ),
            argument("a3", "Routine vaccines save the lives of children", Stance::Pro),
            argument("a4", "Getting the vaccination should remain a personal choice", Stance::Pro),
            argument("a5", "The side effects of vaccines can be dangerous", Stance::Con),
        ],
        vec![
            key_point("k1", "Vaccines save lives", Stance::Pro),
            key_point("k2", "Vaccination is a personal choice", Stance::Pro),
            key_point("k3", "Vaccines have dangerous side effects", Stance::Con),
        ],
    )
    .unwrap()
}

pub(crate) fn labelled() -> LabelledDataset {
    let labels = Labels::try_from_pairs([
        (("a1", "k1"), 1.0),
        (("a1", "k2"), 0.0),
        (("a2", "k1"), 0.0),
        (("a2", "k2"), 1.0),
        (("a3", "k1"), 1.0),
        (("a3", "k2"), 0.0),
        (("a4", "k1"), 0.0),
        (("a4", "k2"), 1.0),
        (("a5", "k3"), 1.0),
    ])
    .unwrap();
    LabelledDataset::new(dataset(), labels).unwrap()
}

pub(crate) fn unlabelled() -> LabelledDataset {
    LabelledDataset::new(dataset(), Labels::new()).unwrap()
}
