#![allow(dead_code)]

use std::fs;
use std::path::Path;

use kpmatch::{Argument, Dataset, KeyPoint, LabelledDataset, Labels, Splits, Stance};

/// Two topics, both stances, a handful of annotated pairs per split.
pub fn debate_split(prefix: &str, arguments: &[(&str, &str, &str, Stance)]) -> LabelledDataset {
    let key_points = vec![
        key_point("kp-1", "school-uniforms", "Uniforms reduce bullying", Stance::Pro),
        key_point("kp-2", "school-uniforms", "Uniforms save families money", Stance::Pro),
        key_point("kp-3", "school-uniforms", "Uniforms limit self expression", Stance::Con),
        key_point("kp-4", "nuclear-energy", "Nuclear energy is low carbon", Stance::Pro),
        key_point("kp-5", "nuclear-energy", "Nuclear waste is dangerous", Stance::Con),
    ];
    let arguments: Vec<Argument> = arguments
        .iter()
        .map(|(id, topic, text, stance)| Argument {
            id: format!("{prefix}-{id}"),
            text: (*text).into(),
            topic: (*topic).into(),
            stance: *stance,
        })
        .collect();
    let data = Dataset::new(arguments, key_points).expect("unique ids");

    // Annotate the pair whose key point shares the most words, plus one
    // negative per argument where a second eligible key point exists.
    let mut labels = Vec::new();
    for argument in data.arguments() {
        let mut eligible: Vec<&KeyPoint> = data
            .key_points()
            .iter()
            .filter(|kp| kp.topic == argument.topic && kp.stance == argument.stance)
            .collect();
        eligible.sort_by_key(|kp| std::cmp::Reverse(shared_words(&argument.text, &kp.text)));
        if let Some(best) = eligible.first() {
            labels.push(((argument.id.clone(), best.id.clone()), 1.0));
        }
        if let Some(other) = eligible.get(1) {
            labels.push(((argument.id.clone(), other.id.clone()), 0.0));
        }
    }
    LabelledDataset::new(data, Labels::try_from_pairs(labels).expect("labels in range"))
        .expect("eligible labels")
}

fn shared_words(a: &str, b: &str) -> usize {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    b.split_whitespace()
        .filter(|word| a.split_whitespace().any(|w| w == *word))
        .count()
}

fn key_point(id: &str, topic: &str, text: &str, stance: Stance) -> KeyPoint {
    KeyPoint {
        id: id.into(),
        text: text.into(),
        topic: topic.into(),
        stance,
    }
}

pub fn splits() -> Splits {
    use Stance::{Con, Pro};
    Splits {
        train: debate_split(
            "train",
            &[
                ("1", "school-uniforms", "Uniforms reduce bullying in schools", Pro),
                ("2", "school-uniforms", "Uniforms save families money on clothes", Pro),
                ("3", "school-uniforms", "Uniforms limit how students show self expression", Con),
                ("4", "nuclear-energy", "Nuclear energy is a low carbon source", Pro),
                ("5", "nuclear-energy", "Nuclear waste stays dangerous for centuries", Con),
                ("6", "school-uniforms", "Bullying drops when uniforms are required", Pro),
            ],
        ),
        dev: debate_split(
            "dev",
            &[
                ("1", "school-uniforms", "Families save money when uniforms are used", Pro),
                ("2", "nuclear-energy", "Reactors emit very low carbon", Pro),
            ],
        ),
        test: debate_split(
            "test",
            &[
                ("1", "school-uniforms", "Uniforms reduce bullying of poorer kids", Pro),
                ("2", "school-uniforms", "Parents save money with uniforms", Pro),
                ("3", "nuclear-energy", "Storing nuclear waste is dangerous", Con),
                ("4", "nuclear-energy", "Low carbon nuclear energy fights climate change", Pro),
            ],
        ),
    }
}

/// Write the splits as JSON files `train.json`, `dev.json`, `test.json`.
pub fn write_splits(dir: &Path, splits: &Splits) {
    fs::create_dir_all(dir).unwrap();
    for (name, data) in [("train", &splits.train), ("dev", &splits.dev), ("test", &splits.test)] {
        let json = serde_json::to_string_pretty(data).unwrap();
        fs::write(dir.join(format!("{name}.json")), json).unwrap();
    }
}
