use super::*;
use crate::fixtures::{dataset, labelled, unlabelled};
use model::PairId;

fn matcher(config: RegressionConfig) -> RegressionMatcher {
    RegressionMatcher::new(config).expect("valid config")
}

fn trained(dir: &Path) -> RegressionMatcher {
    let mut m = matcher(RegressionConfig::default());
    m.train(&labelled(), &labelled(), &dir.join("cache")).unwrap();
    m
}

#[test]
fn slug_encodes_hyperparameters() {
    assert_eq!(
        matcher(RegressionConfig::default()).slug().as_str(),
        "logistic-regression-0p5-200-0p0001"
    );
    let tuned = matcher(RegressionConfig {
        learning_rate: 0.1,
        epochs: 50,
        weight_decay: 0.0,
        early_stopping: true,
        label_policy: LabelPolicy::Strict,
        stop_words: false,
        ..RegressionConfig::default()
    });
    assert_eq!(
        tuned.slug().as_str(),
        "logistic-regression-0p1-50-0-early-stopping-10-all-terms-strict"
    );

    let patience = |patience| {
        matcher(RegressionConfig {
            early_stopping: true,
            patience,
            ..RegressionConfig::default()
        })
        .slug()
        .clone()
    };
    assert_ne!(patience(1), patience(50));
    // Without early stopping patience has no effect on the weights.
    let ignored = matcher(RegressionConfig {
        patience: 50,
        ..RegressionConfig::default()
    });
    assert_eq!(ignored.slug(), matcher(RegressionConfig::default()).slug());
}

#[test]
fn invalid_hyperparameters_rejected() {
    for (config, field) in [
        (
            RegressionConfig {
                learning_rate: 0.0,
                ..RegressionConfig::default()
            },
            "learning_rate",
        ),
        (
            RegressionConfig {
                epochs: 0,
                ..RegressionConfig::default()
            },
            "epochs",
        ),
        (
            RegressionConfig {
                weight_decay: -1.0,
                ..RegressionConfig::default()
            },
            "weight_decay",
        ),
    ] {
        match RegressionMatcher::new(config) {
            Err(MatcherError::InvalidConfig(msg)) => assert!(msg.contains(field), "{msg}"),
            other => panic!("expected invalid config for {field}, got {other:?}"),
        }
    }
}

#[test]
fn predict_requires_a_model() {
    let err = matcher(RegressionConfig::default())
        .predict(&dataset())
        .expect_err("unloaded");
    assert!(matches!(err, MatcherError::NotReady { .. }));
}

#[test]
fn training_ranks_matches_above_non_matches() {
    let dir = tempfile::tempdir().unwrap();
    let m = trained(dir.path());
    assert!(matches!(m.state(), ModelState::Trained(_)));

    let labels = m.predict(&dataset()).unwrap();
    let get = |a: &str, k: &str| labels.get(&PairId::new(a, k)).unwrap();
    assert!(get("a1", "k1") > get("a1", "k2"));
    assert!(get("a2", "k2") > get("a2", "k1"));
    // a5 is a con argument, k1 a pro key point
    assert!(!labels.contains(&PairId::new("a5", "k1")));
    assert_eq!(labels.len(), dataset().eligible_pairs().count());
}

#[test]
fn training_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let first = trained(dir.path()).predict(&dataset()).unwrap();
    let second = trained(dir.path()).predict(&dataset()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn retraining_one_instance_does_not_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = trained(dir.path());
    let first = m.predict(&dataset()).unwrap();
    let first_model = *m.state().model().unwrap();

    m.train(&labelled(), &labelled(), &dir.path().join("cache")).unwrap();
    assert_eq!(*m.state().model().unwrap(), first_model);
    assert_eq!(m.predict(&dataset()).unwrap(), first);
}

#[test]
fn saved_model_restores_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("models").join("lr");
    let original = trained(dir.path());
    original.save_model(&model_dir).unwrap();

    let mut fresh = matcher(RegressionConfig::default());
    assert!(fresh.load_model(&model_dir).unwrap());
    assert!(matches!(fresh.state(), ModelState::Loaded(_)));
    assert_eq!(
        fresh.predict(&dataset()).unwrap(),
        original.predict(&dataset()).unwrap()
    );
}

#[test]
fn missing_corrupt_or_foreign_models_are_cache_misses() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = matcher(RegressionConfig::default());
    assert!(!m.load_model(&dir.path().join("absent")).unwrap());

    let corrupt = dir.path().join("corrupt");
    fs::create_dir_all(&corrupt).unwrap();
    fs::write(corrupt.join(MODEL_FILE), b"{not json").unwrap();
    assert!(!m.load_model(&corrupt).unwrap());

    let foreign = dir.path().join("foreign");
    let other = {
        let mut other = matcher(RegressionConfig {
            epochs: 5,
            ..RegressionConfig::default()
        });
        other.train(&labelled(), &labelled(), dir.path()).unwrap();
        other
    };
    other.save_model(&foreign).unwrap();
    assert!(!m.load_model(&foreign).unwrap());
    assert!(!m.state().is_ready());
}

#[test]
fn save_without_model_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = matcher(RegressionConfig::default())
        .save_model(dir.path())
        .expect_err("nothing to save");
    assert!(matches!(err, MatcherError::NotReady { .. }));
}

#[test]
fn early_stopping_checkpoints_to_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache");
    let mut m = matcher(RegressionConfig {
        early_stopping: true,
        ..RegressionConfig::default()
    });
    m.train(&labelled(), &labelled(), &cache).unwrap();
    assert!(cache.join(CHECKPOINT_FILE).is_file());
    assert!(m.state().is_ready());
}

#[test]
fn unannotated_training_data_depends_on_label_policy() {
    let dir = tempfile::tempdir().unwrap();
    let mut skip = matcher(RegressionConfig::default());
    let err = skip
        .train(&unlabelled(), &unlabelled(), dir.path())
        .expect_err("no annotated pairs");
    assert!(matches!(err, MatcherError::EmptyTrainingSet { .. }));

    let mut strict = matcher(RegressionConfig {
        label_policy: LabelPolicy::Strict,
        ..RegressionConfig::default()
    });
    strict.train(&unlabelled(), &unlabelled(), dir.path()).unwrap();
    let labels = strict.predict(&dataset()).unwrap();
    assert!(labels.iter().all(|(_, v)| v < 0.5));
}
