use std::fs;
use std::path::Path;

use model::{LabelledDataset, ModelError, Splits};
use tracing::info;

use crate::PipelineError;
use crate::config::DataYamlConfig;

/// Read a serialized [`LabelledDataset`] from a JSON file.
pub fn load_labelled_dataset(path: &Path) -> Result<LabelledDataset, PipelineError> {
    let raw = fs::read(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data: LabelledDataset = serde_json::from_slice(&raw).map_err(ModelError::from)?;
    info!(
        path = %path.display(),
        arguments = data.arguments().len(),
        key_points = data.key_points().len(),
        labels = data.labels().len(),
        "dataset_loaded"
    );
    Ok(data)
}

pub fn load_splits(paths: &DataYamlConfig) -> Result<Splits, PipelineError> {
    Ok(Splits {
        train: load_labelled_dataset(&paths.train)?,
        dev: load_labelled_dataset(&paths.dev)?,
        test: load_labelled_dataset(&paths.test)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        match load_labelled_dataset(&path) {
            Err(PipelineError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_dataset_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.json");
        fs::write(&path, b"{\"arguments\": 3}").unwrap();
        assert!(matches!(
            load_labelled_dataset(&path),
            Err(PipelineError::Model(_))
        ));
    }

    #[test]
    fn loads_serialized_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.json");
        let json = r#"{
            "arguments": [{"id": "a1", "text": "Cheap energy", "topic": "t", "stance": 1}],
            "key_points": [{"id": "k1", "text": "Energy is cheap", "topic": "t", "stance": 1}],
            "labels": {"a1": {"k1": 1.0}}
        }"#;
        fs::write(&path, json).unwrap();

        let data = load_labelled_dataset(&path).unwrap();
        assert_eq!(data.labels().len(), 1);
        assert_eq!(data.as_dataset().eligible_pairs().count(), 1);
    }
}
