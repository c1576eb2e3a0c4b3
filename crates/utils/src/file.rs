//! Reading and writing the files statemon works with: TOML configuration and JSON layouts or
//! exported histories.

use std::{fs, path::Path};

use eyre::{Result, WrapErr};
use serde::{de::DeserializeOwned, Serialize};

/// Loads a TOML document from `path` into `T`.
pub fn load_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    trace!("loading toml: {:?}", path);

    let content =
        fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&content).wrap_err_with(|| format!("malformed toml in {}", path.display()))
}

/// Loads a JSON document from `path` into `T`.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    trace!("loading json: {:?}", path);

    let content =
        fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).wrap_err_with(|| format!("malformed json in {}", path.display()))
}

/// Writes `data` as pretty-printed JSON to `path`, creating parent directories when missing.
pub fn save_json<T: Serialize>(path: impl AsRef<Path>, data: &T) -> Result<()> {
    let path = path.as_ref();
    trace!("saving json: {:?}", path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(data)?;
    fs::write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Sample {
        name: String,
        #[serde(default)]
        enabled: bool,
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.toml");
        fs::write(&path, "name = \"monitor\"\nenabled = true\n").unwrap();

        let sample: Sample = load_toml(&path).unwrap();
        assert_eq!(sample, Sample { name: "monitor".to_string(), enabled: true });
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_toml::<Sample>(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_json_in_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        let data = BTreeMap::from([("a".to_string(), 1u64), ("b".to_string(), 2u64)]);
        save_json(&path, &data).unwrap();

        let loaded: BTreeMap<String, u64> = load_json(&path).unwrap();
        assert_eq!(loaded, data);
    }
}
