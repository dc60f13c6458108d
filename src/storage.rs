//! JSON file persistence (spec §4.6 "Storage Port").
//!
//! Grounded in the teacher's `db.rs` pattern of a narrow trait wrapping I/O
//! so callers don't know whether they're talking to a file, a database, or
//! (in tests) an in-memory stand-in. The trait itself is kept object-safe
//! (plain `serde_json::Value`s, no generic methods) so the orchestrator can
//! hold one `&dyn StorageService` across every entity's differently-typed
//! strategy; `write_entities`/`read_entities` below do the typed
//! serialize/deserialize step callers actually want.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::GithubDataError;

/// Reads and writes entity collections as pretty-printed JSON files.
pub trait StorageService: Send + Sync {
    fn write_values(&self, entities: &[Value], relative_path: &str) -> Result<(), GithubDataError>;

    fn read_values(&self, relative_path: &str) -> Result<Vec<Value>, GithubDataError>;

    fn exists(&self, relative_path: &str) -> bool;

    /// Writes opaque bytes (release assets) under `relative_path`, per spec
    /// §4.1's `release-assets/{tag}/{name}` layout.
    fn write_bytes(&self, bytes: &[u8], relative_path: &str) -> Result<(), GithubDataError>;

    fn read_bytes(&self, relative_path: &str) -> Result<Vec<u8>, GithubDataError>;
}

/// Serializes `entities` and writes them through `storage`.
pub fn write_entities<T: Serialize>(
    storage: &dyn StorageService,
    entities: &[T],
    relative_path: &str,
) -> Result<(), GithubDataError> {
    let values = entities
        .iter()
        .map(|e| serde_json::to_value(e).map_err(|e| GithubDataError::Validation(e.to_string())))
        .collect::<Result<Vec<Value>, _>>()?;
    storage.write_values(&values, relative_path)
}

/// Reads and deserializes entities through `storage`.
pub fn read_entities<T: DeserializeOwned>(
    storage: &dyn StorageService,
    relative_path: &str,
) -> Result<Vec<T>, GithubDataError> {
    storage
        .read_values(relative_path)?
        .into_iter()
        .map(|v| serde_path_to_error::deserialize(v).map_err(|e| GithubDataError::Validation(format!("{relative_path}: {e}"))))
        .collect()
}

/// `StorageService` backed by plain files under a root directory (spec §4.6:
/// "one JSON file per entity type, named `{entity_name}.json`").
pub struct JsonStorageService {
    root: PathBuf,
}

impl JsonStorageService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonStorageService { root: root.into() }
    }

    fn full_path(&self, relative_path: &str) -> PathBuf {
        self.root.join(relative_path)
    }
}

impl StorageService for JsonStorageService {
    fn write_values(&self, entities: &[Value], relative_path: &str) -> Result<(), GithubDataError> {
        let path = self.full_path(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entities)
            .map_err(|e| GithubDataError::Validation(format!("serializing {relative_path}: {e}")))?;
        fs::write(&path, json)?;
        Ok(())
    }

    /// Reads a list of entities from `relative_path`. Per spec §4.6, a file
    /// containing a single JSON object (not wrapped in an array) is treated
    /// as a one-element list; anything else is a `Validation` error.
    fn read_values(&self, relative_path: &str) -> Result<Vec<Value>, GithubDataError> {
        let path = self.full_path(relative_path);
        let contents = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| GithubDataError::Validation(format!("parsing {relative_path}: {e}")))?;

        match value {
            Value::Array(items) => Ok(items),
            Value::Object(_) => Ok(vec![value]),
            other => Err(GithubDataError::Validation(format!(
                "{relative_path} must contain a JSON object or array of objects, found {other}"
            ))),
        }
    }

    fn exists(&self, relative_path: &str) -> bool {
        self.full_path(relative_path).exists()
    }

    fn write_bytes(&self, bytes: &[u8], relative_path: &str) -> Result<(), GithubDataError> {
        let path = self.full_path(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(())
    }

    fn read_bytes(&self, relative_path: &str) -> Result<Vec<u8>, GithubDataError> {
        Ok(fs::read(self.full_path(relative_path))?)
    }
}

/// Resolves the JSON file name for an entity (spec §4.6).
pub fn entity_file_name(entity_name: &str) -> String {
    format!("{entity_name}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Widget {
        name: String,
    }

    #[test]
    fn round_trips_a_list() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorageService::new(dir.path());
        let widgets = vec![Widget { name: "a".into() }, Widget { name: "b".into() }];
        write_entities(&storage, &widgets, "widgets.json").unwrap();
        let read_back: Vec<Widget> = read_entities(&storage, "widgets.json").unwrap();
        assert_eq!(read_back, widgets);
    }

    #[test]
    fn a_bare_object_is_treated_as_a_single_element_list() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("widget.json"), r#"{"name": "solo"}"#).unwrap();
        let storage = JsonStorageService::new(dir.path());
        let read_back: Vec<Widget> = read_entities(&storage, "widget.json").unwrap();
        assert_eq!(read_back, vec![Widget { name: "solo".into() }]);
    }

    #[test]
    fn neither_object_nor_array_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("widget.json"), "42").unwrap();
        let storage = JsonStorageService::new(dir.path());
        let err = read_entities::<Widget>(&storage, "widget.json").unwrap_err();
        assert!(matches!(err, GithubDataError::Validation(_)));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorageService::new(dir.path());
        write_entities(&storage, &[Widget { name: "a".into() }], "nested/widgets.json").unwrap();
        assert!(storage.exists("nested/widgets.json"));
    }
}
