use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

/// String key-value storage with the surface of browser local storage.
///
/// Every call may fail (storage disabled, quota exceeded, unreadable file);
/// callers that must keep working decide how to degrade.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&mut self, key: &str) -> anyhow::Result<()>;
    fn keys(&self) -> anyhow::Result<Vec<String>>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> anyhow::Result<()> {
        self.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.items.keys().cloned().collect())
    }
}

/// Durable store kept as one flat JSON object on disk.
///
/// The file is re-read on every access so that several handles (or several
/// processes) pointed at the same path observe each other's writes.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(serde_json::Map::new());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read store: {}", self.path.display()));
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Map::new());
        }
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse store: {}", self.path.display()))
    }

    fn write_all(&self, items: &serde_json::Map<String, serde_json::Value>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create store dir: {}", parent.display()))?;
        }

        let tmp_path = self
            .path
            .with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
        let data = serde_json::to_vec_pretty(items).context("serialize store")?;
        std::fs::write(&tmp_path, &data)
            .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("rename tmp to final: {}", self.path.display()))?;
        Ok(())
    }
}

// Entries written by other tools may hold non-string JSON; they read back as
// their JSON text and are left untouched on write.
fn value_as_item(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.read_all()?.remove(key).map(value_as_item))
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut items = self.read_all()?;
        items.insert(key.to_owned(), serde_json::Value::String(value.to_owned()));
        self.write_all(&items)
    }

    fn remove_item(&mut self, key: &str) -> anyhow::Result<()> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }

    fn keys(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.read_all()?.into_iter().map(|(key, _)| key).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::progress::{load_all_completed, set_completed};

    #[test]
    fn json_file_store_missing_file_is_empty() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = JsonFileStore::new(temp.path().join("nested").join("storage.json"));

        assert!(store.keys()?.is_empty());
        assert_eq!(store.get_item("completed-p0-m1")?, None);
        Ok(())
    }

    #[test]
    fn json_file_store_survives_reopen() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("nested").join("storage.json");

        let mut store = JsonFileStore::new(&path);
        store.set_item("completed-p0-m1", "true")?;
        store.set_item("theme", "dark")?;
        store.remove_item("theme")?;

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.keys()?, vec!["completed-p0-m1".to_owned()]);
        assert_eq!(
            reopened.get_item("completed-p0-m1")?.as_deref(),
            Some("true")
        );
        Ok(())
    }

    #[test]
    fn json_file_store_keeps_non_string_entries() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("storage.json");
        std::fs::write(&path, r#"{"completed-p0-m1":"true","volume":7}"#)?;

        let mut store = JsonFileStore::new(&path);
        assert_eq!(
            load_all_completed(&store),
            BTreeSet::from(["p0-m1".to_owned()])
        );
        assert_eq!(store.get_item("volume")?.as_deref(), Some("7"));

        set_completed(&mut store, "p0-m2", true);

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(raw["volume"], 7);
        assert_eq!(raw["completed-p0-m2"], "true");
        assert_eq!(
            load_all_completed(&store),
            BTreeSet::from(["p0-m1".to_owned(), "p0-m2".to_owned()])
        );
        Ok(())
    }

    #[test]
    fn json_file_store_rejects_corrupt_file() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("storage.json");
        std::fs::write(&path, "not json")?;

        let store = JsonFileStore::new(&path);
        let err = store.keys().unwrap_err();
        assert!(format!("{err:#}").contains("parse store"));
        Ok(())
    }
}
