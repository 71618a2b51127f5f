use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Opaque string store. Game state, stats and settings each live under
/// their own key, possibly in different stores.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Reads `key` and decodes it as JSON. A missing key is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(contents) => {
            let value = serde_json::from_str(&contents)
                .with_context(|| format!("corrupt value under '{key}'"))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    store.set(key, &contents)
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;
        Ok(FileStore { data_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(contents))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        // temp file + rename keeps the previous value intact on a failed write
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("term_wordle_{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn memory_store_test() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("stats").expect("get"), None);

        store.set("stats", "{}").expect("set");
        assert_eq!(store.get("stats").expect("get").as_deref(), Some("{}"));

        store.remove("stats").expect("remove");
        assert_eq!(store.get("stats").expect("get"), None);
    }

    #[test]
    fn file_store_test() {
        let dir = temp_dir();
        let mut store = FileStore::new(&dir).expect("store expected");
        assert_eq!(store.get("wordleState").expect("get"), None);

        store.set("wordleState", "hello").expect("set");
        assert!(dir.join("wordleState.json").exists());
        assert_eq!(store.get("wordleState").expect("get").as_deref(), Some("hello"));

        // a second store on the same directory sees the same data
        let other = FileStore::new(&dir).expect("store expected");
        assert_eq!(other.get("wordleState").expect("get").as_deref(), Some("hello"));

        store.remove("wordleState").expect("remove");
        store.remove("wordleState").expect("removing twice is fine");
        assert_eq!(store.get("wordleState").expect("get"), None);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn json_helpers_test() {
        let mut store = MemoryStore::new();
        let sample = Sample {
            name: "crane".to_string(),
            count: 3,
        };
        save_json(&mut store, "sample", &sample).expect("save");
        let loaded: Option<Sample> = load_json(&store, "sample").expect("load");
        assert_eq!(loaded, Some(sample));

        let missing: Option<Sample> = load_json(&store, "missing").expect("load");
        assert_eq!(missing, None);

        store.set("sample", "not json").expect("set");
        assert!(load_json::<Sample>(&store, "sample").is_err());
    }
}
