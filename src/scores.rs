use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// String key/value persistence, one entry per game.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// JSON object on disk, rewritten whole on every `set`.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: PathBuf) -> Self {
        let mut store = FileStore {
            path,
            entries: BTreeMap::new(),
        };
        store.read_file();
        store
    }

    fn read_file(&mut self) {
        let Ok(data) = fs::read_to_string(&self.path) else {
            log::info!("No score file at {}, starting fresh", self.path.display());
            return;
        };
        match serde_json::from_str::<BTreeMap<String, String>>(&data) {
            Ok(entries) => {
                log::info!("Loaded {} score entries from {}", entries.len(), self.path.display());
                self.entries = entries;
            }
            Err(e) => log::warn!("Ignoring unreadable score file {}: {}", self.path.display(), e),
        }
    }

    fn write_file(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode scores: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            log::warn!("Could not write {}: {}", self.path.display(), e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
        self.write_file();
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Best score per game, kept as decimal strings.
pub struct HighScores {
    store: Box<dyn KeyValueStore>,
}

impl HighScores {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::default()))
    }

    /// Stored best for `key`; absent or unparsable values count as 0.
    pub fn load(&self, key: &str) -> u32 {
        self.store
            .get(key)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(0)
    }

    /// Persist `value` if it beats the stored best. Returns true if written.
    pub fn save(&mut self, key: &str, value: u32) -> bool {
        if value <= self.load(key) {
            return false;
        }
        self.store.set(key, value.to_string());
        log::info!("New best for {}: {}", key, value);
        true
    }
}
