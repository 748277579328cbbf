use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

/// Key holding the logged-in user's id. Its presence is the session flag.
pub const USER_ID_KEY: &str = "userId";
/// Key holding the selected day as `YYYY-MM-DD`.
pub const SELECTED_DAY_KEY: &str = "selectedDay";

const APP_DIR: &str = "habit-tracker";

/// String key/value storage that outlives a single run.
///
/// `get` never fails: unreadable values are reported as absent.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// One file per key under a directory, written with owner-only permissions on unix.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<config dir>/habit-tracker`, or `None` when the platform has no config dir.
    pub fn default_root() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

fn secure_write(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Some(raw.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        secure_write(&self.key_path(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Process-local store, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.values
            .lock()
            .expect("memory store lock poisoned")
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("memory store lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.values
            .lock()
            .expect("memory store lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.values
            .lock()
            .expect("memory store lock poisoned")
            .remove(key);
        Ok(())
    }
}
