//! Integer key-value store persisted as a flat TOML table.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use raft_runner_core::collaborators::KeyValueStore;

/// Failures while reading or writing the store file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    /// The file could not be read or written.
    #[error("store I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but is not a table of integers.
    #[error("store file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The values could not be rendered back to TOML.
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Key-value store backed by a TOML file.
///
/// Writes stay in memory until [`KeyValueStore::save`] flushes them.
#[derive(Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, i32>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file yields an empty store.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every value to disk.
    pub(crate) fn flush(&self) -> Result<(), StoreError> {
        let text = toml::to_string(&self.values)?;
        fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn set_int(&mut self, key: &str, value: i32) {
        let _ = self.values.insert(key.to_owned(), value);
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn delete_key(&mut self, key: &str) {
        let _ = self.values.remove(key);
    }

    fn save(&mut self) {
        if let Err(error) = self.flush() {
            log::warn!("{error}");
        }
    }
}
