//! Persistent label to secret mapping.

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Store file format version
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Could not find your key: {0}")]
    NotFound(String),
    #[error("Labels cannot be empty")]
    InvalidLabel,
    #[error("Could not access the store at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("The store at {path} is not valid")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported store version: {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// Where secrets live. Labels come back from [`SecretStore::labels`] in the
/// same order for as long as the store is not mutated.
pub trait SecretStore {
    fn put(&mut self, label: &str, secret: &str) -> Result<(), StoreError>;
    fn get(&self, label: &str) -> Result<String, StoreError>;
    fn delete(&mut self, label: &str) -> Result<(), StoreError>;
    fn labels(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    keys: BTreeMap<String, String>,
}

/// JSON file backed store. Labels enumerate in byte-wise order.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    keys: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; it is
    /// only created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let keys = match fs::read_to_string(&path) {
            Ok(json) => {
                let file: StoreFile =
                    serde_json::from_str(&json).map_err(|source| StoreError::Format {
                        path: path.clone(),
                        source,
                    })?;

                if file.version != STORE_VERSION {
                    return Err(StoreError::Version {
                        found: file.version,
                        expected: STORE_VERSION,
                    });
                }

                file.keys
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no store at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        debug!("opened store {} with {} keys", path.display(), keys.len());

        Ok(Self { path, keys })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the whole store through a temporary sibling file so readers
    /// never see a partial write.
    fn save(&self, keys: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(io_err)?;

        let file = StoreFile {
            version: STORE_VERSION,
            keys: keys.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".keys.tmp-")
            .tempfile_in(parent)
            .map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!("saved {} keys to {}", keys.len(), self.path.display());

        Ok(())
    }
}

impl SecretStore for FileStore {
    fn put(&mut self, label: &str, secret: &str) -> Result<(), StoreError> {
        if label.is_empty() {
            return Err(StoreError::InvalidLabel);
        }

        let mut keys = self.keys.clone();
        if keys.insert(label.to_string(), secret.to_string()).is_some() {
            info!("overwriting secret for {label}");
        }

        self.save(&keys)?;
        self.keys = keys;

        Ok(())
    }

    fn get(&self, label: &str) -> Result<String, StoreError> {
        self.keys
            .get(label)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(label.to_string()))
    }

    fn delete(&mut self, label: &str) -> Result<(), StoreError> {
        let mut keys = self.keys.clone();
        if keys.remove(label).is_none() {
            return Err(StoreError::NotFound(label.to_string()));
        }

        self.save(&keys)?;
        self.keys = keys;

        Ok(())
    }

    fn labels(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.keys.keys().cloned().collect())
    }
}
