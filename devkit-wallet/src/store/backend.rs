//! Persistence adapters for the wallet record

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use super::WalletState;

/// Fixed namespace the record is stored under
pub const STORAGE_KEY: &str = "wallet-storage";

/// On-disk envelope around the state
#[derive(Deserialize)]
struct PersistedRecord {
    state: WalletState,
    #[serde(default)]
    version: u32,
}

#[derive(Serialize)]
struct PersistedRecordRef<'a> {
    state: &'a WalletState,
    version: u32,
}

const RECORD_VERSION: u32 = 0;

/// Loads and saves the whole wallet record at once
pub trait StateStore {
    /// Read the latest committed record, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<WalletState>>;

    /// Replace the stored record
    fn save(&self, state: &WalletState) -> Result<()>;

    /// Remove the stored record entirely
    fn clear(&self) -> Result<()>;
}

fn encode(state: &WalletState) -> Result<String> {
    let record = PersistedRecordRef {
        state,
        version: RECORD_VERSION,
    };
    Ok(serde_json::to_string(&record)?)
}

fn decode(raw: &str) -> Result<WalletState> {
    let record: PersistedRecord = serde_json::from_str(raw)?;
    if record.version > RECORD_VERSION {
        return Err(Error::Serialization(format!(
            "unsupported record version {}",
            record.version
        )));
    }
    Ok(record.state)
}

/// JSON file store, `<dir>/wallet-storage.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", STORAGE_KEY)),
        }
    }

    /// Location of the record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, contents: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = open_private(&tmp)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<WalletState>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::StorageUnavailable(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, state: &WalletState) -> Result<()> {
        let contents = encode(state)?;
        self.write_atomic(&contents).map_err(|e| {
            Error::StorageUnavailable(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::StorageUnavailable(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// In-process store holding the serialized record
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The serialized record as it would be written to disk
    pub fn raw(&self) -> Option<String> {
        self.record.lock().ok().and_then(|record| record.clone())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<WalletState>> {
        let record = self
            .record
            .lock()
            .map_err(|_| Error::StorageUnavailable("memory store poisoned".to_string()))?;
        record.as_deref().map(decode).transpose()
    }

    fn save(&self, state: &WalletState) -> Result<()> {
        let contents = encode(state)?;
        let mut record = self
            .record
            .lock()
            .map_err(|_| Error::StorageUnavailable("memory store poisoned".to_string()))?;
        *record = Some(contents);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut record = self
            .record
            .lock()
            .map_err(|_| Error::StorageUnavailable("memory store poisoned".to_string()))?;
        *record = None;
        Ok(())
    }
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn load(&self) -> Result<Option<WalletState>> {
        (**self).load()
    }

    fn save(&self, state: &WalletState) -> Result<()> {
        (**self).save(state)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
