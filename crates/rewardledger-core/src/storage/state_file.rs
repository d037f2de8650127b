//! Persisted ledger state.
//!
//! The state is one small JSON record, read whole on startup and written
//! whole after every mutation. [`JsonFileStore`] writes to a sibling temp
//! file and renames it over the old record, so a failed write leaves the
//! previous state intact.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::ledger::LedgerState;

/// Somewhere a [`LedgerState`] can be loaded from and saved to.
pub trait StateStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<LedgerState>, StorageError>;

    fn save(&self, state: &LedgerState) -> Result<(), StorageError>;

    /// Remove the persisted record. Succeeds if there is none.
    fn clear(&self) -> Result<(), StorageError>;
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn load(&self) -> Result<Option<LedgerState>, StorageError> {
        (**self).load()
    }

    fn save(&self, state: &LedgerState) -> Result<(), StorageError> {
        (**self).save(state)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

/// JSON file at a fixed path.
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

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_err(&self, source: std::io::Error) -> StorageError {
        StorageError::WriteFailed {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<LedgerState>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no saved state, starting fresh");
                return Ok(None);
            }
            Err(source) => {
                return Err(StorageError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let state = serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "loaded state");
        Ok(Some(state))
    }

    fn save(&self, state: &LedgerState) -> Result<(), StorageError> {
        let data = serde_json::to_string_pretty(state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_err(e))?;
        }

        let tmp = self.tmp_path();
        let written = fs::File::create(&tmp).and_then(|mut f| {
            f.write_all(data.as_bytes())?;
            f.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(self.write_err(e));
        }

        tracing::debug!(path = %self.path.display(), points = state.points, "saved state");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.write_err(e)),
        }
    }
}

/// In-memory store for tests and throwaway sessions.
///
/// `fail_writes` makes every save and clear fail, to exercise the
/// write-then-acknowledge path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<Option<LedgerState>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LedgerState) -> Self {
        let store = Self::default();
        *store.saved.borrow_mut() = Some(state);
        store
    }

    pub fn saved(&self) -> Option<LedgerState> {
        self.saved.borrow().clone()
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::WriteFailed {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("writes disabled"),
            });
        }
        Ok(())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<LedgerState>, StorageError> {
        Ok(self.saved())
    }

    fn save(&self, state: &LedgerState) -> Result<(), StorageError> {
        self.check_writable()?;
        *self.saved.borrow_mut() = Some(state.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.check_writable()?;
        *self.saved.borrow_mut() = None;
        Ok(())
    }
}
