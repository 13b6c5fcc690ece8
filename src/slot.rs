//! Persisted-state channel: one named slot holding the last saved blob.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::GameError;

/// Storage for the single save blob.
pub trait SaveSlot {
    /// Last written blob, or None if the slot is empty or unreadable.
    fn read(&self) -> Option<String>;

    /// Replace the blob. The newest write wins.
    fn write(&mut self, blob: &str) -> Result<(), GameError>;
}

/// In-process slot. Clones share the same contents, so a test can keep a
/// handle after giving one to the engine.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    blob: Rc<RefCell<Option<String>>>,
    writes: Rc<Cell<usize>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        let slot = Self::default();
        *slot.blob.borrow_mut() = Some(blob.into());
        slot
    }

    pub fn contents(&self) -> Option<String> {
        self.blob.borrow().clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Make subsequent writes fail, to exercise write-error handling.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl SaveSlot for MemorySlot {
    fn read(&self) -> Option<String> {
        self.contents()
    }

    fn write(&mut self, blob: &str) -> Result<(), GameError> {
        if self.fail_writes.get() {
            return Err(GameError::Storage("memory slot is read-only".into()));
        }
        *self.blob.borrow_mut() = Some(blob.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Slot backed by a JSON file. Writes go to a sibling temp file and are
/// renamed into place, so a crash mid-write leaves the previous save intact.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug)]
pub struct FileSlot {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileSlot {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SaveSlot for FileSlot {
    fn read(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn write(&mut self, blob: &str) -> Result<(), GameError> {
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, blob)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| GameError::Storage(format!("{}: {e}", self.path.display())))
    }
}

/// Browser `localStorage` slot.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Debug)]
pub struct LocalStorageSlot {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
impl SaveSlot for LocalStorageSlot {
    fn read(&self) -> Option<String> {
        get_storage()?.get_item(&self.key).ok()?
    }

    fn write(&mut self, blob: &str) -> Result<(), GameError> {
        let storage =
            get_storage().ok_or_else(|| GameError::Storage("localStorage unavailable".into()))?;
        storage
            .set_item(&self.key, blob)
            .map_err(|e| GameError::Storage(format!("{e:?}")))
    }
}
