//! Persistent client storage for the chosen brand
//!
//! Mirrors browser local storage: a single `currentBrandId` entry that
//! survives restarts. Writes are best effort.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, PoisonError,
    },
};

use brandmux_shared::BrandId;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Key/value store holding the persisted brand identifier
pub trait BrandStorage: Send + Sync {
    /// Persisted identifier, if any
    fn load(&self) -> Result<Option<BrandId>, StorageError>;

    /// Replace the persisted identifier
    fn store(&self, brand_id: &BrandId) -> Result<(), StorageError>;

    /// Forget the persisted identifier
    fn clear(&self) -> Result<(), StorageError>;
}

// ============================================================================
// In-memory storage
// ============================================================================

/// Process-local storage, for tests and hosts without a disk
#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Mutex<Option<BrandId>>,
    unavailable: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a value
    pub fn with_value(brand_id: impl Into<BrandId>) -> Self {
        Self {
            value: Mutex::new(Some(brand_id.into())),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail (quota exceeded, private mode)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Currently stored value
    pub fn value(&self) -> Option<BrandId> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("storage quota exceeded".to_string()));
        }
        Ok(())
    }
}

impl BrandStorage for MemoryStorage {
    fn load(&self) -> Result<Option<BrandId>, StorageError> {
        Ok(self.value())
    }

    fn store(&self, brand_id: &BrandId) -> Result<(), StorageError> {
        self.check_available()?;
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(brand_id.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.check_available()?;
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// ============================================================================
// File storage
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredBrand {
    #[serde(rename = "currentBrandId", default, skip_serializing_if = "Option::is_none")]
    current_brand_id: Option<BrandId>,
}

/// JSON file storage: `{"currentBrandId": "<id>"}`
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BrandStorage for FileStorage {
    fn load(&self) -> Result<Option<BrandId>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        let stored: StoredBrand =
            serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        Ok(stored.current_brand_id.filter(|id| !id.is_empty()))
    }

    fn store(&self, brand_id: &BrandId) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let json = serde_json::to_string(&StoredBrand {
            current_brand_id: Some(brand_id.clone()),
        })?;
        fs::write(&self.path, json).map_err(|err| self.io_error(err))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}
