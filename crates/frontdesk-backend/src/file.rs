use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::Result;
use crate::dataset::Dataset;
use crate::error::StoreError;

const DATA_FILENAME: &str = "frontdesk.json";

/// A [`Dataset`] persisted as one JSON document under a data directory.
///
/// Every call loads the document, applies one closure and, for writes that
/// succeed, saves it back through a temporary file and a rename. Access is
/// serialised within the process; separate processes are not coordinated.
pub struct FileBackend {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileBackend {
    /// Opens the store under `data_dir`, creating the directory if needed.
    /// The data file itself is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns an unavailable error if the directory cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).map_err(|source| {
            StoreError::unavailable(format!(
                "cannot create data directory {}: {source}",
                data_dir.display()
            ))
        })?;
        Ok(Self {
            path: data_dir.join(DATA_FILENAME),
            lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    ///
    /// Returns an unavailable error if the document cannot be loaded, or
    /// whatever `f` returns.
    pub fn read<T>(&self, f: impl FnOnce(&Dataset) -> T) -> Result<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::unavailable("data file lock poisoned"))?;
        let data = self.load()?;
        Ok(f(&data))
    }

    /// Applies `f` and persists the dataset if it returns `Ok`. A failed
    /// closure leaves the file untouched.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or an unavailable error if the document
    /// cannot be loaded or saved.
    pub fn write<T, E>(
        &self,
        f: impl FnOnce(&mut Dataset) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::unavailable("data file lock poisoned"))?;
        let mut data = self.load()?;
        let value = f(&mut data)?;
        self.save(&data)?;
        Ok(value)
    }

    fn load(&self) -> Result<Dataset> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Dataset::new()),
            Err(source) => {
                return Err(StoreError::unavailable(format!(
                    "cannot read {}: {source}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&content).map_err(|source| {
            StoreError::unavailable(format!(
                "cannot parse {}: {source}",
                self.path.display()
            ))
        })
    }

    fn save(&self, data: &Dataset) -> Result<()> {
        let content = serde_json::to_string_pretty(data).map_err(|source| {
            StoreError::unavailable(format!("cannot serialize dataset: {source}"))
        })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, content).map_err(|source| {
            StoreError::unavailable(format!("cannot write {}: {source}", staging.display()))
        })?;
        fs::rename(&staging, &self.path).map_err(|source| {
            StoreError::unavailable(format!(
                "cannot replace {}: {source}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), rows = data.row_count(), "saved dataset");
        Ok(())
    }
}
