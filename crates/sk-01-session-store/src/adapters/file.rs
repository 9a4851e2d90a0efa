use crate::domain::{StoreError, StoreKey};
use crate::ports::SessionStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed session store.
///
/// Keeps every record in one JSON object (`{"SESSION-...": "<value>"}`) and
/// rewrites the whole document on each mutation, atomically via a temp file
/// and rename. Suitable for the handful of records a client holds.
#[derive(Debug)]
pub struct FileSessionStore {
    data: RwLock<BTreeMap<String, String>>,
    path: PathBuf,
}

impl FileSessionStore {
    /// Open the store at `path`, loading existing records.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is rejected rather than silently overwritten.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = Self::load_from_file(&path)?;

        if data.is_empty() {
            info!(path = %path.display(), "No existing session records");
        } else {
            info!(path = %path.display(), records = data.len(), "Loaded session records");
        }

        Ok(Self {
            data: RwLock::new(data),
            path,
        })
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_file(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| StoreError::MalformedDocument(e.to_string()))
    }

    fn save_to_file(&self, data: &BTreeMap<String, String>) -> Result<(), StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(data)
            .map_err(|e| StoreError::MalformedDocument(e.to_string()))?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file =
            std::fs::File::create(&temp_path).map_err(|e| StoreError::io(&temp_path, e))?;
        file.write_all(&bytes)
            .map_err(|e| StoreError::io(&temp_path, e))?;
        file.sync_all().map_err(|e| StoreError::io(&temp_path, e))?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = %self.path.display(), records = data.len(), "Session records saved");
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
        Ok(self.data.read().get(&key.to_string()).cloned())
    }

    fn put(&self, key: &StoreKey, value: &str) -> Result<(), StoreError> {
        let mut data = self.data.write();
        let mut next = data.clone();
        next.insert(key.to_string(), value.to_string());
        self.save_to_file(&next)?;
        *data = next;
        Ok(())
    }

    fn delete(&self, key: &StoreKey) -> Result<(), StoreError> {
        let mut data = self.data.write();
        let key = key.to_string();
        if !data.contains_key(&key) {
            return Ok(());
        }
        let mut next = data.clone();
        next.remove(&key);
        self.save_to_file(&next)?;
        *data = next;
        Ok(())
    }
}
