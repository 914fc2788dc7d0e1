//! Key/value persistence port and its two implementations.
//!
//! Each key holds one JSON document. Neither backend interprets the
//! documents; they only enforce the optional byte budget.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};

/// Persistence port used by [`crate::store::Store`].
pub trait StorageBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;
    fn keys(&self) -> StoreResult<Vec<String>>;
}

fn check_quota(
    key: &str,
    used_elsewhere: usize,
    value: &str,
    quota: Option<usize>,
) -> StoreResult<()> {
    if let Some(limit) = quota {
        let needed = used_elsewhere + key.len() + value.len();
        if needed > limit {
            return Err(StoreError::QuotaExceeded {
                key: key.to_string(),
                needed,
                limit,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Volatile backend. Size accounting counts key and value bytes.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    /// Bytes currently used.
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let current = self.entries.get(key).map_or(0, |v| key.len() + v.len());
        check_quota(key, self.used_bytes() - current, value, self.quota)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

const FILE_EXTENSION: &str = "json";

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileBackend {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>, quota: Option<usize>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, quota })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        if !is_valid_key(key) {
            return Err(StoreError::Config(format!("Invalid storage key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }

    fn used_bytes_except(&self, key: &str) -> StoreResult<usize> {
        let mut total = 0;
        for k in self.keys()? {
            if k == key {
                continue;
            }
            let meta = fs::metadata(self.path_for(&k)?)?;
            total += k.len() + meta.len() as usize;
        }
        Ok(total)
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        if self.quota.is_some() {
            check_quota(key, self.used_bytes_except(key)?, value, self.quota)?;
        }
        write_atomic(&path, value.as_bytes())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Keys stored in the directory. Other files, including `.json` files
    /// whose name is not a valid key, are ignored.
    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if is_valid_key(stem) => keys.push(stem.to_string()),
                _ => tracing::debug!(path = %path.display(), "Skipping foreign file"),
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
///
/// Readers see either the old or the new content, never a partial file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
