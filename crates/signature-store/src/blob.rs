//! The generic key-value blob store the rest of the system persists through

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StoreError;

/// Get/set/enumerate over opaque blobs under well-known keys.
///
/// This is the whole persistence contract: callers own serialization and
/// treat every value as a single blob (last writer wins).
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blobs.lock().expect("lock poisoned").get(key).cloned())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.blobs
            .lock()
            .expect("lock poisoned")
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let blobs = self.blobs.lock().expect("lock poisoned");
        let mut keys: Vec<String> = blobs.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// One file per key inside a data directory.
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Open (and create if needed) the store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are well-known constants; a flat file per key is enough.
        self.root.join(key)
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        // Write-then-rename so a crash mid-write never leaves a torn blob.
        let tmp = self.root.join(format!("{}.tmp", key));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    if !name.ends_with(".tmp") {
                        keys.push(name.to_string());
                    }
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.put("a", b"one").unwrap();
        store.put("b", b"two").unwrap();
        store.put("a", b"three").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some(&b"three"[..]));
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();

        assert_eq!(store.get("missing").unwrap(), None);
        store.put("uploaded-pdf", b"%PDF-1.4").unwrap();
        assert_eq!(
            store.get("uploaded-pdf").unwrap().as_deref(),
            Some(&b"%PDF-1.4"[..])
        );
        assert_eq!(store.keys().unwrap(), vec!["uploaded-pdf"]);
    }

    #[test]
    fn test_file_store_overwrite_is_last_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();

        store.put("k", b"first").unwrap();
        store.put("k", b"second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn test_file_store_reopens_existing_data() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileBlobStore::open(dir.path()).unwrap();
            store.put("k", b"persisted").unwrap();
        }
        let store = FileBlobStore::open(dir.path()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"persisted"[..]));
    }
}
