use crate::adapters::memory::{apply_batch, scan};
#[cfg(feature = "locking")]
use crate::adapters::DatabaseLock;
use crate::errors::KVStoreError;
use crate::ports::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed key-value store.
///
/// The whole map is rewritten on each mutation via temp file + fsync +
/// atomic rename, so a write is durable once `put`/`atomic_batch_write`
/// returns and a crash never leaves a half-written store behind.
pub struct FileBackedKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    path: PathBuf,
    #[cfg(feature = "locking")]
    _lock: DatabaseLock,
}

impl FileBackedKVStore {
    /// Open (or create) the store at `path`.
    ///
    /// A missing file yields an empty store; an unreadable or truncated file
    /// is a `CorruptionError`, never silently replaced.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(KVStoreError::io)?;
            }
        }

        #[cfg(feature = "locking")]
        let lock = DatabaseLock::acquire_for(&path).map_err(|e| KVStoreError::Locked {
            message: e.to_string(),
        })?;

        let data = Self::load_from_file(&path)?;
        if data.is_empty() {
            info!("[kv-01] 📁 Storage file empty or not found: {}", path.display());
        } else {
            info!(
                "[kv-01] 💾 Loaded {} keys from {}",
                data.len(),
                path.display()
            );
        }

        Ok(Self {
            data,
            path,
            #[cfg(feature = "locking")]
            _lock: lock,
        })
    }

    fn load_from_file(path: &Path) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, KVStoreError> {
        let mut file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(KVStoreError::io(e)),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(KVStoreError::io)?;

        // Simple binary format: [key_len:u32][key][value_len:u32][value]...
        let mut data = BTreeMap::new();
        let mut cursor = 0;
        while cursor < bytes.len() {
            let key = read_frame(&bytes, &mut cursor)?;
            let value = read_frame(&bytes, &mut cursor)?;
            data.insert(key, value);
        }
        Ok(data)
    }

    fn save_to_file(&self) -> Result<(), KVStoreError> {
        let mut bytes = Vec::new();
        for (key, value) in &self.data {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
        }

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(KVStoreError::io)?;
        file.write_all(&bytes).map_err(KVStoreError::io)?;
        file.sync_all().map_err(KVStoreError::io)?;
        std::fs::rename(&temp_path, &self.path).map_err(KVStoreError::io)?;
        sync_parent_dir(&self.path)?;

        debug!(
            "[kv-01] Persisted {} keys ({} bytes) to {}",
            self.data.len(),
            bytes.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Apply `mutate` to a copy of the map, persist it, then swap it in.
    ///
    /// The in-memory view only changes after the file write succeeded.
    fn commit<F>(&mut self, mutate: F) -> Result<(), KVStoreError>
    where
        F: FnOnce(&mut BTreeMap<Vec<u8>, Vec<u8>>),
    {
        let previous = self.data.clone();
        mutate(&mut self.data);
        if let Err(e) = self.save_to_file() {
            self.data = previous;
            return Err(e);
        }
        Ok(())
    }
}

/// Flush the directory entry of `path` so a completed rename survives a crash.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<(), KVStoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::File::open(parent)
        .and_then(|dir| dir.sync_all())
        .map_err(KVStoreError::io)
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<(), KVStoreError> {
    Ok(())
}

fn read_frame(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, KVStoreError> {
    let truncated = || KVStoreError::CorruptionError {
        message: format!("truncated record at offset {}", cursor),
    };

    let len_end = cursor.checked_add(4).ok_or_else(truncated)?;
    let len_bytes: [u8; 4] = bytes
        .get(*cursor..len_end)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(truncated)?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    let end = len_end.checked_add(len).ok_or_else(truncated)?;
    let frame = bytes.get(len_end..end).ok_or_else(truncated)?.to_vec();
    *cursor = end;
    Ok(frame)
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.commit(|data| {
            data.insert(key.to_vec(), value.to_vec());
        })
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.commit(|data| {
            data.remove(key);
        })
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.commit(|data| apply_batch(data, operations))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(scan(&self.data, prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.db");

        {
            let mut store = FileBackedKVStore::open(&path).unwrap();
            store.put(b"slashing/aa", b"record").unwrap();
            store
                .atomic_batch_write(vec![
                    BatchOperation::put(b"wallet/w1".to_vec(), b"w".to_vec()),
                    BatchOperation::put(b"pubkey/aa".to_vec(), b"w1/a1".to_vec()),
                ])
                .unwrap();
        }

        let store = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(store.get(b"slashing/aa").unwrap(), Some(b"record".to_vec()));
        assert_eq!(store.get(b"pubkey/aa").unwrap(), Some(b"w1/a1".to_vec()));
    }

    #[cfg(unix)]
    #[test]
    fn test_parent_dir_sync() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("slashing.db");

        let mut store = FileBackedKVStore::open(&nested).unwrap();
        store.put(b"k", b"v").unwrap();
        assert!(sync_parent_dir(&nested).is_ok());

        let missing = dir.path().join("absent").join("slashing.db");
        assert!(matches!(
            sync_parent_dir(&missing),
            Err(KVStoreError::IOError { .. })
        ));
    }

    #[test]
    fn test_truncated_file_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.db");
        std::fs::write(&path, [10u8, 0, 0, 0, b'a']).unwrap();

        let result = FileBackedKVStore::open(&path);
        assert!(matches!(result, Err(KVStoreError::CorruptionError { .. })));
    }

    #[test]
    fn test_delete_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.db");

        {
            let mut store = FileBackedKVStore::open(&path).unwrap();
            store.put(b"k", b"v").unwrap();
            store.delete(b"k").unwrap();
        }

        let store = FileBackedKVStore::open(&path).unwrap();
        assert!(!store.exists(b"k").unwrap());
    }

    #[cfg(feature = "locking")]
    #[test]
    fn test_second_open_is_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.db");

        let _first = FileBackedKVStore::open(&path).unwrap();
        let second = FileBackedKVStore::open(&path);
        assert!(matches!(second, Err(KVStoreError::Locked { .. })));
    }
}
