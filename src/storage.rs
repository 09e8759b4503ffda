//! Flat-file collections: one JSON array per file, rewritten in full on every save.
//!
//! Saves go through a uniquely named temp file in the same directory and a
//! rename, so a reader never sees a half-written array and a crash leaves
//! either the old or the new contents.
//!
//! Several processes may point at the same files. A load, modify, save cycle
//! is only safe while the caller holds the collection's [`CollectionLock`].

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Errors that can occur while reading or writing a collection file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn serialization(path: &Path, source: serde_json::Error) -> Self {
        Self::Serialization {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Advisory lock on a collection's `<file>.lock` sibling.
///
/// Released when dropped. The lock is per open file, so it also excludes
/// other handles inside the same process.
#[derive(Debug)]
pub struct CollectionLock {
    _file: std::fs::File,
}

/// A durable array of `T` stored as JSON in a single file.
#[derive(Debug)]
pub struct JsonCollection<T> {
    path: PathBuf,
    lock_path: PathBuf,
    #[cfg(test)]
    fail_saves: std::sync::atomic::AtomicBool,
    _records: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonCollection<T> {
    /// Opens the collection, creating an empty file (and its directory) if missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::io(&path, e))?;
        Ok(Self {
            lock_path: with_suffix(&path, ".lock"),
            path,
            #[cfg(test)]
            fail_saves: std::sync::atomic::AtomicBool::new(false),
            _records: PhantomData,
        })
    }

    /// Waits for exclusive access to the collection across processes.
    pub async fn lock(&self) -> Result<CollectionLock, StorageError> {
        self.acquire(true).await
    }

    /// Waits for shared access; any number of shared holders exclude an exclusive one.
    pub async fn lock_shared(&self) -> Result<CollectionLock, StorageError> {
        self.acquire(false).await
    }

    async fn acquire(&self, exclusive: bool) -> Result<CollectionLock, StorageError> {
        let lock_path = self.lock_path.clone();
        let file = blocking(&self.lock_path, move || {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(false)
                .read(true)
                .write(true)
                .open(&lock_path)?;
            if exclusive {
                FileExt::lock_exclusive(&file)?;
            } else {
                FileExt::lock_shared(&file)?;
            }
            Ok(file)
        })
        .await?;
        Ok(CollectionLock { _file: file })
    }

    /// Reads the whole array. An empty file is an empty collection.
    pub async fn load(&self) -> Result<Vec<T>, StorageError> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| StorageError::serialization(&self.path, e))
    }

    /// Replaces the whole array.
    pub async fn save(&self, records: &[T]) -> Result<(), StorageError> {
        #[cfg(test)]
        if self.fail_saves.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StorageError::io(&self.path, io::Error::other("saves disabled")));
        }
        let bytes =
            serde_json::to_vec(records).map_err(|e| StorageError::serialization(&self.path, e))?;
        let path = self.path.clone();
        blocking(&self.path, move || write_atomic(&path, &bytes)).await?;
        debug!(path = %self.path.display(), records = records.len(), "Collection saved");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_fail_saves(&self, fail: bool) {
        self.fail_saves
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Writes `bytes` to a fresh temp file next to `path`, then renames it over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut prefix = OsString::from(".");
    if let Some(name) = path.file_name() {
        prefix.push(name);
        prefix.push(".");
    }
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

async fn blocking<R, F>(path: &Path, work: F) -> Result<R, StorageError>
where
    R: Send + 'static,
    F: FnOnce() -> io::Result<R> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(io::Error::other)
        .and_then(|result| result)
        .map_err(|e| StorageError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn open_creates_an_empty_collection() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("items.json");

        let collection = JsonCollection::<u32>::open(&path).await.expect("open");
        assert!(path.exists());
        assert!(collection.load().await.expect("load").is_empty());
    }

    #[tokio::test]
    async fn save_replaces_contents_without_leaving_temp_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("items.json");
        let collection = JsonCollection::<u32>::open(&path).await.expect("open");

        collection.save(&[1, 2, 3]).await.expect("save");
        collection.save(&[4]).await.expect("save");

        assert_eq!(collection.load().await.expect("load"), vec![4]);
        assert_eq!(entries(temp.path()), vec!["items.json"]);
    }

    #[tokio::test]
    async fn simultaneous_saves_to_one_file_all_land() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("items.json");

        let handles: Vec<_> = (0..16u32)
            .map(|i| {
                let path = path.clone();
                tokio::spawn(async move {
                    let collection = JsonCollection::<u32>::open(&path).await?;
                    collection.save(&[i, i]).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().expect("save");
        }

        let stored = JsonCollection::<u32>::open(&path)
            .await
            .unwrap()
            .load()
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0], stored[1]);
        assert_eq!(entries(temp.path()), vec!["items.json"]);
    }

    #[tokio::test]
    async fn exclusive_lock_waits_for_the_holder() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("items.json");
        let first = JsonCollection::<u32>::open(&path).await.unwrap();
        let second = Arc::new(JsonCollection::<u32>::open(&path).await.unwrap());

        let held = first.lock().await.expect("lock");
        let waiter = {
            let second = second.clone();
            tokio::spawn(async move { second.lock().await.map(drop) })
        };
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!waiter.is_finished());

        drop(held);
        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("lock released")
            .unwrap()
            .expect("second lock");

        let shared_a = first.lock_shared().await.expect("shared");
        let shared_b = second.lock_shared().await.expect("shared");
        drop((shared_a, shared_b));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("items.json");
        std::fs::write(&path, "[1, 2").expect("write");

        let collection = JsonCollection::<u32>::open(&path).await.expect("open");
        assert!(matches!(
            collection.load().await,
            Err(StorageError::Serialization { .. })
        ));
    }
}
