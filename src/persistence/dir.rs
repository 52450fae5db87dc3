//! Directory-backed stores: one `<key>.json` file per key.
//!
//! Writes go to `<key>.json.tmp` first and are renamed into place, so a
//! reader never sees a half-written snapshot.

use std::fs;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;

use super::store::{validate_key, LocalStore, RemoteStore};

fn paths(dir: &Path, key: &str) -> Result<(PathBuf, PathBuf), StoreError> {
    validate_key(key)?;
    Ok((
        dir.join(format!("{key}.json")),
        dir.join(format!("{key}.json.tmp")),
    ))
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Local cache in a directory on this machine.
#[derive(Debug, Clone)]
pub struct DirLocal {
    dir: PathBuf,
}

impl DirLocal {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirLocal { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl LocalStore for DirLocal {
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let (path, tmp) = paths(&self.dir, key)?;
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;
        fs::write(&tmp, value).map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))?;
        debug!(path = %path.display(), bytes = value.len(), "wrote local snapshot");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let (path, _) = paths(&self.dir, key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}

/// Remote store on a shared or mounted directory, accessed asynchronously.
/// A missing directory counts as an unreachable remote.
#[derive(Debug, Clone)]
pub struct DirRemote {
    dir: PathBuf,
}

impl DirRemote {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirRemote { dir: dir.into() }
    }

    async fn ensure_reachable(&self) -> Result<(), StoreError> {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            _ => Err(StoreError::Unavailable(format!(
                "remote directory {} is not reachable",
                self.dir.display()
            ))),
        }
    }
}

impl RemoteStore for DirRemote {
    fn put(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        async move {
            let (path, tmp) = paths(&self.dir, key)?;
            self.ensure_reachable().await?;
            tokio::fs::write(&tmp, value).await.map_err(io_error(&tmp))?;
            tokio::fs::rename(&tmp, &path)
                .await
                .map_err(io_error(&path))?;
            Ok(())
        }
    }

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        async move {
            let (path, _) = paths(&self.dir, key)?;
            self.ensure_reachable().await?;
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(io_error(&path)(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirLocal::new(dir.path().join("saves"));

        assert_eq!(store.get("c4").unwrap(), None);
        store.put("c4", "{\"c4\":1}").unwrap();
        assert_eq!(store.get("c4").unwrap().as_deref(), Some("{\"c4\":1}"));
        assert!(dir.path().join("saves/c4.json").exists());
        assert!(!dir.path().join("saves/c4.json.tmp").exists());
    }

    #[test]
    fn test_local_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirLocal::new(dir.path());
        store.put("c4", "first").unwrap();
        store.put("c4", "second").unwrap();
        assert_eq!(store.get("c4").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_local_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirLocal::new(dir.path());
        assert!(matches!(
            store.put("../escape", "x"),
            Err(StoreError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_remote_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let remote = DirRemote::new(dir.path());

        assert_eq!(remote.get("c4").await.unwrap(), None);
        remote.put("c4", "payload").await.unwrap();
        assert_eq!(remote.get("c4").await.unwrap().as_deref(), Some("payload"));
    }

    #[tokio::test]
    async fn test_remote_missing_dir_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let remote = DirRemote::new(dir.path().join("not-mounted"));

        assert!(matches!(
            remote.put("c4", "payload").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            remote.get("c4").await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
