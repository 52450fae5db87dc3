//! In-process stores for tests and offline play.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::StoreError;

use super::store::{LocalStore, RemoteStore};

fn entries(map: &Mutex<HashMap<String, String>>) -> MutexGuard<'_, HashMap<String, String>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Remote store held in memory, with switches to simulate an unreachable or
/// stalled server.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    entries: Mutex<HashMap<String, String>>,
    offline: AtomicBool,
    stalled: AtomicBool,
    latency: Option<Duration>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before answering.
    pub fn with_latency(latency: Duration) -> Self {
        MemoryRemote {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// While offline every call fails with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// While stalled every call never resolves.
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    /// Store a raw value directly, bypassing the availability switches.
    pub fn insert_raw(&self, key: &str, value: &str) {
        entries(&self.entries).insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        entries(&self.entries).get(key).cloned()
    }

    async fn reachable(&self) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("remote is offline".into()));
        }
        Ok(())
    }
}

impl RemoteStore for MemoryRemote {
    fn put(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        async move {
            self.reachable().await?;
            entries(&self.entries).insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        async move {
            self.reachable().await?;
            Ok(entries(&self.entries).get(key).cloned())
        }
    }
}

/// Local store held in memory.
#[derive(Debug, Default)]
pub struct MemoryLocal {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryLocal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `put` fail, for exercising best-effort mirroring.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        entries(&self.entries).insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        entries(&self.entries).get(key).cloned()
    }
}

impl LocalStore for MemoryLocal {
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("local writes disabled".into()));
        }
        entries(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(entries(&self.entries).get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remote_roundtrip() {
        let remote = MemoryRemote::new();
        remote.put("c4", "{}").await.unwrap();
        assert_eq!(remote.get("c4").await.unwrap().as_deref(), Some("{}"));
        assert_eq!(remote.get("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remote_offline() {
        let remote = MemoryRemote::new();
        remote.set_offline(true);
        assert!(matches!(
            remote.put("c4", "{}").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(remote.raw("c4").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_stalled_never_resolves() {
        let remote = MemoryRemote::new();
        remote.set_stalled(true);
        let result = tokio::time::timeout(Duration::from_secs(60), remote.get("c4")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_local_fail_writes() {
        let local = MemoryLocal::new();
        local.put("c4", "a").unwrap();
        local.set_fail_writes(true);
        assert!(local.put("c4", "b").is_err());
        assert_eq!(local.get("c4").unwrap().as_deref(), Some("a"));
    }
}
