//! Key-value contracts for the two storage tiers.
//!
//! Remote methods return `impl Future + Send` so the synchronizer's futures
//! stay `Send` and can be spawned onto a multi-threaded runtime.

use std::future::Future;

use crate::error::StoreError;

/// Remote key-value store, typically behind a network transport.
///
/// Implementations should resolve every call eventually; the synchronizer
/// also wraps each call in its own deadline.
pub trait RemoteStore: Send + Sync {
    fn put(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
}

/// Synchronous local cache.
pub trait LocalStore: Send + Sync {
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Keys double as file names in directory stores.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::Rejected(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("c4").is_ok());
        assert!(validate_key("game_2-b").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../c4").is_err());
        assert!(validate_key("a/b").is_err());
    }
}
