use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to remove cache file '{0}'")]
    CacheDelete(PathBuf, #[source] std::io::Error),

    #[error("Storing '{key}' ({size} bytes) would exceed the storage quota of {quota} bytes")]
    QuotaExceeded {
        key: String,
        size: usize,
        quota: usize,
    },

    #[error("Failed to encode cache data")]
    CacheEncode(#[source] serde_json::Error),

    #[error("Failed to decode cache data stored under '{0}'")]
    CacheDecode(String, #[source] serde_json::Error),

    #[error("Invalid cache key '{0}'")]
    InvalidKey(String),

    #[error("Cache storage lock was poisoned")]
    Poisoned,
}
