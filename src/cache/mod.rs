//! Day-scoped file cache for raw provider responses.
//!
//! One file per request fingerprint, holding the pretty-printed JSON body
//! of the provider response. Staleness is structural: callers embed the
//! current calendar day in the fingerprint via [`day_key`], so a new day
//! produces a new key and old entries are simply never read again. The
//! store itself has no TTL or eviction logic.
//!
//! Caching is a best-effort optimization. Reads that fail for any reason
//! (missing file, unreadable file, corrupt JSON) report a miss and the
//! caller refetches; writes that fail are logged and swallowed.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

/// Cache configuration.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Directory holding one file per fingerprint
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./web-request-cache"),
        }
    }
}

/// Durable request/response cache keyed by sanitized fingerprint.
pub struct DayCache {
    dir: PathBuf,
}

impl DayCache {
    /// Create a cache rooted at the configured directory, creating it if
    /// needed. A directory that cannot be created degrades to a cache that
    /// always misses.
    pub fn new(config: CacheConfig) -> Self {
        if let Err(e) = fs::create_dir_all(&config.dir) {
            warn!(dir = %config.dir.display(), error = %e, "could not create cache directory");
        }
        Self { dir: config.dir }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(sanitize(key))
    }

    /// Read a cached document. Any failure reads as a miss so the caller
    /// refetches instead of crashing the run.
    pub fn get(&self, key: &str) -> Option<Value> {
        let path = self.entry_path(key);

        let contents = fs::read_to_string(&path).ok()?;

        match serde_json::from_str(&contents) {
            Ok(value) => {
                debug!(path = %path.display(), "cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache entry, treating as miss");
                None
            }
        }
    }

    /// Write or overwrite a cached document. Failures are logged, never
    /// escalated; every value can be regenerated by a successful fetch.
    pub fn put(&self, key: &str, value: &Value) {
        let path = self.entry_path(key);

        let pretty = match serde_json::to_string_pretty(value) {
            Ok(s) => s,
            Err(e) => {
                warn!(key, error = %e, "could not serialize cache value");
                return;
            }
        };

        if let Err(e) = fs::write(&path, pretty) {
            warn!(path = %path.display(), error = %e, "error writing cache file");
        }
    }
}

/// Replace path-reserved characters so a fingerprint can be used directly
/// as a filename. Deterministic and idempotent; fingerprints are already
/// near-unique URLs, so the rare collision is acceptable.
pub fn sanitize(key: &str) -> String {
    key.replace('/', "-")
}

/// Build the day-scoped fingerprint for a request URL.
pub fn day_key(date: NaiveDate, url: &str) -> String {
    format!("{}{}", date.format("%Y%m%d"), url)
}
