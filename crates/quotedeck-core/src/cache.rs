//! Time-bounded cache for fetched payloads.
//!
//! Entries pair a payload with the wall-clock second they were stored.
//! `get` returns the payload only while `now - stored_at < max_age` and
//! deletes the entry the moment it is found stale. A zero `max_age`
//! disables the store entirely, which is how the always-fetch-fresh API
//! variant runs. The durable backend writes one JSON file per key so
//! entries survive process restarts; this is a local single-node cache,
//! nothing is shared across machines.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, warn};

/// Wall-clock source, injected so staleness tests don't sleep.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> i64;
}

/// Production clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    stored_at: i64,
    payload: serde_json::Value,
}

/// Raw key-value persistence behind the cache store.
///
/// IO failures are reported so the store can degrade to a miss; they never
/// surface to fetch callers.
pub trait CacheBackend: Send + Sync {
    fn load(&self, key: &str) -> io::Result<Option<String>>;
    fn store(&self, key: &str, raw: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Volatile backend for tests and the fresh-only variant.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl CacheBackend for MemoryBackend {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn store(&self, key: &str, raw: &str) -> io::Result<()> {
        self.lock().insert(key.to_owned(), raw.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

impl MemoryBackend {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .expect("cache entry map should not be poisoned")
    }
}

/// Durable backend: one `<key>.json` file per logical key under a local
/// directory. The dashboard's analogue of browser local storage.
#[derive(Debug)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are symbol-derived; anything else is flattened to keep the
        // file name safe.
        let safe: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl CacheBackend for JsonFileBackend {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn store(&self, key: &str, raw: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), raw)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error),
        }
    }
}

/// Time-bounded key-value cache for fetch payloads.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    clock: Arc<dyn Clock>,
    max_age: Duration,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn CacheBackend>, max_age: Duration) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            max_age,
        }
    }

    /// Volatile store, mostly for tests.
    pub fn in_memory(max_age: Duration) -> Self {
        Self::new(Arc::new(MemoryBackend::default()), max_age)
    }

    /// Durable store backed by JSON files under `dir`.
    pub fn durable(dir: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self::new(Arc::new(JsonFileBackend::new(dir)), max_age)
    }

    /// Disabled store: every `get` misses, every `put` is a no-op. The
    /// always-fetch-fresh variant runs with this.
    pub fn disabled() -> Self {
        Self::in_memory(Duration::ZERO)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub const fn is_disabled(&self) -> bool {
        self.max_age.is_zero()
    }

    /// Return the cached payload for `key` if it is younger than `max_age`;
    /// a stale or unreadable entry is deleted and reported as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if self.is_disabled() {
            return None;
        }

        let raw = match self.backend.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                warn!(key, %error, "cache read failed; treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(error) => {
                warn!(key, %error, "cache entry unreadable; evicting");
                self.evict(key);
                return None;
            }
        };

        let age = self.clock.now_unix() - entry.stored_at;
        if age >= self.max_age.as_secs() as i64 {
            debug!(key, age_secs = age, "cache entry stale; evicting");
            self.evict(key);
            return None;
        }

        match serde_json::from_value(entry.payload) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key, %error, "cache payload shape mismatch; evicting");
                self.evict(key);
                None
            }
        }
    }

    /// Unconditionally overwrite the entry for `key` with the current
    /// timestamp. Write failures degrade to an uncached fetch.
    pub fn put<T: Serialize>(&self, key: &str, payload: &T) {
        if self.is_disabled() {
            return;
        }

        let payload = match serde_json::to_value(payload) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(key, %error, "cache payload not serializable; skipping write");
                return;
            }
        };

        let entry = CacheEntry {
            stored_at: self.clock.now_unix(),
            payload,
        };

        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(key, %error, "cache entry not serializable; skipping write");
                return;
            }
        };

        if let Err(error) = self.backend.store(key, &raw) {
            warn!(key, %error, "cache write failed; continuing uncached");
        }
    }

    fn evict(&self, key: &str) {
        if let Err(error) = self.backend.remove(key) {
            warn!(key, %error, "failed to remove stale cache entry");
        }
    }
}
