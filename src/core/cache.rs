use crate::core::errors::Result;
use crate::core::lookup_result::LookupResult;
use log::{debug, error, trace};
use moka::policy::Expiry;
use moka::sync::Cache;
use redis::Commands;
use std::time::{Duration, Instant};

/*-------------------------------------------------------------------------------------------------
  Cache Store
-------------------------------------------------------------------------------------------------*/

/// Key-value store of serialized [LookupResult] records keyed by normalized IP address.
///
/// Cache failures never reach the caller: a failed, timed-out or undecodable `get` is a miss and
/// a failed `set` is logged and dropped. Implementations are shared between concurrent lookups.
pub trait CacheStore: Send + Sync {
    /// Short backend name used in log messages.
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Option<LookupResult>;

    fn set(&self, key: &str, result: &LookupResult, ttl: Duration);
}

/*--------------------------------------------------------------------------------------
  Entry Encoding
--------------------------------------------------------------------------------------*/

fn encode_entry(key: &str, result: &LookupResult) -> Option<String> {
    serde_json::to_string(result)
        .inspect_err(|error| error!("Failed to serialize cache entry for `{key}`: {error}"))
        .ok()
}

fn decode_entry(key: &str, value: &str) -> Option<LookupResult> {
    serde_json::from_str(value)
        .inspect_err(|error| error!("Failed to deserialize cache entry for `{key}`: {error}"))
        .ok()
}

/*-------------------------------------------------------------------------------------------------
  Redis Cache
-------------------------------------------------------------------------------------------------*/

/// [CacheStore] backed by Redis. Values are JSON strings written with `SET key value EX ttl`.
///
/// Every operation opens its own connection from the shared [redis::Client], so concurrent
/// lookups never wait on each other. The configured timeout bounds connecting, reading and
/// writing; an operation that exceeds it is treated like any other cache failure.
#[derive(Clone, Debug)]
pub struct RedisCache {
    client: redis::Client,
    timeout: Duration,
}

impl RedisCache {
    /// Open a client for `url` (e.g. `redis://localhost:6379/0`) and verify the server answers a
    /// `PING`. An unreachable server is an error here rather than on first use.
    pub fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let cache = Self { client, timeout };

        let mut connection = cache
            .connection()
            .inspect_err(|error| error!("Failed to connect to Redis at `{url}`: {error}"))?;
        let pong: String = redis::cmd("PING")
            .query(&mut connection)
            .inspect_err(|error| error!("Failed to ping Redis at `{url}`: {error}"))?;
        debug!("Redis connection test successful: {pong}");

        Ok(cache)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn connection(&self) -> redis::RedisResult<redis::Connection> {
        let connection = self.client.get_connection_with_timeout(self.timeout)?;
        connection.set_read_timeout(Some(self.timeout))?;
        connection.set_write_timeout(Some(self.timeout))?;
        Ok(connection)
    }
}

impl CacheStore for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn get(&self, key: &str) -> Option<LookupResult> {
        let value = self
            .connection()
            .and_then(|mut connection| connection.get::<_, Option<String>>(key))
            .inspect_err(|error| error!("Failed to get `{key}` from Redis: {error}"))
            .ok()
            .flatten();

        match value {
            Some(value) => decode_entry(key, &value),
            None => {
                trace!("Key not found in Redis: {key}");
                None
            }
        }
    }

    fn set(&self, key: &str, result: &LookupResult, ttl: Duration) {
        let Some(value) = encode_entry(key, result) else {
            return;
        };

        // Redis rejects `EX 0`.
        let seconds = ttl.as_secs().max(1);

        let _ = self
            .connection()
            .and_then(|mut connection| connection.set_ex::<_, _, ()>(key, value, seconds))
            .inspect(|_| trace!("Cached `{key}` in Redis for {seconds} seconds"))
            .inspect_err(|error| error!("Failed to set `{key}` in Redis: {error}"));
    }
}

/*-------------------------------------------------------------------------------------------------
  Memory Cache
-------------------------------------------------------------------------------------------------*/

/// Upper bound on entries held by a [MemoryCache] built with [MemoryCache::new].
pub const DEFAULT_MEMORY_CAPACITY: u64 = 100_000;

/// Serialized record plus the TTL it was written with.
#[derive(Clone, Debug)]
struct MemoryEntry {
    ttl: Duration,
    value: String,
}

/// Expires each entry after the TTL given to the `set` that wrote it.
struct MemoryEntryExpiry;

impl Expiry<String, MemoryEntry> for MemoryEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &MemoryEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &MemoryEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process [CacheStore] on a bounded [moka] cache with per-entry expiry. Entries are stored
/// serialized, the same way they are stored in Redis, and expired entries are evicted by the
/// cache's housekeeping whether or not their key is read again.
#[derive(Clone)]
pub struct MemoryCache {
    inner: Cache<String, MemoryEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(MemoryEntryExpiry)
            .build();

        Self { inner }
    }

    /// Number of live entries, after pending evictions have run.
    pub fn len(&self) -> usize {
        self.inner.run_pending_tasks();
        self.inner.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MemoryCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<LookupResult> {
        match self.inner.get(key) {
            Some(entry) => decode_entry(key, &entry.value),
            None => {
                trace!("Key not found in memory cache: {key}");
                None
            }
        }
    }

    fn set(&self, key: &str, result: &LookupResult, ttl: Duration) {
        let Some(value) = encode_entry(key, result) else {
            return;
        };

        self.inner.insert(key.to_string(), MemoryEntry { ttl, value });
        trace!("Cached `{key}` in memory for {} seconds", ttl.as_secs());
    }
}

/*-------------------------------------------------------------------------------------------------
  Null Cache
-------------------------------------------------------------------------------------------------*/

/// Disabled cache: every `get` misses and every `set` is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCache;

impl CacheStore for NullCache {
    fn name(&self) -> &'static str {
        "none"
    }

    fn get(&self, _key: &str) -> Option<LookupResult> {
        None
    }

    fn set(&self, _key: &str, _result: &LookupResult, _ttl: Duration) {}
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
