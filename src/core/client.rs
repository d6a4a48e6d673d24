use crate::core::cache::{CacheStore, NullCache, RedisCache};
use crate::core::classifier::{classify, normalize, LocalNetwork, DEFAULT_LOCAL_PREFIX};
use crate::core::errors::Result;
use crate::core::lookup_result::{Classification, LookupResult};
use crate::core::report::{LogReporter, Reporter};
use crate::core::resolver::{HttpResolver, Resolver, DEFAULT_URL};
use log::{debug, info, warn};
use std::env;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

/*-------------------------------------------------------------------------------------------------
  Simple Interface
-------------------------------------------------------------------------------------------------*/

/// _**Simple library interface**_ that builds a [GeoLocator] from the environment and looks up a
/// single address. Fails only when the locator cannot be built (for example, when a Redis URL is
/// configured but the server does not answer).
///
/// ```no_run
/// let result = geolocate::lookup("8.8.8.8").unwrap();
/// println!("{} {} ({})", result.address, result.country_code, result.classification);
/// ```
pub fn lookup(address: &str) -> Result<LookupResult> {
    Ok(GeoLocator::new()?.lookup(address))
}

/*-------------------------------------------------------------------------------------------------
  GeoLocator Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [GeoLocator] struct. Provides setters for each configuration value and
/// for the collaborators (cache, resolver, reporter) the locator is composed of.
///
/// ```
/// use std::sync::Arc;
///
/// let locator = geolocate::GeoLocatorBuilder::default()
///     .url("https://json.geoiplookup.io")
///     .cache(Arc::new(geolocate::MemoryCache::new()))
///     .cache_ttl(60 * 60) // 1 hour
///     .local_prefix("10.20.")
///     .http_timeout(2000) // 2 seconds
///     .build()
///     .unwrap();
///
/// assert_eq!(locator.cache_backend(), "memory");
/// assert_eq!(locator.local_prefix(), "10.20.");
/// ```
///
/// The [GeoLocatorBuilder::new] method sources initial configuration values from environment
/// variables when set and uses default values when they are not set. Use
/// [GeoLocatorBuilder::default] to ignore the environment.
#[derive(Clone)]
pub struct GeoLocatorBuilder {
    url: String,
    redis_url: Option<String>,
    cache_ttl: u64,
    local_prefix: String,
    http_timeout: u64,
    cache_timeout: u64,

    cache: Option<Arc<dyn CacheStore>>,
    resolver: Option<Arc<dyn Resolver>>,
    reporter: Option<Arc<dyn Reporter>>,
}

/*--------------------------------------------------------------------------------------
  GeoLocator Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for GeoLocatorBuilder {
    /// Create a new [GeoLocatorBuilder] with default configuration values.
    ///
    /// ```
    /// let locator = geolocate::GeoLocatorBuilder::default().build().unwrap();
    ///
    /// assert_eq!(locator.url(), "https://json.geoiplookup.io");
    /// assert_eq!(locator.redis_url(), None);
    /// assert_eq!(locator.cache_ttl(), 7776000);
    /// assert_eq!(locator.local_prefix(), "192.168.106.");
    /// assert_eq!(locator.http_timeout(), 5000);
    /// assert_eq!(locator.cache_timeout(), 1000);
    /// ```
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            redis_url: None,
            cache_ttl: 90 * 24 * 60 * 60, // 90 days
            local_prefix: DEFAULT_LOCAL_PREFIX.to_string(),
            http_timeout: 5000, // 5 seconds
            cache_timeout: 1000, // 1 second
            cache: None,
            resolver: None,
            reporter: None,
        }
    }
}

impl fmt::Debug for GeoLocatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoLocatorBuilder")
            .field("url", &self.url)
            .field("redis_url", &self.redis_url)
            .field("cache_ttl", &self.cache_ttl)
            .field("local_prefix", &self.local_prefix)
            .field("http_timeout", &self.http_timeout)
            .field("cache_timeout", &self.cache_timeout)
            .field("cache", &self.cache.as_ref().map(|cache| cache.name()))
            .finish_non_exhaustive()
    }
}

impl GeoLocatorBuilder {
    /// Create a new [GeoLocatorBuilder] reading initial configuration values from
    /// environment variables when set and default values when they are not set.
    ///
    /// The environment variables used to set the initial configuration values
    /// are:
    /// - `GEOLOCATE_URL`
    /// - `GEOLOCATE_REDIS_URL` (falls back to a legacy `REDIS_CONF=host:port`)
    /// - `GEOLOCATE_CACHE_TTL`
    /// - `GEOLOCATE_LOCAL_PREFIX`
    /// - `GEOLOCATE_HTTP_TIMEOUT`
    /// - `GEOLOCATE_CACHE_TIMEOUT`
    pub fn new() -> Self {
        let default = GeoLocatorBuilder::default();

        Self {
            url: get_env_var("GEOLOCATE_URL", default.url),
            redis_url: get_redis_url(),
            cache_ttl: get_env_var("GEOLOCATE_CACHE_TTL", default.cache_ttl),
            local_prefix: get_env_var("GEOLOCATE_LOCAL_PREFIX", default.local_prefix),
            http_timeout: get_env_var("GEOLOCATE_HTTP_TIMEOUT", default.http_timeout),
            cache_timeout: get_env_var("GEOLOCATE_CACHE_TIMEOUT", default.cache_timeout),
            ..default
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the base URL of the geolocation API; defaults to
    /// `https://json.geoiplookup.io`. Lookups request `{url}/{address}`.
    pub fn url(&mut self, url: &str) -> &mut Self {
        self.url = url.to_string();
        self
    }

    /// Set the Redis URL used for the cache (e.g. `redis://localhost:6379/0`).
    /// Without one, and without an explicit [GeoLocatorBuilder::cache], caching is
    /// disabled.
    pub fn redis_url(&mut self, redis_url: &str) -> &mut Self {
        self.redis_url = Some(redis_url.to_string());
        self
    }

    /// Set how long (in seconds) resolved records stay in the cache; defaults to
    /// 90 days (`7776000` seconds).
    pub fn cache_ttl(&mut self, cache_ttl: u64) -> &mut Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// Set the address prefix of the deployment's own network; defaults to
    /// `192.168.106.`. An empty prefix disables the local-network check.
    pub fn local_prefix(&mut self, local_prefix: &str) -> &mut Self {
        self.local_prefix = local_prefix.to_string();
        self
    }

    /// Set the maximum time (in milliseconds) a request to the geolocation API may
    /// take; defaults to `5000` milliseconds.
    pub fn http_timeout(&mut self, http_timeout: u64) -> &mut Self {
        self.http_timeout = http_timeout;
        self
    }

    /// Set the maximum time (in milliseconds) for connecting to, reading from, or
    /// writing to Redis; defaults to `1000` milliseconds.
    pub fn cache_timeout(&mut self, cache_timeout: u64) -> &mut Self {
        self.cache_timeout = cache_timeout;
        self
    }

    /// Use `cache` instead of connecting to Redis.
    pub fn cache(&mut self, cache: Arc<dyn CacheStore>) -> &mut Self {
        self.cache = Some(cache);
        self
    }

    /// Use `resolver` instead of the HTTP resolver.
    pub fn resolver(&mut self, resolver: Arc<dyn Resolver>) -> &mut Self {
        self.resolver = Some(resolver);
        self
    }

    /// Use `reporter` instead of the [LogReporter].
    pub fn reporter(&mut self, reporter: Arc<dyn Reporter>) -> &mut Self {
        self.reporter = Some(reporter);
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    /// Build the [GeoLocator]. Connects to Redis when a Redis URL is configured and
    /// no cache was supplied; an unreachable server is an error.
    pub fn build(&self) -> Result<GeoLocator> {
        let cache: Arc<dyn CacheStore> = match (&self.cache, &self.redis_url) {
            (Some(cache), _) => Arc::clone(cache),
            (None, Some(redis_url)) => Arc::new(RedisCache::connect(
                redis_url,
                Duration::from_millis(self.cache_timeout),
            )?),
            (None, None) => {
                warn!("No Redis URL configured; caching is disabled");
                Arc::new(NullCache)
            }
        };

        let resolver: Arc<dyn Resolver> = match &self.resolver {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(HttpResolver::new(
                &self.url,
                Duration::from_millis(self.http_timeout),
            )?),
        };

        let reporter: Arc<dyn Reporter> = self
            .reporter
            .clone()
            .unwrap_or_else(|| Arc::new(LogReporter));

        info!("Cache backend: {}", cache.name());

        Ok(GeoLocator {
            url: self.url.clone(),
            redis_url: self.redis_url.clone(),
            cache_ttl: self.cache_ttl,
            network: LocalNetwork::new(&self.local_prefix),
            http_timeout: self.http_timeout,
            cache_timeout: self.cache_timeout,
            cache,
            resolver,
            reporter,
        })
    }
}

/*-------------------------------------------------------------------------------------------------
  GeoLocator
-------------------------------------------------------------------------------------------------*/

/// Looks up geographic and network metadata for IP addresses.
///
/// Each lookup runs once, in order, on the calling thread:
///
/// 1. normalize the address (three octets are completed with a fixed fourth);
/// 2. classify it; local and non-routable addresses are answered immediately;
/// 3. serve a usable cached record if there is one;
/// 4. otherwise ask the remote resolver and cache a usable answer.
///
/// A [GeoLocator] can be shared between threads. Concurrent lookups of the same cold address
/// each go to the resolver and each write the cache; the last write wins.
#[derive(Clone)]
pub struct GeoLocator {
    url: String,
    redis_url: Option<String>,
    cache_ttl: u64,
    network: LocalNetwork,
    http_timeout: u64,
    cache_timeout: u64,

    cache: Arc<dyn CacheStore>,
    resolver: Arc<dyn Resolver>,
    reporter: Arc<dyn Reporter>,
}

/*--------------------------------------------------------------------------------------
  GeoLocator Implementation
--------------------------------------------------------------------------------------*/

impl fmt::Debug for GeoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoLocator")
            .field("url", &self.url)
            .field("redis_url", &self.redis_url)
            .field("cache_ttl", &self.cache_ttl)
            .field("network", &self.network)
            .field("http_timeout", &self.http_timeout)
            .field("cache_timeout", &self.cache_timeout)
            .field("cache", &self.cache.name())
            .finish_non_exhaustive()
    }
}

impl GeoLocator {
    /// Build a [GeoLocator] configured from the environment; see [GeoLocatorBuilder::new].
    pub fn new() -> Result<Self> {
        GeoLocatorBuilder::new().build()
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    /// Cache entry lifetime in seconds.
    pub fn cache_ttl(&self) -> u64 {
        self.cache_ttl
    }

    pub fn local_prefix(&self) -> &str {
        self.network.prefix()
    }

    /// Remote request timeout in milliseconds.
    pub fn http_timeout(&self) -> u64 {
        self.http_timeout
    }

    /// Cache operation timeout in milliseconds.
    pub fn cache_timeout(&self) -> u64 {
        self.cache_timeout
    }

    /// Name of the cache backend in use (`redis`, `memory`, `none`, ...).
    pub fn cache_backend(&self) -> &'static str {
        self.cache.name()
    }

    /*-------------------------------------------------------------------------
      Lookup
    -------------------------------------------------------------------------*/

    /// Look up `address`. Always returns a record; inspect `classification`, `success` and
    /// `error` to tell the outcomes apart. The record's address is the normalized form.
    pub fn lookup(&self, address: &str) -> LookupResult {
        let result = self.run(LookupResult::new(&normalize(address)));
        self.reporter.report(&result);
        result
    }

    fn run(&self, result: LookupResult) -> LookupResult {
        let result = match classify(result, &self.network) {
            ControlFlow::Break(result) => return result,
            ControlFlow::Continue(result) => result,
        };

        let result = match self.check_cache(result) {
            ControlFlow::Break(result) => return result,
            ControlFlow::Continue(result) => result,
        };

        self.resolve(result)
    }

    /*-------------------------------------------------------------------------
      Private Methods
    -------------------------------------------------------------------------*/

    /// Serve the cached record when it is usable; otherwise continue with `result`.
    fn check_cache(&self, result: LookupResult) -> ControlFlow<LookupResult, LookupResult> {
        match self.cache.get(&result.address) {
            Some(cached) if cached.is_usable() => {
                debug!("Cache hit: {}", result.address);
                ControlFlow::Break(LookupResult {
                    address: result.address,
                    classification: Classification::CacheHit,
                    ..cached
                })
            }
            Some(_) => {
                warn!(
                    "Cached entry for {} has no country code; resolving again",
                    result.address
                );
                ControlFlow::Continue(result)
            }
            None => {
                debug!("Cache miss: {}", result.address);
                ControlFlow::Continue(result)
            }
        }
    }

    /// Resolve `result` remotely and cache the answer when it is usable.
    fn resolve(&self, result: LookupResult) -> LookupResult {
        let (result, error) = self.resolver.resolve(result);

        if error.is_none() && result.is_usable() {
            let snapshot = LookupResult {
                classification: Classification::Resolved,
                ..result.clone()
            };
            self.cache.set(
                &result.address,
                &snapshot,
                Duration::from_secs(self.cache_ttl),
            );
        } else {
            debug!("Not caching unresolved record for {}", result.address);
        }

        LookupResult {
            classification: Classification::CacheMiss,
            ..result
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Get and parse an environment variable value or return a default value.
fn get_env_var<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    env::var(env_var)
        .ok()
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", env_var, value))
                .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
                .ok()
        })
        .unwrap_or(default)
}

/// Redis URL from `GEOLOCATE_REDIS_URL`, or built from a legacy `REDIS_CONF=host:port`.
fn get_redis_url() -> Option<String> {
    let non_empty = |value: &String| !value.trim().is_empty();

    env::var("GEOLOCATE_REDIS_URL")
        .ok()
        .filter(non_empty)
        .inspect(|value| info!("Using GEOLOCATE_REDIS_URL: {}", value))
        .or_else(|| {
            env::var("REDIS_CONF")
                .ok()
                .filter(non_empty)
                .inspect(|value| info!("Using REDIS_CONF: {}", value))
                .map(|address| format!("redis://{address}/"))
        })
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MemoryCache;
    use crate::core::errors::Error;
    use crate::core::lookup_result::UNKNOWN_COUNTRY_CODE;
    use env::VarError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use test_log::test;

    /*----------------------------------------------------------------------------------
      Test Collaborators
    ----------------------------------------------------------------------------------*/

    #[derive(Default)]
    struct FakeResolver {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeResolver {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Resolver for FakeResolver {
        fn resolve(&self, result: LookupResult) -> (LookupResult, Option<Error>) {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.fail {
                let message = format!(
                    "Request for IP {} failed: connection refused",
                    result.address
                );
                return (
                    LookupResult {
                        error: message.clone(),
                        ..result
                    },
                    Some(message.into()),
                );
            }

            let result = LookupResult {
                isp: "Google LLC".to_string(),
                city: "Mountain View".to_string(),
                country_code: "US".to_string(),
                country_name: "United States".to_string(),
                success: true,
                located: true,
                ..result
            };
            (result, None)
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        reported: Mutex<Vec<(String, Classification)>>,
    }

    impl Reporter for RecordingReporter {
        fn report(&self, result: &LookupResult) {
            self.reported
                .lock()
                .unwrap()
                .push((result.address.clone(), result.classification));
        }
    }

    struct Fixture {
        locator: GeoLocator,
        cache: Arc<MemoryCache>,
        resolver: Arc<FakeResolver>,
        reporter: Arc<RecordingReporter>,
    }

    fn fixture(resolver: FakeResolver) -> Fixture {
        let cache = Arc::new(MemoryCache::new());
        let resolver = Arc::new(resolver);
        let reporter = Arc::new(RecordingReporter::default());

        let locator = GeoLocatorBuilder::default()
            .cache(cache.clone())
            .resolver(resolver.clone())
            .reporter(reporter.clone())
            .build()
            .unwrap();

        Fixture {
            locator,
            cache,
            resolver,
            reporter,
        }
    }

    /*----------------------------------------------------------------------------------
      Short-Circuit Classifications
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_local_lookup_skips_cache_and_resolver() {
        let f = fixture(FakeResolver::default());

        let result = f.locator.lookup("192.168.106.5");

        assert_eq!(result.classification, Classification::Local);
        assert!(result.success);
        assert_eq!(result.isp, "LaughingJ");
        assert_eq!(result.city, "Lewisville");
        assert_eq!(result.country_code, "US");
        assert_eq!(f.resolver.calls(), 0);
        assert!(f.cache.is_empty());
    }

    #[test]
    fn test_non_routable_lookup_skips_cache_and_resolver() {
        let f = fixture(FakeResolver::default());

        let result = f.locator.lookup("192.168.1.1");

        assert_eq!(result.classification, Classification::NonRoutable);
        assert!(!result.success);
        assert_eq!(result.error, "Invalid public IPv4 or IPv6 address 192.168.1.1");
        assert_eq!(f.resolver.calls(), 0);
        assert!(f.cache.is_empty());
    }

    /*----------------------------------------------------------------------------------
      Cache-Aside
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_cold_then_warm_lookup() {
        let f = fixture(FakeResolver::default());

        let first = f.locator.lookup("8.8.8.8");
        assert_eq!(first.classification, Classification::CacheMiss);
        assert_eq!(f.resolver.calls(), 1);
        assert_eq!(f.cache.len(), 1);

        let second = f.locator.lookup("8.8.8.8");
        assert_eq!(second.classification, Classification::CacheHit);
        assert_eq!(f.resolver.calls(), 1);

        assert_eq!(
            LookupResult {
                classification: Classification::CacheMiss,
                ..second
            },
            first
        );
    }

    #[test]
    fn test_cached_snapshot_is_tagged_resolved() {
        let f = fixture(FakeResolver::default());

        f.locator.lookup("8.8.8.8");

        let snapshot = f.cache.get("8.8.8.8").unwrap();
        assert_eq!(snapshot.classification, Classification::Resolved);
        assert_eq!(snapshot.country_code, "US");
    }

    #[test]
    fn test_three_octet_address_shares_cache_entry() {
        let f = fixture(FakeResolver::default());

        let first = f.locator.lookup("8.8.8");
        assert_eq!(first.address, "8.8.8.112");
        assert_eq!(first.classification, Classification::CacheMiss);

        let second = f.locator.lookup("8.8.8.112");
        assert_eq!(second.address, "8.8.8.112");
        assert_eq!(second.classification, Classification::CacheHit);
        assert_eq!(f.resolver.calls(), 1);
    }

    #[test]
    fn test_sentinel_cache_entry_is_resolved_again() {
        let f = fixture(FakeResolver::default());
        let stale = LookupResult {
            isp: "Google LLC".to_string(),
            country_code: UNKNOWN_COUNTRY_CODE.to_string(),
            classification: Classification::Resolved,
            ..LookupResult::new("8.8.8.8")
        };
        f.cache.set("8.8.8.8", &stale, Duration::from_secs(60));

        let result = f.locator.lookup("8.8.8.8");

        assert_eq!(f.resolver.calls(), 1);
        assert_eq!(result.classification, Classification::CacheMiss);
        assert_eq!(result.country_code, "US");
        assert_eq!(f.cache.get("8.8.8.8").unwrap().country_code, "US");
    }

    #[test]
    fn test_resolver_failure_returns_record_and_skips_cache() {
        let f = fixture(FakeResolver::failing());

        let result = f.locator.lookup("8.8.8.8");

        assert_eq!(result.classification, Classification::CacheMiss);
        assert!(!result.success);
        assert!(result.error.starts_with("Request for IP 8.8.8.8 failed"));
        assert_eq!(result.country_code, UNKNOWN_COUNTRY_CODE);
        assert!(f.cache.is_empty());

        // Failures are not cached, so the next lookup tries again.
        f.locator.lookup("8.8.8.8");
        assert_eq!(f.resolver.calls(), 2);
    }

    #[test]
    fn test_concurrent_lookups() {
        let f = fixture(FakeResolver::default());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let result = f.locator.lookup("1.1.1.1");
                    assert_eq!(result.country_code, "US");
                });
            }
        });

        let calls = f.resolver.calls();
        assert!((1..=4).contains(&calls));
        assert_eq!(f.cache.len(), 1);
    }

    /*----------------------------------------------------------------------------------
      Reporting
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_every_lookup_is_reported_once() {
        let f = fixture(FakeResolver::default());

        f.locator.lookup("192.168.106.5");
        f.locator.lookup("10.0.0.1");
        f.locator.lookup("8.8.8.8");
        f.locator.lookup("8.8.8.8");

        let reported = f.reporter.reported.lock().unwrap().clone();
        assert_eq!(
            reported,
            vec![
                ("192.168.106.5".to_string(), Classification::Local),
                ("10.0.0.1".to_string(), Classification::NonRoutable),
                ("8.8.8.8".to_string(), Classification::CacheMiss),
                ("8.8.8.8".to_string(), Classification::CacheHit),
            ]
        );
    }

    /*----------------------------------------------------------------------------------
      Construction
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_build_without_redis_disables_cache() {
        let locator = GeoLocatorBuilder::default().build().unwrap();
        assert_eq!(locator.cache_backend(), "none");
        assert_eq!(locator.redis_url(), None);
    }

    #[test]
    fn test_build_fails_when_redis_is_unreachable() {
        let locator = GeoLocatorBuilder::default()
            .redis_url("redis://127.0.0.1:1/")
            .cache_timeout(250)
            .build();
        assert!(locator.is_err());
    }

    /*----------------------------------------------------------------------------------
      Test Environment Variable Configuration
    ----------------------------------------------------------------------------------*/

    /// ENV_VAR: GEOLOCATE_URL
    /// ENV_VAR: GEOLOCATE_REDIS_URL
    /// ENV_VAR: REDIS_CONF
    /// ENV_VAR: GEOLOCATE_CACHE_TTL
    /// ENV_VAR: GEOLOCATE_LOCAL_PREFIX
    /// ENV_VAR: GEOLOCATE_HTTP_TIMEOUT
    /// ENV_VAR: GEOLOCATE_CACHE_TIMEOUT
    #[test]
    fn test_environment_variable_configuration() {
        let test_env_vars = [
            ("GEOLOCATE_URL", "https://my-geo-api.com"),
            ("GEOLOCATE_REDIS_URL", ""),
            ("REDIS_CONF", "cache.internal:6379"),
            ("GEOLOCATE_CACHE_TTL", "60"),
            ("GEOLOCATE_LOCAL_PREFIX", "10.20."),
            ("GEOLOCATE_HTTP_TIMEOUT", "not-a-number"),
            ("GEOLOCATE_CACHE_TIMEOUT", "250"),
        ];

        let default = GeoLocatorBuilder::default();

        // Store environment variable values
        let stored_env_vars: Vec<(String, std::result::Result<String, VarError>)> = test_env_vars
            .iter()
            .map(|(env_var, _)| (env_var.to_string(), env::var(env_var)))
            .collect();

        // Unset all environment variables
        test_env_vars.iter().for_each(|(env_var, _)| unsafe {
            std::env::remove_var(env_var);
        });

        // Test default cases
        let new = GeoLocatorBuilder::new();
        assert_eq!(new.url, default.url);
        assert_eq!(new.redis_url, default.redis_url);
        assert_eq!(new.cache_ttl, default.cache_ttl);
        assert_eq!(new.local_prefix, default.local_prefix);
        assert_eq!(new.http_timeout, default.http_timeout);
        assert_eq!(new.cache_timeout, default.cache_timeout);

        // Set all environment variables
        for (env_var, value) in test_env_vars.iter() {
            unsafe { std::env::set_var(env_var, value) };
        }

        // Test environment variable configuration
        let env_config = GeoLocatorBuilder::new();
        assert_eq!(env_config.url, "https://my-geo-api.com");
        assert_eq!(
            env_config.redis_url.as_deref(),
            Some("redis://cache.internal:6379/")
        );
        assert_eq!(env_config.cache_ttl, 60);
        assert_eq!(env_config.local_prefix, "10.20.");
        assert_eq!(env_config.http_timeout, default.http_timeout);
        assert_eq!(env_config.cache_timeout, 250);

        // Reset environment variables
        for (env_var, value) in stored_env_vars {
            match value {
                Ok(value) => unsafe { std::env::set_var(env_var, value) },
                Err(VarError::NotPresent) => unsafe { std::env::remove_var(env_var) },
                Err(VarError::NotUnicode(value)) => unsafe { std::env::set_var(env_var, value) },
            }
        }
    }

    /*----------------------------------------------------------------------------------
      Test Getter and Setter Methods
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_getter_and_setter_methods() {
        let locator = GeoLocatorBuilder::default()
            .url("https://my-geo-api.com")
            .cache(Arc::new(MemoryCache::new()))
            .cache_ttl(60)
            .local_prefix("10.20.")
            .http_timeout(2000)
            .cache_timeout(250)
            .build()
            .unwrap();

        assert_eq!(locator.url(), "https://my-geo-api.com");
        assert_eq!(locator.cache_ttl(), 60);
        assert_eq!(locator.local_prefix(), "10.20.");
        assert_eq!(locator.http_timeout(), 2000);
        assert_eq!(locator.cache_timeout(), 250);
        assert_eq!(locator.cache_backend(), "memory");
    }
}
