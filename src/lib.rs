//! Resolve geographic and network metadata (ISP, city, country, ...) for IP addresses while
//! keeping calls to a rate-limited geolocation API to a minimum.
//!
//! Every lookup is classified locally first. Addresses on the deployment's own network get a
//! fixed home record, private (RFC 1918) addresses are rejected, and only routable addresses
//! reach the cache and, on a miss, the remote API. Resolved records are written back to the
//! cache (Redis) for next time.
//!
//! ```no_run
//! let locator = geolocate::GeoLocator::new()?;
//!
//! let result = locator.lookup("8.8.8.8");
//! println!("{} {} {}", result.address, result.country_code, result.classification);
//! # Ok::<(), geolocate::Error>(())
//! ```

/*-------------------------------------------------------------------------------------------------
  Modules
-------------------------------------------------------------------------------------------------*/

mod core;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::cache::{
    CacheStore, MemoryCache, NullCache, RedisCache, DEFAULT_MEMORY_CAPACITY,
};
pub use crate::core::classifier::{
    classify, normalize, LocalNetwork, DEFAULT_LOCAL_PREFIX, FILL_OCTET,
};
pub use crate::core::client::{lookup, GeoLocator, GeoLocatorBuilder};
pub use crate::core::errors::{Error, Result};
pub use crate::core::lookup_result::{
    Classification, LookupResult, UNKNOWN, UNKNOWN_COUNTRY_CODE,
};
pub use crate::core::report::{LogReporter, Reporter};
pub use crate::core::resolver::{HttpResolver, Resolver, DEFAULT_URL};
