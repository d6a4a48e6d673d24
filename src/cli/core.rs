use crate::cli;
use geolocate::{GeoLocator, GeoLocatorBuilder, MemoryCache, Result};
use std::io::{self, BufRead};
use std::sync::Arc;

/*-------------------------------------------------------------------------------------------------
  Core functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Build the GeoLocator from the environment and CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_locator(args: &cli::Args) -> Result<GeoLocator> {
    let mut builder = GeoLocatorBuilder::new();

    if let Some(url) = &args.url {
        builder.url(url);
    }
    if let Some(redis_url) = &args.redis_url {
        builder.redis_url(redis_url);
    }
    if args.memory_cache {
        builder.cache(Arc::new(MemoryCache::new()));
    }
    if let Some(ttl) = args.ttl {
        builder.cache_ttl(ttl);
    }
    if let Some(local_prefix) = &args.local_prefix {
        builder.local_prefix(local_prefix);
    }
    if let Some(http_timeout) = args.http_timeout {
        builder.http_timeout(http_timeout);
    }
    if let Some(cache_timeout) = args.cache_timeout {
        builder.cache_timeout(cache_timeout);
    }

    builder.build()
}

/*--------------------------------------------------------------------------------------
  Addresses from CLI arguments or stdin
--------------------------------------------------------------------------------------*/

pub fn addresses(args: &cli::Args) -> Result<Vec<String>> {
    if args.addresses.is_empty() {
        read_addresses(io::stdin().lock())
    } else {
        Ok(args.addresses.clone())
    }
}

/// One address per line; surrounding whitespace is trimmed and blank lines are skipped.
fn read_addresses<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut addresses = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let address = line.trim();
        if !address.is_empty() {
            addresses.push(address.to_string());
        }
    }
    Ok(addresses)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
