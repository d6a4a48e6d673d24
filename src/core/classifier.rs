use crate::core::lookup_result::{Classification, LookupResult};
use log::trace;
use std::ops::ControlFlow;

/*-------------------------------------------------------------------------------------------------
  Constants
-------------------------------------------------------------------------------------------------*/

/// Fourth octet appended to three-octet addresses.
pub const FILL_OCTET: &str = "112";

/// Prefix of the deployment's own network unless one is configured.
pub const DEFAULT_LOCAL_PREFIX: &str = "192.168.106.";

/// RFC 1918 private ranges: 10.0.0.0/8, 172.16.0.0/12 (as its sixteen /16 prefixes) and
/// 192.168.0.0/16.
const NON_ROUTABLE_PREFIXES: [&str; 18] = [
    "192.168.", "10.", "172.16.", "172.17.", "172.18.", "172.19.", "172.20.", "172.21.",
    "172.22.", "172.23.", "172.24.", "172.25.", "172.26.", "172.27.", "172.28.", "172.29.",
    "172.30.", "172.31.",
];

/*--------------------------------------------------------------------------------------
  Home Location
--------------------------------------------------------------------------------------*/

const HOME_ISP: &str = "LaughingJ";
const HOME_ORG: &str = "LaughingJ";
const HOME_CITY: &str = "Lewisville";
const HOME_COUNTRY_CODE: &str = "US";
const HOME_COUNTRY_NAME: &str = "United States";

/*-------------------------------------------------------------------------------------------------
  Address Normalization
-------------------------------------------------------------------------------------------------*/

/// Complete a three-octet address (`a.b.c`) with [FILL_OCTET]; any other input is returned
/// unchanged. Runs before classification so a host yields the same class and cache key whether
/// or not the caller supplied the last octet.
///
/// ```
/// assert_eq!(geolocate::normalize("8.8.8"), "8.8.8.112");
/// assert_eq!(geolocate::normalize("8.8.8.8"), "8.8.8.8");
/// ```
pub fn normalize(address: &str) -> String {
    if address.split('.').count() == 3 {
        format!("{address}.{FILL_OCTET}")
    } else {
        address.to_string()
    }
}

/*-------------------------------------------------------------------------------------------------
  Local Network
-------------------------------------------------------------------------------------------------*/

/// The operator's own network, identified by a string prefix such as `192.168.106.`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocalNetwork {
    prefix: String,
}

impl Default for LocalNetwork {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_PREFIX)
    }
}

impl LocalNetwork {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn contains(&self, address: &str) -> bool {
        !self.prefix.is_empty() && address.starts_with(&self.prefix)
    }

    /// Whether `address` falls in a private range other than this local network.
    pub fn is_non_routable(&self, address: &str) -> bool {
        !self.contains(address)
            && NON_ROUTABLE_PREFIXES
                .iter()
                .any(|prefix| address.starts_with(prefix))
    }
}

/*-------------------------------------------------------------------------------------------------
  Classification Stage
-------------------------------------------------------------------------------------------------*/

/// First stage of a lookup. Local and non-routable addresses are finished here
/// ([ControlFlow::Break]); routable addresses continue to the cache and the remote resolver.
///
/// The local check runs first because the local prefix sits inside one of the private ranges.
pub fn classify(
    result: LookupResult,
    network: &LocalNetwork,
) -> ControlFlow<LookupResult, LookupResult> {
    if network.contains(&result.address) {
        trace!("{} is on the local network", result.address);
        return ControlFlow::Break(home_location(result));
    }

    if network.is_non_routable(&result.address) {
        trace!("{} is non-routable", result.address);
        return ControlFlow::Break(non_routable(result));
    }

    ControlFlow::Continue(result)
}

fn home_location(result: LookupResult) -> LookupResult {
    LookupResult {
        isp: HOME_ISP.to_string(),
        org: HOME_ORG.to_string(),
        city: HOME_CITY.to_string(),
        country_code: HOME_COUNTRY_CODE.to_string(),
        country_name: HOME_COUNTRY_NAME.to_string(),
        success: true,
        located: true,
        classification: Classification::Local,
        ..result
    }
}

fn non_routable(result: LookupResult) -> LookupResult {
    LookupResult {
        success: false,
        located: false,
        error: format!("Invalid public IPv4 or IPv6 address {}", result.address),
        classification: Classification::NonRoutable,
        ..result
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
