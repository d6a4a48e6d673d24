use serde::{Deserialize, Serialize};
use std::fmt;

/*-------------------------------------------------------------------------------------------------
  Sentinel Values
-------------------------------------------------------------------------------------------------*/

/// Placeholder for descriptive fields that have not been resolved.
pub const UNKNOWN: &str = "-----";

/// Placeholder for the two-letter country code until it has been resolved.
pub const UNKNOWN_COUNTRY_CODE: &str = "--";

/*-------------------------------------------------------------------------------------------------
  Classification
-------------------------------------------------------------------------------------------------*/

/// Where a [LookupResult] came from. Exactly one tag applies to a record at any time; it drives
/// both the lookup pipeline and the way a result is reported.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    /// Address belongs to the deployment's own network.
    Local,

    /// Address is in a reserved private (RFC 1918) range.
    NonRoutable,

    /// Record was served from the cache.
    CacheHit,

    /// Record was not (usably) cached and was fetched from the remote API.
    #[default]
    CacheMiss,

    /// Record was resolved by the remote API; the tag carried by cached snapshots.
    Resolved,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Local => "local",
            Classification::NonRoutable => "non-routable",
            Classification::CacheHit => "cache-hit",
            Classification::CacheMiss => "cache-miss",
            Classification::Resolved => "resolved",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/*-------------------------------------------------------------------------------------------------
  Lookup Result
-------------------------------------------------------------------------------------------------*/

/// Geographic and network metadata for a single IP address.
///
/// A fresh record is created for every lookup with sentinel values in its descriptive fields;
/// each stage of the lookup pipeline takes the record by value and hands back an updated one.
/// The serialized form is also the value stored in the cache.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LookupResult {
    /// The (normalized) IP address; also the cache key.
    #[serde(rename = "ip")]
    pub address: String,

    pub isp: String,
    pub org: String,
    pub hostname: String,
    pub city: String,
    pub country_code: String,
    pub country_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_name: Option<String>,

    /// The record is a confirmed resolution.
    pub success: bool,

    /// Human-readable failure reason; empty when there is none.
    #[serde(default)]
    pub error: String,

    /// The remote API answered with a parsable body for this address.
    #[serde(default)]
    pub located: bool,

    #[serde(default)]
    pub classification: Classification,
}

impl LookupResult {
    /// Create a record for `address` with every descriptive field set to its sentinel.
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            isp: UNKNOWN.to_string(),
            org: UNKNOWN.to_string(),
            hostname: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            country_code: UNKNOWN_COUNTRY_CODE.to_string(),
            country_name: UNKNOWN.to_string(),
            latitude: None,
            longitude: None,
            postal_code: None,
            region: None,
            district: None,
            timezone_name: None,
            connection_type: None,
            asn_number: None,
            asn_org: None,
            asn: None,
            continent_code: None,
            continent_name: None,
            currency_code: None,
            currency_name: None,
            success: false,
            error: String::new(),
            located: false,
            classification: Classification::default(),
        }
    }

    /// A cached record is only trusted when its country code has been resolved.
    pub fn is_usable(&self) -> bool {
        self.country_code != UNKNOWN_COUNTRY_CODE
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use test_log::test;

    /*----------------------------------------------------------------------------------
      Test Helper Functions
    ----------------------------------------------------------------------------------*/

    pub(crate) fn test_google_dns_result() -> LookupResult {
        LookupResult {
            isp: "Google LLC".to_string(),
            org: "Google LLC".to_string(),
            hostname: "dns.google".to_string(),
            city: "Mountain View".to_string(),
            country_code: "US".to_string(),
            country_name: "United States".to_string(),
            latitude: Some(37.386),
            longitude: Some(-122.0838),
            region: Some("California".to_string()),
            asn_number: Some(15169),
            asn: Some("AS15169".to_string()),
            success: true,
            located: true,
            classification: Classification::Resolved,
            ..LookupResult::new("8.8.8.8")
        }
    }

    /*----------------------------------------------------------------------------------
      LookupResult
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_new_result_holds_sentinels() {
        let result = LookupResult::new("1.1.1.1");

        assert_eq!(result.address, "1.1.1.1");
        assert_eq!(result.isp, UNKNOWN);
        assert_eq!(result.city, UNKNOWN);
        assert_eq!(result.country_code, UNKNOWN_COUNTRY_CODE);
        assert_eq!(result.country_name, UNKNOWN);
        assert!(!result.success);
        assert!(!result.located);
        assert!(result.error.is_empty());
        assert_eq!(result.classification, Classification::CacheMiss);
        assert!(!result.is_usable());
    }

    #[test]
    fn test_resolved_result_is_usable() {
        assert!(test_google_dns_result().is_usable());
    }

    #[test]
    fn test_serialization_is_lossless() {
        let expected = test_google_dns_result();

        let json = serde_json::to_string(&expected).unwrap();
        let actual: LookupResult = serde_json::from_str(&json).unwrap();

        assert_eq!(actual, expected);
        assert!(json.contains(r#""ip":"8.8.8.8""#));
        assert!(json.contains(r#""classification":"resolved""#));
        assert!(!json.contains("postal_code"));
    }

    /*----------------------------------------------------------------------------------
      Classification
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_classification_names() {
        assert_eq!(Classification::Local.to_string(), "local");
        assert_eq!(Classification::NonRoutable.to_string(), "non-routable");
        assert_eq!(Classification::CacheHit.to_string(), "cache-hit");
        assert_eq!(Classification::CacheMiss.to_string(), "cache-miss");
        assert_eq!(Classification::Resolved.to_string(), "resolved");

        let json = serde_json::to_string(&Classification::NonRoutable).unwrap();
        assert_eq!(json, r#""non-routable""#);
    }
}
