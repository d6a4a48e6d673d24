use crate::core::errors::{Error, Result};
use crate::core::lookup_result::LookupResult;
use flate2::read::GzDecoder;
use log::{debug, error, trace};
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING};
use reqwest::StatusCode;
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

/*-------------------------------------------------------------------------------------------------
  Resolver
-------------------------------------------------------------------------------------------------*/

/// Base URL of the geolocation API; the address is appended as the last path segment
/// (`https://json.geoiplookup.io/8.8.8.8`). The free tier allows about 500 lookups per hour.
pub const DEFAULT_URL: &str = "https://json.geoiplookup.io";

/// Resolves a routable address against a remote geolocation source.
///
/// A resolver always hands the record back. When resolution fails the record carries the reason
/// in its `error` field, keeps whatever was populated so far, and the error is returned alongside.
pub trait Resolver: Send + Sync {
    fn resolve(&self, result: LookupResult) -> (LookupResult, Option<Error>);
}

/*-------------------------------------------------------------------------------------------------
  HTTP Resolver
-------------------------------------------------------------------------------------------------*/

/// [Resolver] issuing a single `GET {url}/{address}` per lookup.
#[derive(Clone, Debug)]
pub struct HttpResolver {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpResolver {
    /// Build a resolver for the API at `url`. `timeout` bounds each request from connect until
    /// the body has been read.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_url(&self, address: &str) -> String {
        format!("{}/{}", self.url, address)
    }
}

impl Resolver for HttpResolver {
    fn resolve(&self, result: LookupResult) -> (LookupResult, Option<Error>) {
        let url = self.request_url(&result.address);
        debug!("Resolve {}: GET {}", result.address, url);

        let response = match self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_ENCODING, "gzip")
            .send()
        {
            Ok(response) => response,
            Err(error) => {
                let message = format!("Request for IP {} failed: {}", result.address, error);
                return failed(result, message, error.into());
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let message = format!("Invalid response for IP {}: {}", result.address, status);
            return failed(result, message.clone(), message.into());
        }

        let gzip = response
            .headers()
            .get(CONTENT_ENCODING)
            .is_some_and(|encoding| encoding.as_bytes().eq_ignore_ascii_case(b"gzip"));

        match response
            .bytes()
            .map_err(Error::from)
            .and_then(|body| decode_body(&body, gzip))
        {
            Ok(response) => {
                let result = response.apply(result);
                trace!("Parsed answer for {}: {:?}", result.address, result);
                (result, None)
            }
            Err(error) => {
                let message = format!("Invalid response body for IP {}: {}", result.address, error);
                failed(result, message, error)
            }
        }
    }
}

fn failed(result: LookupResult, message: String, error: Error) -> (LookupResult, Option<Error>) {
    error!("{message}");
    let result = LookupResult {
        error: message,
        ..result
    };
    (result, Some(error))
}

/*-------------------------------------------------------------------------------------------------
  Response Decoding
-------------------------------------------------------------------------------------------------*/

/// Decompress (when `gzip`) and parse an API response body.
pub(crate) fn decode_body(body: &[u8], gzip: bool) -> Result<ApiResponse> {
    if gzip {
        let mut json = Vec::new();
        GzDecoder::new(body).read_to_end(&mut json)?;
        Ok(serde_json::from_slice(&json)?)
    } else {
        Ok(serde_json::from_slice(body)?)
    }
}

/*--------------------------------------------------------------------------------------
  API Response
--------------------------------------------------------------------------------------*/

/// The API's JSON object. Every field is optional; fields the API leaves out keep the record's
/// current value when the response is applied.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub(crate) struct ApiResponse {
    pub ip: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    pub hostname: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub postal_code: Option<String>,
    pub region: Option<String>,
    pub district: Option<String>,
    pub timezone_name: Option<String>,
    pub connection_type: Option<String>,
    pub asn_number: Option<u32>,
    pub asn_org: Option<String>,
    pub asn: Option<String>,
    pub continent_code: Option<String>,
    pub continent_name: Option<String>,
    pub currency_code: Option<String>,
    pub currency_name: Option<String>,
    pub success: Option<bool>,
    pub error: Option<String>,
}

impl ApiResponse {
    /// Overlay the response onto `result` and mark it located. The address is the cache key and
    /// is never replaced by the API's echo of it.
    pub(crate) fn apply(self, result: LookupResult) -> LookupResult {
        if let Some(ip) = self.ip.as_deref().filter(|ip| *ip != result.address) {
            debug!("API answered {} for {}", ip, result.address);
        }

        LookupResult {
            isp: self.isp.unwrap_or(result.isp),
            org: self.org.unwrap_or(result.org),
            hostname: self.hostname.unwrap_or(result.hostname),
            city: self.city.unwrap_or(result.city),
            country_code: self.country_code.unwrap_or(result.country_code),
            country_name: self.country_name.unwrap_or(result.country_name),
            latitude: self.latitude.or(result.latitude),
            longitude: self.longitude.or(result.longitude),
            postal_code: self.postal_code.or(result.postal_code),
            region: self.region.or(result.region),
            district: self.district.or(result.district),
            timezone_name: self.timezone_name.or(result.timezone_name),
            connection_type: self.connection_type.or(result.connection_type),
            asn_number: self.asn_number.or(result.asn_number),
            asn_org: self.asn_org.or(result.asn_org),
            asn: self.asn.or(result.asn),
            continent_code: self.continent_code.or(result.continent_code),
            continent_name: self.continent_name.or(result.continent_name),
            currency_code: self.currency_code.or(result.currency_code),
            currency_name: self.currency_name.or(result.currency_name),
            success: self.success.unwrap_or(result.success),
            error: self.error.unwrap_or(result.error),
            located: true,
            ..result
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
