//! IP geolocation via ip-api.com.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::types::{from_ureq, GeoLocation, ProviderError};
use super::GeoResolver;

const PROVIDER: &str = "ip-api.com";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Resolver backed by the free ip-api.com JSON endpoint.
///
/// The input string is not validated here; whatever the caller hands over is
/// templated into the lookup URL and the provider gets to judge it.
#[derive(Clone)]
pub struct IpApiResolver {
    agent: ureq::Agent,
}

impl IpApiResolver {
    pub fn new() -> Self {
        Self {
            agent: ureq::builder().timeout(TIMEOUT).build(),
        }
    }
}

impl Default for IpApiResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoResolver for IpApiResolver {
    fn resolve(&self, ip_address: &str) -> Result<GeoLocation, ProviderError> {
        let url = format!("http://ip-api.com/json/{}", ip_address);

        let body = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| from_ureq(PROVIDER, e))?
            .into_string()
            .map_err(|e| ProviderError::unavailable(PROVIDER, e.to_string()))?;

        let location = parse_geo(&body)?;
        debug!(ip = ip_address, lat = location.latitude, lon = location.longitude, "resolved");
        Ok(location)
    }
}

/// Response fields we consume. The provider also sends `country`, `city`,
/// `isp`, and more; serde drops those on the floor.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// ip-api signals lookup failure in-band with `status: "fail"` and HTTP 200,
/// so the body has to be inspected rather than trusted.
fn parse_geo(body: &str) -> Result<GeoLocation, ProviderError> {
    let parsed: IpApiResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::invalid(PROVIDER, e.to_string()))?;

    if parsed.status != "success" {
        let reason = parsed.message.unwrap_or_else(|| format!("status '{}'", parsed.status));
        return Err(ProviderError::invalid(PROVIDER, reason));
    }

    match (parsed.lat, parsed.lon) {
        (Some(latitude), Some(longitude)) => Ok(GeoLocation { latitude, longitude }),
        _ => Err(ProviderError::invalid(PROVIDER, "missing lat/lon fields")),
    }
}
