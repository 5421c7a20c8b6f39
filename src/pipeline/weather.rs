//! Current weather via WeatherAPI.com.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::types::{from_ureq, GeoLocation, ProviderError, WeatherSnapshot};
use super::WeatherFetcher;

const PROVIDER: &str = "api.weatherapi.com";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Fetcher backed by WeatherAPI.com's `current.json` endpoint.
#[derive(Clone)]
pub struct WeatherApiFetcher {
    agent: ureq::Agent,
}

impl WeatherApiFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::builder().timeout(TIMEOUT).build(),
        }
    }
}

impl Default for WeatherApiFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherFetcher for WeatherApiFetcher {
    fn fetch(&self, location: &GeoLocation, api_key: &str) -> Result<WeatherSnapshot, ProviderError> {
        // `{}` on f64 prints the shortest representation that round-trips, so
        // the provider sees exactly the coordinates we resolved. `aqi=yes` is
        // part of the request contract even though air quality goes unused.
        let query = format!("{},{}", location.latitude, location.longitude);

        let body = self
            .agent
            .get("http://api.weatherapi.com/v1/current.json")
            .query("key", api_key)
            .query("q", &query)
            .query("aqi", "yes")
            .call()
            .map_err(|e| from_ureq(PROVIDER, e))?
            .into_string()
            .map_err(|e| ProviderError::unavailable(PROVIDER, e.to_string()))?;

        let snapshot = parse_weather(&body)?;
        debug!(city = %snapshot.city, temp_c = snapshot.temperature_c, "fetched");
        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
}

/// The interesting slice of the response; wind, pressure, and the air-quality
/// block are ignored.
#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

fn parse_weather(body: &str) -> Result<WeatherSnapshot, ProviderError> {
    let parsed: WaResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::invalid(PROVIDER, e.to_string()))?;

    Ok(WeatherSnapshot {
        city: parsed.location.name,
        temperature_c: parsed.current.temp_c,
        humidity_pct: parsed.current.humidity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "location": {
            "name": "Shibuya",
            "region": "Tokyo",
            "country": "Japan",
            "lat": 35.66,
            "lon": 139.7,
            "tz_id": "Asia/Tokyo",
            "localtime_epoch": 1724550000,
            "localtime": "2024-08-25 10:40"
        },
        "current": {
            "last_updated": "2024-08-25 10:30",
            "temp_c": 31.2,
            "temp_f": 88.2,
            "is_day": 1,
            "condition": {"text": "Partly cloudy", "icon": "", "code": 1003},
            "wind_kph": 13.0,
            "pressure_mb": 1009.0,
            "humidity": 71,
            "cloud": 50,
            "feelslike_c": 36.4,
            "uv": 7.0,
            "air_quality": {
                "co": 230.3, "no2": 11.1, "o3": 71.5, "so2": 2.9,
                "pm2_5": 8.7, "pm10": 9.3, "us-epa-index": 1, "gb-defra-index": 1
            }
        }
    }"#;

    #[test]
    fn extracts_city_temperature_humidity() {
        let snap = parse_weather(SAMPLE).unwrap();
        assert_eq!(snap.city, "Shibuya");
        assert_eq!(snap.temperature_c, 31.2);
        assert_eq!(snap.humidity_pct, 71);
    }

    #[test]
    fn malformed_body_is_invalid_response() {
        let err = parse_weather(r#"{"error":{"code":1006,"message":"No matching location found."}}"#)
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse { .. }));
    }

    #[test]
    fn coordinates_round_trip_in_query() {
        let loc = GeoLocation {
            latitude: 35.6893,
            longitude: -0.125,
        };
        assert_eq!(
            format!("{},{}", loc.latitude, loc.longitude),
            "35.6893,-0.125"
        );
    }
}
