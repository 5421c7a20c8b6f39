//! The three-stage discomfort pipeline.
//!
//! IP address → coordinates (ip-api.com) → current weather (WeatherAPI.com)
//! → discomfort index and feeling band. The two lookup stages sit behind
//! traits so they can be stubbed out; the calculator is pure.

pub mod geo;
pub mod index;
pub mod types;
pub mod weather;

pub use geo::IpApiResolver;
pub use index::{classify, discomfort_index, Feeling};
pub use types::{DiscomfortResult, GeoLocation, ProviderError, WeatherSnapshot};
pub use weather::WeatherApiFetcher;

/// Maps an IP address to coordinates via an external lookup.
pub trait GeoResolver: Send + Sync {
    fn resolve(&self, ip_address: &str) -> Result<GeoLocation, ProviderError>;
}

/// Maps coordinates to current conditions via an external provider.
pub trait WeatherFetcher: Send + Sync {
    fn fetch(&self, location: &GeoLocation, api_key: &str)
        -> Result<WeatherSnapshot, ProviderError>;
}

/// Sequential composition of the three stages. Holds no request state: the IP
/// address and API key are parameters of every call, so concurrent requests
/// share one `Pipeline` without locking.
pub struct Pipeline {
    geo: Box<dyn GeoResolver>,
    weather: Box<dyn WeatherFetcher>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_providers(
            Box::new(IpApiResolver::new()),
            Box::new(WeatherApiFetcher::new()),
        )
    }

    /// Assemble a pipeline from explicit stages (used by tests).
    pub fn with_providers(geo: Box<dyn GeoResolver>, weather: Box<dyn WeatherFetcher>) -> Self {
        Self { geo, weather }
    }

    /// Run the whole pipeline for one request.
    pub fn run(&self, ip_address: &str, api_key: &str) -> Result<DiscomfortResult, ProviderError> {
        let location = self.geo.resolve(ip_address)?;
        let snapshot = self.weather.fetch(&location, api_key)?;
        Ok(classify(&snapshot))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubGeo {
        location: GeoLocation,
        fail_for: Option<&'static str>,
    }

    impl GeoResolver for StubGeo {
        fn resolve(&self, ip_address: &str) -> Result<GeoLocation, ProviderError> {
            if self.fail_for == Some(ip_address) {
                return Err(ProviderError::unavailable("ip-api.com", "connect timed out"));
            }
            Ok(self.location)
        }
    }

    struct StubWeather {
        snapshot: WeatherSnapshot,
        expect_key: &'static str,
    }

    impl WeatherFetcher for StubWeather {
        fn fetch(
            &self,
            location: &GeoLocation,
            api_key: &str,
        ) -> Result<WeatherSnapshot, ProviderError> {
            assert_eq!(api_key, self.expect_key);
            assert_eq!(location.latitude, 35.0);
            assert_eq!(location.longitude, 139.0);
            Ok(self.snapshot.clone())
        }
    }

    struct FailingWeather;

    impl WeatherFetcher for FailingWeather {
        fn fetch(&self, _: &GeoLocation, _: &str) -> Result<WeatherSnapshot, ProviderError> {
            Err(ProviderError::invalid("api.weatherapi.com", "garbage body"))
        }
    }

    fn tokyo_pipeline(fail_for: Option<&'static str>) -> Pipeline {
        Pipeline::with_providers(
            Box::new(StubGeo {
                location: GeoLocation {
                    latitude: 35.0,
                    longitude: 139.0,
                },
                fail_for,
            }),
            Box::new(StubWeather {
                snapshot: WeatherSnapshot {
                    city: "Tokyo".into(),
                    temperature_c: 25.0,
                    humidity_pct: 60,
                },
                expect_key: "key",
            }),
        )
    }

    #[test]
    fn composes_all_three_stages() {
        let result = tokyo_pipeline(None).run("203.0.113.5", "key").unwrap();

        assert_eq!(result.city, "Tokyo");
        assert_eq!(result.temperature, 25.0);
        assert_eq!(result.humidity, 60);
        assert_eq!(result.index, discomfort_index(25.0, 60));
        assert_eq!(result.feeling, Feeling::NotHot);
    }

    #[test]
    fn resolver_error_stops_the_pipeline() {
        let err = tokyo_pipeline(Some("203.0.113.5"))
            .run("203.0.113.5", "key")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable { .. }));
    }

    #[test]
    fn fetcher_error_propagates() {
        let pipeline = Pipeline::with_providers(
            Box::new(StubGeo {
                location: GeoLocation {
                    latitude: 35.0,
                    longitude: 139.0,
                },
                fail_for: None,
            }),
            Box::new(FailingWeather),
        );
        let err = pipeline.run("203.0.113.5", "key").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse { .. }));
    }

    // One caller's failure must not leak into another caller's request: the
    // pipeline carries no per-request state between calls.
    #[test]
    fn failure_does_not_poison_later_requests() {
        let pipeline = tokyo_pipeline(Some("198.51.100.9"));

        assert!(pipeline.run("198.51.100.9", "key").is_err());

        let result = pipeline.run("203.0.113.5", "key").unwrap();
        assert_eq!(result.city, "Tokyo");
        assert_eq!(result.feeling, Feeling::NotHot);
    }
}
