//! Core types for the discomfort pipeline.

use serde::Serialize;
use thiserror::Error;

use super::index::Feeling;

/// Coordinates resolved from a client IP address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions at the nearest weather station.
///
/// `humidity_pct` is the provider's raw percentage, passed through unvalidated.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
}

/// Terminal output of the pipeline, serialized to the caller as
/// `{city, feeling, humidity, index, temperature}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscomfortResult {
    pub city: String,
    pub feeling: Feeling,
    pub humidity: u8,
    pub index: f64,
    pub temperature: f64,
}

/// Failures from the two external lookup stages.
///
/// `Unavailable` is a transport-level failure (DNS, connect, timeout);
/// `InvalidResponse` means the provider answered, but with a bad status, an
/// in-band failure, or a body we cannot decode. Neither is ever substituted
/// with zeroed data.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} is unreachable: {message}")]
    Unavailable {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned an unusable response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn unavailable(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider,
            message: message.into(),
        }
    }

    pub fn invalid(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider,
            message: message.into(),
        }
    }

    pub fn provider(&self) -> &'static str {
        match self {
            Self::Unavailable { provider, .. } | Self::InvalidResponse { provider, .. } => provider,
        }
    }
}

/// Map a `ureq` call error onto the taxonomy: transport problems are
/// `Unavailable`, HTTP error statuses are `InvalidResponse`.
pub(crate) fn from_ureq(provider: &'static str, err: ureq::Error) -> ProviderError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            ProviderError::invalid(provider, format!("status {}: {}", code, truncate(&body)))
        }
        ureq::Error::Transport(t) => ProviderError::unavailable(provider, t.to_string()),
    }
}

/// Keep provider error bodies short enough for a log line.
pub(crate) fn truncate(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &body[..i]),
        None => body.to_string(),
    }
}
