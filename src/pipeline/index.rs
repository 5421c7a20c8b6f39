//! Discomfort index calculator.
//!
//! Pure arithmetic over temperature and humidity; no I/O and no failure mode.
//! The formula is the Thom discomfort index as used in Japanese weather
//! reporting, with eight qualitative bands on inclusive upper bounds.

use serde::{Serialize, Serializer};

use super::types::{DiscomfortResult, WeatherSnapshot};

/// Qualitative comfort band for an index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feeling {
    Cold,
    ColdALittle,
    NoFeeling,
    FeelsGood,
    NotHot,
    HotALittle,
    Hot,
    TooHot,
}

impl Feeling {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cold => "Cold",
            Self::ColdALittle => "Cold a little",
            Self::NoFeeling => "No feeling",
            Self::FeelsGood => "Feels Good",
            Self::NotHot => "Not Hot",
            Self::HotALittle => "Hot a little",
            Self::Hot => "Hot",
            Self::TooHot => "Too Hot",
        }
    }

    /// Classify an index value. Bounds are inclusive on the upper side and
    /// exact: 55.0 is `Cold`, anything above it up to 60.0 is `ColdALittle`.
    pub fn from_index(index: f64) -> Self {
        if index <= 55.0 {
            Self::Cold
        } else if index <= 60.0 {
            Self::ColdALittle
        } else if index <= 65.0 {
            Self::NoFeeling
        } else if index <= 70.0 {
            Self::FeelsGood
        } else if index <= 75.0 {
            Self::NotHot
        } else if index <= 80.0 {
            Self::HotALittle
        } else if index <= 85.0 {
            Self::Hot
        } else {
            Self::TooHot
        }
    }
}

impl std::fmt::Display for Feeling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Feeling {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// `0.81*T + 0.01*H*(0.99*T - 14.3) + 46.3` with `T` in Celsius and `H` the
/// humidity percentage.
pub fn discomfort_index(temperature_c: f64, humidity_pct: u8) -> f64 {
    let t = temperature_c;
    let h = f64::from(humidity_pct);
    0.81 * t + 0.01 * h * (0.99 * t - 14.3) + 46.3
}

/// Score a weather snapshot. City, temperature, and humidity pass through
/// unchanged.
pub fn classify(weather: &WeatherSnapshot) -> DiscomfortResult {
    let index = discomfort_index(weather.temperature_c, weather.humidity_pct);

    DiscomfortResult {
        city: weather.city.clone(),
        feeling: Feeling::from_index(index),
        humidity: weather.humidity_pct,
        index,
        temperature: weather.temperature_c,
    }
}
