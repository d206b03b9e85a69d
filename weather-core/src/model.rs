use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

/// Placeholder used when no place name is known for a set of coordinates.
pub const UNKNOWN_CITY: &str = "Ваш город";

/// What the caller wants weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free-text city name, possibly an alias such as "спб".
    City(String),
    /// A coordinate pair; `label` is a caller-known place name, used when the
    /// provider does not report one.
    Coordinates {
        lat: f64,
        lon: f64,
        label: Option<String>,
    },
}

impl LocationQuery {
    pub fn city(name: impl Into<String>) -> Self {
        LocationQuery::City(name.into())
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        LocationQuery::Coordinates {
            lat,
            lon,
            label: None,
        }
    }

    /// Name to show when the provider leaves the locality out.
    pub fn fallback_city(&self) -> &str {
        match self {
            LocationQuery::City(name) => name,
            LocationQuery::Coordinates { label, .. } => label.as_deref().unwrap_or(UNKNOWN_CITY),
        }
    }
}

/// Which backend produced a [`WeatherRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Mock,
    Live,
    LiveYandex,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Mock => "mock",
            Source::Live => "live",
            Source::LiveYandex => "live_yandex",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current conditions, normalized across providers.
///
/// `pressure` stays in the provider's own unit: hPa for OpenWeatherMap and
/// mock data, mmHg for Yandex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub temperature: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<i64>,
    pub description: String,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    #[serde(with = "local_timestamp")]
    pub timestamp: NaiveDateTime,
    pub source: Source,
}

impl WeatherRecord {
    /// Unit label for `pressure`.
    pub fn pressure_unit(&self) -> &'static str {
        match self.source {
            Source::LiveYandex => "мм рт. ст.",
            Source::Mock | Source::Live => "гПа",
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(local_timestamp::FORMAT).to_string()
    }
}

/// Retrieval time: local wall clock, whole seconds.
pub fn retrieval_time() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Approximate position of the current machine, from its public IP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpLocation {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

impl IpLocation {
    pub fn into_query(self) -> LocationQuery {
        LocationQuery::Coordinates {
            lat: self.lat,
            lon: self.lon,
            label: Some(self.city),
        }
    }
}

mod local_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
