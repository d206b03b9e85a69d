//! Core library for the `weather` tools.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Provider selection (Yandex, OpenWeather, mock) and response normalization
//! - Geocoding and IP-based location helpers
//! - Shared domain models (queries, records)
//!
//! It is used by `weather-cli` and `weather-web`.

pub mod config;
pub mod error;
pub mod geocode;
mod http;
pub mod location;
pub mod lookup;
pub mod model;
pub mod normalize;
pub mod provider;

pub use config::{Config, Endpoints, ProviderConfig};
pub use error::LookupError;
pub use http::{IP_LOOKUP_TIMEOUT, WEATHER_TIMEOUT};
pub use location::LocationResolver;
pub use lookup::WeatherLookup;
pub use model::{IpLocation, LocationQuery, Source, WeatherRecord};
pub use normalize::normalize_city;
pub use provider::{ProviderId, WeatherProvider};
