use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::LookupError,
    geocode::{GeoPoint, NominatimGeocoder},
    http::{WEATHER_TIMEOUT, build_client, fetch_json},
    model::{LocationQuery, Source, WeatherRecord, retrieval_time},
    normalize::{round_temperature, title_case},
};

use super::WeatherProvider;

const SERVICE: &str = "Yandex Weather";
const API_KEY_HEADER: &str = "X-Yandex-Weather-Key";

/// Yandex only takes coordinates, so city names go through the geocoder first.
#[derive(Clone)]
pub struct YandexProvider {
    api_key: String,
    endpoint: String,
    geocoder: NominatimGeocoder,
    http: Client,
}

impl std::fmt::Debug for YandexProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YandexProvider")
            .field("endpoint", &self.endpoint)
            .field("geocoder", &self.geocoder)
            .finish_non_exhaustive()
    }
}

impl YandexProvider {
    pub fn new(api_key: String, endpoint: String, geocoder: NominatimGeocoder) -> Result<Self> {
        Ok(Self {
            api_key,
            endpoint,
            geocoder,
            http: build_client(WEATHER_TIMEOUT)?,
        })
    }

    async fn resolve(&self, query: &LocationQuery) -> Result<GeoPoint, LookupError> {
        match query {
            LocationQuery::City(name) => self.geocoder.geocode(name).await,
            LocationQuery::Coordinates { lat, lon, .. } => Ok(GeoPoint {
                lat: *lat,
                lon: *lon,
            }),
        }
    }

    async fn fetch_fact(&self, point: GeoPoint) -> Result<YaForecastResponse, LookupError> {
        debug!(endpoint = %self.endpoint, lat = point.lat, lon = point.lon, "requesting Yandex forecast");

        let request = self
            .http
            .get(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[
                ("lat", point.lat.to_string()),
                ("lon", point.lon.to_string()),
                ("lang", "ru_RU".to_string()),
                ("limit", "1".to_string()),
                ("hours", "false".to_string()),
            ]);

        fetch_json(SERVICE, request).await
    }
}

#[derive(Debug, Deserialize)]
struct YaFact {
    temp: f64,
    feels_like: Option<f64>,
    condition: String,
    humidity: u8,
    pressure_mm: u32,
    wind_speed: f64,
}

#[derive(Debug, Deserialize)]
struct YaName {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct YaGeoObject {
    locality: Option<YaName>,
    country: Option<YaName>,
}

#[derive(Debug, Deserialize)]
struct YaForecastResponse {
    #[serde(default)]
    geo_object: YaGeoObject,
    fact: YaFact,
}

impl YaForecastResponse {
    fn into_record(self, fallback_city: &str) -> WeatherRecord {
        let name_of = |part: Option<YaName>| part.and_then(|p| p.name).filter(|n| !n.is_empty());

        let city = name_of(self.geo_object.locality).unwrap_or_else(|| fallback_city.to_string());
        let country = name_of(self.geo_object.country);

        WeatherRecord {
            city,
            country,
            temperature: round_temperature(self.fact.temp),
            feels_like: self.fact.feels_like.map(round_temperature),
            description: title_case(&self.fact.condition.replace('-', " ")),
            humidity: self.fact.humidity,
            pressure: self.fact.pressure_mm,
            wind_speed: self.fact.wind_speed,
            timestamp: retrieval_time(),
            source: Source::LiveYandex,
        }
    }
}

#[async_trait]
impl WeatherProvider for YandexProvider {
    async fn get_weather(&self, query: &LocationQuery) -> Result<WeatherRecord, LookupError> {
        let point = self.resolve(query).await?;
        let parsed = self.fetch_fact(point).await?;
        Ok(parsed.into_record(query.fallback_city()))
    }
}
