use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::LookupError,
    http::{WEATHER_TIMEOUT, build_client, fetch_json},
    model::{LocationQuery, Source, WeatherRecord, retrieval_time},
    normalize::{round_temperature, title_case},
};

use super::WeatherProvider;

const SERVICE: &str = "OpenWeather";

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, endpoint: String) -> Result<Self> {
        Ok(Self {
            api_key,
            endpoint,
            http: build_client(WEATHER_TIMEOUT)?,
        })
    }

    async fn fetch_current(&self, query: &LocationQuery) -> Result<WeatherRecord, LookupError> {
        let mut params: Vec<(&str, String)> = match query {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates { lat, lon, .. } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };
        params.extend([
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
            ("lang", "ru".to_string()),
        ]);

        debug!(endpoint = %self.endpoint, ?query, "requesting OpenWeather current weather");

        let parsed: OwCurrentResponse =
            fetch_json(SERVICE, self.http.get(&self.endpoint).query(&params)).await?;

        Ok(parsed.into_record(query.fallback_city()))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_record(self, fallback_city: &str) -> WeatherRecord {
        let city = if self.name.trim().is_empty() {
            fallback_city.to_string()
        } else {
            self.name
        };

        let description = self
            .weather
            .first()
            .map(|w| title_case(&w.description))
            .unwrap_or_default();

        WeatherRecord {
            city,
            country: self.sys.country.filter(|c| !c.is_empty()),
            temperature: round_temperature(self.main.temp),
            feels_like: Some(round_temperature(self.main.feels_like)),
            description,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            timestamp: retrieval_time(),
            source: Source::Live,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn get_weather(&self, query: &LocationQuery) -> Result<WeatherRecord, LookupError> {
        self.fetch_current(query).await
    }
}
