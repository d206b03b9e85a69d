use crate::{
    Config, LocationQuery, WeatherRecord,
    error::LookupError,
    geocode::NominatimGeocoder,
    provider::{mock::MockProvider, openweather::OpenWeatherProvider, yandex::YandexProvider},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod mock;
pub mod openweather;
pub mod yandex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Yandex,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Yandex => "yandex",
        }
    }

    /// Environment variable carrying this provider's API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::Yandex => "YANDEX_WEATHER_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Yandex]
    }

    /// Selection order when several credentials are configured.
    pub const fn by_priority() -> &'static [ProviderId] {
        &[ProviderId::Yandex, ProviderId::OpenWeather]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "yandex" => Ok(ProviderId::Yandex),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, yandex."
            )),
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch and normalize current conditions. City queries arrive already
    /// alias-expanded and trimmed.
    async fn get_weather(&self, query: &LocationQuery) -> Result<WeatherRecord, LookupError>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_by_id(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `weather configure {id}` or set {}.",
            id.env_var()
        )
    })?;

    let endpoints = &config.endpoints;
    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(
            api_key.to_owned(),
            endpoints.openweather.clone(),
        )?),
        ProviderId::Yandex => Box::new(YandexProvider::new(
            api_key.to_owned(),
            endpoints.yandex.clone(),
            NominatimGeocoder::new(endpoints.geocoder.clone())?,
        )?),
    };

    Ok(boxed)
}

/// Pick the provider the configured credentials allow, falling back to mock data.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    match config.preferred_provider() {
        Some(id) => provider_by_id(id, config),
        None => Ok(Box::new(MockProvider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_parsing_ignores_case() {
        assert_eq!(ProviderId::try_from("Yandex").unwrap(), ProviderId::Yandex);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("weatherapi").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn provider_by_id_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_by_id(ProviderId::OpenWeather, &cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured for provider"));
        assert!(msg.contains("OPENWEATHER_API_KEY"));
    }

    #[test]
    fn no_credentials_selects_mock() {
        let provider = provider_from_config(&Config::default()).expect("mock always builds");
        assert!(format!("{provider:?}").contains("MockProvider"));
    }

    #[test]
    fn yandex_selected_even_with_openweather_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        cfg.upsert_provider_api_key(ProviderId::Yandex, "YA_KEY".into());

        let provider = provider_from_config(&cfg).expect("provider");
        assert!(format!("{provider:?}").contains("YandexProvider"));
    }

    #[test]
    fn openweather_selected_when_only_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        let provider = provider_from_config(&cfg).expect("provider");
        assert!(format!("{provider:?}").contains("OpenWeatherProvider"));
    }
}
