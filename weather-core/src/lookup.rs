use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    Config, LocationQuery, WeatherRecord,
    error::LookupError,
    normalize::normalize_city,
    provider::{ProviderId, WeatherProvider, provider_from_config},
};

/// Entry point used by the console and web front ends.
///
/// The provider is chosen once, at construction; every call after that makes
/// at most two sequential outbound requests and never retries.
#[derive(Debug)]
pub struct WeatherLookup {
    provider: Box<dyn WeatherProvider>,
    selected: Option<ProviderId>,
}

impl WeatherLookup {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            provider: provider_from_config(config)?,
            selected: config.preferred_provider(),
        })
    }

    pub fn with_provider(provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            selected: None,
        }
    }

    /// Provider in use; `None` means mock data (or a custom provider).
    pub fn selected_provider(&self) -> Option<ProviderId> {
        self.selected
    }

    pub async fn try_lookup(&self, query: &LocationQuery) -> Result<WeatherRecord, LookupError> {
        let query = match query {
            LocationQuery::City(raw) => LocationQuery::City(normalize_city(raw)),
            other => other.clone(),
        };

        debug!(?query, provider = ?self.selected, "weather lookup");
        self.provider.get_weather(&query).await
    }

    /// Full record or nothing. Failures are logged, not returned.
    pub async fn lookup(&self, query: &LocationQuery) -> Option<WeatherRecord> {
        match self.try_lookup(query).await {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, ?query, "weather lookup unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Source;
    use async_trait::async_trait;

    /// Fails every call, echoing the city it was handed.
    #[derive(Debug)]
    struct EchoMissProvider;

    #[async_trait]
    impl WeatherProvider for EchoMissProvider {
        async fn get_weather(&self, query: &LocationQuery) -> Result<WeatherRecord, LookupError> {
            Err(LookupError::GeocodeMiss(query.fallback_city().to_string()))
        }
    }

    #[tokio::test]
    async fn no_credentials_gives_mock_record_for_any_city() {
        let lookup = WeatherLookup::from_config(&Config::default()).expect("lookup");
        assert_eq!(lookup.selected_provider(), None);

        for city in ["AnyCity", "Владивосток", "  x  "] {
            let record = lookup
                .lookup(&LocationQuery::city(city))
                .await
                .expect("mock always answers");
            assert_eq!(record.source, Source::Mock);
            assert_eq!(record.temperature, 22);
            assert_eq!(record.description, "Ясно");
        }
    }

    #[tokio::test]
    async fn mock_record_uses_canonical_alias() {
        let lookup = WeatherLookup::from_config(&Config::default()).expect("lookup");
        let record = lookup
            .lookup(&LocationQuery::city(" Питер "))
            .await
            .expect("mock always answers");
        assert_eq!(record.city, "Санкт-Петербург");
    }

    #[tokio::test]
    async fn city_is_normalized_before_reaching_provider() {
        let lookup = WeatherLookup::with_provider(Box::new(EchoMissProvider));

        assert!(lookup.lookup(&LocationQuery::city("  MSK ")).await.is_none());

        let err = lookup
            .try_lookup(&LocationQuery::city("spb"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'Санкт-Петербург'"));

        let err = lookup
            .try_lookup(&LocationQuery::city(" Тула "))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'Тула'"));
    }
}
