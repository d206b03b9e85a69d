use async_trait::async_trait;

use crate::{
    error::LookupError,
    model::{LocationQuery, Source, WeatherRecord, retrieval_time},
};

use super::WeatherProvider;

/// Fixed placeholder data, served when no provider credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

impl MockProvider {
    pub fn record_for(city: &str) -> WeatherRecord {
        WeatherRecord {
            city: city.to_string(),
            country: None,
            temperature: 22,
            feels_like: None,
            description: "Ясно".to_string(),
            humidity: 65,
            pressure: 1013,
            wind_speed: 3.2,
            timestamp: retrieval_time(),
            source: Source::Mock,
        }
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn get_weather(&self, query: &LocationQuery) -> Result<WeatherRecord, LookupError> {
        Ok(Self::record_for(query.fallback_city()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_is_independent_of_input() {
        let a = MockProvider
            .get_weather(&LocationQuery::city("Лондон"))
            .await
            .expect("mock never fails");
        let b = MockProvider
            .get_weather(&LocationQuery::coordinates(0.0, 0.0))
            .await
            .expect("mock never fails");

        for record in [&a, &b] {
            assert_eq!(record.source, Source::Mock);
            assert_eq!(record.temperature, 22);
            assert_eq!(record.description, "Ясно");
            assert_eq!(record.humidity, 65);
            assert_eq!(record.pressure, 1013);
            assert_eq!(record.wind_speed, 3.2);
        }
        assert_eq!(a.city, "Лондон");
        assert_eq!(b.city, "Ваш город");
    }
}
