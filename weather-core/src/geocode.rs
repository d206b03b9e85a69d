//! Free-text place name to coordinates, via Nominatim.

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::LookupError,
    http::{WEATHER_TIMEOUT, build_client, fetch_json},
};

const SERVICE: &str = "Nominatim";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    endpoint: String,
    http: Client,
}

// Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: String) -> Result<Self> {
        Ok(Self {
            endpoint,
            http: build_client(WEATHER_TIMEOUT)?,
        })
    }

    /// Coordinates of the best match for `query`.
    pub async fn geocode(&self, query: &str) -> Result<GeoPoint, LookupError> {
        debug!(endpoint = %self.endpoint, query, "geocoding");

        let request = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")]);

        let places: Vec<NominatimPlace> = fetch_json(SERVICE, request).await?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::GeocodeMiss(query.to_string()))?;

        parse_point(&place).ok_or_else(|| LookupError::NoData {
            service: SERVICE,
            detail: format!("unparsable coordinates ({}, {})", place.lat, place.lon),
        })
    }
}

fn parse_point(place: &NominatimPlace) -> Option<GeoPoint> {
    Some(GeoPoint {
        lat: place.lat.trim().parse().ok()?,
        lon: place.lon.trim().parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_coordinates() {
        let place = NominatimPlace {
            lat: "59.9387".to_string(),
            lon: "30.3162".to_string(),
        };
        assert_eq!(
            parse_point(&place),
            Some(GeoPoint {
                lat: 59.9387,
                lon: 30.3162
            })
        );
    }

    #[test]
    fn rejects_garbage_coordinates() {
        let place = NominatimPlace {
            lat: "north".to_string(),
            lon: "30.3".to_string(),
        };
        assert_eq!(parse_point(&place), None);
    }
}
