use reqwest::StatusCode;
use thiserror::Error;

/// Why a single lookup produced no record.
///
/// [`crate::WeatherLookup::lookup`] collapses every variant into `None`;
/// [`crate::WeatherLookup::try_lookup`] keeps them apart for diagnostics.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Timeout, DNS failure, refused connection, truncated body.
    #[error("network failure talking to {service}: {source}")]
    Network {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{service} request failed with status {status}: {body}")]
    Provider {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The geocoder found nothing for the query.
    #[error("no geocoding match for '{0}'")]
    GeocodeMiss(String),

    /// The service answered successfully but without usable data.
    #[error("{service} returned no usable data: {detail}")]
    NoData {
        service: &'static str,
        detail: String,
    },

    /// The body could not be decoded into the expected shape.
    #[error("failed to parse {service} response: {source}")]
    Malformed {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LookupError {
    pub fn is_network(&self) -> bool {
        matches!(self, LookupError::Network { .. })
    }
}
