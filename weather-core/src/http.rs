//! Shared plumbing for the outbound GET calls made by providers and locators.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::LookupError;

/// Budget for weather and geocoding calls.
pub const WEATHER_TIMEOUT: Duration = Duration::from_secs(10);

/// Budget for the IP-geolocation call.
pub const IP_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

// Nominatim rejects requests without an identifying agent.
const USER_AGENT: &str = concat!("weather-core/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Send a prepared request and decode a successful JSON body.
///
/// Non-2xx statuses never reach the decoder; their body is kept (truncated)
/// in the error for the logs.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T, LookupError> {
    let res = request
        .send()
        .await
        .map_err(|source| LookupError::Network { service, source })?;

    let status = res.status();
    debug!(service, %status, "response received");

    let body = res
        .text()
        .await
        .map_err(|source| LookupError::Network { service, source })?;

    if !status.is_success() {
        return Err(LookupError::Provider {
            service,
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| LookupError::Malformed { service, source })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_is_kept() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_cyrillic_body_is_cut_on_char_boundary() {
        let body = "ж".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
