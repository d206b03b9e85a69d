//! Approximate location of the current machine from its public IP.

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    Config,
    error::LookupError,
    http::{IP_LOOKUP_TIMEOUT, build_client, fetch_json},
    model::{IpLocation, UNKNOWN_CITY},
};

const SERVICE: &str = "ip-api";

#[derive(Debug, Clone)]
pub struct LocationResolver {
    endpoint: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl LocationResolver {
    pub fn new(endpoint: String) -> Result<Self> {
        Ok(Self {
            endpoint,
            http: build_client(IP_LOOKUP_TIMEOUT)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.endpoints.ip_location.clone())
    }

    pub async fn try_locate(&self) -> Result<IpLocation, LookupError> {
        debug!(endpoint = %self.endpoint, "locating by IP");

        let parsed: IpApiResponse = fetch_json(SERVICE, self.http.get(&self.endpoint)).await?;

        if parsed.status != "success" {
            return Err(LookupError::NoData {
                service: SERVICE,
                detail: format!(
                    "status '{}'{}",
                    parsed.status,
                    parsed.message.map(|m| format!(": {m}")).unwrap_or_default()
                ),
            });
        }

        let (Some(lat), Some(lon)) = (parsed.lat, parsed.lon) else {
            return Err(LookupError::NoData {
                service: SERVICE,
                detail: "coordinates missing".to_string(),
            });
        };

        let city = parsed
            .city
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_CITY.to_string());

        Ok(IpLocation { city, lat, lon })
    }

    /// Same as [`Self::try_locate`], with every failure collapsed to `None`.
    pub async fn locate(&self) -> Option<IpLocation> {
        match self.try_locate().await {
            Ok(location) => Some(location),
            Err(err) => {
                warn!(error = %err, "IP location unavailable");
                None
            }
        }
    }
}
