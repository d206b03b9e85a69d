use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use weather_core::{Config, LocationQuery, LocationResolver, WeatherLookup, WeatherRecord};

use crate::page;

pub const LOOKUP_FAILED: &str = "Не удалось получить данные";

/// Shared, read-only settings; every request builds its own lookup.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
}

pub fn router(config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(index))
        .route("/api/weather", get(api_weather))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiParams {
    city: String,
}

async fn index(State(state): State<AppState>, Query(params): Query<IndexParams>) -> Html<String> {
    let query = params.q.unwrap_or_default();
    let weather = page_weather(&state.config, query.trim()).await;
    Html(page::render(&query, weather.as_ref()))
}

async fn api_weather(
    State(state): State<AppState>,
    Query(params): Query<ApiParams>,
) -> Response {
    match city_weather(&state.config, &params.city).await {
        Some(record) => {
            info!(city = %record.city, source = %record.source, "weather served");
            Json(record).into_response()
        }
        None => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": LOOKUP_FAILED })),
        )
            .into_response(),
    }
}

fn build_lookup(config: &Config) -> Option<WeatherLookup> {
    WeatherLookup::from_config(config)
        .map_err(|err| error!(error = %err, "failed to set up weather lookup"))
        .ok()
}

async fn city_weather(config: &Config, city: &str) -> Option<WeatherRecord> {
    build_lookup(config)?
        .lookup(&LocationQuery::city(city))
        .await
}

/// By city when one was typed, otherwise by the server's IP location.
async fn page_weather(config: &Config, query: &str) -> Option<WeatherRecord> {
    if !query.is_empty() {
        return city_weather(config, query).await;
    }

    let locator = LocationResolver::from_config(config)
        .map_err(|err| error!(error = %err, "failed to set up IP locator"))
        .ok()?;
    let location = locator.locate().await?;

    build_lookup(config)?.lookup(&location.into_query()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;
    use weather_core::ProviderId;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn send_get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8"))
    }

    #[tokio::test]
    async fn api_returns_mock_record_without_keys() {
        let (status, body) = send_get(router(Config::default()), "/api/weather?city=msk").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["city"], "Москва");
        assert_eq!(json["temperature"], 22);
        assert_eq!(json["source"], "mock");
    }

    #[tokio::test]
    async fn api_requires_city() {
        let (status, _) = send_get(router(Config::default()), "/api/weather").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn api_reports_bad_gateway_when_provider_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.endpoints.openweather = format!("{}/weather", server.uri());
        config.upsert_provider_api_key(ProviderId::OpenWeather, "OW_KEY".into());

        let (status, body) = send_get(router(config), "/api/weather?city=Tula").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["error"], LOOKUP_FAILED);
    }

    #[tokio::test]
    async fn index_renders_weather_for_query() {
        let (status, body) = send_get(router(Config::default()), "/?q=spb").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h2>Санкт-Петербург</h2>"));
        assert!(body.contains("value=\"spb\""));
    }

    #[tokio::test]
    async fn index_falls_back_to_ip_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "city": "Kazan",
                "lat": 55.79,
                "lon": 49.12
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.endpoints.ip_location = format!("{}/json/", server.uri());

        let (status, body) = send_get(router(config), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h2>Kazan</h2>"));
    }

    #[tokio::test]
    async fn index_without_location_has_no_weather_block() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "private range"
            })))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.endpoints.ip_location = format!("{}/json/", server.uri());

        let (status, body) = send_get(router(config), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<form"));
        assert!(!body.contains("class=\"weather\""));
    }
}
