//! HTTP surface for the walletcheck service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;
use walletcheck_core::Address;
use walletcheck_providers::{PriceClient, ScanClient};

use crate::config::Config;
use crate::report::generate_report;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<Config>,
    /// Chain scanner client.
    pub scan: ScanClient,
    /// Price quote client.
    pub price: PriceClient,
}

/// Build the axum application from configuration.
pub fn build_app(config: Config) -> anyhow::Result<Router> {
    let timeout = Duration::from_secs(config.providers.request_timeout_secs);
    let scan = ScanClient::new(
        config.providers.scan_api_url.clone(),
        config.providers.scan_api_key.clone(),
        timeout,
        config.providers.tx_page_size,
    )
    .context("failed to build scan client")?;
    let price = PriceClient::new(config.providers.price_api_url.clone(), timeout)
        .context("failed to build price client")?;

    let state = AppState {
        config: Arc::new(config),
        scan,
        price,
    };

    Ok(Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/check/:address", get(check_wallet))
        .layer(CorsLayer::permissive())
        .with_state(state))
}

async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": "walletcheck",
        "version": env!("CARGO_PKG_VERSION"),
        "chain": state.config.network.chain_name,
        "chainId": state.config.network.chain_id,
        "endpoints": {
            "check": "/check/:address",
            "health": "/health",
        },
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Run a background check for one wallet address.
///
/// A malformed address is rejected before any upstream call is made.
async fn check_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    let address: Address = match address.parse() {
        Ok(addr) => addr,
        Err(_) => return bad_request("Invalid wallet address format"),
    };

    info!("checking wallet 0x{:x}", address);
    let report = generate_report(&state.scan, &state.price, &state.config, address).await;
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": report })),
    )
}

fn bad_request(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": message })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = Config::for_test(
            "http://127.0.0.1:9".to_string(),
            "http://127.0.0.1:9".to_string(),
        );
        build_app(config).unwrap()
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(test_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_service_info() {
        let (status, body) = get_json(test_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "walletcheck");
        assert_eq!(body["endpoints"]["check"], "/check/:address");
    }

    #[tokio::test]
    async fn test_invalid_address_rejected() {
        let (status, body) = get_json(test_app(), "/check/not-an-address").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid wallet address format");
    }

    #[tokio::test]
    async fn test_truncated_address_rejected() {
        let (status, body) = get_json(test_app(), "/check/0x1234").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
