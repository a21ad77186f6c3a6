//! CoinGecko-family price quote client.

use serde::Deserialize;
use std::time::Duration;

use crate::error::{ProviderError, Result};

/// Client for a CoinGecko-family simple-price API.
#[derive(Debug, Clone)]
pub struct PriceClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    ethereum: Option<PriceQuote>,
}

#[derive(Debug, Deserialize)]
struct PriceQuote {
    usd: Option<f64>,
}

impl PriceClient {
    /// Create a client with a bounded per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch the current ETH/USD quote.
    ///
    /// An unreachable provider or a response without the expected quote is
    /// an error; the caller substitutes the configured fallback price.
    pub async fn fetch_eth_usd(&self) -> Result<f64> {
        let url = format!(
            "{}/simple/price?ids=ethereum&vs_currencies=usd",
            self.base_url
        );
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status().as_u16()));
        }
        let body: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        body.ethereum
            .and_then(|quote| quote.usd)
            .ok_or_else(|| ProviderError::Decode("missing ethereum.usd quote".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> PriceClient {
        PriceClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_price_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ethereum": { "usd": 3214.55 }
            })))
            .mount(&server)
            .await;

        let price = client(&server).fetch_eth_usd().await.unwrap();
        assert!((price - 3214.55).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_fetch_price_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "dogecoin": { "usd": 0.07 }
            })))
            .mount(&server)
            .await;

        let err = client(&server).fetch_eth_usd().await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_price_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).fetch_eth_usd().await.unwrap_err();
        assert!(matches!(err, ProviderError::HttpStatus(500)));
    }
}
