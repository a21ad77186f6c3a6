//! Etherscan-family account API client.
//!
//! Serves two of the three upstream reads: account balance
//! (`module=account&action=balance`) and transaction history
//! (`module=account&action=txlist`). Both share the scan envelope format:
//! `{ "status": "1"|"0", "message": ..., "result": ... }` where `result`
//! is a decimal string for balance and an array of records for txlist.

use serde::Deserialize;
use std::time::Duration;
use tracing::warn;
use walletcheck_core::{Address, TransactionRecord, U256};

use crate::error::{ProviderError, Result};

/// Client for an Etherscan-family account API.
#[derive(Debug, Clone)]
pub struct ScanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    tx_page_size: u32,
}

/// Common scan API envelope. `result` varies by action, so it is decoded
/// in a second step.
#[derive(Debug, Deserialize)]
struct ScanEnvelope {
    status: String,
    #[serde(default)]
    message: String,
    result: serde_json::Value,
}

/// One transaction record as the scan API encodes it: every field is a
/// string, empty means absent.
#[derive(Debug, Deserialize)]
struct ScanTx {
    #[serde(rename = "timeStamp")]
    time_stamp: String,
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    value: String,
    #[serde(rename = "isError", default)]
    is_error: String,
    #[serde(default)]
    hash: String,
}

impl ScanTx {
    /// Decode into the domain record. Addresses are parsed into
    /// `alloy_primitives::Address`, which normalizes casing; an empty
    /// string on either side becomes `None`.
    fn into_record(self) -> Result<TransactionRecord> {
        let timestamp = self
            .time_stamp
            .parse::<u64>()
            .map_err(|e| ProviderError::Decode(format!("bad timeStamp {:?}: {}", self.time_stamp, e)))?;

        let from = parse_optional_address(&self.from)?;
        let to = parse_optional_address(&self.to)?;

        let value = if self.value.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(&self.value, 10)
                .map_err(|e| ProviderError::Decode(format!("bad value {:?}: {}", self.value, e)))?
        };

        // The scan API encodes success as isError == "0"; some endpoints
        // omit the field entirely for successful records.
        let is_error = !matches!(self.is_error.as_str(), "" | "0");

        Ok(TransactionRecord {
            timestamp,
            from,
            to,
            value,
            is_error,
            hash: self.hash,
        })
    }
}

fn parse_optional_address(raw: &str) -> Result<Option<Address>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<Address>()
        .map(Some)
        .map_err(|e| ProviderError::Decode(format!("bad address {:?}: {}", raw, e)))
}

impl ScanClient {
    /// Create a client with a bounded per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        tx_page_size: u32,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            tx_page_size,
        })
    }

    /// Fetch the account balance in wei.
    ///
    /// A non-success envelope or transport failure is an error; the caller
    /// decides whether to degrade to zero.
    pub async fn fetch_balance(&self, address: Address) -> Result<U256> {
        let url = format!(
            "{}?module=account&action=balance&address=0x{:x}&tag=latest&apikey={}",
            self.base_url, address, self.api_key
        );
        let envelope = self.get_envelope(&url).await?;

        let raw = envelope
            .result
            .as_str()
            .ok_or_else(|| ProviderError::Decode("balance result is not a string".to_string()))?;
        U256::from_str_radix(raw, 10)
            .map_err(|e| ProviderError::Decode(format!("bad balance {:?}: {}", raw, e)))
    }

    /// Fetch the transaction history, newest first, up to the provider-side
    /// page cap.
    ///
    /// Individual records that fail to decode are skipped with a warning
    /// rather than poisoning the whole batch.
    pub async fn fetch_transactions(&self, address: Address) -> Result<Vec<TransactionRecord>> {
        let url = format!(
            "{}?module=account&action=txlist&address=0x{:x}&startblock=0&endblock=99999999&page=1&offset={}&sort=desc&apikey={}",
            self.base_url, address, self.tx_page_size, self.api_key
        );
        let envelope = self.get_envelope(&url).await?;

        let raw_list: Vec<ScanTx> = serde_json::from_value(envelope.result)
            .map_err(|e| ProviderError::Decode(format!("txlist result is not a record array: {}", e)))?;

        let mut records = Vec::with_capacity(raw_list.len());
        for raw in raw_list {
            match raw.into_record() {
                Ok(record) => records.push(record),
                Err(e) => warn!("skipping undecodable transaction record: {}", e),
            }
        }
        Ok(records)
    }

    async fn get_envelope(&self, url: &str) -> Result<ScanEnvelope> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status().as_u16()));
        }
        let envelope: ScanEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        if envelope.status != "1" {
            return Err(ProviderError::NonSuccess(envelope.message));
        }
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WALLET: &str = "0x1111111111111111111111111111111111111111";

    fn client(server: &MockServer) -> ScanClient {
        ScanClient::new(server.uri(), "test-key", Duration::from_secs(5), 1000).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_balance_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "balance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "1",
                "message": "OK",
                "result": "1500000000000000000"
            })))
            .mount(&server)
            .await;

        let balance = client(&server)
            .fetch_balance(WALLET.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(balance, U256::from(1_500_000_000_000_000_000u64));
    }

    #[tokio::test]
    async fn test_fetch_balance_non_success_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "0",
                "message": "NOTOK",
                "result": "Max rate limit reached"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_balance(WALLET.parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NonSuccess(_)));
    }

    #[tokio::test]
    async fn test_fetch_balance_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_balance(WALLET.parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::HttpStatus(502)));
    }

    #[tokio::test]
    async fn test_fetch_transactions_decodes_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "txlist"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "1",
                "message": "OK",
                "result": [
                    {
                        "timeStamp": "1700000000",
                        // Mixed casing normalizes during address parsing.
                        "from": "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
                        "to": WALLET,
                        "value": "42",
                        "isError": "0",
                        "hash": "0xabc"
                    },
                    {
                        // Contract creation: empty `to`.
                        "timeStamp": "1700000100",
                        "from": WALLET,
                        "to": "",
                        "value": "0",
                        "isError": "1",
                        "hash": "0xdef"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let records = client(&server)
            .fetch_transactions(WALLET.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, U256::from(42u64));
        assert_eq!(
            records[0].from.unwrap(),
            "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
                .parse::<Address>()
                .unwrap()
        );
        assert!(!records[0].is_error);
        assert_eq!(records[1].to, None);
        assert!(records[1].is_error);
    }

    #[tokio::test]
    async fn test_fetch_transactions_skips_undecodable_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "1",
                "message": "OK",
                "result": [
                    { "timeStamp": "not-a-number", "from": "", "to": "", "value": "", "isError": "", "hash": "0x1" },
                    { "timeStamp": "1700000000", "from": "", "to": "", "value": "7", "isError": "0", "hash": "0x2" }
                ]
            })))
            .mount(&server)
            .await;

        let records = client(&server)
            .fetch_transactions(WALLET.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hash, "0x2");
    }

    #[tokio::test]
    async fn test_fetch_transactions_non_success_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "0",
                "message": "No transactions found",
                "result": []
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_transactions(WALLET.parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NonSuccess(_)));
    }
}
