use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::core::price::{CryptoRateProvider, SpotPriceProvider};

pub const COINBASE_BASE_URL: &str = "https://api.coinbase.com";

/// Cryptos coinbase quotes against each other.
const LISTED: [&str; 4] = ["BTC", "BCH", "ETH", "LTC"];

pub struct CoinbaseProvider {
    base_url: String,
    client: reqwest::Client,
}

impl CoinbaseProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent("hodl/1.0").build()?;
        Ok(CoinbaseProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str, what: &str) -> Result<T> {
        debug!("Requesting {} from {}", what, url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for {}", e, what))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for {}", response.status(), what));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", what, e))
    }
}

#[derive(Debug, Deserialize)]
struct SpotResponse {
    data: SpotData,
}

#[derive(Debug, Deserialize)]
struct SpotData {
    amount: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeRatesResponse {
    data: ExchangeRatesData,
}

#[derive(Debug, Deserialize)]
struct ExchangeRatesData {
    rates: HashMap<String, String>,
}

#[async_trait]
impl SpotPriceProvider for CoinbaseProvider {
    #[instrument(name = "CoinbaseSpot", skip(self))]
    async fn spot_price(&self, crypto: &str, fiat: &str) -> Result<Decimal> {
        let pair = format!("{}-{}", crypto.to_uppercase(), fiat.to_uppercase());
        let url = format!("{}/v2/prices/{}/spot", self.base_url, pair);

        let data: SpotResponse = self.get(&url, &format!("pair: {pair}")).await?;
        Decimal::from_str(&data.data.amount)
            .map_err(|e| anyhow!("Invalid amount '{}' for pair: {}: {}", data.data.amount, pair, e))
    }
}

#[async_trait]
impl CryptoRateProvider for CoinbaseProvider {
    #[instrument(name = "CoinbaseRate", skip(self))]
    async fn crypto_rate(&self, from: &str, to: &str) -> Result<Decimal> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();
        let url = format!("{}/v2/exchange-rates?currency={}", self.base_url, from);

        let data: ExchangeRatesResponse = self.get(&url, &format!("currency: {from}")).await?;
        let rate = data
            .data
            .rates
            .get(&to)
            .ok_or_else(|| anyhow!("No rate from {} to {}", from, to))?;
        Decimal::from_str(rate).map_err(|e| anyhow!("Invalid rate '{}' for {}: {}", rate, to, e))
    }

    fn supports(&self, from: &str, to: &str) -> bool {
        let listed = |code: &str| LISTED.iter().any(|c| c.eq_ignore_ascii_case(code));
        listed(from) && listed(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_spot_mock_server(pair: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/v2/prices/{pair}/spot");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_spot_price() {
        let mock_response = r#"{
            "data": {
                "base": "BTC",
                "currency": "USD",
                "amount": "64123.45"
            }
        }"#;
        let mock_server = create_spot_mock_server("BTC-USD", mock_response).await;

        let provider = CoinbaseProvider::new(&mock_server.uri()).unwrap();
        let price = provider.spot_price("btc", "usd").await.unwrap();
        assert_eq!(price, Decimal::from_str("64123.45").unwrap());
    }

    #[tokio::test]
    async fn test_spot_price_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/prices/ABC-USD/spot"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let provider = CoinbaseProvider::new(&mock_server.uri()).unwrap();
        let result = provider.spot_price("ABC", "USD").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 404 Not Found for pair: ABC-USD"
        );
    }

    #[tokio::test]
    async fn test_spot_price_malformed_response() {
        let mock_response = r#"{"data": {"price": "1"}}"#;
        let mock_server = create_spot_mock_server("ETH-EUR", mock_response).await;

        let provider = CoinbaseProvider::new(&mock_server.uri()).unwrap();
        let result = provider.spot_price("ETH", "EUR").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for pair: ETH-EUR")
        );
    }

    #[tokio::test]
    async fn test_successful_crypto_rate() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "data": {
                "currency": "LTC",
                "rates": {"BTC": "0.00123", "ETH": "0.031", "USD": "80.1"}
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/v2/exchange-rates"))
            .and(query_param("currency", "LTC"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let provider = CoinbaseProvider::new(&mock_server.uri()).unwrap();
        let rate = provider.crypto_rate("ltc", "btc").await.unwrap();
        assert_eq!(rate, Decimal::from_str("0.00123").unwrap());

        let missing = provider.crypto_rate("ltc", "bch").await;
        assert_eq!(missing.unwrap_err().to_string(), "No rate from LTC to BCH");
    }

    #[test]
    fn test_supports_only_listed_pairs() {
        let provider = CoinbaseProvider::new(COINBASE_BASE_URL).unwrap();
        assert!(provider.supports("ltc", "BTC"));
        assert!(provider.supports("eth", "bch"));
        assert!(!provider.supports("xrp", "xmr"));
        assert!(!provider.supports("ABC", "DEF"));
        assert!(!provider.supports("btc", "xrp"));
    }
}
