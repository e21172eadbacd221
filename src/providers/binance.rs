use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::core::price::CryptoRateProvider;

pub const BINANCE_BASE_URL: &str = "https://api.binance.com";

/// Binance only quotes the minor cryptos against these.
const QUOTE_ASSETS: [&str; 2] = ["BTC", "ETH"];

pub struct BinanceProvider {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent("hodl/1.0").build()?;
        Ok(BinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn ticker_price(&self, symbol: &str) -> Result<Decimal> {
        let url = format!("{}/api/v3/ticker/price?symbol={}", self.base_url, symbol);
        debug!("Requesting ticker price from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let ticker: TickerResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;
        Decimal::from_str(&ticker.price)
            .map_err(|e| anyhow!("Invalid price '{}' for {}: {}", ticker.price, symbol, e))
    }
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: String,
}

#[async_trait]
impl CryptoRateProvider for BinanceProvider {
    /// Binance lists each market once, so a missing `FROMTO` symbol is
    /// retried as the inverse `TOFROM` market.
    #[instrument(name = "BinanceRate", skip(self))]
    async fn crypto_rate(&self, from: &str, to: &str) -> Result<Decimal> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();

        match self.ticker_price(&format!("{from}{to}")).await {
            Ok(price) => Ok(price),
            Err(direct_err) => {
                debug!(error = %direct_err, "Direct market failed, trying inverse");
                let inverse = self
                    .ticker_price(&format!("{to}{from}"))
                    .await
                    .map_err(|_| direct_err)?;
                if inverse.is_zero() {
                    return Err(anyhow!("Zero price for symbol: {}{}", to, from));
                }
                Ok(Decimal::ONE / inverse)
            }
        }
    }

    fn supports(&self, from: &str, to: &str) -> bool {
        let quote = |code: &str| QUOTE_ASSETS.iter().any(|c| c.eq_ignore_ascii_case(code));
        !from.eq_ignore_ascii_case(to) && (quote(from) || quote(to))
    }
}
