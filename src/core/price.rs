//! Pricing abstractions

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Unit price of a crypto in a fiat currency.
#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    async fn spot_price(&self, crypto: &str, fiat: &str) -> Result<Decimal>;
}

/// How many units of `to` one unit of `from` buys, for two cryptos.
#[async_trait]
pub trait CryptoRateProvider: Send + Sync {
    async fn crypto_rate(&self, from: &str, to: &str) -> Result<Decimal>;

    /// Whether the exchange lists this pair at all.
    fn supports(&self, from: &str, to: &str) -> bool;
}
