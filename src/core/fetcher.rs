//! Turns provider results into the "1 X = Y Z" lines the CLI prints.
//!
//! Failures never escape the string-returning calls: they are logged and
//! replaced by one of the fixed messages below so every command prints
//! one line per price.

use crate::core::currency::{Crypto, Fiat};
use crate::core::price::{CryptoRateProvider, SpotPriceProvider};
use crate::providers::{BinanceProvider, CoinbaseProvider};
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;
use tracing::debug;

pub const UNSUPPORTED_CONVERSION: &str = "[*] unsupported crypto to crypto conversion operation";
pub const CRYPTO_SYMBOL_ERROR: &str = "[*] error, check you are using correct crypto symbols";
pub const PRICE_SYMBOL_ERROR: &str =
    "[*] error, check you are using correct crypto and fiat symbols";

pub struct PriceFetcher {
    spot: Arc<dyn SpotPriceProvider>,
    coinbase: Arc<dyn CryptoRateProvider>,
    binance: Arc<dyn CryptoRateProvider>,
}

impl PriceFetcher {
    pub fn new(
        spot: Arc<dyn SpotPriceProvider>,
        coinbase: Arc<dyn CryptoRateProvider>,
        binance: Arc<dyn CryptoRateProvider>,
    ) -> Self {
        PriceFetcher {
            spot,
            coinbase,
            binance,
        }
    }

    pub fn from_urls(coinbase_url: &str, binance_url: &str) -> Result<Self> {
        let coinbase = Arc::new(CoinbaseProvider::new(coinbase_url)?);
        let binance = Arc::new(BinanceProvider::new(binance_url)?);
        Ok(Self::new(coinbase.clone(), coinbase, binance))
    }

    /// `1 LTC = 0.0012 BTC`, fiat or crypto on the right-hand side.
    pub async fn convert(&self, from: &str, to: &str) -> String {
        if Fiat::is_fiat(to) {
            self.get_price(from, to).await
        } else if self.coinbase.supports(from, to) {
            self.coinbase_convert_crypto(from, to).await
        } else if self.binance.supports(from, to) {
            self.binance_convert_crypto(from, to).await
        } else {
            UNSUPPORTED_CONVERSION.to_string()
        }
    }

    pub async fn coinbase_convert_crypto(&self, from: &str, to: &str) -> String {
        if !self.coinbase.supports(from, to) {
            return UNSUPPORTED_CONVERSION.to_string();
        }
        match self.coinbase.crypto_rate(from, to).await {
            Ok(rate) => format_rate(from, rate, to),
            Err(e) => {
                debug!(error = %e, from, to, "Coinbase conversion failed");
                CRYPTO_SYMBOL_ERROR.to_string()
            }
        }
    }

    pub async fn binance_convert_crypto(&self, from: &str, to: &str) -> String {
        match self.binance.crypto_rate(from, to).await {
            Ok(rate) => format_rate(from, rate, to),
            Err(e) => {
                debug!(error = %e, from, to, "Binance conversion failed");
                CRYPTO_SYMBOL_ERROR.to_string()
            }
        }
    }

    pub async fn get_price(&self, crypto: &str, fiat: &str) -> String {
        match self.spot.spot_price(crypto, fiat).await {
            Ok(price) => format_rate(crypto, price, fiat),
            Err(e) => {
                debug!(error = %e, crypto, fiat, "Spot price lookup failed");
                PRICE_SYMBOL_ERROR.to_string()
            }
        }
    }

    pub async fn get_price_decimal(&self, crypto: &str, fiat: &str) -> Result<Decimal> {
        self.spot.spot_price(crypto, fiat).await
    }

    pub async fn get_price_numeric(&self, crypto: &str, fiat: &str) -> Result<f64> {
        let price = self.get_price_decimal(crypto, fiat).await?;
        price
            .to_f64()
            .ok_or_else(|| anyhow!("Price {} for {} does not fit in a float", price, crypto))
    }

    /// Prices of every major, in report order. `on_progress` runs once per
    /// finished request.
    pub async fn get_majors(
        &self,
        fiat: Fiat,
        on_progress: &(dyn Fn() + Send + Sync),
    ) -> Vec<String> {
        let mut lines = Vec::with_capacity(Crypto::MAJORS.len());
        for crypto in Crypto::MAJORS {
            lines.push(self.get_price(crypto.code(), fiat.code()).await);
            on_progress();
        }
        lines
    }
}

pub fn format_rate(from: &str, rate: Decimal, to: &str) -> String {
    format!(
        "1 {} = {} {}",
        from.to_uppercase(),
        rate.normalize(),
        to.to_uppercase()
    )
}
