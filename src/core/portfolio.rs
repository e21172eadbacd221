//! Portfolio quantities and their fiat valuation.

use crate::core::config::{ConfigStore, SECTION_PORTFOLIO, SECTION_READINGS, parse_decimal};
use crate::core::currency::{Crypto, Fiat};
use crate::core::error::HodlError;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Parses a user supplied quantity or price, in plain or scientific notation.
/// Rejects anything that is not a non-negative decimal.
pub fn parse_amount(value: &str) -> Result<Decimal, HodlError> {
    let amount = parse_decimal(value).ok_or_else(|| HodlError::NotANumber(value.to_string()))?;
    if amount < Decimal::ZERO {
        return Err(HodlError::Negative(value.to_string()));
    }
    Ok(amount)
}

/// Validates `value` and stores it verbatim (trimmed). Nothing is written
/// when validation fails.
pub fn record(
    store: &mut ConfigStore,
    section: &str,
    key: &str,
    value: &str,
) -> Result<Decimal, HodlError> {
    let amount = parse_amount(value)?;
    store.set(section, key, value.trim())?;
    debug!(section, key, %amount, "Recorded amount");
    Ok(amount)
}

pub fn holding(store: &ConfigStore, crypto: Crypto) -> Result<Decimal, HodlError> {
    store.get_decimal(SECTION_PORTFOLIO, &crypto.key())
}

/// Quantity held times the last recorded price, in the standard fiat.
pub fn portfolio_value(store: &ConfigStore, crypto: Crypto) -> Result<Decimal, HodlError> {
    let quantity = holding(store, crypto)?;
    let reading = store.get_decimal(SECTION_READINGS, &crypto.key())?;
    quantity
        .checked_mul(reading)
        .ok_or_else(|| HodlError::Overflow(format!("{crypto} portfolio value")))
}

pub fn total_portfolio_value(store: &ConfigStore) -> Result<Decimal, HodlError> {
    Crypto::MAJORS
        .into_iter()
        .try_fold(Decimal::ZERO, |total, crypto| {
            total
                .checked_add(portfolio_value(store, crypto)?)
                .ok_or_else(|| HodlError::Overflow("total portfolio value".to_string()))
        })
}

pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn portfolio_value_line(crypto: Crypto, value: Decimal, fiat: Fiat) -> String {
    format!(
        "[*] {} portfolio value: {:.2} {}",
        crypto,
        round_for_display(value),
        fiat
    )
}

pub fn portfolio_set_line(crypto: Crypto, value: &str) -> String {
    format!("[*] {} portfolio value set at {} coins", crypto, value.trim())
}
