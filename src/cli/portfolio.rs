use super::ui;
use crate::core::config::{ConfigStore, SECTION_PORTFOLIO};
use crate::core::currency::Crypto;
use crate::core::error::HodlError;
use crate::core::portfolio;
use anyhow::Result;

/// Records the number of coins held. A bad quantity is reported in the
/// output rather than failing the command.
pub fn configure_portfolio(
    store: &mut ConfigStore,
    crypto: Crypto,
    quantity: &str,
) -> Result<Vec<String>> {
    match portfolio::record(store, SECTION_PORTFOLIO, &crypto.key(), quantity) {
        Ok(_) => Ok(vec![portfolio::portfolio_set_line(crypto, quantity)]),
        Err(e) if e.is_invalid_input() => {
            Ok(vec![ui::style_text(&e.to_string(), ui::StyleType::Error)])
        }
        Err(e) => Err(e.into()),
    }
}

/// A value too large to compute is shown as an error line; the stored
/// quantity and reading stay as they are.
pub fn print_portfolio_value(store: &ConfigStore, crypto: Crypto) -> Result<String> {
    let fiat = store.standard_fiat()?;
    match portfolio::portfolio_value(store, crypto) {
        Ok(value) => Ok(portfolio::portfolio_value_line(crypto, value, fiat)),
        Err(e @ HodlError::Overflow(_)) => Ok(overflow_line(&e)),
        Err(e) => Err(e.into()),
    }
}

pub(super) fn overflow_line(e: &HodlError) -> String {
    ui::style_text(&format!("[*] error, {e}"), ui::StyleType::Error)
}
