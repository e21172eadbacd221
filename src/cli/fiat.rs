use crate::core::config::{ConfigStore, SECTION_READINGS};
use crate::core::currency::{Crypto, Fiat};
use crate::core::fetcher::PriceFetcher;
use anyhow::Result;
use tracing::{debug, warn};

/// Switches the standard fiat and re-prices every reading in it.
pub async fn set_fiat(
    store: &mut ConfigStore,
    fetcher: &PriceFetcher,
    fiat: Fiat,
) -> Result<Vec<String>> {
    let mut output = vec![format!("[*] updating standard fiat to {fiat} ...")];
    store.set_standard_fiat(fiat)?;
    output.extend(adjust_readings_to_new_fiat(store, fetcher, fiat).await?);
    Ok(output)
}

/// Readings are kept in the standard fiat, so they go stale when it changes.
/// A reading that cannot be re-priced keeps its old value.
pub async fn adjust_readings_to_new_fiat(
    store: &mut ConfigStore,
    fetcher: &PriceFetcher,
    fiat: Fiat,
) -> Result<Vec<String>> {
    let mut output = Vec::new();

    for key in store.keys(SECTION_READINGS) {
        let Ok(crypto) = key.parse::<Crypto>() else {
            debug!(key = %key, "Skipping unknown reading");
            continue;
        };
        match fetcher.get_price_decimal(crypto.code(), fiat.code()).await {
            Ok(price) => {
                store.set(SECTION_READINGS, &key, &price.normalize().to_string())?;
            }
            Err(e) => {
                warn!(error = %e, %crypto, %fiat, "Could not re-price reading");
                output.push(format!(
                    "[*] error, could not update {crypto} reading to {fiat}"
                ));
            }
        }
    }

    output.push(format!("[*] success: {fiat} configured as standard fiat"));
    Ok(output)
}
