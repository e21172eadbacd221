use super::ui;
use crate::core::config::ConfigStore;
use crate::core::currency::{Crypto, Fiat};
use crate::core::error::HodlError;
use crate::core::fetcher::PriceFetcher;
use crate::core::portfolio;
use crate::core::report::{self, Rate};
use anyhow::Result;
use rust_decimal::Decimal;

/// Report for one crypto in the standard fiat, followed by its portfolio
/// value at the refreshed reading.
pub async fn crypto_report(
    store: &mut ConfigStore,
    fetcher: &PriceFetcher,
    crypto: Crypto,
) -> Result<Vec<String>> {
    let fiat = store.standard_fiat()?;
    let line = fetcher.get_price(crypto.code(), fiat.code()).await;
    let width = line.chars().count();

    Ok(vec![
        report_or_passthrough(store, &line, width)?,
        super::portfolio::print_portfolio_value(store, crypto)?,
    ])
}

/// Every major against the standard fiat, then the value of each non-zero
/// holding and their total.
pub async fn majors_report(
    store: &mut ConfigStore,
    fetcher: &PriceFetcher,
) -> Result<Vec<String>> {
    let fiat = store.standard_fiat()?;
    let lines = fetch_majors(fetcher, fiat).await;
    let width = ui::alignment(&lines);

    let mut output = Vec::with_capacity(lines.len());
    for line in &lines {
        output.push(report_or_passthrough(store, line, width)?);
    }

    let mut held_any = false;
    for crypto in Crypto::MAJORS {
        if portfolio::holding(store, crypto)? > Decimal::ZERO {
            held_any = true;
            output.push(super::portfolio::print_portfolio_value(store, crypto)?);
        }
    }
    if held_any {
        let line = match portfolio::total_portfolio_value(store) {
            Ok(total) => format!(
                "[*] total portfolio value: {} {}",
                ui::style_text(
                    &format!("{:.2}", portfolio::round_for_display(total)),
                    ui::StyleType::TotalValue
                ),
                fiat
            ),
            Err(e @ HodlError::Overflow(_)) => super::portfolio::overflow_line(&e),
            Err(e) => return Err(e.into()),
        };
        output.push(line);
    }
    Ok(output)
}

/// Plain prices of every major in `fiat`. Readings are left alone since they
/// are kept in the standard fiat.
pub async fn majors_in(fetcher: &PriceFetcher, fiat: Fiat) -> Vec<String> {
    fetch_majors(fetcher, fiat).await
}

/// `crypto` priced in any fiat or crypto, without touching readings.
pub async fn convert(fetcher: &PriceFetcher, crypto: Crypto, to: &str) -> Vec<String> {
    vec![fetcher.convert(crypto.code(), to).await]
}

async fn fetch_majors(fetcher: &PriceFetcher, fiat: Fiat) -> Vec<String> {
    let pb = ui::new_progress_bar(Crypto::MAJORS.len() as u64);
    let pb_clone = pb.clone();
    let lines = fetcher.get_majors(fiat, &move || pb_clone.inc(1)).await;
    pb.finish_and_clear();
    lines
}

/// Fetch failures come back as message strings; those are printed as they
/// are and leave the readings untouched.
fn report_or_passthrough(store: &mut ConfigStore, line: &str, width: usize) -> Result<String> {
    if line.parse::<Rate>().is_err() {
        return Ok(ui::style_text(line, ui::StyleType::Error));
    }
    Ok(report::report(store, line, width)?)
}
