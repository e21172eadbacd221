//! Price change report against the last recorded reading.
//!
//! Each line is a colored block holding the rate, followed by the change in
//! words: green for an increase, red for a decrease, blue for no change.

use crate::core::config::{ConfigStore, SECTION_READINGS};
use crate::core::error::HodlError;
use console::Style;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Increase,
    Decrease,
    NoChange,
}

impl Change {
    pub fn classify(previous: Decimal, current: Decimal) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Greater => Change::Increase,
            std::cmp::Ordering::Less => Change::Decrease,
            std::cmp::Ordering::Equal => Change::NoChange,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Change::Increase => "increase",
            Change::Decrease => "decrease",
            Change::NoChange => "no change",
        }
    }

    fn style(&self) -> Style {
        let base = Style::new().white().force_styling(true);
        match self {
            Change::Increase => base.on_green(),
            Change::Decrease => base.on_red(),
            Change::NoChange => base.on_blue(),
        }
    }
}

/// A parsed `1 BTC = 100 USD` line.
#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
    pub asset: String,
    pub value: Decimal,
    pub quote: String,
}

impl FromStr for Rate {
    type Err = HodlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || HodlError::MalformedRate(s.to_string());
        match s.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["1", asset, "=", value, quote] => Ok(Rate {
                asset: asset.to_lowercase(),
                value: Decimal::from_str(value).map_err(|_| malformed())?,
                quote: quote.to_uppercase(),
            }),
            _ => Err(malformed()),
        }
    }
}

/// Renders `new_rate` against the stored reading for its asset, then records
/// the new rate as the reading. `alignment` is the width the rate text is
/// padded to.
pub fn report(
    store: &mut ConfigStore,
    new_rate: &str,
    alignment: usize,
) -> Result<String, HodlError> {
    let rate: Rate = new_rate.parse()?;
    let previous = store.get_decimal(SECTION_READINGS, &rate.asset)?;
    let change = Change::classify(previous, rate.value);
    debug!(asset = %rate.asset, %previous, current = %rate.value, ?change, "Classified rate");

    let line = render(new_rate.trim(), change, previous, rate.value, alignment);
    store.set(SECTION_READINGS, &rate.asset, &rate.value.normalize().to_string())?;
    Ok(line)
}

pub fn render(
    rate_text: &str,
    change: Change,
    previous: Decimal,
    current: Decimal,
    alignment: usize,
) -> String {
    let block = change
        .style()
        .apply_to(format!(" {rate_text:<alignment$} "));
    format!("{} {}", block, describe(change, previous, current))
}

fn describe(change: Change, previous: Decimal, current: Decimal) -> String {
    if change == Change::NoChange {
        return change.label().to_string();
    }
    let Some(delta) = current.checked_sub(previous) else {
        return change.label().to_string();
    };
    let sign = if delta > Decimal::ZERO { "+" } else { "" };
    let mut text = format!("{} {}{}", change.label(), sign, delta.normalize());
    // No percentage from a zero reading, or when it does not fit.
    let pct = delta
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    if let Some(pct) = pct {
        text.push_str(&format!(" ({sign}{:.2}%)", pct.round_dp(2)));
    }
    text
}
