pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::ConfigStore;
use crate::core::currency::{Crypto, Fiat};
use crate::core::fetcher::PriceFetcher;
use crate::providers::{BINANCE_BASE_URL, COINBASE_BASE_URL};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// One invocation's worth of work, as decided by the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Report every major in the standard fiat.
    Majors,
    /// Plain prices of every major in another fiat.
    MajorsIn(Fiat),
    /// Report one crypto in the standard fiat.
    Crypto(Crypto),
    /// One crypto priced in a fiat or another crypto.
    Convert { crypto: Crypto, to: String },
    SetFiat(Fiat),
    ConfigurePortfolio { crypto: Crypto, quantity: String },
}

/// Runs `command` against the config at `config_path`, or the default
/// location, creating it with defaults on first use.
pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("hodl starting...");

    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => ConfigStore::default_path()?,
    };
    let mut store = ConfigStore::open_or_init(&path)?;
    debug!("Loaded config from {}", store.path().display());

    let fetcher = PriceFetcher::from_urls(
        &store.provider_url("coinbase", COINBASE_BASE_URL),
        &store.provider_url("binance", BINANCE_BASE_URL),
    )?;

    for line in execute(command, &mut store, &fetcher).await? {
        println!("{line}");
    }
    Ok(())
}

pub async fn execute(
    command: AppCommand,
    store: &mut ConfigStore,
    fetcher: &PriceFetcher,
) -> Result<Vec<String>> {
    debug!(?command, "Executing");
    match command {
        AppCommand::Majors => cli::price::majors_report(store, fetcher).await,
        AppCommand::MajorsIn(fiat) => Ok(cli::price::majors_in(fetcher, fiat).await),
        AppCommand::Crypto(crypto) => cli::price::crypto_report(store, fetcher, crypto).await,
        AppCommand::Convert { crypto, to } => Ok(cli::price::convert(fetcher, crypto, &to).await),
        AppCommand::SetFiat(fiat) => cli::fiat::set_fiat(store, fetcher, fiat).await,
        AppCommand::ConfigurePortfolio { crypto, quantity } => {
            cli::portfolio::configure_portfolio(store, crypto, &quantity)
        }
    }
}
