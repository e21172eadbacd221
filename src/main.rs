use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use hodl::AppCommand;
use hodl::core::currency::{Crypto, Fiat};
use hodl::core::log::init_logging;

#[derive(Parser, Debug)]
#[command(name = "hodl", version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(long)]
    config_path: Option<String>,

    /// Report on one crypto in the standard fiat
    #[arg(short, long)]
    crypto: Option<Crypto>,

    /// Price in this fiat instead; every major when used without --crypto
    #[arg(short, long, conflicts_with = "to")]
    fiat: Option<Fiat>,

    /// Convert --crypto into this crypto
    #[arg(short, long, requires = "crypto")]
    to: Option<Crypto>,

    /// Change the standard fiat and re-price readings in it (also -sf)
    #[arg(
        long,
        value_name = "FIAT",
        conflicts_with_all = ["crypto", "fiat", "to", "configure_portfolio"]
    )]
    set_fiat: Option<Fiat>,

    /// Record how many coins you hold (also -cp)
    #[arg(
        long,
        num_args = 2,
        value_names = ["CRYPTO", "QUANTITY"],
        allow_hyphen_values = true,
        conflicts_with_all = ["crypto", "fiat", "to"]
    )]
    configure_portfolio: Option<Vec<String>>,
}

impl Cli {
    fn into_app_command(self) -> Result<AppCommand, clap::Error> {
        if let Some(fiat) = self.set_fiat {
            return Ok(AppCommand::SetFiat(fiat));
        }

        if let Some(values) = self.configure_portfolio {
            let [crypto, quantity]: [String; 2] = values.try_into().map_err(|_| {
                Cli::command().error(
                    ErrorKind::WrongNumberOfValues,
                    "--configure-portfolio takes a crypto and a quantity",
                )
            })?;
            let crypto = crypto
                .parse::<Crypto>()
                .map_err(|e| Cli::command().error(ErrorKind::InvalidValue, e))?;
            return Ok(AppCommand::ConfigurePortfolio { crypto, quantity });
        }

        Ok(match (self.crypto, self.fiat, self.to) {
            (Some(crypto), Some(fiat), _) => AppCommand::Convert {
                crypto,
                to: fiat.code().to_string(),
            },
            (Some(crypto), None, Some(to)) => AppCommand::Convert {
                crypto,
                to: to.code().to_string(),
            },
            (Some(crypto), None, None) => AppCommand::Crypto(crypto),
            (None, Some(fiat), _) => AppCommand::MajorsIn(fiat),
            (None, None, _) => AppCommand::Majors,
        })
    }
}

/// Accepts the single-dash spellings `-sf` and `-cp`, which clap would
/// otherwise read as `-s f` and `-c p`.
fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            if arg == "-sf" {
                "--set-fiat".to_string()
            } else if arg == "-cp" {
                "--configure-portfolio".to_string()
            } else {
                arg
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    init_logging(cli.verbose);

    let config_path = cli.config_path.clone();
    let command = cli.into_app_command().unwrap_or_else(|e| e.exit());

    let result = hodl::run_command(command, config_path.as_deref()).await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let args = std::iter::once("hodl")
            .chain(args.iter().copied())
            .map(String::from);
        Cli::try_parse_from(normalize_args(args))
    }

    #[test]
    fn test_flags() {
        let cli = parse(&["-c", "ltc"]).unwrap();
        assert_eq!(cli.crypto, Some(Crypto::Ltc));

        let cli = parse(&["-f", "GBP"]).unwrap();
        assert_eq!(cli.fiat, Some(Fiat::Gbp));

        let cli = parse(&["-sf", "USD"]).unwrap();
        assert_eq!(cli.set_fiat, Some(Fiat::Usd));

        let cli = parse(&["-cp", "ltc", "2"]).unwrap();
        let values = cli.configure_portfolio.unwrap();
        assert_eq!(values[0], "ltc");
        assert_eq!(values[1], "2");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(parse(&["-f", "fake_code"]).is_err());
        assert!(parse(&["-sf", "fake_code"]).is_err());
        assert!(parse(&["-c", "fake_code"]).is_err());
        assert!(parse(&["-sf", "USD", "-f", "USD"]).is_err());
        assert!(parse(&["-t", "btc"]).is_err());
        assert!(parse(&["-cp", "ltc"]).is_err());

        let cli = parse(&["-cp", "fake_code", "2"]).unwrap();
        let err = cli.into_app_command().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_commands() {
        fn command(args: &[&str]) -> AppCommand {
            parse(args).unwrap().into_app_command().unwrap()
        }

        assert_eq!(command(&[]), AppCommand::Majors);
        assert_eq!(command(&["-f", "eur"]), AppCommand::MajorsIn(Fiat::Eur));
        assert_eq!(command(&["-c", "BTC"]), AppCommand::Crypto(Crypto::Btc));
        assert_eq!(
            command(&["-c", "ltc", "-f", "gbp"]),
            AppCommand::Convert {
                crypto: Crypto::Ltc,
                to: "GBP".to_string()
            }
        );
        assert_eq!(
            command(&["-c", "xmr", "-t", "btc"]),
            AppCommand::Convert {
                crypto: Crypto::Xmr,
                to: "BTC".to_string()
            }
        );
        assert_eq!(command(&["-sf", "chf"]), AppCommand::SetFiat(Fiat::Chf));
        assert_eq!(
            command(&["-cp", "btc", "-1"]),
            AppCommand::ConfigurePortfolio {
                crypto: Crypto::Btc,
                quantity: "-1".to_string()
            }
        );
    }
}
