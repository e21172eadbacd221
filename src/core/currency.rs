//! Supported crypto and fiat codes

use anyhow::anyhow;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Crypto {
    Btc,
    Bch,
    Eth,
    Ltc,
    Xmr,
    Xrp,
}

impl Crypto {
    /// Every supported crypto, in report order.
    pub const MAJORS: [Crypto; 6] = [
        Crypto::Btc,
        Crypto::Bch,
        Crypto::Eth,
        Crypto::Ltc,
        Crypto::Xmr,
        Crypto::Xrp,
    ];

    /// Uppercase ticker, as the exchanges expect it.
    pub fn code(&self) -> &'static str {
        match self {
            Crypto::Btc => "BTC",
            Crypto::Bch => "BCH",
            Crypto::Eth => "ETH",
            Crypto::Ltc => "LTC",
            Crypto::Xmr => "XMR",
            Crypto::Xrp => "XRP",
        }
    }

    /// Lowercase ticker, used as the key in the config file.
    pub fn key(&self) -> String {
        self.code().to_lowercase()
    }
}

impl Display for Crypto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Crypto {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Crypto::MAJORS
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                anyhow!(
                    "invalid crypto code: {} (choose from {})",
                    s,
                    Crypto::MAJORS.map(|c| c.key()).join(", ")
                )
            })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fiat {
    #[default]
    Usd,
    Eur,
    Gbp,
    Chf,
    Jpy,
    Cad,
    Aud,
    Cny,
    Inr,
    Rub,
    Krw,
    Brl,
    Sek,
    Nok,
    Pln,
}

impl Fiat {
    pub const ALL: [Fiat; 15] = [
        Fiat::Usd,
        Fiat::Eur,
        Fiat::Gbp,
        Fiat::Chf,
        Fiat::Jpy,
        Fiat::Cad,
        Fiat::Aud,
        Fiat::Cny,
        Fiat::Inr,
        Fiat::Rub,
        Fiat::Krw,
        Fiat::Brl,
        Fiat::Sek,
        Fiat::Nok,
        Fiat::Pln,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Fiat::Usd => "USD",
            Fiat::Eur => "EUR",
            Fiat::Gbp => "GBP",
            Fiat::Chf => "CHF",
            Fiat::Jpy => "JPY",
            Fiat::Cad => "CAD",
            Fiat::Aud => "AUD",
            Fiat::Cny => "CNY",
            Fiat::Inr => "INR",
            Fiat::Rub => "RUB",
            Fiat::Krw => "KRW",
            Fiat::Brl => "BRL",
            Fiat::Sek => "SEK",
            Fiat::Nok => "NOK",
            Fiat::Pln => "PLN",
        }
    }

    pub fn is_fiat(code: &str) -> bool {
        code.parse::<Fiat>().is_ok()
    }
}

impl Display for Fiat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Fiat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fiat::ALL
            .into_iter()
            .find(|f| f.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                anyhow!(
                    "invalid fiat code: {} (choose from {})",
                    s,
                    Fiat::ALL.map(|f| f.code()).join(", ")
                )
            })
    }
}
