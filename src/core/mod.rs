//! Core business logic

pub mod config;
pub mod currency;
pub mod error;
pub mod fetcher;
pub mod log;
pub mod portfolio;
pub mod price;
pub mod report;

// Re-export main types for cleaner imports
pub use config::ConfigStore;
pub use currency::{Crypto, Fiat};
pub use error::HodlError;
pub use fetcher::PriceFetcher;
pub use price::{CryptoRateProvider, SpotPriceProvider};
