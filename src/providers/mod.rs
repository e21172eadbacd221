pub mod binance;
pub mod coinbase;

pub use binance::{BINANCE_BASE_URL, BinanceProvider};
pub use coinbase::{COINBASE_BASE_URL, CoinbaseProvider};
