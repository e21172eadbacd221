pub mod fiat;
pub mod portfolio;
pub mod price;
pub mod ui;
