pub mod curve_reader;
pub mod initialize;
pub mod wallet_loader;
