pub mod client;
pub mod entsoe;
pub mod price_provider;
