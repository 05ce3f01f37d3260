//! Core business logic: rate table and conversion

pub mod config;
pub mod currency;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use currency::{ConversionError, ConversionRequest, ConversionResult, convert, pair_key};
pub use rates::{BaseRates, RateTable, build_rate_table, load_base_rates, load_rate_table};
