//! Core rate handling: currencies, snapshots, sources, caching and conversion

pub mod amount;
pub mod cache;
pub mod config;
pub mod convert;
pub mod currency;
pub mod fallback;
pub mod log;
pub mod query;
pub mod rates;
pub mod source;

// Re-export main types for cleaner imports
pub use cache::{DEFAULT_MAX_AGE, RateCache};
pub use convert::{ConversionError, ConversionRequest, ConversionResult, convert};
pub use currency::CurrencyCode;
pub use rates::{Quote, RateEntry, RateOrigin, RateSnapshot};
pub use source::{QuoteProvider, RateSource, ResilientRateSource};
