//! Parsing of one-line conversion queries such as `100 USD to UZS`

use crate::core::amount::{AmountError, parse_amount};
use crate::core::convert::ConversionRequest;
use crate::core::currency::{CurrencyCode, UnknownCurrency};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Expected '<amount> <FROM> to <TO>', e.g. '100 USD to UZS'")]
    Malformed,

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Currency(#[from] UnknownCurrency),
}

/// Accepts `<amount> <FROM> to <TO>` or `<amount> <FROM> <TO>`, case-insensitively.
pub fn parse_query(text: &str) -> Result<ConversionRequest, QueryError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let (amount, from, to) = match parts.as_slice() {
        [amount, from, sep, to] if sep.eq_ignore_ascii_case("to") => (*amount, *from, *to),
        [amount, from, to] => (*amount, *from, *to),
        _ => return Err(QueryError::Malformed),
    };

    Ok(ConversionRequest {
        amount: parse_amount(amount)?,
        from: from.parse::<CurrencyCode>()?,
        to: to.parse::<CurrencyCode>()?,
    })
}
