//! Cross-rate conversion through the base currency

use crate::core::currency::CurrencyCode;
use crate::core::rates::RateSnapshot;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::error;

const FOREIGN_DECIMALS: u32 = 4;
const BASE_DECIMALS: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRequest {
    pub amount: Decimal,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionResult {
    pub converted_amount: Decimal,
    /// Units of the target currency per one unit of the source currency.
    pub effective_rate: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Rate not available for {0}")]
    NotAvailable(CurrencyCode),

    #[error("Amount must be greater than zero, got {0}")]
    InvalidAmount(Decimal),

    #[error("Amount {amount} {from} is too large to convert to {to}")]
    Overflow {
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
    },
}

pub fn convert(
    snapshot: &RateSnapshot,
    amount: Decimal,
    from: CurrencyCode,
    to: CurrencyCode,
) -> Result<ConversionResult, ConversionError> {
    if amount <= Decimal::ZERO {
        return Err(ConversionError::InvalidAmount(amount));
    }
    let overflow = || ConversionError::Overflow { amount, from, to };

    if from.is_base() {
        let to_rate = rate_of(snapshot, to)?;
        let result = amount.checked_div(to_rate).ok_or_else(overflow)?;
        let effective_rate = Decimal::ONE.checked_div(to_rate).ok_or_else(overflow)?;
        return Ok(ConversionResult {
            converted_amount: round_half_up(result, FOREIGN_DECIMALS),
            effective_rate,
        });
    }

    if to.is_base() {
        let from_rate = rate_of(snapshot, from)?;
        let result = amount.checked_mul(from_rate).ok_or_else(overflow)?;
        return Ok(ConversionResult {
            converted_amount: round_half_up(result, BASE_DECIMALS),
            effective_rate: from_rate,
        });
    }

    let from_rate = rate_of(snapshot, from)?;
    let to_rate = rate_of(snapshot, to)?;
    let in_base = amount.checked_mul(from_rate).ok_or_else(overflow)?;
    let result = in_base.checked_div(to_rate).ok_or_else(overflow)?;
    let effective_rate = from_rate.checked_div(to_rate).ok_or_else(overflow)?;
    Ok(ConversionResult {
        converted_amount: round_half_up(result, FOREIGN_DECIMALS),
        effective_rate,
    })
}

pub fn convert_request(
    snapshot: &RateSnapshot,
    request: &ConversionRequest,
) -> Result<ConversionResult, ConversionError> {
    convert(snapshot, request.amount, request.from, request.to)
}

fn rate_of(snapshot: &RateSnapshot, code: CurrencyCode) -> Result<Decimal, ConversionError> {
    let rate = snapshot
        .rate_of(code)
        .ok_or(ConversionError::NotAvailable(code))?;
    if rate <= Decimal::ZERO {
        debug_assert!(false, "stored rate for {code} must be positive, got {rate}");
        error!(code = %code, rate = %rate, "Skipping non-positive stored rate");
        return Err(ConversionError::NotAvailable(code));
    }
    Ok(rate)
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
