use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Largest amount accepted from user input.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Invalid amount '{0}': enter digits only, e.g. 100, 1500.50, 25000")]
    Invalid(String),

    #[error("Amount must be greater than zero")]
    NotPositive,

    #[error("Amount is too large, enter less than 1 000 000 000")]
    TooLarge,
}

/// Parses user-entered text into a positive amount.
///
/// Accepts `,` as the decimal separator and ignores spaces used for digit grouping.
pub fn parse_amount(text: &str) -> Result<Decimal, AmountError> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let amount =
        Decimal::from_str(&cleaned).map_err(|_| AmountError::Invalid(text.trim().to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive);
    }
    if amount > MAX_AMOUNT {
        return Err(AmountError::TooLarge);
    }
    Ok(amount)
}
