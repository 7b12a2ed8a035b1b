//! Supported currencies

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Rub,
    Cny,
    Aed,
    Krw,
    Try,
    Gbp,
    Jpy,
    Kzt,
    Sgd,
    Chf,
    Cad,
    Uzs,
    Uah,
    Pln,
    Inr,
    Brl,
    Myr,
    Thb,
    Sar,
    Azn,
    Kgs,
    Tjs,
    Irr,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl CurrencyCode {
    /// The local currency every rate is quoted against.
    pub const BASE: CurrencyCode = CurrencyCode::Uzs;

    pub const ALL: [CurrencyCode; 25] = [
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Rub,
        CurrencyCode::Cny,
        CurrencyCode::Aed,
        CurrencyCode::Krw,
        CurrencyCode::Try,
        CurrencyCode::Gbp,
        CurrencyCode::Jpy,
        CurrencyCode::Kzt,
        CurrencyCode::Sgd,
        CurrencyCode::Chf,
        CurrencyCode::Cad,
        CurrencyCode::Uzs,
        CurrencyCode::Uah,
        CurrencyCode::Pln,
        CurrencyCode::Inr,
        CurrencyCode::Brl,
        CurrencyCode::Myr,
        CurrencyCode::Thb,
        CurrencyCode::Sar,
        CurrencyCode::Azn,
        CurrencyCode::Kgs,
        CurrencyCode::Tjs,
        CurrencyCode::Irr,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Rub => "RUB",
            CurrencyCode::Cny => "CNY",
            CurrencyCode::Aed => "AED",
            CurrencyCode::Krw => "KRW",
            CurrencyCode::Try => "TRY",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Kzt => "KZT",
            CurrencyCode::Sgd => "SGD",
            CurrencyCode::Chf => "CHF",
            CurrencyCode::Cad => "CAD",
            CurrencyCode::Uzs => "UZS",
            CurrencyCode::Uah => "UAH",
            CurrencyCode::Pln => "PLN",
            CurrencyCode::Inr => "INR",
            CurrencyCode::Brl => "BRL",
            CurrencyCode::Myr => "MYR",
            CurrencyCode::Thb => "THB",
            CurrencyCode::Sar => "SAR",
            CurrencyCode::Azn => "AZN",
            CurrencyCode::Kgs => "KGS",
            CurrencyCode::Tjs => "TJS",
            CurrencyCode::Irr => "IRR",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "US Dollar",
            CurrencyCode::Eur => "Euro",
            CurrencyCode::Rub => "Russian Ruble",
            CurrencyCode::Cny => "Chinese Yuan",
            CurrencyCode::Aed => "UAE Dirham",
            CurrencyCode::Krw => "South Korean Won",
            CurrencyCode::Try => "Turkish Lira",
            CurrencyCode::Gbp => "British Pound",
            CurrencyCode::Jpy => "Japanese Yen",
            CurrencyCode::Kzt => "Kazakhstani Tenge",
            CurrencyCode::Sgd => "Singapore Dollar",
            CurrencyCode::Chf => "Swiss Franc",
            CurrencyCode::Cad => "Canadian Dollar",
            CurrencyCode::Uzs => "Uzbek Som",
            CurrencyCode::Uah => "Ukrainian Hryvnia",
            CurrencyCode::Pln => "Polish Zloty",
            CurrencyCode::Inr => "Indian Rupee",
            CurrencyCode::Brl => "Brazilian Real",
            CurrencyCode::Myr => "Malaysian Ringgit",
            CurrencyCode::Thb => "Thai Baht",
            CurrencyCode::Sar => "Saudi Riyal",
            CurrencyCode::Azn => "Azerbaijani Manat",
            CurrencyCode::Kgs => "Kyrgyzstani Som",
            CurrencyCode::Tjs => "Tajikistani Somoni",
            CurrencyCode::Irr => "Iranian Rial",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "🇺🇸",
            CurrencyCode::Eur => "🇪🇺",
            CurrencyCode::Rub => "🇷🇺",
            CurrencyCode::Cny => "🇨🇳",
            CurrencyCode::Aed => "🇦🇪",
            CurrencyCode::Krw => "🇰🇷",
            CurrencyCode::Try => "🇹🇷",
            CurrencyCode::Gbp => "🇬🇧",
            CurrencyCode::Jpy => "🇯🇵",
            CurrencyCode::Kzt => "🇰🇿",
            CurrencyCode::Sgd => "🇸🇬",
            CurrencyCode::Chf => "🇨🇭",
            CurrencyCode::Cad => "🇨🇦",
            CurrencyCode::Uzs => "🇺🇿",
            CurrencyCode::Uah => "🇺🇦",
            CurrencyCode::Pln => "🇵🇱",
            CurrencyCode::Inr => "🇮🇳",
            CurrencyCode::Brl => "🇧🇷",
            CurrencyCode::Myr => "🇲🇾",
            CurrencyCode::Thb => "🇹🇭",
            CurrencyCode::Sar => "🇸🇦",
            CurrencyCode::Azn => "🇦🇿",
            CurrencyCode::Kgs => "🇰🇬",
            CurrencyCode::Tjs => "🇹🇯",
            CurrencyCode::Irr => "🇮🇷",
        }
    }

    pub fn is_base(&self) -> bool {
        *self == Self::BASE
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == wanted)
            .ok_or(UnknownCurrency(s.trim().to_string()))
    }
}
