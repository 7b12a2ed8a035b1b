//! Static approximate rates used when the upstream provider is unreachable or silent

use crate::core::currency::CurrencyCode;
use crate::core::rates::{RateEntry, RateOrigin, RateSnapshot};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

// (code, mantissa, scale)
const APPROXIMATE_RATES: [(CurrencyCode, i64, u32); 25] = [
    (CurrencyCode::Usd, 12500, 0),
    (CurrencyCode::Eur, 13500, 0),
    (CurrencyCode::Rub, 140, 0),
    (CurrencyCode::Cny, 1750, 0),
    (CurrencyCode::Aed, 3400, 0),
    (CurrencyCode::Krw, 95, 1),
    (CurrencyCode::Try, 400, 0),
    (CurrencyCode::Gbp, 15800, 0),
    (CurrencyCode::Jpy, 85, 0),
    (CurrencyCode::Kzt, 27, 0),
    (CurrencyCode::Sgd, 12000, 0),
    (CurrencyCode::Chf, 12500, 0),
    (CurrencyCode::Cad, 9000, 0),
    (CurrencyCode::Uzs, 1, 0),
    (CurrencyCode::Uah, 320, 0),
    (CurrencyCode::Pln, 2500, 0),
    (CurrencyCode::Inr, 150, 0),
    (CurrencyCode::Brl, 2000, 0),
    (CurrencyCode::Myr, 2400, 0),
    (CurrencyCode::Thb, 320, 0),
    (CurrencyCode::Sar, 3000, 0),
    (CurrencyCode::Azn, 6500, 0),
    (CurrencyCode::Kgs, 130, 0),
    (CurrencyCode::Tjs, 1100, 0),
    (CurrencyCode::Irr, 27, 3),
];

/// Currencies the upstream provider is known not to quote.
const UNQUOTED_FILL_INS: [CurrencyCode; 12] = [
    CurrencyCode::Sgd,
    CurrencyCode::Chf,
    CurrencyCode::Cad,
    CurrencyCode::Pln,
    CurrencyCode::Brl,
    CurrencyCode::Myr,
    CurrencyCode::Thb,
    CurrencyCode::Sar,
    CurrencyCode::Azn,
    CurrencyCode::Kgs,
    CurrencyCode::Tjs,
    CurrencyCode::Irr,
];

pub fn approximate_rate(code: CurrencyCode) -> Decimal {
    APPROXIMATE_RATES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, mantissa, scale)| Decimal::new(*mantissa, *scale))
        .unwrap_or(Decimal::ONE)
}

/// Approximate entry for a supported code missing from a live response, if one is known.
pub fn fill_in_entry(code: CurrencyCode, now: DateTime<Utc>) -> Option<RateEntry> {
    UNQUOTED_FILL_INS.contains(&code).then(|| {
        RateEntry::new(
            code,
            approximate_rate(code),
            now.date_naive(),
            RateOrigin::Approximate,
        )
    })
}

/// A snapshot covering every supported code from the static table.
pub fn fallback_snapshot(now: DateTime<Utc>) -> RateSnapshot {
    let as_of = now.date_naive();
    let entries = APPROXIMATE_RATES.iter().map(|(code, mantissa, scale)| {
        RateEntry::new(
            *code,
            Decimal::new(*mantissa, *scale),
            as_of,
            RateOrigin::Approximate,
        )
    });
    RateSnapshot::new(entries, now)
}
