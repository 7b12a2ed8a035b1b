//! Rate snapshot types shared by sources, the cache and the conversion engine

use crate::core::currency::CurrencyCode;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::error;

/// Where a single rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOrigin {
    Primary,
    Approximate,
}

impl Display for RateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RateOrigin::Primary => "Central Bank of Uzbekistan",
            RateOrigin::Approximate => "Approximate rate",
        })
    }
}

/// Units of the base currency per one unit of `code`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    pub code: CurrencyCode,
    pub rate: Decimal,
    pub as_of: NaiveDate,
    pub source: RateOrigin,
}

impl RateEntry {
    pub fn new(code: CurrencyCode, rate: Decimal, as_of: NaiveDate, source: RateOrigin) -> Self {
        Self {
            code,
            rate,
            as_of,
            source,
        }
    }

    /// The base currency entry, always exactly 1.
    pub fn base(as_of: NaiveDate, source: RateOrigin) -> Self {
        Self::new(CurrencyCode::BASE, Decimal::ONE, as_of, source)
    }
}

/// A single `{code, rate, date}` triple as reported by an upstream provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub code: String,
    pub rate: Decimal,
    pub date: Option<NaiveDate>,
}

/// An immutable set of rates fetched together.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    entries: BTreeMap<CurrencyCode, RateEntry>,
    fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    /// Builds a snapshot, dropping any entry that breaks the positive-rate invariant.
    pub fn new(entries: impl IntoIterator<Item = RateEntry>, fetched_at: DateTime<Utc>) -> Self {
        let mut map = BTreeMap::new();
        for entry in entries {
            if entry.rate <= Decimal::ZERO {
                error!(code = %entry.code, rate = %entry.rate, "Dropping non-positive rate");
                continue;
            }
            map.insert(entry.code, entry);
        }
        Self {
            entries: map,
            fetched_at,
        }
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn get(&self, code: CurrencyCode) -> Option<&RateEntry> {
        self.entries.get(&code)
    }

    pub fn rate_of(&self, code: CurrencyCode) -> Option<Decimal> {
        self.entries.get(&code).map(|e| e.rate)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RateEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Codes from the supported set with no entry in this snapshot.
    pub fn missing_codes(&self) -> Vec<CurrencyCode> {
        CurrencyCode::ALL
            .iter()
            .copied()
            .filter(|c| !self.entries.contains_key(c))
            .collect()
    }

    pub fn covers_all(&self) -> bool {
        self.entries.len() == CurrencyCode::ALL.len()
    }

    /// True when the snapshot was built from a live provider response.
    pub fn is_primary(&self) -> bool {
        self.entries
            .values()
            .any(|e| e.source == RateOrigin::Primary)
    }
}
