use super::ui;
use crate::core::{CurrencyCode, RateCache, RateOrigin, RateSnapshot, RateSource};
use anyhow::{Result, anyhow};
use comfy_table::Cell;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::debug;

/// Currencies listed against USD, in display order.
const MAJOR_CURRENCIES: [CurrencyCode; 9] = [
    CurrencyCode::Eur,
    CurrencyCode::Gbp,
    CurrencyCode::Jpy,
    CurrencyCode::Chf,
    CurrencyCode::Cad,
    CurrencyCode::Cny,
    CurrencyCode::Rub,
    CurrencyCode::Try,
    CurrencyCode::Inr,
];

/// Majors usually worth more than a dollar, shown as `1 CODE = x USD`.
const PRICED_IN_USD: [CurrencyCode; 4] = [
    CurrencyCode::Eur,
    CurrencyCode::Gbp,
    CurrencyCode::Chf,
    CurrencyCode::Cad,
];

/// Below this many som per unit, a currency is shown as units per one som.
const INVERT_BELOW: Decimal = Decimal::TEN;

fn label(code: CurrencyCode) -> String {
    format!("{} {} ({})", code.flag(), code, code.name())
}

fn source_label(snapshot: &RateSnapshot) -> String {
    if snapshot.is_primary() {
        RateOrigin::Primary.to_string()
    } else {
        RateOrigin::Approximate.to_string()
    }
}

/// Rows of the base-currency section, sorted by display name.
pub fn base_rows(snapshot: &RateSnapshot) -> Vec<(CurrencyCode, String)> {
    let mut entries: Vec<_> = snapshot.entries().filter(|e| !e.code.is_base()).collect();
    entries.sort_by_key(|e| e.code.name());

    entries
        .into_iter()
        .filter_map(|entry| {
            let line = if entry.rate > INVERT_BELOW {
                format!(
                    "1 {} = {} {}",
                    entry.code,
                    ui::format_amount(entry.rate),
                    CurrencyCode::BASE
                )
            } else {
                format!(
                    "1 {} = {} {}",
                    CurrencyCode::BASE,
                    ui::format_amount(Decimal::ONE.checked_div(entry.rate)?),
                    entry.code
                )
            };
            Some((entry.code, line))
        })
        .collect()
}

/// Rows of the USD section; empty when USD is missing, and out-of-range ratios are left out.
pub fn usd_rows(snapshot: &RateSnapshot) -> Vec<(CurrencyCode, String)> {
    let Some(usd_rate) = snapshot.rate_of(CurrencyCode::Usd) else {
        return Vec::new();
    };

    MAJOR_CURRENCIES
        .iter()
        .filter_map(|code| snapshot.rate_of(*code).map(|rate| (*code, rate)))
        .filter_map(|(code, rate)| {
            let line = if PRICED_IN_USD.contains(&code) {
                format!("1 {} = {} USD", code, ui::format_rate(rate.checked_div(usd_rate)?))
            } else {
                format!("1 USD = {} {}", ui::format_rate(usd_rate.checked_div(rate)?), code)
            };
            Some((code, line))
        })
        .collect()
}

pub fn display_rates(snapshot: &RateSnapshot) -> String {
    let mut output = format!(
        "{}\n\n{} {}\n{} {}\n\n",
        ui::style_text("EXCHANGE RATES", ui::StyleType::Title),
        ui::style_text("Updated:", ui::StyleType::Label),
        snapshot.fetched_at().format("%Y-%m-%d %H:%M UTC"),
        ui::style_text("Source:", ui::StyleType::Label),
        source_label(snapshot),
    );

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate ({})", CurrencyCode::BASE)),
        ui::header_cell("Source"),
    ]);
    for (i, (code, line)) in base_rows(snapshot).into_iter().enumerate() {
        let source = snapshot
            .get(code)
            .map_or(String::new(), |e| e.source.to_string());
        table.add_row(vec![
            ui::number_cell((i + 1).to_string()),
            Cell::new(label(code)),
            Cell::new(line),
            Cell::new(source),
        ]);
    }
    output.push_str(&format!(
        "{}\n{table}\n",
        ui::style_text(
            &format!("1. All currencies against {}", CurrencyCode::BASE),
            ui::StyleType::Label
        )
    ));

    let usd_rows = usd_rows(snapshot);
    if !usd_rows.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Rate (USD)")]);
        for (code, line) in usd_rows {
            table.add_row(vec![Cell::new(label(code)), Cell::new(line)]);
        }
        output.push_str(&format!(
            "\n{}\n{table}",
            ui::style_text("2. Major currencies against USD", ui::StyleType::Label)
        ));
    }

    output
}

pub fn display_currencies() -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);

    let mut codes = CurrencyCode::ALL.to_vec();
    codes.sort_by_key(|c| c.code());
    for code in codes {
        table.add_row(vec![
            Cell::new(format!("{} {}", code.flag(), code)),
            Cell::new(code.name()),
        ]);
    }
    table.to_string()
}

pub async fn run<S: RateSource>(
    cache: &RateCache<S>,
    max_age: Duration,
    refresh: bool,
) -> Result<String> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    if refresh {
        cache.force_refresh().await;
    } else {
        cache.ensure_fresh(max_age).await;
    }
    pb.finish_and_clear();

    let snapshot = cache
        .current_snapshot()
        .await
        .ok_or_else(|| anyhow!("Exchange rates could not be loaded, please try again later"))?;
    debug!(currencies = snapshot.len(), "Rendering rates");

    Ok(display_rates(&snapshot))
}
