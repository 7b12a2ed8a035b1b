use super::ui;
use crate::core::{
    ConversionError, ConversionRequest, ConversionResult, CurrencyCode, RateCache, RateOrigin,
    RateSnapshot, RateSource, convert,
};
use anyhow::{Result, anyhow, bail};
use std::time::Duration;
use tracing::debug;

const RETRY_HINT: &str = "choose other currencies, or run `uzfx rates --refresh` and try again";

fn side(code: CurrencyCode) -> String {
    format!("{} {} ({})", code.flag(), code, code.name())
}

fn decimals_for(code: CurrencyCode) -> u32 {
    if code.is_base() { 0 } else { 4 }
}

/// Origin of the foreign side of the conversion.
fn source_of(snapshot: &RateSnapshot, request: &ConversionRequest) -> RateOrigin {
    let foreign = if request.from.is_base() {
        request.to
    } else {
        request.from
    };
    snapshot
        .get(foreign)
        .map_or(RateOrigin::Approximate, |e| e.source)
}

pub fn display_conversion(
    snapshot: &RateSnapshot,
    request: &ConversionRequest,
    result: &ConversionResult,
) -> String {
    let rows = [
        (
            "Input:",
            format!("{} {}", ui::format_amount(request.amount), side(request.from)),
        ),
        (
            "Output:",
            format!(
                "{} {}",
                ui::format_number(result.converted_amount, decimals_for(request.to)),
                side(request.to)
            ),
        ),
        (
            "Rate:",
            format!(
                "1 {} = {} {}",
                request.from,
                ui::format_rate(result.effective_rate),
                request.to
            ),
        ),
        (
            "Updated:",
            snapshot
                .fetched_at()
                .format("%Y-%m-%d %H:%M UTC")
                .to_string(),
        ),
        ("Source:", source_of(snapshot, request).to_string()),
    ];

    let mut output = format!(
        "{}\n\n",
        ui::style_text("CONVERSION RESULT", ui::StyleType::Title)
    );
    for (label, value) in rows {
        let value = if label == "Output:" {
            ui::style_text(&value, ui::StyleType::Value)
        } else {
            value
        };
        output.push_str(&format!(
            "{}{}\n",
            ui::style_text(&format!("{label:<9}"), ui::StyleType::Label),
            value
        ));
    }
    output
}

/// Refreshes rates if stale, converts and renders the result.
pub async fn run<S: RateSource>(
    cache: &RateCache<S>,
    max_age: Duration,
    request: ConversionRequest,
) -> Result<String> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    cache.ensure_fresh(max_age).await;
    pb.finish_and_clear();

    let snapshot = cache
        .current_snapshot()
        .await
        .ok_or_else(|| anyhow!("Exchange rates could not be loaded, {}", RETRY_HINT))?;

    match convert(&snapshot, request.amount, request.from, request.to) {
        Ok(result) => {
            debug!(?request, ?result, "Conversion completed");
            Ok(display_conversion(&snapshot, &request, &result))
        }
        Err(e @ ConversionError::NotAvailable(_)) => bail!("{}: {}", e, RETRY_HINT),
        Err(e) => Err(e.into()),
    }
}
