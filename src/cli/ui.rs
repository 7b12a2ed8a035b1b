use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::{Decimal, RoundingStrategy};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Value,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Value => style(text).green().bold(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell for numbers.
pub fn number_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Spinner shown while rates are fetched.
pub fn new_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Formats `value` with `dp` decimals, space-grouped thousands and a comma decimal separator.
pub fn format_number(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped},{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Two-decimal amount, e.g. `1 250 000,00`.
pub fn format_amount(value: Decimal) -> String {
    format_number(value, 2)
}

/// Rates below one keep enough decimals to stay meaningful.
pub fn format_rate(value: Decimal) -> String {
    if value.abs() >= Decimal::ONE {
        format_amount(value)
    } else {
        format_number(value, 6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(dec!(1250000)), "1 250 000,00");
        assert_eq!(format_amount(dec!(999.5)), "999,50");
        assert_eq!(format_amount(dec!(1000)), "1 000,00");
        assert_eq!(format_amount(dec!(0.125)), "0,13");
        assert_eq!(format_amount(dec!(-12345.678)), "-12 345,68");
    }

    #[test]
    fn test_format_number_without_decimals() {
        assert_eq!(format_number(dec!(1250000), 0), "1 250 000");
        assert_eq!(format_number(dec!(28.5), 0), "29");
        assert_eq!(format_number(dec!(108), 4), "108,0000");
    }

    #[test]
    fn test_format_rate_small_values() {
        assert_eq!(format_rate(dec!(0.00008)), "0,000080");
        assert_eq!(format_rate(dec!(1.08)), "1,08");
        assert_eq!(format_rate(dec!(12845.67)), "12 845,67");
    }
}
