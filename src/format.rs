use std::fmt::Write;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::TrackerError;

/// Short US date, as a browser in the en-US locale would print it.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Renders an amount like `$1,234.50`. Rounding only ever happens here.
pub fn format_money(amount: Decimal, currency: char) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{sign}{currency}{}.{fraction}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

pub fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_date(date: NaiveDate, format: &str) -> Result<String, TrackerError> {
    let mut formatted = String::new();
    write!(formatted, "{}", date.format(format))
        .map_err(|_| TrackerError::InvalidArgument(format!("bad date format {format:?}")))?;
    Ok(formatted)
}
