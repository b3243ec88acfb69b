use std::str::FromStr;

use nom::branch::alt;
use nom::character::complete::{char as char_parser, digit0};
use nom::combinator::opt;
use nom::error::{make_error, ErrorKind};
use nom::sequence::preceded;
use nom::IResult;
use rust_decimal::Decimal;

use crate::errors::TrackerError;

fn separator_parser(input: &str) -> IResult<&str, ()> {
    alt((char_parser(','), char_parser('.')))(input).map(|(input, _)| (input, ()))
}

fn after_separator_parser(input: &str) -> IResult<&str, &str> {
    let (rest, digits) = digit0(input)?;
    if digits.len() > 2 {
        return Err(nom::Err::Failure(make_error(input, ErrorKind::TooLarge)));
    }
    Ok((rest, digits))
}

fn decimals_parser(input: &str) -> IResult<&str, &str> {
    preceded(separator_parser, after_separator_parser)(input)
}

fn amount_parser(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, whole) = digit0(input)?;
    let (input, decimals) = opt(decimals_parser)(input)?;
    Ok((input, (whole, decimals.unwrap_or_default())))
}

/// Parses a positive money amount with at most two decimals, accepting either
/// `.` or `,` as the decimal separator.
pub fn parse_amount(s: &str) -> Result<Decimal, TrackerError> {
    let (whole, decimals) = match amount_parser(s.trim()) {
        Ok(("", digits)) => digits,
        Ok((rest, _)) => {
            return Err(TrackerError::Parse(format!(
                "unexpected characters {rest:?} in amount"
            )))
        }
        Err(nom::Err::Failure(_)) => {
            return Err(TrackerError::Parse(
                "amounts have at most two decimals".to_string(),
            ))
        }
        Err(e) => return Err(TrackerError::Parse(e.to_string())),
    };
    if whole.is_empty() && decimals.is_empty() {
        return Err(TrackerError::Parse("amount is empty".to_string()));
    }
    let whole = if whole.is_empty() { "0" } else { whole };
    let decimals = if decimals.is_empty() { "0" } else { decimals };
    let amount = Decimal::from_str(&format!("{whole}.{decimals}"))
        .map_err(|e| TrackerError::Parse(e.to_string()))?;
    if amount.is_zero() {
        return Err(TrackerError::Parse("amount must be positive".to_string()));
    }
    Ok(amount.normalize())
}
