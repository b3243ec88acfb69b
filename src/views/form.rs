use chrono::{Local, NaiveDate, Weekday};
use inquire::{error::InquireResult, required, Confirm, CustomType, DateSelect, Select, Text};
use rust_decimal::Decimal;

use crate::config::TrackerConfig;
use crate::errors::TrackerError;
use crate::expenses::{ExpenseCategory, ExpenseInput};
use crate::format::format_money;
use crate::parse::parse_amount;

pub fn money_amount(config: &TrackerConfig, default: Option<Decimal>) -> InquireResult<Decimal> {
    let currency = config.currency;
    let parser = |input: &str| parse_amount(input).map_err(|_| ());
    let formatter = |amount: Decimal| format_money(amount, currency);
    let help = format!("Type the amount in {currency}, using . or , as the decimal separator");
    let mut prompt = CustomType::<Decimal>::new("Amount:")
        .with_parser(&parser)
        .with_formatter(&formatter)
        .with_error_message("Please type a positive amount with at most two decimals")
        .with_help_message(&help);
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }
    prompt.prompt()
}

fn category(default: Option<ExpenseCategory>) -> InquireResult<ExpenseCategory> {
    let labels: Vec<&str> = ExpenseCategory::ALL.iter().map(|c| c.label()).collect();
    let cursor = default
        .and_then(|default| ExpenseCategory::ALL.iter().position(|&c| c == default))
        .unwrap_or(0);
    let choice = Select::new("Category:", labels)
        .with_starting_cursor(cursor)
        .raw_prompt()?;
    Ok(ExpenseCategory::ALL[choice.index])
}

/// Pre-filled answers for the form. Missing ones start blank, the date at today.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDefaults {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
}

impl From<ExpenseInput> for FormDefaults {
    fn from(input: ExpenseInput) -> Self {
        Self {
            amount: Some(input.amount),
            description: Some(input.description),
            date: Some(input.date),
            category: Some(input.category),
        }
    }
}

/// Asks for every field of an expense. `editing` only changes the wording.
pub fn prompt(
    defaults: &FormDefaults,
    editing: bool,
    config: &TrackerConfig,
) -> Result<ExpenseInput, TrackerError> {
    let today = Local::now().date_naive();
    let amount = money_amount(config, defaults.amount)?;

    let mut description = Text::new("Description:")
        .with_validator(required!("Please enter a description"));
    if let Some(default) = &defaults.description {
        description = description.with_default(default);
    }
    let description = description.prompt()?;

    let date: NaiveDate = DateSelect::new("Date:")
        .with_default(defaults.date.unwrap_or(today))
        .with_week_start(Weekday::Mon)
        .prompt()?;
    let category = category(defaults.category)?;

    let input = ExpenseInput {
        amount,
        description,
        date,
        category,
    }
    .validate()?;

    let verb = if editing { "Update" } else { "Add" };
    if Confirm::new(&format!("{verb} this expense?"))
        .with_default(true)
        .prompt()?
    {
        Ok(input)
    } else {
        Err(TrackerError::Aborted)
    }
}
