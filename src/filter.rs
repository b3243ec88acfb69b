use chrono::NaiveDate;
use chronoutil::RelativeDuration;

use crate::errors::TrackerError;
use crate::expenses::{Expense, ExpenseCategory, ExpenseStatus};
use crate::format::format_date;

/// Narrows the expense list and export. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub status: Option<ExpenseStatus>,
    pub category: Option<ExpenseCategory>,
}

impl ExpenseFilter {
    /// The last thirty days up to and including `today`.
    pub fn last_month(today: NaiveDate) -> Self {
        Self {
            start: Some(today + RelativeDuration::days(-30)),
            end: Some(today),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.start.map_or(true, |start| expense.date >= start)
            && self.end.map_or(true, |end| expense.date <= end)
            && self.status.map_or(true, |status| expense.status == status)
            && self
                .category
                .map_or(true, |category| expense.category == category)
    }

    /// The filter in words, e.g. "from 6/10/2024 to 7/10/2024, confirmed, Food".
    pub fn describe(&self, date_format: &str) -> Result<String, TrackerError> {
        let mut parts = Vec::new();
        match (self.start, self.end) {
            (Some(start), Some(end)) => parts.push(format!(
                "from {} to {}",
                format_date(start, date_format)?,
                format_date(end, date_format)?
            )),
            (Some(start), None) => parts.push(format!("from {}", format_date(start, date_format)?)),
            (None, Some(end)) => parts.push(format!("until {}", format_date(end, date_format)?)),
            (None, None) => {}
        }
        if let Some(status) = self.status {
            parts.push(status.key().to_string());
        }
        if let Some(category) = self.category {
            parts.push(category.to_string());
        }
        if parts.is_empty() {
            return Ok("all expenses".to_string());
        }
        Ok(parts.join(", "))
    }

    pub fn apply<'a>(&self, records: &'a [Expense]) -> Vec<&'a Expense> {
        records
            .iter()
            .filter(|expense| self.matches(expense))
            .collect()
    }
}
