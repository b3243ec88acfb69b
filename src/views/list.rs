use crate::errors::TrackerError;
use crate::expenses::Expense;
use crate::format::{format_date, format_money};

use super::push_line;

pub const EMPTY_LIST: &str = "No expenses recorded yet";

pub fn render(
    expenses: &[&Expense],
    currency: char,
    date_format: &str,
) -> Result<String, TrackerError> {
    if expenses.is_empty() {
        return Ok(format!("{EMPTY_LIST}\n"));
    }
    let mut out = String::new();
    for expense in expenses {
        let tag = if expense.is_draft() { "" } else { "  [Confirmed]" };
        push_line(
            &mut out,
            format_args!(
                "{}  {}{tag}",
                format_money(expense.amount, currency),
                expense.category
            ),
        );
        push_line(&mut out, format_args!("  {}", expense.description));
        let date = format_date(expense.date, date_format)?;
        push_line(&mut out, format_args!("  {date}  id {}", expense.id));
        out.push('\n');
    }
    Ok(out)
}
