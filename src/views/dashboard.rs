use crate::expenses::summary::Summary;
use crate::format::format_money;

use super::push_line;

fn line(out: &mut String, label: &str, value: String) {
    push_line(out, format_args!("  {label:<16}{value:>14}"));
}

pub fn render(summary: &Summary, currency: char) -> String {
    let mut out = String::from("Summary\n");
    line(&mut out, "Total Expenses", format_money(summary.total, currency));
    line(&mut out, "Confirmed", format_money(summary.confirmed, currency));
    line(&mut out, "Pending", format_money(summary.pending, currency));
    out.push('\n');
    for (category, total) in &summary.by_category {
        line(&mut out, &category.to_string(), format_money(*total, currency));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::expenses::{Expense, ExpenseCategory, ExpenseInput, ExpenseStatus};

    fn shows(rendered: &str, label: &str, value: &str) -> bool {
        rendered
            .lines()
            .any(|l| l.trim_start().starts_with(label) && l.trim_end().ends_with(value))
    }

    fn taxi() -> Expense {
        Expense::draft(ExpenseInput {
            amount: Decimal::from(100),
            description: "Taxi".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: ExpenseCategory::Transportation,
        })
    }

    #[test]
    fn draft_counts_as_pending() {
        let rendered = render(&Summary::of(&[taxi()]), '$');
        assert!(shows(&rendered, "Total Expenses", "$100.00"));
        assert!(shows(&rendered, "Pending", "$100.00"));
        assert!(shows(&rendered, "Confirmed", "$0.00"));
    }

    #[test]
    fn confirmed_shows_in_category_breakdown() {
        let mut taxi = taxi();
        taxi.status = ExpenseStatus::Confirmed;
        let rendered = render(&Summary::of(&[taxi]), '$');
        assert!(shows(&rendered, "Confirmed", "$100.00"));
        assert!(shows(&rendered, "Pending", "$0.00"));
        assert!(shows(&rendered, "Transportation", "$100.00"));
        assert!(shows(&rendered, "Supplies", "$0.00"));
    }

    #[test]
    fn empty_dashboard_is_all_zero() {
        let rendered = render(&Summary::of(&[]), '$');
        let amounts = rendered.lines().filter(|l| l.contains('$')).count();
        assert_eq!(amounts, 8);
        assert!(rendered
            .lines()
            .filter(|l| l.contains('$'))
            .all(|l| l.ends_with("$0.00")));
    }
}
