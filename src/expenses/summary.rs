use rust_decimal::Decimal;

use super::{Expense, ExpenseCategory, ExpenseStatus};

pub fn total_all(records: &[Expense]) -> Decimal {
    records.iter().map(|expense| expense.amount).sum()
}

pub fn total_by_status(records: &[Expense], status: ExpenseStatus) -> Decimal {
    records
        .iter()
        .filter(|expense| expense.status == status)
        .map(|expense| expense.amount)
        .sum()
}

pub fn total_by_category(records: &[Expense], category: ExpenseCategory) -> Decimal {
    records
        .iter()
        .filter(|expense| expense.category == category)
        .map(|expense| expense.amount)
        .sum()
}

/// Everything the dashboard shows, computed in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: Decimal,
    pub confirmed: Decimal,
    pub pending: Decimal,
    /// in `ExpenseCategory::ALL` order
    pub by_category: Vec<(ExpenseCategory, Decimal)>,
}

impl Summary {
    pub fn of(records: &[Expense]) -> Self {
        Self {
            total: total_all(records),
            confirmed: total_by_status(records, ExpenseStatus::Confirmed),
            pending: total_by_status(records, ExpenseStatus::Draft),
            by_category: ExpenseCategory::ALL
                .into_iter()
                .map(|category| (category, total_by_category(records, category)))
                .collect(),
        }
    }
}
