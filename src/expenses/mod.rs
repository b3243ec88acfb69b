use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TrackerError;
use crate::format::title_case;

pub mod summary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExpenseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Transportation,
    Food,
    Accommodation,
    Supplies,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        Self::Transportation,
        Self::Food,
        Self::Accommodation,
        Self::Supplies,
        Self::Other,
    ];

    /// lower-case key, as stored
    pub fn key(self) -> &'static str {
        match self {
            Self::Transportation => "transportation",
            Self::Food => "food",
            Self::Accommodation => "accommodation",
            Self::Supplies => "supplies",
            Self::Other => "other",
        }
    }

    /// label shown in the form's category selection
    pub fn label(self) -> &'static str {
        match self {
            Self::Transportation => "Transportation",
            Self::Food => "Food & Drinks",
            Self::Accommodation => "Accommodation",
            Self::Supplies => "Supplies",
            Self::Other => "Other",
        }
    }
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&title_case(self.key()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Draft,
    Confirmed,
}

impl ExpenseStatus {
    pub fn key(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Confirmed => "confirmed",
        }
    }
}

impl Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&title_case(self.key()))
    }
}

/// The fields a user submits when adding or editing an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseInput {
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
}

impl ExpenseInput {
    /// Input constraints the form enforces before anything reaches the store.
    pub fn validate(self) -> Result<Self, TrackerError> {
        if amount_is_invalid(self.amount) {
            return Err(TrackerError::InvalidArgument(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(TrackerError::InvalidArgument(
                "description must not be empty".into(),
            ));
        }
        Ok(Self {
            description: description.to_string(),
            ..self
        })
    }
}

fn amount_is_invalid(amount: Decimal) -> bool {
    amount.is_zero() || amount.is_sign_negative()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub status: ExpenseStatus,
}

impl Expense {
    /// A fresh record: new id, always a draft.
    pub fn draft(input: ExpenseInput) -> Self {
        Self {
            id: ExpenseId::generate(),
            amount: input.amount,
            description: input.description,
            date: input.date,
            category: input.category,
            status: ExpenseStatus::Draft,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.status == ExpenseStatus::Draft
    }

    /// Overwrites the user-editable fields, leaving `id` and `status` alone.
    pub fn apply(&mut self, input: ExpenseInput) {
        self.amount = input.amount;
        self.description = input.description;
        self.date = input.date;
        self.category = input.category;
    }

    pub fn to_input(&self) -> ExpenseInput {
        ExpenseInput {
            amount: self.amount,
            description: self.description.clone(),
            date: self.date,
            category: self.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::*;

    fn taxi() -> ExpenseInput {
        ExpenseInput {
            amount: Decimal::from(100),
            description: "Taxi".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: ExpenseCategory::Transportation,
        }
    }

    #[test]
    fn drafts_get_distinct_ids() {
        let a = Expense::draft(taxi());
        let b = Expense::draft(taxi());
        assert_ne!(a.id, b.id);
        assert_eq!(a.status, ExpenseStatus::Draft);
        assert_eq!(b.status, ExpenseStatus::Draft);
    }

    #[test]
    fn apply_keeps_identity_and_status() {
        let mut expense = Expense::draft(taxi());
        expense.status = ExpenseStatus::Confirmed;
        let id = expense.id;
        expense.apply(ExpenseInput {
            amount: Decimal::new(4250, 2),
            description: "Lunch".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
            category: ExpenseCategory::Food,
        });
        assert_eq!(expense.id, id);
        assert_eq!(expense.status, ExpenseStatus::Confirmed);
        assert_eq!(expense.amount, Decimal::new(4250, 2));
        assert_eq!(expense.category, ExpenseCategory::Food);
    }

    #[test]
    fn validate_rejects_bad_input() {
        let zero = ExpenseInput {
            amount: Decimal::ZERO,
            ..taxi()
        };
        assert!(matches!(
            zero.validate(),
            Err(TrackerError::InvalidArgument(_))
        ));
        let negative = ExpenseInput {
            amount: Decimal::from(-5),
            ..taxi()
        };
        assert!(negative.validate().is_err());
        let blank = ExpenseInput {
            description: "   ".to_string(),
            ..taxi()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn validate_trims_description() {
        let input = ExpenseInput {
            description: "  Taxi to airport ".to_string(),
            ..taxi()
        };
        assert_eq!(input.validate().unwrap().description, "Taxi to airport");
    }

    #[test]
    fn serialized_form_uses_lowercase_keys_and_numbers() {
        let expense = Expense::draft(ExpenseInput {
            amount: Decimal::from_str("12.5").unwrap(),
            ..taxi()
        });
        let value = serde_json::to_value(&expense).unwrap();
        assert_eq!(value["category"], "transportation");
        assert_eq!(value["status"], "draft");
        assert_eq!(value["date"], "2024-01-01");
        assert_eq!(value["amount"].as_f64(), Some(12.5));
        assert!(value["amount"].is_number());
        assert_eq!(value["id"], expense.id.to_string());
    }

    #[test]
    fn reads_records_written_by_older_sessions() {
        let blob = r#"{
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "amount": 100,
            "description": "Taxi",
            "date": "2024-01-01",
            "category": "transportation",
            "status": "confirmed"
        }"#;
        let expense: Expense = serde_json::from_str(blob).unwrap();
        assert_eq!(expense.amount, Decimal::from(100));
        assert_eq!(expense.status, ExpenseStatus::Confirmed);
        assert_eq!(
            expense.id,
            "7c9e6679-7425-40de-944b-e07fc1f90ae7"
                .parse::<ExpenseId>()
                .unwrap()
        );
    }

    #[test]
    fn category_names() {
        assert_eq!(ExpenseCategory::Food.to_string(), "Food");
        assert_eq!(ExpenseCategory::Food.label(), "Food & Drinks");
        assert_eq!(ExpenseStatus::Confirmed.to_string(), "Confirmed");
    }
}
