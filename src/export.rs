use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};

use crate::errors::TrackerError;
use crate::expenses::Expense;
use crate::format::format_date;

pub const DEFAULT_EXPORT_FILE: &str = "expenses.xlsx";
pub const SHEET_NAME: &str = "Expenses";
pub const HEADERS: [&str; 5] = ["Date", "Description", "Amount", "Category", "Status"];

/// One spreadsheet line, already formatted for humans.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub status: String,
}

impl ExportRow {
    pub fn new(expense: &Expense, date_format: &str) -> Result<Self, TrackerError> {
        Ok(Self {
            date: format_date(expense.date, date_format)?,
            description: expense.description.clone(),
            amount: expense.amount.to_f64().unwrap_or_default(),
            category: expense.category.to_string(),
            status: expense.status.to_string(),
        })
    }
}

pub fn rows<'a>(
    records: impl IntoIterator<Item = &'a Expense>,
    date_format: &str,
) -> Result<Vec<ExportRow>, TrackerError> {
    records
        .into_iter()
        .map(|expense| ExportRow::new(expense, date_format))
        .collect()
}

/// Writes `rows` to a single-sheet workbook at `path`, replacing any existing file.
pub fn write_workbook(rows: &[ExportRow], path: &Path) -> Result<(), TrackerError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format("#,##0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let line = i as u32 + 1;
        worksheet.write_string(line, 0, &row.date)?;
        worksheet.write_string(line, 1, &row.description)?;
        worksheet.write_number_with_format(line, 2, row.amount, &amount_format)?;
        worksheet.write_string(line, 3, &row.category)?;
        worksheet.write_string(line, 4, &row.status)?;
    }
    worksheet.set_column_width(1, 40)?;

    workbook.save(path)?;
    tracing::info!("exported {} expenses to {}", rows.len(), path.display());
    Ok(())
}

/// Formats `records` and writes them to `path`. Returns how many were written.
pub fn export(records: &[&Expense], date_format: &str, path: &Path) -> Result<usize, TrackerError> {
    let rows = rows(records.iter().copied(), date_format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_workbook(&rows, path)?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    use super::*;
    use crate::expenses::{ExpenseCategory, ExpenseInput, ExpenseStatus};
    use crate::format::DEFAULT_DATE_FORMAT;

    fn records() -> Vec<Expense> {
        let taxi = Expense::draft(ExpenseInput {
            amount: Decimal::from(100),
            description: "Taxi".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: ExpenseCategory::Transportation,
        });
        let mut dinner = Expense::draft(ExpenseInput {
            amount: Decimal::new(3475, 2),
            description: "Dinner with client".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 11, 23).unwrap(),
            category: ExpenseCategory::Food,
        });
        dinner.status = ExpenseStatus::Confirmed;
        vec![taxi, dinner]
    }

    #[test]
    fn rows_are_human_formatted() {
        let rows = rows(&records(), DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(
            rows,
            vec![
                ExportRow {
                    date: "1/1/2024".to_string(),
                    description: "Taxi".to_string(),
                    amount: 100.0,
                    category: "Transportation".to_string(),
                    status: "Draft".to_string(),
                },
                ExportRow {
                    date: "11/23/2024".to_string(),
                    description: "Dinner with client".to_string(),
                    amount: 34.75,
                    category: "Food".to_string(),
                    status: "Confirmed".to_string(),
                },
            ]
        );
    }

    #[test]
    fn rows_keep_every_record_in_order() {
        let records = records();
        let rows = rows(records.iter().rev(), "%Y-%m-%d").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2024-11-23");
        assert_eq!(rows[1].date, "2024-01-01");
    }

    #[test]
    fn writes_an_xlsx_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        let rows = rows(&records(), DEFAULT_DATE_FORMAT).unwrap();
        write_workbook(&rows, &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn export_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("2024.xlsx");
        let records = records();
        let selected: Vec<&Expense> = records.iter().collect();
        assert_eq!(export(&selected, DEFAULT_DATE_FORMAT, &path).unwrap(), 2);
        assert!(path.exists());
    }

    #[test]
    fn empty_export_still_has_a_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        write_workbook(&[], &path).unwrap();
        assert!(path.exists());
    }
}
