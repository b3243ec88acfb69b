use std::fmt::Display;

use chrono::{Local, Weekday};
use inquire::{DateSelect, InquireError, Select};

use crate::config::TrackerConfig;
use crate::errors::TrackerError;
use crate::expenses::summary::Summary;
use crate::expenses::{Expense, ExpenseCategory, ExpenseId, ExpenseStatus};
use crate::export;
use crate::filter::ExpenseFilter;
use crate::format::format_money;
use crate::storage::SnapshotStorage;
use crate::store::{ExpenseStore, StoreEvent};

use super::form::{self, FormDefaults};
use super::{dashboard, list};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuEntry {
    Dashboard,
    Expenses,
    AddExpense,
    Edit,
    Confirm,
    Delete,
    SetFilters,
    ClearFilters,
    Export,
    Quit,
}

impl MenuEntry {
    const ALL: [MenuEntry; 10] = [
        Self::Dashboard,
        Self::Expenses,
        Self::AddExpense,
        Self::Edit,
        Self::Confirm,
        Self::Delete,
        Self::SetFilters,
        Self::ClearFilters,
        Self::Export,
        Self::Quit,
    ];
}

impl Display for MenuEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Dashboard => "Dashboard",
            Self::Expenses => "Expenses",
            Self::AddExpense => "Add Expense",
            Self::Edit => "Edit a draft",
            Self::Confirm => "Confirm a draft",
            Self::Delete => "Delete an expense",
            Self::SetFilters => "Set filters",
            Self::ClearFilters => "Clear filters",
            Self::Export => "Export to Excel",
            Self::Quit => "Quit",
        };
        f.write_str(label)
    }
}

fn describe(event: &StoreEvent) -> String {
    match event {
        StoreEvent::Created(id) => format!("Added expense {id}"),
        StoreEvent::Updated(id) => format!("Updated expense {id}"),
        StoreEvent::Deleted(id) => format!("Deleted expense {id}"),
        StoreEvent::Confirmed(id) => format!("Confirmed expense {id}"),
    }
}

/// Turns prompt cancellation into `None` so the menu loop can carry on.
fn cancellable<T>(result: Result<T, TrackerError>) -> Result<Option<T>, TrackerError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(TrackerError::Aborted)
        | Err(TrackerError::Prompt(InquireError::OperationCanceled)) => {
            println!("Nothing changed.");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Reports a failed step; only Ctrl-C ends the session.
fn ends_session(result: Result<(), TrackerError>) -> bool {
    match result {
        Ok(()) => false,
        Err(TrackerError::Prompt(InquireError::OperationInterrupted)) => true,
        Err(err) => {
            tracing::error!("menu step failed: {err}");
            println!("That did not work: {err}");
            false
        }
    }
}

fn choose_expense(
    candidates: &[&Expense],
    message: &str,
    config: &TrackerConfig,
) -> Result<Option<ExpenseId>, TrackerError> {
    if candidates.is_empty() {
        println!("No matching expenses.");
        return Ok(None);
    }
    let labels: Vec<String> = candidates
        .iter()
        .map(|expense| {
            format!(
                "{} {} {} ({})",
                expense.date,
                format_money(expense.amount, config.currency),
                expense.description,
                expense.category
            )
        })
        .collect();
    let choice = cancellable(Select::new(message, labels).raw_prompt().map_err(Into::into))?;
    Ok(choice.map(|choice| candidates[choice.index].id))
}

fn prompt_filter() -> Result<ExpenseFilter, TrackerError> {
    let today = Local::now().date_naive();
    let defaults = ExpenseFilter::last_month(today);
    let start = DateSelect::new("Start date:")
        .with_default(defaults.start.unwrap_or(today))
        .with_week_start(Weekday::Mon)
        .prompt()?;
    let end = DateSelect::new("End date:")
        .with_default(defaults.end.unwrap_or(today).max(start))
        .with_min_date(start)
        .with_week_start(Weekday::Mon)
        .prompt()?;

    let status = Select::new("Status:", vec!["All Status", "Draft", "Confirmed"]).raw_prompt()?;
    let status = match status.index {
        1 => Some(ExpenseStatus::Draft),
        2 => Some(ExpenseStatus::Confirmed),
        _ => None,
    };

    let labels: Vec<&str> = std::iter::once("All Categories")
        .chain(ExpenseCategory::ALL.iter().map(|c| c.label()))
        .collect();
    let category = Select::new("Category:", labels).raw_prompt()?;
    let category = category
        .index
        .checked_sub(1)
        .and_then(|i| ExpenseCategory::ALL.get(i).copied());

    Ok(ExpenseFilter {
        start: Some(start),
        end: Some(end),
        status,
        category,
    })
}

/// Menu-driven session. The dashboard is re-rendered after every change.
pub fn run<S: SnapshotStorage>(
    store: &mut ExpenseStore<S>,
    config: &TrackerConfig,
) -> Result<(), TrackerError> {
    let currency = config.currency;
    let subscription = store.subscribe(move |event, records| {
        println!("{}\n", describe(event));
        print!("{}", dashboard::render(&Summary::of(records), currency));
    });
    let mut filter = ExpenseFilter::default();

    print!("{}", dashboard::render(&Summary::of(store.records()), currency));
    let result = loop {
        let entry = match Select::new("What next?", MenuEntry::ALL.to_vec()).prompt() {
            Ok(entry) => entry,
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                break Ok(())
            }
            Err(err) => break Err(err.into()),
        };
        if ends_session(step(entry, store, config, &mut filter)) {
            break Ok(());
        }
        if entry == MenuEntry::Quit {
            break Ok(());
        }
    };
    store.unsubscribe(subscription);
    result
}

fn step<S: SnapshotStorage>(
    entry: MenuEntry,
    store: &mut ExpenseStore<S>,
    config: &TrackerConfig,
    filter: &mut ExpenseFilter,
) -> Result<(), TrackerError> {
    match entry {
        MenuEntry::Dashboard => {
            print!("{}", dashboard::render(&Summary::of(store.records()), config.currency));
        }
        MenuEntry::Expenses => {
            if !filter.is_empty() {
                println!("Showing {}\n", filter.describe(&config.date_format)?);
            }
            let shown = filter.apply(store.records());
            print!("{}", list::render(&shown, config.currency, &config.date_format)?);
        }
        MenuEntry::AddExpense => {
            if let Some(input) = cancellable(form::prompt(&FormDefaults::default(), false, config))? {
                store.create(input)?;
            }
        }
        MenuEntry::Edit => {
            let drafts: Vec<&Expense> = store.records().iter().filter(|e| e.is_draft()).collect();
            let Some(id) = choose_expense(&drafts, "Edit which draft?", config)? else {
                return Ok(());
            };
            let Some(current) = store.get(id).map(Expense::to_input) else {
                return Ok(());
            };
            let defaults = FormDefaults::from(current);
            if let Some(input) = cancellable(form::prompt(&defaults, true, config))? {
                store.update(id, input)?;
            }
        }
        MenuEntry::Confirm => {
            let drafts: Vec<&Expense> = store.records().iter().filter(|e| e.is_draft()).collect();
            if let Some(id) = choose_expense(&drafts, "Confirm which draft?", config)? {
                store.confirm(id)?;
            }
        }
        MenuEntry::Delete => {
            let all: Vec<&Expense> = store.records().iter().collect();
            if let Some(id) = choose_expense(&all, "Delete which expense?", config)? {
                store.delete(id)?;
            }
        }
        MenuEntry::SetFilters => {
            if let Some(chosen) = cancellable(prompt_filter())? {
                *filter = chosen;
            }
        }
        MenuEntry::ClearFilters => *filter = ExpenseFilter::default(),
        MenuEntry::Export => {
            let selected = filter.apply(store.records());
            let written = export::export(&selected, &config.date_format, &config.export_file)?;
            println!(
                "Exported {written} expenses to {}",
                config.export_file.display()
            );
        }
        MenuEntry::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::expenses::ExpenseInput;
    use crate::storage::{FailingStorage, MemoryStorage};

    fn config(dir: &std::path::Path) -> TrackerConfig {
        TrackerConfig {
            export_file: dir.join("out.xlsx"),
            ..TrackerConfig::default()
        }
    }

    fn taxi() -> ExpenseInput {
        ExpenseInput {
            amount: Decimal::from(100),
            description: "Taxi".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: ExpenseCategory::Transportation,
        }
    }

    #[test]
    fn menu_lists_every_entry_once() {
        let labels: Vec<String> = MenuEntry::ALL.iter().map(|e| e.to_string()).collect();
        assert_eq!(labels.len(), 10);
        assert!(labels.contains(&"Export to Excel".to_string()));
        assert_eq!(labels.last().map(String::as_str), Some("Quit"));
    }

    #[test]
    fn cancelled_prompts_change_nothing() {
        assert!(cancellable::<()>(Err(TrackerError::Aborted)).unwrap().is_none());
        assert!(cancellable::<()>(Err(TrackerError::Prompt(
            InquireError::OperationCanceled
        )))
        .unwrap()
        .is_none());
        assert!(cancellable::<()>(Err(TrackerError::Parse("x".into()))).is_err());
        assert_eq!(cancellable(Ok(3)).unwrap(), Some(3));
    }

    #[test]
    fn export_step_honours_the_filter() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut store = ExpenseStore::open(MemoryStorage::new());
        store.create(taxi()).unwrap();
        let mut filter = ExpenseFilter {
            category: Some(ExpenseCategory::Food),
            ..ExpenseFilter::default()
        };
        step(MenuEntry::Export, &mut store, &config, &mut filter).unwrap();
        assert!(config.export_file.exists());
        step(MenuEntry::ClearFilters, &mut store, &config, &mut filter).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn failures_are_reported_and_the_session_goes_on() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut store = ExpenseStore::open(FailingStorage);
        let redraws = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = std::rc::Rc::clone(&redraws);
        store.subscribe(move |_, _| counter.set(counter.get() + 1));

        assert!(!ends_session(store.create(taxi()).map(drop)));
        assert_eq!(store.len(), 1);
        assert_eq!(redraws.get(), 1);

        let unwritable = TrackerConfig {
            export_file: dir.path().to_path_buf(),
            ..config
        };
        let mut filter = ExpenseFilter::default();
        let export = step(MenuEntry::Export, &mut store, &unwritable, &mut filter);
        assert!(export.is_err());
        assert!(!ends_session(export));

        assert!(ends_session(Err(TrackerError::Prompt(
            InquireError::OperationInterrupted
        ))));
        assert!(!ends_session(Ok(())));
    }

    #[test]
    fn events_are_described() {
        let id = ExpenseId::generate();
        assert_eq!(
            describe(&StoreEvent::Confirmed(id)),
            format!("Confirmed expense {id}")
        );
    }
}
