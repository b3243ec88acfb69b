use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args as ClapArgs, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use self::config::TrackerConfig;
use self::errors::TrackerError;
use self::expenses::summary::Summary;
use self::expenses::{ExpenseCategory, ExpenseId, ExpenseInput, ExpenseStatus};
use self::filter::ExpenseFilter;
use self::storage::{JsonFileStorage, MemoryStorage, SnapshotStorage};
use self::store::ExpenseStore;
use self::views::form::{self, FormDefaults};
use self::views::{dashboard, list, session};

mod config;
pub mod errors;
mod expenses;
mod export;
mod filter;
mod format;
mod parse;
mod storage;
mod store;
mod views;

#[derive(Parser, Debug)]
#[command(version, about = "Track expenses from draft to confirmed", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
    #[arg(short, long)]
    debug: bool,
    /// Config file (defaults to ./expenses.config when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory holding the stored expenses
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Keep everything in memory; nothing is read or written
    #[arg(long)]
    ephemeral: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals by status and category
    Dashboard,
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Add a draft; prompts for anything not given
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a draft; prompts when no field is given
    Edit {
        id: ExpenseId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    Confirm {
        id: ExpenseId,
    },
    Delete {
        id: ExpenseId,
    },
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Menu-driven session (the default)
    Interactive,
}

#[derive(ClapArgs, Debug, Default)]
struct FieldArgs {
    #[arg(short, long, value_parser = amount_arg)]
    amount: Option<Decimal>,
    #[arg(short = 'm', long)]
    description: Option<String>,
    #[arg(short = 't', long)]
    date: Option<NaiveDate>,
    #[arg(short, long, value_enum)]
    category: Option<ExpenseCategory>,
}

impl FieldArgs {
    fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.category.is_none()
    }

    /// Complete input when every required field was given; the date defaults to today.
    fn complete(&self) -> Option<ExpenseInput> {
        Some(ExpenseInput {
            amount: self.amount?,
            description: self.description.clone()?,
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            category: self.category?,
        })
    }

    fn merged_into(self, base: ExpenseInput) -> ExpenseInput {
        ExpenseInput {
            amount: self.amount.unwrap_or(base.amount),
            description: self.description.unwrap_or(base.description),
            date: self.date.unwrap_or(base.date),
            category: self.category.unwrap_or(base.category),
        }
    }
}

impl From<FieldArgs> for FormDefaults {
    fn from(fields: FieldArgs) -> Self {
        Self {
            amount: fields.amount,
            description: fields.description,
            date: fields.date,
            category: fields.category,
        }
    }
}

#[derive(ClapArgs, Debug, Default)]
struct FilterArgs {
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long, value_enum)]
    status: Option<ExpenseStatus>,
    #[arg(long, value_enum)]
    category: Option<ExpenseCategory>,
}

impl From<FilterArgs> for ExpenseFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            start: args.from,
            end: args.to,
            status: args.status,
            category: args.category,
        }
    }
}

fn amount_arg(s: &str) -> Result<Decimal, String> {
    parse::parse_amount(s).map_err(|e| e.to_string())
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("expenses={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), TrackerError> {
    let args = Args::parse();
    init_logging(args.debug);

    let mut config = TrackerConfig::load(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = Some(data_dir);
    }
    let command = args.command.unwrap_or(Command::Interactive);

    if args.ephemeral {
        tracing::info!("ephemeral session, nothing will be saved");
        run(ExpenseStore::open(MemoryStorage::new()), command, &config)
    } else {
        let storage = JsonFileStorage::new(config.data_dir());
        tracing::debug!("using storage at {}", storage.path().display());
        run(ExpenseStore::open(storage), command, &config)
    }
}

fn report_no_op(changed: bool, id: ExpenseId, what: &str) {
    if !changed {
        println!("Nothing to {what} for {id}.");
    }
}

fn run<S: SnapshotStorage>(
    mut store: ExpenseStore<S>,
    command: Command,
    config: &TrackerConfig,
) -> Result<(), TrackerError> {
    if store.is_empty() {
        tracing::debug!("no expenses stored yet");
    } else {
        tracing::debug!("{} expenses loaded", store.len());
    }
    match command {
        Command::Dashboard => {
            print!("{}", dashboard::render(&Summary::of(store.records()), config.currency));
        }
        Command::List { filter } => {
            let filter = ExpenseFilter::from(filter);
            let shown = filter.apply(store.records());
            print!("{}", list::render(&shown, config.currency, &config.date_format)?);
        }
        Command::Add { fields } => {
            let input = match fields.complete() {
                Some(input) => input.validate()?,
                None => form::prompt(&FormDefaults::from(fields), false, config)?,
            };
            let expense = store.create(input)?;
            println!("Added {}", expense.id);
        }
        Command::Edit { id, fields } => {
            let Some(current) = store.get(id) else {
                report_no_op(false, id, "edit");
                return Ok(());
            };
            if !current.is_draft() {
                println!("{id} is confirmed and can no longer be edited.");
                return Ok(());
            }
            let current = current.to_input();
            let input = if fields.is_empty() {
                form::prompt(&FormDefaults::from(current), true, config)?
            } else {
                fields.merged_into(current).validate()?
            };
            let changed = store.update(id, input)?;
            report_no_op(changed, id, "edit");
        }
        Command::Confirm { id } => {
            let changed = store.confirm(id)?;
            report_no_op(changed, id, "confirm");
        }
        Command::Delete { id } => {
            let changed = store.delete(id)?;
            report_no_op(changed, id, "delete");
        }
        Command::Export { output, filter } => {
            let path = output.unwrap_or_else(|| config.export_file.clone());
            let filter = ExpenseFilter::from(filter);
            let selected = filter.apply(store.records());
            let written = export::export(&selected, &config.date_format, &path)?;
            println!("Exported {written} expenses to {}", path.display());
        }
        Command::Interactive => session::run(&mut store, config)?,
    }
    Ok(())
}
