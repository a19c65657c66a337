//! These structs provide the CLI interface for the expenses CLI.

use crate::advice::Provider;
use crate::model::{Amount, Category, ExpensePatch, LimitPatch, Period};
use crate::notify::ReadFilter;
use crate::search::ExpenseQuery;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: A command-line tool for tracking personal spending.
///
/// Record what you spend, set spending limits per category, and see where your money goes. When
/// spending gets close to or exceeds a limit, a notification is recorded (at most once a day for
/// each category).
///
/// Data is kept in a single directory (see --expenses-home) that belongs to one user. Start by
/// running `expenses init`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the user profile.
    ///
    /// This is the first command you should run. Decide what directory you want to store data in
    /// and pass it as --expenses-home. By default, it will be $HOME/expenses.
    Init(InitArgs),
    /// Add, change, remove or search expenses.
    #[command(subcommand)]
    Expense(ExpenseCommand),
    /// Add, change, remove or list spending limits.
    #[command(subcommand)]
    Limit(LimitCommand),
    /// Show or change your name, email and monthly budget.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Show this month's totals, trends and limit progress.
    Dashboard,
    /// List notifications or mark them as read.
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// Write your data to a JSON or CSV file.
    #[command(subcommand)]
    Export(ExportCommand),
    /// Read a receipt image and propose an expense.
    Scan(ScanArgs),
    /// Ask the AI assistant for advice about your spending.
    Advise(AdviseArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where expense data and configuration is held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_expenses_home())]
    expenses_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, expenses_home: PathBuf) -> Self {
        Self {
            log_level,
            expenses_home: expenses_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expenses_home(&self) -> &DisplayPath {
        &self.expenses_home
    }
}

/// (Not shown): Args for the `expenses init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Your name.
    #[arg(long)]
    name: String,

    /// Your email address.
    #[arg(long)]
    email: String,

    /// Your monthly budget. Defaults to 2000.
    #[arg(long)]
    monthly_budget: Option<Amount>,

    /// Which AI provider `expenses advise` talks to: openrouter, groq, openai or cursor.
    #[arg(long, default_value_t = Provider::default())]
    provider: Provider,

    /// The model to request from the provider. Each provider has a default.
    #[arg(long)]
    model: Option<String>,

    /// The base URL of an OpenAI-compatible server. Only used by the cursor provider.
    #[arg(long)]
    base_url: Option<String>,
}

impl InitArgs {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            monthly_budget: None,
            provider: Provider::default(),
            model: None,
            base_url: None,
        }
    }

    pub fn with_monthly_budget(mut self, monthly_budget: Amount) -> Self {
        self.monthly_budget = Some(monthly_budget);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn monthly_budget(&self) -> Option<Amount> {
        self.monthly_budget
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Print the profile.
    Show,
    /// Change one or more profile fields.
    Update(UpdateProfileArgs),
}

/// (Not shown): Args for the `expenses profile update` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct UpdateProfileArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Must be greater than zero.
    #[arg(long)]
    pub monthly_budget: Option<Amount>,
}

impl UpdateProfileArgs {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.monthly_budget.is_none()
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ExpenseCommand {
    /// Record a new expense.
    Add(AddExpenseArgs),
    /// Change fields of an existing expense.
    Update(UpdateExpenseArgs),
    /// Remove an expense.
    Delete(IdArgs),
    /// Find expenses by text, category, date or amount.
    Search(SearchArgs),
}

/// (Not shown): Args for the `expenses expense add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddExpenseArgs {
    /// How much was spent, e.g. 45.67 or $1,234.50
    #[arg(long)]
    pub amount: Amount,

    /// The category name or slug, e.g. "Food & Dining" or food-dining
    #[arg(long)]
    pub category: Category,

    /// What the money was spent on.
    #[arg(long)]
    pub description: String,

    /// The date of the expense as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// A link to an image of the receipt.
    #[arg(long)]
    pub receipt_url: Option<String>,
}

/// (Not shown): Args for the `expenses expense update` command.
#[derive(Debug, Parser, Clone)]
pub struct UpdateExpenseArgs {
    /// The id of the expense to change.
    pub id: String,

    #[arg(long)]
    pub amount: Option<Amount>,

    #[arg(long)]
    pub category: Option<Category>,

    #[arg(long)]
    pub description: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub receipt_url: Option<String>,
}

impl UpdateExpenseArgs {
    pub fn patch(&self) -> ExpensePatch {
        ExpensePatch {
            amount: self.amount,
            category: self.category,
            description: self.description.clone(),
            date: self.date,
            receipt_url: self.receipt_url.clone(),
        }
    }
}

/// (Not shown): Args for commands that take a single record id.
#[derive(Debug, Parser, Clone)]
pub struct IdArgs {
    /// The id of the record.
    id: String,
}

impl IdArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// (Not shown): Args for the `expenses expense search` command, also used to filter CSV exports.
#[derive(Debug, Parser, Clone, Default)]
pub struct SearchArgs {
    /// Text to look for in the description or category name, ignoring case.
    #[arg(long)]
    pub term: Option<String>,

    /// Only this category.
    #[arg(long)]
    pub category: Option<Category>,

    /// Earliest date, inclusive, as YYYY-MM-DD.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest date, inclusive, as YYYY-MM-DD.
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Smallest amount, inclusive.
    #[arg(long)]
    pub min_amount: Option<Amount>,

    /// Largest amount, inclusive.
    #[arg(long)]
    pub max_amount: Option<Amount>,
}

impl SearchArgs {
    pub fn query(&self) -> ExpenseQuery {
        ExpenseQuery {
            term: self.term.clone(),
            category: self.category,
            from: self.from,
            to: self.to,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum LimitCommand {
    /// Set a spending limit for a category.
    Add(AddLimitArgs),
    /// Change an existing limit.
    Update(UpdateLimitArgs),
    /// Remove a limit.
    Delete(IdArgs),
    /// List limits with this month's progress.
    List,
}

/// (Not shown): Args for the `expenses limit add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddLimitArgs {
    /// The category name or slug.
    #[arg(long)]
    pub category: Category,

    /// The most you want to spend. Must be greater than zero.
    #[arg(long)]
    pub amount: Amount,

    /// weekly or monthly
    #[arg(long, default_value_t = Period::default())]
    pub period: Period,
}

/// (Not shown): Args for the `expenses limit update` command.
#[derive(Debug, Parser, Clone)]
pub struct UpdateLimitArgs {
    /// The id of the limit to change.
    pub id: String,

    #[arg(long)]
    pub category: Option<Category>,

    #[arg(long)]
    pub amount: Option<Amount>,

    #[arg(long)]
    pub period: Option<Period>,
}

impl UpdateLimitArgs {
    pub fn patch(&self) -> LimitPatch {
        LimitPatch {
            category: self.category,
            amount: self.amount,
            period: self.period,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum NotificationsCommand {
    /// List notifications, newest first.
    List(ListNotificationsArgs),
    /// Mark one notification as read.
    Read(IdArgs),
    /// Mark every notification as read.
    ReadAll,
}

/// (Not shown): Args for the `expenses notifications list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListNotificationsArgs {
    /// Which notifications to show.
    #[arg(long, value_enum, default_value_t = ReadFilter::All)]
    filter: ReadFilter,
}

impl ListNotificationsArgs {
    pub fn new(filter: ReadFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> ReadFilter {
        self.filter
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ExportCommand {
    /// Write your profile, every expense and a summary as JSON.
    Json(ExportJsonArgs),
    /// Write expenses as CSV, optionally filtered.
    Csv(ExportCsvArgs),
}

/// (Not shown): Args for the `expenses export json` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ExportJsonArgs {
    /// Where to write the file. Defaults to expense_data_YYYY-MM-DD.json in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

impl ExportJsonArgs {
    pub fn new(out: Option<PathBuf>) -> Self {
        Self { out }
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }
}

/// (Not shown): Args for the `expenses export csv` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ExportCsvArgs {
    /// Where to write the file. Defaults to expenses_YYYY-MM-DD.csv in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    #[clap(flatten)]
    filter: SearchArgs,
}

impl ExportCsvArgs {
    pub fn new(out: Option<PathBuf>, filter: SearchArgs) -> Self {
        Self { out, filter }
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }

    pub fn filter(&self) -> &SearchArgs {
        &self.filter
    }
}

/// (Not shown): Args for the `expenses scan` command.
#[derive(Debug, Parser, Clone)]
pub struct ScanArgs {
    /// The receipt image: PNG, JPEG, GIF, WEBP or BMP.
    image: PathBuf,

    /// Record the scanned receipt as an expense instead of only showing it.
    #[arg(long)]
    save: bool,

    /// How long the simulated scan takes, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,
}

impl ScanArgs {
    pub fn new(image: impl Into<PathBuf>, save: bool, delay_ms: u64) -> Self {
        Self {
            image: image.into(),
            save,
            delay_ms,
        }
    }

    pub fn image(&self) -> &Path {
        &self.image
    }

    pub fn save(&self) -> bool {
        self.save
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

/// (Not shown): Args for the `expenses advise` command.
#[derive(Debug, Parser, Clone)]
pub struct AdviseArgs {
    /// Your question, e.g. "How can I spend less on food?"
    #[arg(required = true)]
    question: Vec<String>,

    /// The API key of the configured provider. Falls back to the provider's own environment
    /// variable, e.g. OPENROUTER_API_KEY. It is never written to disk.
    #[arg(long, env = "EXPENSES_AI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Give up on the provider after this many seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

impl AdviseArgs {
    pub fn question(&self) -> String {
        self.question.join(" ")
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

fn default_expenses_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expenses-home or EXPENSES_HOME instead of relying on the \
                default expenses home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
