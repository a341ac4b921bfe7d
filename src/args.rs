//! These structs provide the CLI interface for the ledgerview CLI.

use crate::model::{Amount, TransactionType};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// ledgerview: A terminal dashboard for your income and expenses.
///
/// The purpose of this program is to fetch your transactions from a transactions REST API and show
/// running totals, spending by category and month-by-month income against expense. You can also
/// add and delete transactions; after every change the full list is fetched again.
///
/// Point it at your API once with `ledgerview init --api-url <URL>`, or pass --api-url (or set
/// LEDGERVIEW_API_URL) on every call.
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
    /// Create the ledgerview home directory and its config.json.
    ///
    /// The config file records the base URL of the transactions collection, e.g.
    /// http://localhost:5000/api/transactions. Transactions are listed with GET on that URL,
    /// created with POST to it and deleted with DELETE on {URL}/{id}.
    Init(InitArgs),
    /// Print the transaction table.
    List(ListArgs),
    /// Add a transaction, then show the refreshed dashboard.
    Add(AddArgs),
    /// Delete one or more transactions by id, then show the refreshed dashboard.
    Delete(DeleteArgs),
    /// Show totals, expenses by category and the transaction table.
    Dashboard(DashboardArgs),
    /// Show monthly income vs expense and a category breakdown of all transactions.
    Report,
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

    /// The directory where the ledgerview configuration is held. Defaults to ~/ledgerview
    #[arg(long, env = "LEDGERVIEW_HOME", default_value_t = default_home())]
    home: DisplayPath,

    /// The base URL of the transactions API. Overrides the value in config.json.
    #[arg(long, env = "LEDGERVIEW_API_URL")]
    api_url: Option<String>,

    /// Print structured output as JSON instead of the rendered view.
    #[arg(long)]
    json: bool,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
            api_url: None,
            json: false,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }

    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// (Not shown): Args for the `ledgerview init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the transactions collection, e.g.
    /// http://localhost:5000/api/transactions
    #[arg(long)]
    api_url: String,

    /// Seconds to wait for each API request before giving up.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>, timeout_secs: Option<u64>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_secs,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.timeout_secs
    }
}

/// (Not shown): Args for the `ledgerview list` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ListArgs {
    /// Only show rows containing this text (case-insensitive).
    #[arg(long, short)]
    search: Option<String>,
}

impl ListArgs {
    pub fn new(search: Option<String>) -> Self {
        Self { search }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

/// (Not shown): Args for the `ledgerview add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The amount of money moved. The sign is ignored; use --type to say which way it went.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) amount: Amount,

    /// Whether the money came in or went out.
    #[arg(long = "type", value_enum)]
    pub(crate) transaction_type: TransactionType,

    /// The date of the transaction, e.g. 2025-10-12.
    #[arg(long)]
    pub(crate) date: String,

    /// The spending category. Only meaningful for expenses.
    #[arg(long)]
    pub(crate) category: Option<String>,

    /// A free-form note.
    #[arg(long)]
    pub(crate) note: Option<String>,
}

impl AddArgs {
    pub fn new(
        amount: Amount,
        transaction_type: TransactionType,
        date: impl Into<String>,
        category: Option<String>,
        note: Option<String>,
    ) -> Self {
        Self {
            amount,
            transaction_type,
            date: date.into(),
            category,
            note,
        }
    }
}

/// (Not shown): Args for the `ledgerview delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ids of the transactions to delete, as shown by `ledgerview list`.
    #[arg(required = true, num_args = 1..)]
    ids: Vec<String>,
}

impl DeleteArgs {
    pub fn new<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// (Not shown): Args for the `ledgerview dashboard` command.
#[derive(Debug, Parser, Clone)]
pub struct DashboardArgs {
    /// Only show table rows containing this text (case-insensitive). Totals and charts always
    /// cover every transaction.
    #[arg(long, short)]
    search: Option<String>,

    /// Keep the dashboard open and refresh it periodically until Ctrl-C.
    #[arg(long)]
    watch: bool,

    /// Seconds between refreshes in --watch mode.
    #[arg(long, default_value_t = 30)]
    refresh_secs: u64,
}

impl DashboardArgs {
    pub fn new(search: Option<String>, watch: bool, refresh_secs: u64) -> Self {
        Self {
            search,
            watch,
            refresh_secs,
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn watch(&self) -> bool {
        self.watch
    }

    pub fn refresh_secs(&self) -> u64 {
        self.refresh_secs
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("ledgerview"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or LEDGERVIEW_HOME instead of relying on the default \
                home directory.",
            );
            PathBuf::from("ledgerview")
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
    pub fn path(&self) -> &Path {
        &self.0
    }
}
