//! Command handlers for the ledgerview CLI.
//!
//! This module contains implementations for all CLI subcommands. Handlers that change data follow
//! one pattern: perform the mutation, then fetch the whole snapshot again and render from that.
//! Nothing is merged into a previously fetched list.

mod add;
mod dashboard;
mod delete;
mod init;
mod list;

use crate::aggregate::Summary;
use crate::api::Store;
use crate::error::{ErrorType, IntoResult};
use crate::model::{RecordId, TransactionRecord};
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use dashboard::{dashboard, report};
pub use delete::delete;
pub use init::init;
pub use list::list;

/// The output type for a command. This allows the command to return a consistent message, a
/// rendered view for the terminal and, optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// The rendered text view, if the command produces one.
    #[serde(skip)]
    body: Option<String>,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            body: None,
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            body: None,
            structure: None,
        }
    }

    /// Attach the rendered view.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the rendered view.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!`. When `json` is set, the structured data (if it exists) goes
    /// to stdout as JSON; otherwise the rendered view (if it exists) goes to stdout and the
    /// structured data to `debug!`.
    pub fn print(&self, json: bool) {
        info!("{}", self.message);
        match (json, self.structure(), self.body()) {
            (true, Some(structure), _) => match serde_json::to_string_pretty(structure) {
                Ok(s) => println!("{s}"),
                Err(e) => tracing::error!("Unable to serialize command output: {e}"),
            },
            (false, structure, body) => {
                if let Some(body) = body {
                    println!("{body}");
                }
                if let Some(structure) = structure {
                    if let Ok(json) = serde_json::to_string_pretty(structure) {
                        debug!("Command output:\n\n{json}\n\n");
                    }
                }
            }
            (true, None, _) => {}
        }
    }
}

/// A full list of transactions as fetched at one point in time, with its derived views.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub records: Vec<TransactionRecord>,
    pub summary: Summary,
}

impl Snapshot {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        let summary = Summary::new(&records);
        Self { records, summary }
    }

    /// Fetches the whole transaction list from `store` and aggregates it.
    pub async fn fetch(store: &mut (dyn Store + Send)) -> Result<Self> {
        let records = store.list().await.pub_result(ErrorType::Network)?;
        debug!("Snapshot has {} transactions", records.len());
        Ok(Self::new(records))
    }
}

/// The structured output of a mutating command: the ids it touched and the snapshot fetched
/// afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Mutation {
    pub ids: Vec<RecordId>,
    pub snapshot: Snapshot,
}
