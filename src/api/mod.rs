//! Access to the remote transactions collection.
//!
//! The `Store` trait is the only thing the rest of the crate talks to. `HttpStore` implements it
//! against the real REST API and `MemoryStore` implements it in memory so that the whole app can
//! run, top-to-bottom, without a server.

mod http;
mod memory;

use crate::model::{NewTransaction, RecordId, TransactionRecord};
use crate::{Config, Result};
use tracing::debug;

pub(crate) use http::HttpStore;
pub(crate) use memory::MemoryStore;

/// When this environment variable is set and non-empty, `Mode::from_env` returns `Mode::Test`.
const TEST_MODE_ENV: &str = "LEDGERVIEW_IN_TEST_MODE";

/// CRUD access to the transactions collection.
#[async_trait::async_trait]
pub trait Store {
    /// Fetches the full snapshot of transactions.
    async fn list(&mut self) -> Result<Vec<TransactionRecord>>;

    /// Creates a transaction and returns it as stored, including its new id.
    async fn create(&mut self, transaction: &NewTransaction) -> Result<TransactionRecord>;

    /// Deletes the transaction with `id`.
    async fn delete(&mut self, id: &RecordId) -> Result<()>;
}

/// Selects which `Store` implementation `store` builds.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Talk to the configured API over HTTP.
    #[default]
    Http,
    /// Use in-memory data seeded with sample transactions.
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(s) if !s.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Builds the `Store` for `mode`.
pub async fn store(config: &Config, mode: Mode) -> Result<Box<dyn Store + Send>> {
    debug!("Creating {mode:?} store for {}", config.api_url());
    Ok(match mode {
        Mode::Http => Box::new(HttpStore::new(config)?),
        Mode::Test => Box::new(MemoryStore::new(config.api_url().as_str())),
    })
}
