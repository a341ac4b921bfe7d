//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::MemoryStore;
use crate::model::{Amount, TransactionRecord, TransactionType};
use crate::Config;
use std::str::FromStr;
use tempfile::TempDir;
use uuid::Uuid;

/// Test environment with a `Config` whose API URL is unique to this environment, so that the
/// in-memory store state it sees is not shared with any other test.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment whose in-memory store holds the seed data.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("ledgerview");
        let rand = Uuid::new_v4().simple().to_string();
        let api_url = format!("http://{rand}.test/api/transactions");
        let config = Config::create(&root, &api_url, None).await.unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Creates a test environment whose in-memory store starts with exactly `records`.
    pub async fn with_records(records: Vec<TransactionRecord>) -> Self {
        let env = Self::new().await;
        env.set_state(records);
        env
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    fn store(&self) -> MemoryStore {
        MemoryStore::new(self.config.api_url().as_str())
    }

    /// Gets the records currently held by the in-memory store for this environment.
    pub fn get_state(&self) -> Vec<TransactionRecord> {
        self.store().get_state()
    }

    /// Sets the records held by the in-memory store for this environment.
    pub fn set_state(&self, records: Vec<TransactionRecord>) {
        self.store().set_state(records)
    }
}

/// The three-record example used throughout the tests: one income in January and two food
/// expenses spread over January and February.
pub fn scenario_records() -> Vec<TransactionRecord> {
    vec![
        TransactionRecord::new(
            "1",
            Amount::from_str("50").unwrap(),
            TransactionType::Income,
            "",
            "2024-01-05",
        ),
        TransactionRecord::new(
            "2",
            Amount::from_str("20").unwrap(),
            TransactionType::Expense,
            "food",
            "2024-01-10",
        ),
        TransactionRecord::new(
            "3",
            Amount::from_str("10").unwrap(),
            TransactionType::Expense,
            "food",
            "2024-02-01",
        ),
    ]
}
