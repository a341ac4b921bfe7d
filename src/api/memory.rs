//! Implements the `Store` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a transactions server. State lives in a process-wide registry keyed
//! by the API URL, so separate `MemoryStore` instances for the same URL see the same records.

use crate::api::Store;
use crate::error::{ErrorType, IntoResult};
use crate::model::{NewTransaction, RecordId, TransactionRecord};
use crate::Result;
use anyhow::{anyhow, Context};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tracing::{debug, error};
use uuid::Uuid;

static STATES: LazyLock<Mutex<HashMap<String, Vec<TransactionRecord>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// An implementation of the `Store` trait that does not use the network.
pub(crate) struct MemoryStore {
    key: String,
}

impl MemoryStore {
    /// Creates a store for `key`. The first store created for a key is seeded with sample data.
    pub(crate) fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let mut states = lock();
        states.entry(key.clone()).or_insert_with(seed_data);
        Self { key }
    }

    /// Returns a copy of the records currently held for this store's key.
    pub(crate) fn get_state(&self) -> Vec<TransactionRecord> {
        lock().get(&self.key).cloned().unwrap_or_default()
    }

    /// Replaces the records held for this store's key.
    pub(crate) fn set_state(&self, records: Vec<TransactionRecord>) {
        lock().insert(self.key.clone(), records);
    }
}

/// A poisoned lock only means another test panicked mid-update; the data is still usable.
fn lock() -> MutexGuard<'static, HashMap<String, Vec<TransactionRecord>>> {
    STATES.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn list(&mut self) -> Result<Vec<TransactionRecord>> {
        Ok(self.get_state())
    }

    async fn create(&mut self, transaction: &NewTransaction) -> Result<TransactionRecord> {
        let id = RecordId::new(Uuid::new_v4().simple().to_string());
        let record = transaction.clone().into_record(id);
        lock()
            .entry(self.key.clone())
            .or_default()
            .push(record.clone());
        debug!("Created in-memory transaction {}", record.id());
        Ok(record)
    }

    async fn delete(&mut self, id: &RecordId) -> Result<()> {
        let mut states = lock();
        let records = states.entry(self.key.clone()).or_default();
        let Some(ix) = records.iter().position(|r| r.id() == id) else {
            return Err(anyhow!("Transaction not found: {id}")).pub_result(ErrorType::Store);
        };
        let _ = records.remove(ix);
        Ok(())
    }
}

/// Loads records from a CSV-formatted string with a header row.
fn load_csv(csv_data: &str) -> Result<Vec<TransactionRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(csv_data.as_bytes()));
    let mut records = Vec::new();
    for (ix, result) in rdr.deserialize().enumerate() {
        let record: TransactionRecord =
            result.with_context(|| format!("Bad seed transaction at row {}", ix + 2))?;
        records.push(record);
    }
    Ok(records)
}

fn seed_data() -> Vec<TransactionRecord> {
    match load_csv(SEED_DATA) {
        Ok(records) => records,
        Err(e) => {
            error!("Unable to load the seed transactions: {e:#}");
            Vec::new()
        }
    }
}

/// Seed transaction data.
const SEED_DATA: &str = r##"id,date,type,category,amount,note
1,2025-08-01,income,Salary,4200.00,August paycheck
2,2025-08-03,expense,Rent,1650.00,
3,2025-08-09,expense,Groceries,87.43,Whole Foods
4,2025-08-14,expense,Coffee,6.75,
5,2025-08-21,expense,Utilities,142.67,Electric bill
6,2025-09-01,income,Salary,4200.00,September paycheck
7,2025-09-02,expense,Rent,1650.00,
8,2025-09-06,expense,Groceries,63.21,Trader Joe's
9,2025-09-12,expense,Transport,52.30,Gas
10,2025-09-19,income,Freelance,350.00,Logo design
11,2025-09-27,expense,Dining,42.30,Dinner out
12,2025-10-01,income,Salary,4200.00,October paycheck
13,2025-10-03,expense,Rent,1650.00,
14,2025-10-10,expense,Groceries,95.82,
15,2025-10-11,expense,Utilities,89.99,Internet
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, TransactionType};
    use std::str::FromStr;

    fn unique_key() -> String {
        format!("memory://{}", Uuid::new_v4())
    }

    #[test]
    fn test_seed_data_parses() {
        let records = load_csv(SEED_DATA).unwrap();
        assert_eq!(records.len(), 15);
        assert_eq!(records[0].id().as_str(), "1");
        assert!(records[0].transaction_type().is_income());
        assert_eq!(records[1].note(), None);
        assert_eq!(records[2].note(), Some("Whole Foods"));
        assert_eq!(
            records[2].amount().value(),
            rust_decimal::Decimal::from_str("87.43").unwrap()
        );
    }

    #[tokio::test]
    async fn test_new_store_is_seeded() {
        let mut store = MemoryStore::new(unique_key());
        assert_eq!(store.list().await.unwrap().len(), 15);
    }

    #[tokio::test]
    async fn test_stores_share_state_by_key() {
        let key = unique_key();
        let mut a = MemoryStore::new(key.clone());
        a.set_state(Vec::new());
        let created = a
            .create(&NewTransaction::new(
                Amount::from_str("5").unwrap(),
                TransactionType::Expense,
                "Coffee",
                "2025-10-12",
                "",
            ))
            .await
            .unwrap();
        let mut b = MemoryStore::new(key);
        let listed = b.list().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_delete_removes_only_matching_record() {
        let mut store = MemoryStore::new(unique_key());
        let before = store.list().await.unwrap();
        store.delete(&RecordId::new("3")).await.unwrap();
        let after = store.list().await.unwrap();
        assert_eq!(after.len(), before.len() - 1);
        assert!(after.iter().all(|r| r.id().as_str() != "3"));
        let expected: Vec<_> = before
            .into_iter()
            .filter(|r| r.id().as_str() != "3")
            .collect();
        assert_eq!(after, expected);
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let mut store = MemoryStore::new(unique_key());
        let err = store.delete(&RecordId::new("nope")).await.unwrap_err();
        assert!(err.to_string().contains("Transaction not found"));
        assert_eq!(ErrorType::of(&err), Some(ErrorType::Store));
        assert_eq!(store.list().await.unwrap().len(), 15);
    }
}
