//! Types that represent the core data model, such as `TransactionRecord` and `MonthKey`.
mod amount;
mod month;
mod transaction;

pub use amount::{Amount, AmountError};
pub use month::MonthKey;
pub use transaction::{NewTransaction, RecordId, TransactionRecord, TransactionType};
