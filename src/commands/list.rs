//! List command handler.

use crate::api::{self, Mode};
use crate::args::ListArgs;
use crate::commands::{Out, Snapshot};
use crate::model::TransactionRecord;
use crate::render::{record_matches, render_records};
use crate::utils::plural;
use crate::{Config, Result};

/// Fetches the transactions and renders them as a table, filtered by `args.search()`.
///
/// The structured output holds only the records that matched the search.
pub async fn list(
    config: Config,
    mode: Mode,
    args: ListArgs,
) -> Result<Out<Vec<TransactionRecord>>> {
    let mut store = api::store(&config, mode).await?;
    let snapshot = Snapshot::fetch(store.as_mut()).await?;
    let body = render_records(&snapshot.records, args.search());

    let matched: Vec<TransactionRecord> = match args.search() {
        Some(search) => snapshot
            .records
            .into_iter()
            .filter(|r| record_matches(r, search))
            .collect(),
        None => snapshot.records,
    };
    let message = format!("Listed {}", plural(matched.len(), "transaction"));
    Ok(Out::new(message, matched).with_body(body))
}
