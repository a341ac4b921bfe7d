//! Add command handler.

use crate::api::{self, Mode};
use crate::args::AddArgs;
use crate::commands::{Mutation, Out, Snapshot};
use crate::error::{ErrorType, IntoResult};
use crate::model::{MonthKey, NewTransaction};
use crate::render::RenderContext;
use crate::{Config, Result};
use tracing::warn;

/// Creates a transaction through the API, then fetches the full list again and renders the
/// dashboard from it.
///
/// # Arguments
///
/// - `config` - The application configuration holding the API URL.
/// - `mode` - Whether to use the HTTP API or the in-memory store.
/// - `args` - The transaction data. `amount`, `type` and `date` are required; `category` and
///   `note` default to empty.
///
/// # Returns
///
/// On success, returns an `Out` containing the id assigned by the server and the refreshed
/// snapshot.
///
/// # Errors
///
/// - Returns an error if the create request fails.
/// - Returns an error if the snapshot cannot be fetched afterwards.
pub async fn add(config: Config, mode: Mode, args: AddArgs) -> Result<Out<Mutation>> {
    let transaction = NewTransaction::new(
        args.amount,
        args.transaction_type,
        args.category.unwrap_or_default(),
        args.date,
        args.note.unwrap_or_default(),
    );
    if MonthKey::from_date_str(&transaction.date).is_none() {
        warn!(
            "The date '{}' is not recognized, this transaction will not appear in monthly totals",
            transaction.date
        );
    }

    let mut store = api::store(&config, mode).await?;
    let created = store
        .create(&transaction)
        .await
        .pub_result(ErrorType::Network)?;

    let snapshot = Snapshot::fetch(store.as_mut()).await?;
    let body =
        RenderContext::default().render_dashboard(&snapshot.records, &snapshot.summary, None);
    let message = format!(
        "Added {} of {} as transaction {}",
        created.transaction_type(),
        created.amount(),
        created.id()
    );
    Ok(Out::new(
        message,
        Mutation {
            ids: vec![created.id().clone()],
            snapshot,
        },
    )
    .with_body(body))
}
