//! Delete command handler.

use crate::api::{self, Mode};
use crate::args::DeleteArgs;
use crate::commands::{Mutation, Out, Snapshot};
use crate::error::{ErrorType, IntoResult};
use crate::model::RecordId;
use crate::render::RenderContext;
use crate::utils::plural;
use crate::{Config, Result};
use tracing::debug;

/// Deletes one or more transactions by id, then fetches the full list again and renders the
/// dashboard from it.
///
/// Ids are deleted one request at a time in the order given. The first failure stops the command;
/// transactions deleted before it stay deleted.
pub async fn delete(config: Config, mode: Mode, args: DeleteArgs) -> Result<Out<Mutation>> {
    let mut store = api::store(&config, mode).await?;

    let mut deleted = Vec::with_capacity(args.ids().len());
    for id in args.ids() {
        let id = RecordId::new(id.trim());
        store.delete(&id).await.pub_result(ErrorType::Store)?;
        debug!("Deleted transaction {id}");
        deleted.push(id);
    }

    let snapshot = Snapshot::fetch(store.as_mut()).await?;
    let body =
        RenderContext::default().render_dashboard(&snapshot.records, &snapshot.summary, None);
    let message = format!("Deleted {}", plural(deleted.len(), "transaction"));
    Ok(Out::new(
        message,
        Mutation {
            ids: deleted,
            snapshot,
        },
    )
    .with_body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{scenario_records, TestEnv};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_delete_exactly_one() {
        let env = TestEnv::with_records(scenario_records()).await;
        let out = delete(env.config(), Mode::Test, DeleteArgs::new(["2"]))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 1 transaction");

        let mutation = out.structure().unwrap();
        let ids: Vec<&str> = mutation
            .snapshot
            .records
            .iter()
            .map(|r| r.id().as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(
            mutation.snapshot.summary.totals.expense,
            Decimal::from_str("10").unwrap()
        );
        assert_eq!(env.get_state().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_multiple() {
        let env = TestEnv::with_records(scenario_records()).await;
        let out = delete(env.config(), Mode::Test, DeleteArgs::new(["1", "3"]))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 2 transactions");
        let state = env.get_state();
        assert_eq!(state.len(), 1);
        assert_eq!(state[0].id().as_str(), "2");
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let env = TestEnv::with_records(scenario_records()).await;
        let result = delete(env.config(), Mode::Test, DeleteArgs::new(["99"])).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Transaction not found"));
        assert_eq!(ErrorType::of(&err), Some(ErrorType::Store));
        assert_eq!(env.get_state().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_stops_at_first_failure() {
        let env = TestEnv::with_records(scenario_records()).await;
        let result = delete(env.config(), Mode::Test, DeleteArgs::new(["1", "99", "3"])).await;
        assert!(result.is_err());
        let ids: Vec<String> = env
            .get_state()
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["2".to_string(), "3".to_string()]);
    }
}
