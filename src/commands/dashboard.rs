//! Dashboard and report command handlers.

use crate::aggregate::Summary;
use crate::api::{self, Mode, Store};
use crate::args::DashboardArgs;
use crate::commands::{Out, Snapshot};
use crate::render::RenderContext;
use crate::{Config, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Fetches the transactions and renders the totals, the expense-by-category chart and the
/// transaction table.
///
/// With `--watch` the dashboard is repainted every `refresh_secs` seconds until Ctrl-C. A refresh
/// that fails is logged and the previous view stays on screen.
pub async fn dashboard(config: Config, mode: Mode, args: DashboardArgs) -> Result<Out<Summary>> {
    let mut store = api::store(&config, mode).await?;
    let mut ctx = RenderContext::default();
    let (snapshot, body) = refresh(store.as_mut(), &mut ctx, args.search()).await?;

    if !args.watch() {
        let message = format!("Dashboard built from {} transactions", snapshot.summary.count);
        return Ok(Out::new(message, snapshot.summary).with_body(body));
    }

    paint(&body);
    let period = Duration::from_secs(args.refresh_secs().max(1));
    info!(
        "Refreshing every {}s, press Ctrl-C to stop",
        period.as_secs()
    );
    let summary = watch(
        store.as_mut(),
        &mut ctx,
        args.search(),
        period,
        snapshot.summary,
        tokio::signal::ctrl_c(),
    )
    .await;

    debug!("Destroyed {} charts while watching", ctx.destroyed());
    Ok(Out::new("Stopped watching the dashboard", summary))
}

/// Repaints the dashboard every `period` until `shutdown` completes and returns the last summary
/// that was painted. `shutdown` is polled across refreshes, so a signal that arrives while a
/// refresh is in flight ends the loop as soon as that refresh is done.
async fn watch<F>(
    store: &mut (dyn Store + Send),
    ctx: &mut RenderContext,
    search: Option<&str>,
    period: Duration,
    mut summary: Summary,
    shutdown: F,
) -> Summary
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(shutdown);
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately and the first view is already painted.
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            signal = &mut shutdown => {
                if let Err(e) = signal {
                    error!("Unable to listen for Ctrl-C: {e}");
                }
                break;
            }
            _ = interval.tick() => {
                match refresh(store, ctx, search).await {
                    Ok((snapshot, body)) => {
                        summary = snapshot.summary;
                        paint(&body);
                    }
                    Err(e) => error!("Refresh failed, keeping the previous view: {e:#}"),
                }
            }
        }
    }
    summary
}

/// Fetches the transactions and renders the monthly income vs expense chart and the category
/// breakdown of all transactions.
pub async fn report(config: Config, mode: Mode) -> Result<Out<Summary>> {
    let mut store = api::store(&config, mode).await?;
    let snapshot = Snapshot::fetch(store.as_mut()).await?;
    let body = RenderContext::default().render_report(&snapshot.summary);
    let message = format!(
        "Report covers {} months",
        snapshot.summary.monthly_totals.len()
    );
    Ok(Out::new(message, snapshot.summary).with_body(body))
}

/// Fetches a new snapshot and paints it into `ctx`. On error `ctx` is left untouched.
async fn refresh(
    store: &mut (dyn Store + Send),
    ctx: &mut RenderContext,
    search: Option<&str>,
) -> Result<(Snapshot, String)> {
    let snapshot = Snapshot::fetch(store).await?;
    let body = ctx.render_dashboard(&snapshot.records, &snapshot.summary, search);
    Ok((snapshot, body))
}

fn paint(body: &str) {
    print!("{CLEAR_SCREEN}");
    println!("{body}");
}
