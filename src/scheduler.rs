//! Scheduled execution of the sync job.
//!
//! Each run is spawned as its own tokio task and tracked until it finishes,
//! so the process never exits with a sync still in flight. A tick that fires
//! while an earlier run is still going starts another run alongside it.

use crate::config::Config;
use crate::sync::{self, SyncOutcome};
use crate::SyncError;
use colored::Colorize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tokio::time::MissedTickBehavior;

/// Spawn a single sync run and wait for it to finish.
pub async fn run_once(config: Config) -> Result<SyncOutcome, SyncError> {
    let handle = tokio::spawn(async move { sync::run(&config).await });
    handle
        .await
        .map_err(|e| format!("Sync task did not complete: {e}"))?
}

/// Start a sync run every `period` until `shutdown` resolves.
///
/// The first run starts immediately. Failed runs are logged and do not stop
/// the schedule. Once `shutdown` resolves no new run is started and every
/// outstanding run is awaited.
///
/// # Returns
/// The number of runs started.
pub async fn run_every<S>(config: Config, period: Duration, shutdown: S) -> usize
where
    S: Future<Output = ()>,
{
    let config = Arc::new(config);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut jobs: JoinSet<(usize, Result<SyncOutcome, SyncError>)> = JoinSet::new();
    let mut started = 0;

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("Shutdown requested, draining {} sync run(s)", jobs.len());
                break;
            }
            _ = ticker.tick() => {
                started += 1;
                let run_id = started;
                let config = Arc::clone(&config);
                log::debug!("Tick: starting sync run#{run_id}");
                jobs.spawn(async move { (run_id, sync::run(&config).await) });
            }
            Some(joined) = jobs.join_next(), if !jobs.is_empty() => report(joined),
        }
    }

    while let Some(joined) = jobs.join_next().await {
        report(joined);
    }
    started
}

fn report(joined: Result<(usize, Result<SyncOutcome, SyncError>), JoinError>) {
    match joined {
        Ok((run_id, Ok(outcome))) => log::info!("sync run#{run_id}: {outcome}"),
        Ok((run_id, Err(e))) => log::error!(
            "sync run#{run_id} {failed}: {e}",
            failed = "failed".on_red()
        ),
        Err(e) => log::error!("sync run did not complete: {e}"),
    }
}
