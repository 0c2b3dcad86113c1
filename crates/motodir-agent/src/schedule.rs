//! Resident mode: one crawl run per cron tick.

use std::sync::Arc;

use motodir_core::AppConfig;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::commands;

/// Register the crawl job on `config.agent_cron`, start the scheduler, and
/// block until Ctrl-C.
///
/// Runs never overlap: a tick that fires while the previous run still holds
/// the lock is skipped, since both would read and write the same state file.
pub(crate) async fn run_scheduled(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let mut scheduler = JobScheduler::new().await?;
    let running = Arc::new(Mutex::new(()));
    let cron = config.agent_cron.clone();

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let config = Arc::clone(&config);
        let running = Arc::clone(&running);

        Box::pin(async move {
            let Ok(_guard) = running.try_lock() else {
                tracing::warn!("scheduler: previous crawl run still in progress; skipping tick");
                return;
            };
            tracing::info!("scheduler: starting crawl run");
            match commands::run(&config).await {
                Ok(summary) => tracing::info!(
                    added = summary.added,
                    next_index = summary.state.current_city_index,
                    "scheduler: crawl run complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: crawl run failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(cron = %cron, "scheduler started");

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal, stopping scheduler");
    scheduler.shutdown().await?;
    Ok(())
}
