//! Notification worker - background delivery loop.
//!
//! The worker polls the database for due jobs, claims a batch with
//! `FOR UPDATE SKIP LOCKED`, and runs one dispatch attempt per claimed job.
//! It owns no delivery state: everything durable lives in the
//! `notification_jobs` and `audit_records` tables, so any number of workers
//! can run against the same database.

use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domains::notifications::activities::dispatch_notification;
use crate::domains::notifications::models::NotificationJob;
use crate::kernel::ServerDeps;

/// Configuration for the notification worker.
#[derive(Debug, Clone)]
pub struct NotificationWorkerConfig {
    /// Maximum number of jobs to claim at once
    pub batch_size: i64,
    /// How long to wait when no jobs are due
    pub poll_interval: Duration,
    /// Worker ID for this instance, for log correlation
    pub worker_id: String,
}

impl Default for NotificationWorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            poll_interval: Duration::from_secs(5),
            worker_id: format!("notifier-{}", Uuid::new_v4()),
        }
    }
}

impl NotificationWorkerConfig {
    /// Create a new config with a specific worker ID.
    pub fn with_worker_id(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            ..Default::default()
        }
    }
}

/// Long-running service that drains the notification queue.
pub struct NotificationWorker {
    deps: ServerDeps,
    config: NotificationWorkerConfig,
}

impl NotificationWorker {
    /// Create a worker with default configuration.
    pub fn new(deps: ServerDeps) -> Self {
        Self {
            deps,
            config: NotificationWorkerConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(deps: ServerDeps, config: NotificationWorkerConfig) -> Self {
        Self { deps, config }
    }

    /// Run until the token is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        info!(
            worker_id = %self.config.worker_id,
            batch_size = self.config.batch_size,
            "notification worker starting"
        );

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            match self.tick().await {
                Ok(0) => {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
                Ok(count) => {
                    debug!(count, "processed notification batch");
                }
                Err(e) => {
                    error!(error = %e, "failed to claim notification jobs");
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(Duration::from_secs(1)) => {}
                    }
                }
            }
        }

        info!(worker_id = %self.config.worker_id, "notification worker stopped");
        Ok(())
    }

    /// Claim one batch of due jobs and dispatch them concurrently.
    ///
    /// Returns the number of jobs claimed. Exposed so tests can drive the
    /// queue without a running loop.
    pub async fn tick(&self) -> Result<usize> {
        let jobs = NotificationJob::claim_due(self.config.batch_size, &self.deps.db_pool).await?;
        if jobs.is_empty() {
            return Ok(0);
        }

        debug!(count = jobs.len(), "claimed notification jobs");

        let mut handles = Vec::with_capacity(jobs.len());
        for job in jobs {
            handles.push(self.process_job(job));
        }
        let count = handles.len();
        futures::future::join_all(handles).await;

        Ok(count)
    }

    /// Dispatch a single claimed job. Outcome logging happens inside the
    /// dispatch action; only bookkeeping errors surface here.
    async fn process_job(&self, job: NotificationJob) {
        let job_id = job.id;
        if let Err(e) = dispatch_notification(job, &self.deps).await {
            error!(job_id = %job_id, error = %e, "notification dispatch errored");
        }
    }
}
