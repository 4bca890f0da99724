//! Background worker scheduler for periodic aggregation runs.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;
use tracing::{error, info};

use crate::orchestrator::Aggregator;

/// Worker scheduler configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Interval between aggregation runs
    pub aggregation_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            aggregation_interval: Duration::from_secs(3600), // 1 hour
        }
    }
}

/// Background worker scheduler.
pub struct WorkerScheduler {
    config: WorkerConfig,
    aggregator: Arc<Aggregator>,
}

impl WorkerScheduler {
    pub fn new(config: WorkerConfig, aggregator: Arc<Aggregator>) -> Self {
        Self { config, aggregator }
    }

    /// Starts all background workers.
    pub fn start(self: Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        let mut handles = Vec::new();

        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_aggregation_worker().await;
        }));

        info!("Background workers started");
        handles
    }

    /// Re-aggregates yesterday and today on every tick. Re-runs are
    /// idempotent, so catching late-arriving events is free.
    async fn run_aggregation_worker(&self) {
        let mut ticker = interval(self.config.aggregation_interval);

        loop {
            ticker.tick().await;

            let today = Utc::now().date_naive();
            let yesterday = today - chrono::Duration::days(1);

            for date in [yesterday, today] {
                match self.aggregator.aggregate(date, None).await {
                    Ok(report) => {
                        info!(
                            date = %date,
                            events = report.events_seen,
                            wineries = report.wineries_processed,
                            "Scheduled aggregation run finished"
                        );
                    }
                    Err(e) => {
                        error!(date = %date, "Scheduled aggregation run failed: {}", e);
                    }
                }
            }
        }
    }
}
