//! Boost Scheduler - periodic priority promotion
//!
//! The coordinator never schedules anything itself; this loop is the external
//! trigger that calls `apply_priority_boosts` for a fixed set of tenants.

use crate::application::queue::QueueCoordinator;
use crate::application::shutdown::ShutdownToken;
use crate::domain::ClientId;
use crate::error::{AppError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// Runs boost passes on a fixed interval until shutdown
pub struct BoostScheduler {
    coordinator: Arc<QueueCoordinator>,
    client_ids: Vec<ClientId>,
    interval: Duration,
}

impl BoostScheduler {
    /// Create a new boost scheduler
    ///
    /// # Arguments
    /// * `coordinator` - Shared queue coordinator
    /// * `client_ids` - Tenants swept on every tick
    /// * `interval` - Time between passes, must be non-zero
    pub fn new(
        coordinator: Arc<QueueCoordinator>,
        client_ids: Vec<ClientId>,
        interval: Duration,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(AppError::Config("boost interval must be non-zero".to_string()));
        }

        Ok(Self {
            coordinator,
            client_ids,
            interval,
        })
    }

    /// Scheduler ticking at the coordinator's configured `boost_interval_secs`
    pub fn from_config(
        coordinator: Arc<QueueCoordinator>,
        client_ids: Vec<ClientId>,
    ) -> Result<Self> {
        let interval = coordinator.config().boost_interval();
        Self::new(coordinator, client_ids, interval)
    }

    /// Run the boost loop (background task)
    ///
    /// First pass runs immediately. Should be spawned in tokio::spawn.
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            tenants = self.client_ids.len(),
            "Boost scheduler started"
        );

        let mut tick = interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.run_once().await;
                }
                _ = shutdown.wait() => {
                    info!("Boost scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// One pass over every tenant. A failing tenant does not stop the others.
    ///
    /// Returns the number of items promoted, including promotions applied by a
    /// pass that aborted partway.
    pub async fn run_once(&self) -> usize {
        let mut total = 0;

        for client_id in &self.client_ids {
            match self.coordinator.apply_priority_boosts(client_id).await {
                Ok(report) => {
                    total += report.boosted_count;
                    debug!(
                        client_id = %client_id,
                        boosted_count = report.boosted_count,
                        "Boost pass finished"
                    );
                }
                Err(AppError::BatchAborted {
                    completed,
                    item_id,
                    reason,
                }) => {
                    total += completed;
                    error!(
                        client_id = %client_id,
                        completed = completed,
                        item_id = %item_id,
                        reason = %reason,
                        "Boost pass aborted"
                    );
                }
                Err(e) => {
                    error!(client_id = %client_id, error = ?e, "Boost pass failed");
                }
            }
        }

        if total > 0 {
            info!(boosted = total, "Scheduled boost pass promoted items");
        }
        total
    }
}
