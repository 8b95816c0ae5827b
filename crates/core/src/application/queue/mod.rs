// Queue Coordinator - ordering, claiming and assignment over the storage port

pub mod assign;
pub mod boost;
pub mod claim;
pub mod listing;
pub mod outcome;
pub mod release;

pub use outcome::{AutoAssignment, BoostReport, ClaimError, ClaimResult, RedistributionReport};

use crate::config::QueueConfig;
use crate::domain::{OperatorWorkload, QueueFilter, QueuePage, QueueStats};
use crate::error::Result;
use crate::port::{StoragePort, TimeProvider};
use std::sync::Arc;

/// Queue Coordinator
///
/// Holds no queue state of its own. Every read goes to the storage port and
/// every change is a single-item conditional write, so several coordinators can
/// share one store.
pub struct QueueCoordinator {
    storage: Arc<dyn StoragePort>,
    time_provider: Arc<dyn TimeProvider>,
    config: QueueConfig,
}

impl QueueCoordinator {
    pub fn new(
        storage: Arc<dyn StoragePort>,
        time_provider: Arc<dyn TimeProvider>,
        config: QueueConfig,
    ) -> Self {
        Self {
            storage,
            time_provider,
            config,
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Open items (pending + assigned) of a tenant, urgent first, oldest first
    pub async fn get_queue(&self, client_id: &str, filter: QueueFilter) -> Result<QueuePage> {
        listing::get_queue(self.storage.as_ref(), &self.config, client_id, filter).await
    }

    /// Claim the highest-priority, oldest pending item of a tenant
    pub async fn claim_next(&self, client_id: &str, operator_id: &str) -> Result<ClaimResult> {
        claim::claim_next(
            self.storage.as_ref(),
            self.time_provider.as_ref(),
            client_id,
            operator_id,
        )
        .await
    }

    /// Claim one item by ID (idempotent for the current holder)
    pub async fn claim_specific(&self, item_id: &str, operator_id: &str) -> Result<ClaimResult> {
        claim::claim_specific(
            self.storage.as_ref(),
            self.time_provider.as_ref(),
            item_id,
            operator_id,
        )
        .await
    }

    /// Hand an item back to the queue. Only the current holder may release.
    pub async fn release(&self, item_id: &str, operator_id: &str, reason: &str) -> Result<()> {
        release::release(
            self.storage.as_ref(),
            self.time_provider.as_ref(),
            item_id,
            operator_id,
            reason,
        )
        .await
    }

    pub async fn get_stats(&self, client_id: &str) -> Result<QueueStats> {
        listing::get_stats(self.storage.as_ref(), client_id).await
    }

    pub async fn get_operator_workload(&self, client_id: &str) -> Result<Vec<OperatorWorkload>> {
        listing::get_operator_workload(self.storage.as_ref(), client_id).await
    }

    /// Return every item held by `leaving_operator_id` to pending, in all tenants
    pub async fn redistribute_workload(
        &self,
        leaving_operator_id: &str,
    ) -> Result<RedistributionReport> {
        release::redistribute_workload(
            self.storage.as_ref(),
            self.time_provider.as_ref(),
            leaving_operator_id,
        )
        .await
    }

    /// Assign a pending item to the least-loaded operator with spare capacity
    pub async fn auto_assign(&self, item_id: &str) -> Result<AutoAssignment> {
        assign::auto_assign(self.storage.as_ref(), self.time_provider.as_ref(), item_id).await
    }

    /// Promote pending items that outwaited their priority's threshold, one level each
    pub async fn apply_priority_boosts(&self, client_id: &str) -> Result<BoostReport> {
        boost::apply_priority_boosts(
            self.storage.as_ref(),
            self.time_provider.as_ref(),
            &self.config,
            client_id,
        )
        .await
    }
}
