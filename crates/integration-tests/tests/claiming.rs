//! Claim semantics, including lost races on the conditional write

mod common;

use async_trait::async_trait;
use common::{Harness, MINUTE, T0};
use futures::future::join_all;
use handoff_core::application::ClaimError;
use handoff_core::domain::{ItemPatch, ItemStatus, OperatorWorkload, Priority, QueueItem};
use handoff_core::error::Result;
use handoff_core::port::time_provider::mocks::MockTimeProvider;
use handoff_core::port::{QueryPage, QueueQuery, StoragePort, StorageStats};
use handoff_core::{QueueConfig, QueueCoordinator};
use handoff_infra_memory::InMemoryStorage;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_claim_next_takes_most_urgent_oldest() {
    let h = Harness::new();
    h.seed("medium-old", "acme", Priority::Medium, 90).await;
    h.seed("urgent-new", "acme", Priority::Urgent, 1).await;
    h.seed("urgent-old", "acme", Priority::Urgent, 3).await;

    let result = h.coordinator.claim_next("acme", "op-1").await.unwrap();

    assert!(result.success);
    let item = result.item.unwrap();
    assert_eq!(item.id, "urgent-old");
    assert_eq!(item.status, ItemStatus::Assigned);
    assert_eq!(item.assigned_to.as_deref(), Some("op-1"));
    assert_eq!(item.assigned_at, Some(T0));

    let next = h.coordinator.claim_next("acme", "op-2").await.unwrap();
    assert_eq!(next.item.unwrap().id, "urgent-new");
}

#[tokio::test]
async fn test_claim_next_ignores_other_tenants_and_assigned_items() {
    let h = Harness::new();
    h.seed("foreign", "globex", Priority::Urgent, 100).await;
    h.seed("mine", "acme", Priority::Low, 1).await;
    h.coordinator.claim_specific("mine", "op-9").await.unwrap();

    let result = h.coordinator.claim_next("acme", "op-1").await.unwrap();

    assert!(!result.success);
    assert!(result.item.is_none());
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_claim_specific_is_idempotent_for_holder() {
    let h = Harness::new();
    h.seed("h-1", "acme", Priority::High, 5).await;

    let first = h.coordinator.claim_specific("h-1", "op-1").await.unwrap();
    assert_eq!(first.item.unwrap().assigned_at, Some(T0));

    h.clock.advance_minutes(3);
    let again = h.coordinator.claim_specific("h-1", "op-1").await.unwrap();

    assert!(again.success);
    let item = again.item.unwrap();
    assert_eq!(item.assigned_to.as_deref(), Some("op-1"));
    assert_eq!(item.assigned_at, Some(T0 + 3 * MINUTE));
}

#[tokio::test]
async fn test_claim_specific_refusals() {
    let h = Harness::new();
    h.seed("held", "acme", Priority::High, 5).await;
    h.seed("done", "acme", Priority::High, 5).await;
    h.coordinator.claim_specific("held", "op-2").await.unwrap();
    h.storage.mark_resolved("done").await.unwrap();

    let held = h.coordinator.claim_specific("held", "op-1").await.unwrap();
    assert!(!held.success);
    assert_eq!(held.error, Some(ClaimError::AlreadyAssigned));
    assert_eq!(h.item("held").await.assigned_to.as_deref(), Some("op-2"));

    let done = h.coordinator.claim_specific("done", "op-1").await.unwrap();
    assert_eq!(done.error, Some(ClaimError::Resolved));

    let missing = h.coordinator.claim_specific("nope", "op-1").await.unwrap();
    assert_eq!(missing.error, Some(ClaimError::NotFound));
    assert_eq!(missing.error_message().as_deref(), Some("Item not found"));
}

/// Lets a rival operator win the conditional write between our read and write
struct RacingStorage {
    inner: Arc<InMemoryStorage>,
    rival: String,
    raced: AtomicBool,
}

#[async_trait]
impl StoragePort for RacingStorage {
    async fn query_queue(&self, query: &QueueQuery) -> Result<QueryPage> {
        self.inner.query_queue(query).await
    }

    async fn get_item(&self, id: &str) -> Result<Option<QueueItem>> {
        self.inner.get_item(id).await
    }

    async fn update_item(
        &self,
        id: &str,
        expected_version: u64,
        patch: &ItemPatch,
    ) -> Result<QueueItem> {
        if !self.raced.swap(true, Ordering::SeqCst) {
            self.inner
                .update_item(id, expected_version, &ItemPatch::assign(&self.rival, T0))
                .await?;
        }
        self.inner.update_item(id, expected_version, patch).await
    }

    async fn get_queue_stats(&self, client_id: &str) -> Result<StorageStats> {
        self.inner.get_queue_stats(client_id).await
    }

    async fn get_operator_workload(&self, client_id: &str) -> Result<Vec<OperatorWorkload>> {
        self.inner.get_operator_workload(client_id).await
    }

    async fn get_available_operators(&self, client_id: &str) -> Result<Vec<OperatorWorkload>> {
        self.inner.get_available_operators(client_id).await
    }
}

#[tokio::test]
async fn test_lost_race_is_structured_failure() {
    common::init_tracing();
    let clock = Arc::new(MockTimeProvider::new(T0));
    let inner = Arc::new(InMemoryStorage::new(clock.clone()));
    inner
        .insert_item(QueueItem::new("h-1", "acme", "t-1", Priority::Urgent, "refund", T0))
        .await
        .unwrap();

    let racing = Arc::new(RacingStorage {
        inner: inner.clone(),
        rival: "op-rival".to_string(),
        raced: AtomicBool::new(false),
    });
    let coordinator = QueueCoordinator::new(racing, clock, QueueConfig::default());

    let result = coordinator.claim_next("acme", "op-1").await.unwrap();

    assert!(!result.success);
    assert!(result.item.is_none());
    assert!(matches!(result.error, Some(ClaimError::Concurrent(_))));

    let stored = inner.get_item("h-1").await.unwrap().unwrap();
    assert_eq!(stored.assigned_to.as_deref(), Some("op-rival"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_single_winner() {
    let h = Harness::new();
    h.seed("only", "acme", Priority::Urgent, 1).await;

    let handles: Vec<_> = (0..16)
        .map(|n| {
            let coordinator = h.coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .claim_next("acme", &format!("op-{}", n))
                    .await
                    .expect("claim should not error")
            })
        })
        .collect();

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("claimer panicked"))
        .collect();

    let winners: Vec<_> = results.iter().filter(|r| r.success).collect();
    assert_eq!(winners.len(), 1);

    let winner = winners[0].item.as_ref().unwrap();
    let stored = h.item("only").await;
    assert_eq!(stored.assigned_to, winner.assigned_to);

    for loser in results.iter().filter(|r| !r.success) {
        assert!(loser.item.is_none());
        assert!(matches!(loser.error, None | Some(ClaimError::Concurrent(_))));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_never_share_an_item() {
    let h = Harness::new();
    for n in 0..8 {
        h.seed(&format!("h-{}", n), "acme", Priority::Medium, 20 - n).await;
    }

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let coordinator = h.coordinator.clone();
            tokio::spawn(async move {
                let mut mine = Vec::new();
                for _ in 0..4 {
                    let result = coordinator
                        .claim_next("acme", &format!("op-{}", n))
                        .await
                        .expect("claim should not error");
                    if let Some(item) = result.item {
                        mine.push(item.id);
                    }
                }
                mine
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for joined in join_all(handles).await {
        for id in joined.expect("claimer panicked") {
            assert!(seen.insert(id.clone()), "{} claimed twice", id);
        }
    }

    for id in &seen {
        assert_eq!(h.item(id).await.status, ItemStatus::Assigned);
    }
}
