//! Shared fixtures: a coordinator wired to the in-memory adapter and a settable clock

#![allow(dead_code)]

use handoff_core::domain::{ItemPatch, Priority, QueueItem};
use handoff_core::port::time_provider::mocks::MockTimeProvider;
use handoff_core::port::{StoragePort, TimeProvider};
use handoff_core::{QueueConfig, QueueCoordinator};
use handoff_infra_memory::InMemoryStorage;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub const MINUTE: i64 = 60_000;

/// Fixed "now" far enough from zero that items can be created in the past
pub const T0: i64 = 1_700_000_000_000;

/// Route core/adapter logs to the test writer. Set `RUST_LOG` to see them.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub struct Harness {
    pub clock: Arc<MockTimeProvider>,
    pub storage: Arc<InMemoryStorage>,
    pub coordinator: Arc<QueueCoordinator>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        init_tracing();

        let clock = Arc::new(MockTimeProvider::new(T0));
        let storage = Arc::new(InMemoryStorage::new(clock.clone()));
        let coordinator = Arc::new(QueueCoordinator::new(
            storage.clone(),
            clock.clone(),
            config,
        ));

        Self {
            clock,
            storage,
            coordinator,
        }
    }

    /// Insert a pending item created `minutes_ago` before the current clock
    pub async fn seed(
        &self,
        id: &str,
        client_id: &str,
        priority: Priority,
        minutes_ago: i64,
    ) -> QueueItem {
        let created_at = self.clock.now_millis() - minutes_ago * MINUTE;
        let item = QueueItem::new(
            id,
            client_id,
            format!("thread-{}", id),
            priority,
            "customer asked for a human",
            created_at,
        );
        self.storage
            .insert_item(item.clone())
            .await
            .expect("seed item");
        item
    }

    /// Put `count` fresh items of `client_id` on `operator_id`'s desk
    pub async fn hold(&self, client_id: &str, operator_id: &str, count: usize) {
        for n in 0..count {
            let id = format!("{}-{}-held-{}", client_id, operator_id, n);
            self.seed(&id, client_id, Priority::Low, 1).await;
            self.storage
                .update_item(&id, 0, &ItemPatch::assign(operator_id, T0))
                .await
                .expect("assign seeded item");
        }
    }

    pub async fn item(&self, id: &str) -> QueueItem {
        self.storage
            .get_item(id)
            .await
            .expect("storage read")
            .expect("item exists")
    }
}
