// In-memory StoragePort Implementation

use crate::roster::{day_of, OperatorProfile, RosterEntry};
use async_trait::async_trait;
use handoff_core::domain::{
    queue_order, ClientId, ItemId, ItemPatch, ItemStatus, OperatorWorkload, QueueItem,
};
use handoff_core::error::{AppError, Result};
use handoff_core::port::{QueryPage, QueueQuery, StoragePort, StorageStats, TimeProvider};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Default)]
struct State {
    items: HashMap<ItemId, QueueItem>,
    // Registration order is kept; it decides auto-assignment ties
    roster: HashMap<ClientId, Vec<RosterEntry>>,
}

impl State {
    /// Items currently held by `operator_id`, across every tenant
    fn load_of(&self, operator_id: &str) -> u32 {
        self.items
            .values()
            .filter(|item| item.is_assigned_to(operator_id))
            .count() as u32
    }

    fn credit_resolution(&mut self, client_id: &str, operator_id: &str, today: i64) -> bool {
        let entry = self
            .roster
            .get_mut(client_id)
            .and_then(|entries| {
                entries
                    .iter_mut()
                    .find(|e| e.profile.operator_id == operator_id)
            });
        match entry {
            Some(entry) => {
                entry.credit_resolution(today);
                true
            }
            None => false,
        }
    }
}

/// Storage adapter keeping every tenant's queue in process memory.
///
/// Each item carries a revision; `update_item` only applies when the caller's
/// `expected_version` still matches, which makes concurrent claims on a shared
/// `InMemoryStorage` behave like a conditional `UPDATE ... WHERE version = ?`.
pub struct InMemoryStorage {
    state: RwLock<State>,
    time_provider: Arc<dyn TimeProvider>,
}

impl InMemoryStorage {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            time_provider,
        }
    }

    /// Enqueue an item created by the escalation side. IDs must be unique.
    pub async fn insert_item(&self, item: QueueItem) -> Result<()> {
        let mut state = self.state.write().await;
        if state.items.contains_key(&item.id) {
            return Err(AppError::Validation(format!(
                "Item {} already exists",
                item.id
            )));
        }

        debug!(
            item_id = %item.id,
            client_id = %item.client_id,
            priority = %item.priority,
            "Item inserted"
        );
        state.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Close an item on behalf of the resolution workflow.
    ///
    /// Clears the assignment and credits the holder's `resolved_today`.
    pub async fn mark_resolved(&self, item_id: &str) -> Result<QueueItem> {
        let today = day_of(self.time_provider.now_millis());
        let mut state = self.state.write().await;
        let item = state
            .items
            .get_mut(item_id)
            .ok_or_else(|| AppError::ItemNotFound(item_id.to_string()))?;

        if item.status == ItemStatus::Resolved {
            return Err(AppError::InvalidState {
                item_id: item.id.clone(),
                status: item.status,
            });
        }

        let holder = item.assigned_to.take();
        item.status = ItemStatus::Resolved;
        item.assigned_at = None;
        item.version += 1;
        let resolved = item.clone();

        if let Some(operator_id) = holder {
            if !state.credit_resolution(&resolved.client_id, &operator_id, today) {
                warn!(
                    operator_id = %operator_id,
                    client_id = %resolved.client_id,
                    "Resolved item held by an unregistered operator"
                );
            }
        }

        debug!(item_id = %resolved.id, client_id = %resolved.client_id, "Item resolved");
        Ok(resolved)
    }

    /// Count a resolution made outside this store toward `resolved_today`
    pub async fn record_resolution(&self, client_id: &str, operator_id: &str) -> Result<()> {
        let today = day_of(self.time_provider.now_millis());
        let mut state = self.state.write().await;
        if state.credit_resolution(client_id, operator_id, today) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Operator {} is not registered for client {}",
                operator_id, client_id
            )))
        }
    }

    /// Add an operator to a tenant's roster, replacing an existing profile
    pub async fn register_operator(&self, client_id: &str, profile: OperatorProfile) {
        let mut state = self.state.write().await;
        let entries = state.roster.entry(client_id.to_string()).or_default();

        match entries
            .iter_mut()
            .find(|e| e.profile.operator_id == profile.operator_id)
        {
            Some(existing) => existing.profile = profile,
            None => entries.push(RosterEntry::new(profile)),
        }
    }

    /// Toggle whether an operator receives new work
    pub async fn set_operator_available(
        &self,
        client_id: &str,
        operator_id: &str,
        available: bool,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let entry = state
            .roster
            .get_mut(client_id)
            .and_then(|entries| {
                entries
                    .iter_mut()
                    .find(|e| e.profile.operator_id == operator_id)
            })
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Operator {} is not registered for client {}",
                    operator_id, client_id
                ))
            })?;

        entry.profile.available = available;
        Ok(())
    }

    /// `resolved_today` counts resolutions since UTC midnight of the injected clock
    fn workloads<'a>(
        state: &'a State,
        client_id: &str,
        only_available: bool,
        today: i64,
    ) -> impl Iterator<Item = OperatorWorkload> + 'a {
        state
            .roster
            .get(client_id)
            .into_iter()
            .flatten()
            .filter(move |e| !only_available || e.profile.available)
            .map(move |e| e.workload(state.load_of(&e.profile.operator_id), today))
    }
}

#[async_trait]
impl StoragePort for InMemoryStorage {
    async fn query_queue(&self, query: &QueueQuery) -> Result<QueryPage> {
        let state = self.state.read().await;

        let mut matched: Vec<&QueueItem> = state
            .items
            .values()
            .filter(|item| query.matches(item))
            .collect();
        matched.sort_by(|a, b| queue_order(a, b).then_with(|| a.id.cmp(&b.id)));

        let total = matched.len() as u64;
        let page = matched.into_iter().skip(query.offset());
        let items = match query.limit() {
            Some(limit) => page.take(limit).cloned().collect(),
            None => page.cloned().collect(),
        };

        Ok(QueryPage { items, total })
    }

    async fn get_item(&self, id: &str) -> Result<Option<QueueItem>> {
        let state = self.state.read().await;
        Ok(state.items.get(id).cloned())
    }

    async fn update_item(
        &self,
        id: &str,
        expected_version: u64,
        patch: &ItemPatch,
    ) -> Result<QueueItem> {
        let mut state = self.state.write().await;
        let item = state
            .items
            .get_mut(id)
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))?;

        if item.version != expected_version {
            return Err(AppError::Conflict(format!(
                "Item {} is at version {}, expected {}",
                id, item.version, expected_version
            )));
        }

        // Patch a copy so a rejected transition leaves the stored item untouched
        let mut updated = item.clone();
        updated.apply_patch(patch)?;
        updated.version += 1;
        *item = updated.clone();

        Ok(updated)
    }

    async fn get_queue_stats(&self, client_id: &str) -> Result<StorageStats> {
        let state = self.state.read().await;
        let now = self.time_provider.now_millis();

        let mut stats = StorageStats::default();
        let mut pending_wait_total: i64 = 0;
        let mut pending_count: u64 = 0;

        for item in state
            .items
            .values()
            .filter(|item| item.client_id == client_id && item.status != ItemStatus::Resolved)
        {
            stats.total += 1;
            *stats.by_priority.entry(item.priority).or_insert(0) += 1;
            *stats.by_status.entry(item.status).or_insert(0) += 1;

            if item.status == ItemStatus::Pending {
                let age = item.age_millis(now);
                pending_wait_total += age;
                pending_count += 1;
                stats.oldest_item_age_ms =
                    Some(stats.oldest_item_age_ms.map_or(age, |oldest| oldest.max(age)));
            }
        }

        if pending_count > 0 {
            stats.avg_wait_time_ms = pending_wait_total as f64 / pending_count as f64;
        }

        Ok(stats)
    }

    async fn get_operator_workload(&self, client_id: &str) -> Result<Vec<OperatorWorkload>> {
        let today = day_of(self.time_provider.now_millis());
        let state = self.state.read().await;
        Ok(Self::workloads(&state, client_id, false, today).collect())
    }

    async fn get_available_operators(&self, client_id: &str) -> Result<Vec<OperatorWorkload>> {
        let today = day_of(self.time_provider.now_millis());
        let state = self.state.read().await;
        Ok(Self::workloads(&state, client_id, true, today).collect())
    }
}
