// Auto-assignment: least-loaded operator with spare capacity

use super::outcome::AutoAssignment;
use crate::domain::{ItemPatch, ItemStatus, OperatorWorkload};
use crate::error::{AppError, Result};
use crate::port::{StoragePort, TimeProvider};
use tracing::{debug, info};

/// Pick the operator for a new item.
///
/// Operators at or above `max_capacity` are excluded outright. Among the rest
/// the strictly lowest `current_load` wins; ties keep the first operator in the
/// order storage returned them.
pub fn select_operator(operators: &[OperatorWorkload]) -> Option<&OperatorWorkload> {
    operators
        .iter()
        .filter(|op| op.has_capacity())
        .min_by_key(|op| op.current_load)
}

/// Assign a pending item to the best available operator of its tenant
pub async fn auto_assign(
    storage: &dyn StoragePort,
    time_provider: &dyn TimeProvider,
    item_id: &str,
) -> Result<AutoAssignment> {
    let item = storage
        .get_item(item_id)
        .await?
        .ok_or_else(|| AppError::ItemNotFound(item_id.to_string()))?;

    if item.status != ItemStatus::Pending {
        return Err(AppError::InvalidState {
            item_id: item.id,
            status: item.status,
        });
    }

    let operators = storage.get_available_operators(&item.client_id).await?;
    debug!(
        item_id = %item.id,
        client_id = %item.client_id,
        candidates = operators.len(),
        "Selecting operator"
    );

    let chosen = select_operator(&operators)
        .ok_or_else(|| AppError::NoOperatorsAvailable(item.client_id.clone()))?;

    let now = time_provider.now_millis();
    let updated = storage
        .update_item(
            &item.id,
            item.version,
            &ItemPatch::assign(&chosen.operator_id, now),
        )
        .await?;

    info!(
        item_id = %updated.id,
        client_id = %updated.client_id,
        operator_id = %chosen.operator_id,
        current_load = chosen.current_load,
        max_capacity = ?chosen.max_capacity,
        "Item auto-assigned"
    );

    Ok(AutoAssignment {
        assigned_to: chosen.operator_id.clone(),
        item: updated,
    })
}
