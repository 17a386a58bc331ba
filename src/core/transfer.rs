//! Transfer business logic - Moves budget between items of the active budget.
//!
//! A transfer is created pending and later approved or rejected exactly once. Approval
//! subtracts the amount from the source item's `budget_amount`, adds it to the destination
//! and re-derives both items, all inside one database transaction. There is
//! no balance check: a source item can end up with a negative budget, which is logged.

use crate::{
    core::{
        budget::{get_active_budget, get_budget_item, set_amounts},
        matches_term, new_id,
    },
    entities::{BudgetItem, BudgetTransfer, TransferStatus, budget_item, budget_transfer},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{ActiveEnum, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Fields supplied when requesting a transfer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    /// Item the amount is taken from
    pub from_item_id: String,
    /// Item the amount is added to
    pub to_item_id: String,
    /// Amount to move
    pub amount: f64,
    /// Justification
    pub reason: String,
    /// Display name of the requester
    pub requested_by: String,
}

/// Counters shown above the transfer list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSummary {
    /// Number of transfers
    pub total: usize,
    /// Awaiting review
    pub pending: usize,
    /// Approved
    pub approved: usize,
    /// Rejected
    pub rejected: usize,
    /// Sum of all transfer amounts regardless of status
    pub total_amount: f64,
}

/// Retrieves every transfer in request order.
pub async fn get_transfers(db: &DatabaseConnection) -> Result<Vec<budget_transfer::Model>> {
    BudgetTransfer::find()
        .order_by_asc(budget_transfer::Column::RequestedAt)
        .order_by_asc(budget_transfer::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a transfer by id.
pub async fn get_transfer_by_id<C>(db: &C, id: &str) -> Result<Option<budget_transfer::Model>>
where
    C: ConnectionTrait,
{
    BudgetTransfer::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Filters transfers by a term matched against the reason and both item names, and by status.
pub async fn search_transfers(
    db: &DatabaseConnection,
    term: Option<&str>,
    status: Option<TransferStatus>,
) -> Result<Vec<budget_transfer::Model>> {
    let item_names: HashMap<String, String> = BudgetItem::find()
        .all(db)
        .await?
        .into_iter()
        .map(|item: budget_item::Model| (item.id, item.name))
        .collect();
    let name_matches = |item_id: &str, term: &str| {
        item_names
            .get(item_id)
            .is_some_and(|name| matches_term(name, term))
    };

    let transfers = get_transfers(db).await?;
    Ok(transfers
        .into_iter()
        .filter(|t| {
            term.is_none_or(|term| {
                matches_term(&t.reason, term)
                    || name_matches(&t.from_item_id, term)
                    || name_matches(&t.to_item_id, term)
            })
        })
        .filter(|t| status.is_none_or(|s| t.status == s))
        .collect())
}

/// Records a new pending transfer. Items are not checked or touched until approval.
#[instrument(skip(db))]
pub async fn create_transfer(db: &DatabaseConnection, new: NewTransfer) -> Result<budget_transfer::Model> {
    if !new.amount.is_finite() {
        return Err(Error::InvalidAmount { amount: new.amount });
    }

    let model = budget_transfer::ActiveModel {
        id: Set(new_id("transfer")),
        from_item_id: Set(new.from_item_id),
        to_item_id: Set(new.to_item_id),
        amount: Set(new.amount),
        reason: Set(new.reason),
        requested_by: Set(new.requested_by),
        requested_at: Set(Utc::now()),
        approved_by: Set(None),
        approved_at: Set(None),
        status: Set(TransferStatus::Pending),
        comments: Set(None),
    };

    let transfer = model.insert(db).await?;
    info!("Transfer {} requested for {}", transfer.id, transfer.amount);
    Ok(transfer)
}

async fn find_pending<C>(db: &C, id: &str) -> Result<budget_transfer::Model>
where
    C: ConnectionTrait,
{
    let transfer = get_transfer_by_id(db, id)
        .await?
        .ok_or_else(|| Error::TransferNotFound { id: id.to_string() })?;

    if transfer.status != TransferStatus::Pending {
        return Err(Error::TransferNotPending {
            id: id.to_string(),
            status: transfer.status.to_value(),
        });
    }
    Ok(transfer)
}

/// Approves a pending transfer and applies it to the active budget.
///
/// Comments are replaced only when given. If there is no active budget, or either item is
/// missing from it, the transfer is still marked approved and the items stay as they are.
#[instrument(skip(db, comments))]
pub async fn approve_transfer(
    db: &DatabaseConnection,
    id: &str,
    approved_by: &str,
    comments: Option<String>,
) -> Result<budget_transfer::Model> {
    let txn = db.begin().await?;
    let transfer = find_pending(&txn, id).await?;

    let mut active: budget_transfer::ActiveModel = transfer.into();
    active.status = Set(TransferStatus::Approved);
    active.approved_by = Set(Some(approved_by.to_string()));
    active.approved_at = Set(Some(Utc::now()));
    if comments.is_some() {
        active.comments = Set(comments);
    }
    let approved = active.update(&txn).await?;

    apply_transfer(&txn, &approved).await?;
    txn.commit().await?;

    info!("Transfer {} approved by {}", approved.id, approved_by);
    Ok(approved)
}

/// Rejects a pending transfer. Budget items are never touched.
#[instrument(skip(db, comments))]
pub async fn reject_transfer(
    db: &DatabaseConnection,
    id: &str,
    comments: Option<String>,
) -> Result<budget_transfer::Model> {
    let transfer = find_pending(db, id).await?;

    let mut active: budget_transfer::ActiveModel = transfer.into();
    active.status = Set(TransferStatus::Rejected);
    if comments.is_some() {
        active.comments = Set(comments);
    }

    let rejected = active.update(db).await?;
    info!("Transfer {} rejected", rejected.id);
    Ok(rejected)
}

/// Moves the transfer amount between the two items of the active budget.
async fn apply_transfer<C>(db: &C, transfer: &budget_transfer::Model) -> Result<()>
where
    C: ConnectionTrait,
{
    let Some(budget) = get_active_budget(db).await? else {
        warn!("No active budget; transfer {} not applied", transfer.id);
        return Ok(());
    };

    let from = get_budget_item(db, &budget.id, &transfer.from_item_id).await?;
    let to = get_budget_item(db, &budget.id, &transfer.to_item_id).await?;
    let (Some(from), Some(to)) = (from, to) else {
        warn!(
            "Transfer {} references items outside budget {}; not applied",
            transfer.id, budget.id
        );
        return Ok(());
    };

    // Same item on both sides nets to zero
    if from.id == to.id {
        let (budget_amount, spent_amount) = (from.budget_amount, from.spent_amount);
        let mut active: budget_item::ActiveModel = from.into();
        set_amounts(&mut active, budget_amount, spent_amount);
        let item = active.update(db).await?;
        debug!("Transfer {} refreshed item {} only", transfer.id, item.id);
        return Ok(());
    }

    let from_budget = from.budget_amount - transfer.amount;
    let to_budget = to.budget_amount + transfer.amount;
    if from_budget < 0.0 {
        warn!(
            "Transfer {} leaves item {} with a negative budget ({})",
            transfer.id, from.id, from_budget
        );
    }

    let from_spent = from.spent_amount;
    let mut from_active: budget_item::ActiveModel = from.into();
    set_amounts(&mut from_active, from_budget, from_spent);
    let from = from_active.update(db).await?;

    let to_spent = to.spent_amount;
    let mut to_active: budget_item::ActiveModel = to.into();
    set_amounts(&mut to_active, to_budget, to_spent);
    let to = to_active.update(db).await?;

    debug!(
        "Transfer {} moved {}: {} now {}, {} now {}",
        transfer.id, transfer.amount, from.id, from.budget_amount, to.id, to.budget_amount
    );
    Ok(())
}

/// Counts transfers by status and sums their amounts.
pub async fn transfer_summary(db: &DatabaseConnection) -> Result<TransferSummary> {
    let transfers = get_transfers(db).await?;

    let mut summary = TransferSummary {
        total: transfers.len(),
        ..TransferSummary::default()
    };
    for transfer in &transfers {
        match transfer.status {
            TransferStatus::Pending => summary.pending += 1,
            TransferStatus::Approved => summary.approved += 1,
            TransferStatus::Rejected => summary.rejected += 1,
        }
        summary.total_amount += transfer.amount;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::budget::{BudgetUpdate, get_budget_item, update_budget},
        entities::{BudgetStatus, ItemStatus},
        test_utils::*,
    };

    #[tokio::test]
    async fn test_approve_conserves_total_budget() -> Result<()> {
        let db = setup_seeded_db().await?;

        let before_from = get_budget_item(&db, "budget-2024", "item-5").await?.unwrap();
        let before_to = get_budget_item(&db, "budget-2024", "item-4").await?.unwrap();
        let before_sum = before_from.budget_amount + before_to.budget_amount;

        let approved = approve_transfer(&db, "transfer-2", "Carlos Administrador", None).await?;
        assert_eq!(approved.status, TransferStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("Carlos Administrador"));
        assert!(approved.approved_at.is_some());

        let from = get_budget_item(&db, "budget-2024", "item-5").await?.unwrap();
        let to = get_budget_item(&db, "budget-2024", "item-4").await?.unwrap();
        assert_eq!(from.budget_amount, 155_000.0);
        assert_eq!(to.budget_amount, 305_000.0);
        assert_eq!(from.budget_amount + to.budget_amount, before_sum);
        assert_eq!(from.available_amount, from.budget_amount - from.spent_amount);
        assert_eq!(to.available_amount, 39_000.0);
        assert_eq!(to.percentage, 87);
        assert_eq!(to.status, ItemStatus::Warning);
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_allows_negative_source_budget() -> Result<()> {
        let db = setup_seeded_db().await?;
        let transfer = create_transfer(&db, new_transfer("item-6", "item-1", 200_000.0)).await?;

        approve_transfer(&db, &transfer.id, "Carlos Administrador", Some("ok".into())).await?;

        let from = get_budget_item(&db, "budget-2024", "item-6").await?.unwrap();
        assert_eq!(from.budget_amount, -50_000.0);
        assert_eq!(from.spent_amount, 87_000.0);
        assert_eq!(from.available_amount, -137_000.0);
        assert_eq!(from.percentage, 0);

        let to = get_budget_item(&db, "budget-2024", "item-1").await?.unwrap();
        assert_eq!(to.budget_amount, 1_050_000.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_twice_is_rejected() -> Result<()> {
        let db = setup_seeded_db().await?;

        let result = approve_transfer(&db, "transfer-1", "Carlos Administrador", None).await;
        assert!(matches!(result, Err(Error::TransferNotPending { .. })));

        let missing = approve_transfer(&db, "transfer-x", "Carlos Administrador", None).await;
        assert!(matches!(missing, Err(Error::TransferNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_reject_leaves_items_untouched() -> Result<()> {
        let db = setup_seeded_db().await?;
        let before = get_budget_item(&db, "budget-2024", "item-5").await?.unwrap();

        let rejected = reject_transfer(&db, "transfer-2", Some("Sin fondos".into())).await?;
        assert_eq!(rejected.status, TransferStatus::Rejected);
        assert_eq!(rejected.comments.as_deref(), Some("Sin fondos"));
        assert!(rejected.approved_by.is_none());

        let after = get_budget_item(&db, "budget-2024", "item-5").await?.unwrap();
        assert_eq!(before.budget_amount, after.budget_amount);
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_without_active_budget_changes_nothing() -> Result<()> {
        let db = setup_seeded_db().await?;
        update_budget(
            &db,
            "budget-2024",
            BudgetUpdate {
                status: Some(BudgetStatus::Closed),
                ..BudgetUpdate::default()
            },
        )
        .await?;

        let approved = approve_transfer(&db, "transfer-2", "Carlos Administrador", None).await?;
        assert_eq!(approved.status, TransferStatus::Approved);

        let from = get_budget_item(&db, "budget-2024", "item-5").await?.unwrap();
        assert_eq!(from.budget_amount, 180_000.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_self_transfer_is_a_no_op() -> Result<()> {
        let db = setup_seeded_db().await?;
        let transfer = create_transfer(&db, new_transfer("item-3", "item-3", 10_000.0)).await?;

        approve_transfer(&db, &transfer.id, "Carlos Administrador", None).await?;

        let item = get_budget_item(&db, "budget-2024", "item-3").await?.unwrap();
        assert_eq!(item.budget_amount, 450_000.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_and_summary() -> Result<()> {
        let db = setup_seeded_db().await?;

        let by_item_name = search_transfers(&db, Some("recursos"), None).await?;
        assert_eq!(by_item_name.len(), 1);
        assert_eq!(by_item_name[0].id, "transfer-2");

        let by_reason = search_transfers(&db, Some("operaciones críticas"), None).await?;
        assert_eq!(by_reason.len(), 1);

        let pending = search_transfers(&db, None, Some(TransferStatus::Pending)).await?;
        assert_eq!(pending.len(), 1);

        let summary = transfer_summary(&db).await?;
        assert_eq!(summary.total, 2);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.total_amount, 40_000.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_transfer_is_pending() -> Result<()> {
        let db = setup_seeded_db().await?;

        let transfer = create_transfer(&db, new_transfer("item-1", "item-2", 5_000.0)).await?;
        assert_eq!(transfer.status, TransferStatus::Pending);
        assert!(transfer.approved_at.is_none());
        assert_eq!(get_transfers(&db).await?.len(), 3);

        let invalid = create_transfer(&db, new_transfer("item-1", "item-2", f64::INFINITY)).await;
        assert!(matches!(invalid, Err(Error::InvalidAmount { .. })));
        Ok(())
    }
}
