//! Budget business logic - Handles budgets and their line items.
//!
//! Item writes go through [`crate::core::status::derive`] so the stored available amount,
//! percentage and status always match the amounts they were written with, and every
//! item mutation recomputes the owning budget's totals inside the same database
//! transaction. Lookups of missing records return `None`/`false` rather than errors,
//! matching how the dashboard pages treat a stale id.

use crate::{
    core::{matches_term, new_id, status},
    entities::{
        Budget, BudgetApproval, BudgetItem, BudgetStatus, ItemStatus, budget, budget_approval,
        budget_item,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Name given to budgets created without one
pub const DEFAULT_BUDGET_NAME: &str = "Nuevo Presupuesto";
/// Creator recorded when the caller does not say who they are
pub const DEFAULT_CREATOR: &str = "Usuario Actual";
/// Creator recorded on items added by the spreadsheet import
pub const IMPORT_CREATOR: &str = "Importación Excel";

/// Fields accepted when creating a budget; anything left out gets a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    /// Display name, default [`DEFAULT_BUDGET_NAME`]
    pub name: Option<String>,
    /// Fiscal year, default the current year
    pub year: Option<i32>,
    /// Initial status, default draft
    pub status: Option<BudgetStatus>,
    /// Currency code, default `USD`
    pub currency: Option<String>,
    /// Creator, default [`DEFAULT_CREATOR`]
    pub created_by: Option<String>,
}

/// Partial update of a budget's own fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    /// New display name
    pub name: Option<String>,
    /// New fiscal year
    pub year: Option<i32>,
    /// New status
    pub status: Option<BudgetStatus>,
    /// New currency code
    pub currency: Option<String>,
}

/// A line item to add; derived fields are computed on insert.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetItem {
    /// Accounting code
    pub code: String,
    /// Display name
    pub name: String,
    /// Spending category
    pub category: String,
    /// Responsible department
    pub department: String,
    /// Planned amount
    pub budget_amount: f64,
    /// Executed amount
    #[serde(default)]
    pub spent_amount: f64,
    /// Creator, default [`DEFAULT_CREATOR`]
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Partial update of a line item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItemUpdate {
    /// New accounting code
    pub code: Option<String>,
    /// New display name
    pub name: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New department
    pub department: Option<String>,
    /// New planned amount
    pub budget_amount: Option<f64>,
    /// New executed amount
    pub spent_amount: Option<f64>,
}

/// A budget together with its items (in position order) and approvals.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetDetail {
    /// The budget itself
    #[serde(flatten)]
    pub budget: budget::Model,
    /// Line items, ordered
    pub items: Vec<budget_item::Model>,
    /// Approval records
    pub approvals: Vec<budget_approval::Model>,
}

/// Aggregated amounts for one category of a budget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// Category name
    pub category: String,
    /// Number of items in the category
    pub item_count: usize,
    /// Summed planned amount
    pub budget_amount: f64,
    /// Summed executed amount
    pub spent_amount: f64,
    /// Summed available amount
    pub available_amount: f64,
    /// Rounded spent/budget ratio of the sums
    pub percentage: i32,
    /// Health of the sums
    pub status: ItemStatus,
}

/// Result of a spreadsheet import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    /// Whether the import went through
    pub success: bool,
    /// Message shown to the user
    pub message: String,
    /// Items that were added
    pub items: Vec<budget_item::Model>,
}

fn ensure_finite(amount: f64) -> Result<()> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

/// Retrieves every budget in creation order.
pub async fn get_budgets(db: &DatabaseConnection) -> Result<Vec<budget::Model>> {
    Budget::find()
        .order_by_asc(budget::Column::CreatedAt)
        .order_by_asc(budget::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a budget by id.
pub async fn get_budget_by_id<C>(db: &C, id: &str) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Loads a budget with its items and approvals.
pub async fn get_budget_detail(db: &DatabaseConnection, id: &str) -> Result<Option<BudgetDetail>> {
    let Some(budget) = get_budget_by_id(db, id).await? else {
        return Ok(None);
    };
    let items = get_budget_items(db, id).await?;
    let approvals = BudgetApproval::find()
        .filter(budget_approval::Column::BudgetId.eq(id))
        .order_by_asc(budget_approval::Column::ApprovedAt)
        .all(db)
        .await?;

    Ok(Some(BudgetDetail {
        budget,
        items,
        approvals,
    }))
}

/// Returns the first budget whose status is active, the one transfers are applied to.
pub async fn get_active_budget<C>(db: &C) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::Status.eq(BudgetStatus::Active))
        .order_by_asc(budget::Column::CreatedAt)
        .order_by_asc(budget::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Filters budgets by a search term (name, case-insensitive, or year) and status.
pub async fn search_budgets(
    db: &DatabaseConnection,
    term: Option<&str>,
    status: Option<BudgetStatus>,
) -> Result<Vec<budget::Model>> {
    let budgets = get_budgets(db).await?;
    Ok(budgets
        .into_iter()
        .filter(|b| {
            term.is_none_or(|t| matches_term(&b.name, t) || b.year.to_string().contains(t))
        })
        .filter(|b| status.is_none_or(|s| b.status == s))
        .collect())
}

/// Creates an empty budget, filling unspecified fields with defaults.
#[instrument(skip(db))]
pub async fn create_budget(db: &DatabaseConnection, new: NewBudget) -> Result<budget::Model> {
    let now = Utc::now();
    let model = budget::ActiveModel {
        id: Set(new_id("budget")),
        name: Set(new.name.unwrap_or_else(|| DEFAULT_BUDGET_NAME.to_string())),
        year: Set(new.year.unwrap_or_else(|| now.year())),
        status: Set(new.status.unwrap_or(BudgetStatus::Draft)),
        total_budget: Set(0.0),
        total_spent: Set(0.0),
        total_available: Set(0.0),
        currency: Set(new.currency.unwrap_or_else(|| "USD".to_string())),
        created_at: Set(now),
        created_by: Set(new.created_by.unwrap_or_else(|| DEFAULT_CREATOR.to_string())),
        last_modified: Set(now),
    };

    let budget = model.insert(db).await?;
    info!("Created budget {} ({})", budget.id, budget.name);
    Ok(budget)
}

/// Applies a partial update to a budget; `None` if it does not exist.
pub async fn update_budget(
    db: &DatabaseConnection,
    id: &str,
    update: BudgetUpdate,
) -> Result<Option<budget::Model>> {
    let Some(existing) = get_budget_by_id(db, id).await? else {
        return Ok(None);
    };

    let mut active: budget::ActiveModel = existing.into();
    if let Some(name) = update.name {
        active.name = Set(name);
    }
    if let Some(year) = update.year {
        active.year = Set(year);
    }
    if let Some(status) = update.status {
        active.status = Set(status);
    }
    if let Some(currency) = update.currency {
        active.currency = Set(currency);
    }
    active.last_modified = Set(Utc::now());

    Ok(Some(active.update(db).await?))
}

/// Deletes a budget along with its items and approvals. Returns whether it existed.
#[instrument(skip(db))]
pub async fn delete_budget(db: &DatabaseConnection, id: &str) -> Result<bool> {
    let txn = db.begin().await?;

    if get_budget_by_id(&txn, id).await?.is_none() {
        return Ok(false);
    }

    BudgetItem::delete_many()
        .filter(budget_item::Column::BudgetId.eq(id))
        .exec(&txn)
        .await?;
    BudgetApproval::delete_many()
        .filter(budget_approval::Column::BudgetId.eq(id))
        .exec(&txn)
        .await?;
    Budget::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted budget {}", id);
    Ok(true)
}

/// Retrieves a budget's items in position order.
pub async fn get_budget_items<C>(db: &C, budget_id: &str) -> Result<Vec<budget_item::Model>>
where
    C: ConnectionTrait,
{
    BudgetItem::find()
        .filter(budget_item::Column::BudgetId.eq(budget_id))
        .order_by_asc(budget_item::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an item by id within a budget.
pub async fn get_budget_item<C>(
    db: &C,
    budget_id: &str,
    item_id: &str,
) -> Result<Option<budget_item::Model>>
where
    C: ConnectionTrait,
{
    BudgetItem::find_by_id(item_id)
        .filter(budget_item::Column::BudgetId.eq(budget_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts an item at the end of the budget without touching the totals.
pub(crate) async fn insert_item<C>(
    db: &C,
    budget_id: &str,
    item: NewBudgetItem,
) -> Result<budget_item::Model>
where
    C: ConnectionTrait,
{
    ensure_finite(item.budget_amount)?;
    ensure_finite(item.spent_amount)?;

    let position = get_budget_items(db, budget_id)
        .await?
        .last()
        .map_or(0, |last| last.position + 1);
    let derived = status::derive(item.spent_amount, item.budget_amount);

    let model = budget_item::ActiveModel {
        id: Set(new_id("item")),
        budget_id: Set(budget_id.to_string()),
        position: Set(position),
        code: Set(item.code),
        name: Set(item.name),
        category: Set(item.category),
        department: Set(item.department),
        budget_amount: Set(item.budget_amount),
        spent_amount: Set(item.spent_amount),
        available_amount: Set(derived.available_amount),
        percentage: Set(derived.percentage),
        status: Set(derived.status),
        last_modified: Set(Utc::now()),
        created_by: Set(item.created_by.unwrap_or_else(|| DEFAULT_CREATOR.to_string())),
    };

    model.insert(db).await.map_err(Into::into)
}

/// Adds an item to a budget and recomputes the totals; `None` if the budget does not exist.
#[instrument(skip(db, item), fields(code = %item.code))]
pub async fn add_budget_item(
    db: &DatabaseConnection,
    budget_id: &str,
    item: NewBudgetItem,
) -> Result<Option<budget_item::Model>> {
    let txn = db.begin().await?;

    if get_budget_by_id(&txn, budget_id).await?.is_none() {
        return Ok(None);
    }

    let created = insert_item(&txn, budget_id, item).await?;
    recalculate_budget_totals(&txn, budget_id).await?;

    txn.commit().await?;
    Ok(Some(created))
}

/// Merges an update into an item, re-derives its fields and recomputes the totals.
pub async fn update_budget_item(
    db: &DatabaseConnection,
    budget_id: &str,
    item_id: &str,
    update: BudgetItemUpdate,
) -> Result<Option<budget_item::Model>> {
    if let Some(amount) = update.budget_amount {
        ensure_finite(amount)?;
    }
    if let Some(amount) = update.spent_amount {
        ensure_finite(amount)?;
    }

    let txn = db.begin().await?;

    let Some(existing) = get_budget_item(&txn, budget_id, item_id).await? else {
        return Ok(None);
    };

    let budget_amount = update.budget_amount.unwrap_or(existing.budget_amount);
    let spent_amount = update.spent_amount.unwrap_or(existing.spent_amount);

    let mut active: budget_item::ActiveModel = existing.into();
    if let Some(code) = update.code {
        active.code = Set(code);
    }
    if let Some(name) = update.name {
        active.name = Set(name);
    }
    if let Some(category) = update.category {
        active.category = Set(category);
    }
    if let Some(department) = update.department {
        active.department = Set(department);
    }
    set_amounts(&mut active, budget_amount, spent_amount);

    let updated = active.update(&txn).await?;
    recalculate_budget_totals(&txn, budget_id).await?;

    txn.commit().await?;
    Ok(Some(updated))
}

/// Writes both amounts and every field derived from them.
pub(crate) fn set_amounts(active: &mut budget_item::ActiveModel, budget_amount: f64, spent_amount: f64) {
    let derived = status::derive(spent_amount, budget_amount);
    active.budget_amount = Set(budget_amount);
    active.spent_amount = Set(spent_amount);
    active.available_amount = Set(derived.available_amount);
    active.percentage = Set(derived.percentage);
    active.status = Set(derived.status);
    active.last_modified = Set(Utc::now());
}

/// Removes an item and recomputes the totals. Returns whether it existed.
pub async fn delete_budget_item(db: &DatabaseConnection, budget_id: &str, item_id: &str) -> Result<bool> {
    let txn = db.begin().await?;

    let result = BudgetItem::delete_many()
        .filter(budget_item::Column::Id.eq(item_id))
        .filter(budget_item::Column::BudgetId.eq(budget_id))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Ok(false);
    }

    recalculate_budget_totals(&txn, budget_id).await?;
    txn.commit().await?;
    Ok(true)
}

/// Sets a budget's totals to the sums over its items.
pub async fn recalculate_budget_totals<C>(db: &C, budget_id: &str) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    let Some(budget) = get_budget_by_id(db, budget_id).await? else {
        return Ok(None);
    };
    let items = get_budget_items(db, budget_id).await?;

    let total_budget: f64 = items.iter().map(|i| i.budget_amount).sum();
    let total_spent: f64 = items.iter().map(|i| i.spent_amount).sum();

    let mut active: budget::ActiveModel = budget.into();
    active.total_budget = Set(total_budget);
    active.total_spent = Set(total_spent);
    active.total_available = Set(total_budget - total_spent);
    active.last_modified = Set(Utc::now());

    Ok(Some(active.update(db).await?))
}

/// Filters a budget's items by search term (name or code) and department.
pub async fn filter_items(
    db: &DatabaseConnection,
    budget_id: &str,
    term: Option<&str>,
    department: Option<&str>,
) -> Result<Vec<budget_item::Model>> {
    let items = get_budget_items(db, budget_id).await?;
    Ok(items
        .into_iter()
        .filter(|i| term.is_none_or(|t| matches_term(&i.name, t) || matches_term(&i.code, t)))
        .filter(|i| department.is_none_or(|d| i.department == d))
        .collect())
}

/// Aggregates a budget's items per category, in order of first appearance.
pub async fn category_breakdown(
    db: &DatabaseConnection,
    budget_id: &str,
) -> Result<Vec<CategoryBreakdown>> {
    let items = get_budget_items(db, budget_id).await?;

    let mut groups: Vec<(String, usize, f64, f64)> = Vec::new();
    for item in &items {
        if let Some(group) = groups.iter_mut().find(|g| g.0 == item.category) {
            group.1 += 1;
            group.2 += item.budget_amount;
            group.3 += item.spent_amount;
        } else {
            groups.push((item.category.clone(), 1, item.budget_amount, item.spent_amount));
        }
    }

    Ok(groups
        .into_iter()
        .map(|(category, item_count, budget_amount, spent_amount)| {
            let derived = status::derive(spent_amount, budget_amount);
            CategoryBreakdown {
                category,
                item_count,
                budget_amount,
                spent_amount,
                available_amount: derived.available_amount,
                percentage: derived.percentage,
                status: derived.status,
            }
        })
        .collect())
}

fn imported_items() -> Vec<NewBudgetItem> {
    [("IMP-001", "Partida Importada 1", 50_000.0), ("IMP-002", "Partida Importada 2", 75_000.0)]
        .into_iter()
        .map(|(code, name, amount)| NewBudgetItem {
            code: code.to_string(),
            name: name.to_string(),
            category: "Importado".to_string(),
            department: "Varios".to_string(),
            budget_amount: amount,
            spent_amount: 0.0,
            created_by: Some(IMPORT_CREATOR.to_string()),
        })
        .collect()
}

/// Simulated spreadsheet import: appends two fixed items to the budget.
///
/// The file is never read; its name is only logged.
#[instrument(skip(db))]
pub async fn import_items(db: &DatabaseConnection, budget_id: &str, file_name: &str) -> Result<ImportOutcome> {
    let txn = db.begin().await?;

    if get_budget_by_id(&txn, budget_id).await?.is_none() {
        return Err(Error::BudgetNotFound {
            id: budget_id.to_string(),
        });
    }

    let mut items = Vec::new();
    for item in imported_items() {
        items.push(insert_item(&txn, budget_id, item).await?);
    }
    recalculate_budget_totals(&txn, budget_id).await?;
    txn.commit().await?;

    info!("Imported {} items from {} into {}", items.len(), file_name, budget_id);
    Ok(ImportOutcome {
        success: true,
        message: format!("Se importaron {} partidas correctamente", items.len()),
        items,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_get_active_budget() -> Result<()> {
        let db = setup_seeded_db().await?;

        let active = get_active_budget(&db).await?.unwrap();
        assert_eq!(active.id, "budget-2024");
        assert_eq!(active.status, BudgetStatus::Active);

        let budgets = get_budgets(&db).await?;
        assert_eq!(budgets.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_budget_detail_orders_items() -> Result<()> {
        let db = setup_seeded_db().await?;

        let detail = get_budget_detail(&db, "budget-2024").await?.unwrap();
        let codes: Vec<&str> = detail.items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, ["OP-001", "MK-001", "TI-001", "RH-001", "AD-001", "PU-001"]);
        assert_eq!(detail.approvals.len(), 1);

        assert!(get_budget_detail(&db, "missing").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_budget_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let budget = create_budget(&db, NewBudget::default()).await?;
        assert_eq!(budget.name, DEFAULT_BUDGET_NAME);
        assert_eq!(budget.status, BudgetStatus::Draft);
        assert_eq!(budget.currency, "USD");
        assert_eq!(budget.year, Utc::now().year());
        assert_eq!(budget.total_budget, 0.0);

        let custom = create_budget(
            &db,
            NewBudget {
                name: Some("Presupuesto 2026".to_string()),
                year: Some(2026),
                status: Some(BudgetStatus::Active),
                ..NewBudget::default()
            },
        )
        .await?;
        assert_eq!(custom.year, 2026);
        assert_eq!(custom.status, BudgetStatus::Active);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_derives_fields_and_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let budget = create_budget(&db, NewBudget::default()).await?;

        let first = add_budget_item(&db, &budget.id, new_item("A-1", 1_000.0, 950.0))
            .await?
            .unwrap();
        assert_eq!(first.available_amount, 50.0);
        assert_eq!(first.percentage, 95);
        assert_eq!(first.status, ItemStatus::Critical);

        let second = add_budget_item(&db, &budget.id, new_item("A-2", 500.0, 100.0))
            .await?
            .unwrap();
        assert!(second.position > first.position);

        let refreshed = get_budget_by_id(&db, &budget.id).await?.unwrap();
        assert_eq!(refreshed.total_budget, 1_500.0);
        assert_eq!(refreshed.total_spent, 1_050.0);
        assert_eq!(refreshed.total_available, 450.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_to_missing_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let result = add_budget_item(&db, "missing", new_item("X", 1.0, 0.0)).await?;
        assert!(result.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_rejects_non_finite_amount() -> Result<()> {
        let db = setup_test_db().await?;
        let budget = create_budget(&db, NewBudget::default()).await?;

        let result = add_budget_item(&db, &budget.id, new_item("X", f64::NAN, 0.0)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_rederives_and_keeps_available_invariant() -> Result<()> {
        let db = setup_seeded_db().await?;

        let updated = update_budget_item(
            &db,
            "budget-2024",
            "item-2",
            BudgetItemUpdate {
                spent_amount: Some(350_000.0),
                ..BudgetItemUpdate::default()
            },
        )
        .await?
        .unwrap();

        assert_eq!(updated.available_amount, updated.budget_amount - updated.spent_amount);
        assert_eq!(updated.available_amount, -30_000.0);
        assert_eq!(updated.status, ItemStatus::Exceeded);
        assert_eq!(updated.name, "Marketing Digital");

        let items = get_budget_items(&db, "budget-2024").await?;
        let budget = get_budget_by_id(&db, "budget-2024").await?.unwrap();
        let sum: f64 = items.iter().map(|i| i.budget_amount).sum();
        assert_eq!(budget.total_budget, sum);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_in_wrong_budget_is_none() -> Result<()> {
        let db = setup_seeded_db().await?;
        let result =
            update_budget_item(&db, "budget-2025", "item-1", BudgetItemUpdate::default()).await?;
        assert!(result.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_item_and_budget() -> Result<()> {
        let db = setup_seeded_db().await?;

        assert!(delete_budget_item(&db, "budget-2024", "item-6").await?);
        assert!(!delete_budget_item(&db, "budget-2024", "item-6").await?);
        let budget = get_budget_by_id(&db, "budget-2024").await?.unwrap();
        assert_eq!(budget.total_budget, 2_080_000.0);

        assert!(delete_budget(&db, "budget-2024").await?);
        assert!(get_budget_by_id(&db, "budget-2024").await?.is_none());
        assert!(get_budget_items(&db, "budget-2024").await?.is_empty());
        assert!(!delete_budget(&db, "budget-2024").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_budget() -> Result<()> {
        let db = setup_seeded_db().await?;

        let updated = update_budget(
            &db,
            "budget-2025",
            BudgetUpdate {
                status: Some(BudgetStatus::Closed),
                ..BudgetUpdate::default()
            },
        )
        .await?
        .unwrap();
        assert_eq!(updated.status, BudgetStatus::Closed);
        assert_eq!(updated.name, "Presupuesto Anual 2025");

        assert!(update_budget(&db, "nope", BudgetUpdate::default()).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_search_budgets() -> Result<()> {
        let db = setup_seeded_db().await?;

        assert_eq!(search_budgets(&db, Some("2025"), None).await?.len(), 1);
        assert_eq!(search_budgets(&db, Some("ANUAL"), None).await?.len(), 2);
        let drafts = search_budgets(&db, None, Some(BudgetStatus::Draft)).await?;
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, "budget-2025");
        Ok(())
    }

    #[tokio::test]
    async fn test_filter_items_and_breakdown() -> Result<()> {
        let db = setup_seeded_db().await?;

        let marketing = filter_items(&db, "budget-2024", None, Some("Marketing")).await?;
        assert_eq!(marketing.len(), 2);
        let by_code = filter_items(&db, "budget-2024", Some("rh-"), None).await?;
        assert_eq!(by_code.len(), 1);

        let breakdown = category_breakdown(&db, "budget-2024").await?;
        let marketing = breakdown.iter().find(|c| c.category == "Marketing").unwrap();
        assert_eq!(marketing.item_count, 2);
        assert_eq!(marketing.budget_amount, 470_000.0);
        assert_eq!(marketing.spent_amount, 285_400.0);
        assert_eq!(breakdown[0].category, "Operacional");
        Ok(())
    }

    #[tokio::test]
    async fn test_import_items() -> Result<()> {
        let db = setup_seeded_db().await?;

        let outcome = import_items(&db, "budget-2025", "partidas.xlsx").await?;
        assert!(outcome.success);
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.message, "Se importaron 2 partidas correctamente");
        assert_ne!(outcome.items[0].id, outcome.items[1].id);

        let budget = get_budget_by_id(&db, "budget-2025").await?.unwrap();
        assert_eq!(budget.total_budget, 125_000.0);

        let missing = import_items(&db, "missing", "x.xlsx").await;
        assert!(matches!(missing, Err(Error::BudgetNotFound { .. })));
        Ok(())
    }
}
