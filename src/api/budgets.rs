use super::{AppState, error::ApiResult};
use crate::{
    core::budget::{
        self, BudgetDetail, BudgetItemUpdate, BudgetUpdate, CategoryBreakdown, ImportOutcome, NewBudget,
        NewBudgetItem,
    },
    entities::{BudgetModel, BudgetItemModel, BudgetStatus},
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;

/// `?q=&status=` on the budget list
#[derive(Debug, Default, Deserialize)]
pub struct BudgetQuery {
    q: Option<String>,
    status: Option<BudgetStatus>,
}

/// `?q=&department=` on the item list
#[derive(Debug, Default, Deserialize)]
pub struct ItemQuery {
    q: Option<String>,
    department: Option<String>,
}

/// Body of the import endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    file_name: String,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/budgets", get(list_budgets).post(create_budget))
        .route("/api/budgets/active", get(active_budget))
        .route(
            "/api/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/api/budgets/{id}/items", get(list_items).post(add_item))
        .route(
            "/api/budgets/{id}/items/{item_id}",
            put(update_item).delete(delete_item),
        )
        .route("/api/budgets/{id}/recalculate", post(recalculate))
        .route("/api/budgets/{id}/categories", get(categories))
        .route("/api/budgets/{id}/import", post(import))
}

async fn list_budgets(
    State(state): State<AppState>,
    Query(query): Query<BudgetQuery>,
) -> ApiResult<Json<Vec<BudgetModel>>> {
    let budgets = budget::search_budgets(&state.db, query.q.as_deref(), query.status).await?;
    Ok(Json(budgets))
}

async fn active_budget(State(state): State<AppState>) -> ApiResult<Json<Option<BudgetModel>>> {
    Ok(Json(budget::get_active_budget(&state.db).await?))
}

async fn create_budget(
    State(state): State<AppState>,
    Json(payload): Json<NewBudget>,
) -> ApiResult<(StatusCode, Json<BudgetModel>)> {
    let created = budget::create_budget(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_budget(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<BudgetDetail>> {
    budget::get_budget_detail(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::BudgetNotFound { id }.into())
}

async fn update_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<BudgetUpdate>,
) -> ApiResult<Json<BudgetModel>> {
    budget::update_budget(&state.db, &id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| Error::BudgetNotFound { id }.into())
}

async fn delete_budget(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    if budget::delete_budget(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::BudgetNotFound { id }.into())
    }
}

async fn list_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ItemQuery>,
) -> ApiResult<Json<Vec<BudgetItemModel>>> {
    let items = budget::filter_items(&state.db, &id, query.q.as_deref(), query.department.as_deref()).await?;
    Ok(Json(items))
}

async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewBudgetItem>,
) -> ApiResult<(StatusCode, Json<BudgetItemModel>)> {
    match budget::add_budget_item(&state.db, &id, payload).await? {
        Some(item) => Ok((StatusCode::CREATED, Json(item))),
        None => Err(Error::BudgetNotFound { id }.into()),
    }
}

async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
    Json(payload): Json<BudgetItemUpdate>,
) -> ApiResult<Json<BudgetItemModel>> {
    budget::update_budget_item(&state.db, &id, &item_id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| Error::BudgetItemNotFound { id: item_id }.into())
}

async fn delete_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    if budget::delete_budget_item(&state.db, &id, &item_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::BudgetItemNotFound { id: item_id }.into())
    }
}

async fn recalculate(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<BudgetModel>> {
    budget::recalculate_budget_totals(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::BudgetNotFound { id }.into())
}

async fn categories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<CategoryBreakdown>>> {
    Ok(Json(budget::category_breakdown(&state.db, &id).await?))
}

async fn import(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ImportRequest>,
) -> ApiResult<Json<ImportOutcome>> {
    Ok(Json(budget::import_items(&state.db, &id, &payload.file_name).await?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::api::testing::{seeded_app, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_and_filter_budgets() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/api/budgets", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = send(&app, Method::GET, "/api/budgets?status=draft", None, None).await;
        let drafts = body.as_array().unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0]["id"], "budget-2025");

        let (_, body) = send(&app, Method::GET, "/api/budgets/active", None, None).await;
        assert_eq!(body["id"], "budget-2024");
    }

    #[tokio::test]
    async fn test_budget_detail_and_missing() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/api/budgets/budget-2024", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 6);
        assert_eq!(body["status"], "active");

        let (status, body) = send(&app, Method::GET, "/api/budgets/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn test_item_lifecycle() {
        let app = seeded_app().await;

        let (status, item) = send(
            &app,
            Method::POST,
            "/api/budgets/budget-2025/items",
            Some(json!({
                "code": "900-2025",
                "name": "Capacitación",
                "category": "Personal",
                "department": "Recursos Humanos",
                "budgetAmount": 10000.0,
                "spentAmount": 9500.0
            })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(item["status"], "critical");
        let item_id = item["id"].as_str().unwrap().to_string();

        let uri = format!("/api/budgets/budget-2025/items/{item_id}");
        let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({ "spentAmount": 1000.0 })), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "healthy");
        assert_eq!(updated["percentage"], 10);

        let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_item_to_missing_budget() {
        let app = seeded_app().await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/budgets/missing/items",
            Some(json!({
                "code": "X",
                "name": "X",
                "category": "X",
                "department": "X",
                "budgetAmount": 1.0
            })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_import_and_recalculate() {
        let app = seeded_app().await;

        let (status, outcome) = send(
            &app,
            Method::POST,
            "/api/budgets/budget-2025/import",
            Some(json!({ "fileName": "partidas.xlsx" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["success"], true);
        assert_eq!(outcome["items"].as_array().unwrap().len(), 2);

        let (status, budget) = send(&app, Method::POST, "/api/budgets/budget-2025/recalculate", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(budget["totalBudget"], 125_000.0);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/budgets/missing/import",
            Some(json!({ "fileName": "x.xlsx" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
