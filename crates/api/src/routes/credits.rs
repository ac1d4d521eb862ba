//! Credit package and lesson-hour ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_db::CreditRepository;
use pelita_db::repositories::credit::CreatePackageInput;
use pelita_shared::types::{PageRequest, PageResponse};

/// Creates the credit router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/credit-packages",
            get(list_packages).post(create_package),
        )
        .route("/credit-packages/{id}", axum::routing::delete(deactivate_package))
        .route("/students/{id}/credits", get(credit_summary))
        .route("/students/{id}/credits/purchase", post(purchase))
        .route("/students/{id}/credits/consume", post(consume))
}

#[derive(Debug, Deserialize)]
struct CreatePackageRequest {
    name: String,
    hours: i32,
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct PurchaseRequest {
    package_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ConsumeRequest {
    hours: i32,
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListPackagesQuery {
    #[serde(default)]
    only_active: bool,
}

/// POST /credit-packages - Create a package.
async fn create_package(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePackageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = CreditRepository::new((*state.db).clone());
    let package = repo
        .create_package(CreatePackageInput {
            name: payload.name,
            hours: payload.hours,
            price: payload.price,
        })
        .await?;

    info!(package = %package.name, hours = package.hours, "Credit package created");

    Ok((StatusCode::CREATED, Json(package)))
}

/// GET /credit-packages - List packages.
async fn list_packages(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListPackagesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CreditRepository::new((*state.db).clone());
    let packages = repo.list_packages(query.only_active).await?;

    Ok(Json(packages))
}

/// DELETE /credit-packages/{id} - Retire a package.
async fn deactivate_package(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = CreditRepository::new((*state.db).clone());
    repo.deactivate_package(id).await?;

    Ok(Json(json!({ "deactivated": true })))
}

/// GET /students/{id}/credits - Balance and transaction history.
async fn credit_summary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CreditRepository::new((*state.db).clone());
    let balance = repo.balance(id).await?;
    let (rows, total) = repo.history(id, &page).await?;

    Ok(Json(json!({
        "student_id": id,
        "balance_hours": balance,
        "history": PageResponse::new(rows, page.page, page.per_page, total),
    })))
}

/// POST /students/{id}/credits/purchase - Buy a package.
async fn purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PurchaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = CreditRepository::new((*state.db).clone());
    let transaction = repo
        .purchase(id, payload.package_id, auth.user_id())
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// POST /students/{id}/credits/consume - Draw down lesson hours.
async fn consume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConsumeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CreditRepository::new((*state.db).clone());
    let transaction = repo
        .consume(id, payload.hours, payload.note, auth.user_id())
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
