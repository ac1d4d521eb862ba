//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_db::AccountRepository;
use pelita_db::entities::sea_orm_active_enums::{AccountRole, AccountType};
use pelita_db::repositories::account::{AccountFilter, CreateAccountInput, UpdateAccountInput};

/// Creates the account router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}

#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    code: String,
    name: String,
    account_type: AccountType,
    role: Option<AccountRole>,
    #[serde(default = "default_true")]
    is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpdateAccountRequest {
    code: Option<String>,
    name: Option<String>,
    account_type: Option<AccountType>,
    role: Option<Option<AccountRole>>,
    is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ListAccountsQuery {
    account_type: Option<AccountType>,
    is_active: Option<bool>,
}

/// POST /accounts - Add an account to the chart.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    if payload.code.trim().is_empty() {
        return Err(ApiError::validation("Account code must not be empty"));
    }

    let repo = AccountRepository::new((*state.db).clone());
    let account = repo
        .create_account(CreateAccountInput {
            code: payload.code,
            name: payload.name,
            account_type: payload.account_type,
            role: payload.role,
            is_active: payload.is_active,
        })
        .await?;

    info!(code = %account.code, "Account created");

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /accounts - List the chart of accounts.
async fn list_accounts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListAccountsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let accounts = repo
        .list_accounts(AccountFilter {
            account_type: query.account_type,
            is_active: query.is_active,
        })
        .await?;

    Ok(Json(accounts))
}

/// GET /accounts/{id} - Fetch one account.
async fn get_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let account = repo
        .find_account_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Account not found: {id}")))?;

    Ok(Json(account))
}

/// PUT /accounts/{id} - Update an account.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = AccountRepository::new((*state.db).clone());
    let account = repo
        .update_account(
            id,
            UpdateAccountInput {
                code: payload.code,
                name: payload.name,
                account_type: payload.account_type,
                role: payload.role,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(Json(account))
}

/// DELETE /accounts/{id} - Delete or deactivate an account.
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = AccountRepository::new((*state.db).clone());
    repo.delete_account(id).await?;

    Ok(Json(json!({ "deleted": true })))
}
