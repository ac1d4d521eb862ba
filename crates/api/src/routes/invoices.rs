//! Invoice routes: issue, pay, cancel, and list.
//!
//! Issuing posts the sales journal; cancelling posts the mirrored reversal.
//! Responses carry the posting outcome so account-resolution problems are
//! visible to callers instead of being swallowed.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_db::InvoiceRepository;
use pelita_db::entities::sea_orm_active_enums::InvoiceStatus;
use pelita_db::repositories::invoice::{CreateInvoiceInput, InvoiceFilter};
use pelita_shared::types::{PageRequest, PageResponse};

/// Creates the invoice router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}/pay", post(pay_invoice))
        .route("/invoices/{id}/cancel", post(cancel_invoice))
}

#[derive(Debug, Deserialize)]
struct CreateInvoiceRequest {
    student_id: Uuid,
    description: Option<String>,
    amount: Decimal,
    issued_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct ListInvoicesQuery {
    #[serde(flatten)]
    page: PageRequest,
    status: Option<InvoiceStatus>,
    student_id: Option<Uuid>,
}

/// POST /invoices - Issue an invoice and post its sales journal.
async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = InvoiceRepository::new((*state.db).clone());
    let created = repo
        .create_invoice(
            CreateInvoiceInput {
                student_id: payload.student_id,
                description: payload.description,
                amount: payload.amount,
                issued_on: payload.issued_on,
            },
            &state.poster,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "invoice": created.invoice,
            "posting": created.posting.as_str(),
        })),
    ))
}

/// GET /invoices - List invoices.
async fn list_invoices(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let (rows, total) = repo
        .list_invoices(
            InvoiceFilter {
                status: query.status,
                student_id: query.student_id,
            },
            &query.page,
        )
        .await?;

    Ok(Json(PageResponse::new(
        rows,
        query.page.page,
        query.page.per_page,
        total,
    )))
}

/// GET /invoices/{id} - Fetch one invoice.
async fn get_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo
        .find_invoice_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Invoice not found: {id}")))?;

    Ok(Json(invoice))
}

/// POST /invoices/{id}/pay - Mark a pending invoice paid.
async fn pay_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo.pay_invoice(id).await?;

    Ok(Json(invoice))
}

/// POST /invoices/{id}/cancel - Cancel an invoice and reverse its journal.
async fn cancel_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = InvoiceRepository::new((*state.db).clone());
    let cancelled = repo.cancel_invoice(id).await?;

    Ok(Json(json!({
        "invoice": cancelled.invoice,
        "reversal_journal_id": cancelled.reversal_journal_id,
    })))
}
