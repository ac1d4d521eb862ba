//! Journal listing routes. Journals are written only by invoice posting and
//! cancellation; this surface is read-only.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_db::JournalRepository;
use pelita_db::entities::sea_orm_active_enums::JournalKind;
use pelita_db::repositories::journal::JournalFilter;
use pelita_shared::types::{PageRequest, PageResponse};

/// Creates the journal router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journals", get(list_journals))
        .route("/journals/{id}", get(get_journal))
}

#[derive(Debug, Deserialize)]
struct ListJournalsQuery {
    #[serde(flatten)]
    page: PageRequest,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    kind: Option<JournalKind>,
}

/// GET /journals - List journals.
async fn list_journals(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListJournalsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = JournalRepository::new((*state.db).clone());
    let (rows, total) = repo
        .list_journals(
            JournalFilter {
                from: query.from,
                to: query.to,
                kind: query.kind,
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

/// GET /journals/{id} - Fetch a journal with its entries.
async fn get_journal(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = JournalRepository::new((*state.db).clone());
    let found = repo
        .find_journal_with_entries(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Journal not found: {id}")))?;

    Ok(Json(json!({
        "journal": found.journal,
        "entries": found.entries,
    })))
}
