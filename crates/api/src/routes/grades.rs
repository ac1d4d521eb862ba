//! Grade recording and report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_db::GradeRepository;
use pelita_db::entities::sea_orm_active_enums::AssessmentKind;
use pelita_db::repositories::grade::{GradeFilter, RecordGradeInput};
use pelita_shared::types::{PageRequest, PageResponse};

/// Creates the grade router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/grades", get(list_grades).post(record_grade))
        .route(
            "/grades/{id}",
            axum::routing::put(correct_grade).delete(delete_grade),
        )
        .route("/students/{id}/report", get(student_report))
}

#[derive(Debug, Deserialize)]
struct RecordGradeRequest {
    student_id: Uuid,
    subject: String,
    term: String,
    assessment: AssessmentKind,
    score: Decimal,
}

#[derive(Debug, Deserialize)]
struct CorrectGradeRequest {
    score: Decimal,
}

#[derive(Debug, Deserialize)]
struct ListGradesQuery {
    #[serde(flatten)]
    page: PageRequest,
    student_id: Option<Uuid>,
    subject: Option<String>,
    term: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    term: String,
}

#[derive(Debug, Serialize)]
struct SubjectAverageResponse {
    subject: String,
    count: usize,
    average: Decimal,
}

/// POST /grades - Record a score.
async fn record_grade(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecordGradeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GradeRepository::new((*state.db).clone());
    let grade = repo
        .record(RecordGradeInput {
            student_id: payload.student_id,
            subject: payload.subject,
            term: payload.term,
            assessment: payload.assessment,
            score: payload.score,
            recorded_by: auth.user_id(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(grade)))
}

/// PUT /grades/{id} - Correct a score.
async fn correct_grade(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CorrectGradeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GradeRepository::new((*state.db).clone());
    let grade = repo.correct(id, payload.score).await?;

    Ok(Json(grade))
}

/// DELETE /grades/{id} - Remove a score.
async fn delete_grade(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = GradeRepository::new((*state.db).clone());
    repo.delete(id).await?;

    Ok(Json(json!({ "deleted": true })))
}

/// GET /grades - List grades.
async fn list_grades(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListGradesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GradeRepository::new((*state.db).clone());
    let (rows, total) = repo
        .list(
            GradeFilter {
                student_id: query.student_id,
                subject: query.subject,
                term: query.term,
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

/// GET /students/{id}/report?term=... - Per-subject averages for one term.
async fn student_report(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GradeRepository::new((*state.db).clone());
    let subjects: Vec<SubjectAverageResponse> = repo
        .report(id, &query.term)
        .await?
        .into_iter()
        .map(|s| SubjectAverageResponse {
            subject: s.subject,
            count: s.count,
            average: s.average,
        })
        .collect();

    Ok(Json(json!({
        "student_id": id,
        "term": query.term,
        "subjects": subjects,
    })))
}
