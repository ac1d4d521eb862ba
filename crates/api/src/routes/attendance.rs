//! Attendance routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_db::AttendanceRepository;
use pelita_db::entities::sea_orm_active_enums::AttendanceStatus;
use pelita_db::repositories::attendance::{AttendanceFilter, RecordAttendanceInput};
use pelita_shared::types::{PageRequest, PageResponse};

/// Creates the attendance router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(list_attendance).post(record_attendance))
        .route("/attendance/{id}", put(correct_attendance))
}

#[derive(Debug, Deserialize)]
struct RecordAttendanceRequest {
    student_id: Uuid,
    schedule_id: Uuid,
    record_date: NaiveDate,
    status: AttendanceStatus,
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CorrectAttendanceRequest {
    status: AttendanceStatus,
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListAttendanceQuery {
    #[serde(flatten)]
    page: PageRequest,
    student_id: Option<Uuid>,
    schedule_id: Option<Uuid>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

/// POST /attendance - Record attendance for one lesson.
async fn record_attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecordAttendanceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AttendanceRepository::new((*state.db).clone());
    let record = repo
        .record(RecordAttendanceInput {
            student_id: payload.student_id,
            schedule_id: payload.schedule_id,
            record_date: payload.record_date,
            status: payload.status,
            note: payload.note,
            recorded_by: auth.user_id(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /attendance/{id} - Correct a recorded status.
async fn correct_attendance(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CorrectAttendanceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AttendanceRepository::new((*state.db).clone());
    let record = repo.correct(id, payload.status, payload.note).await?;

    Ok(Json(record))
}

/// GET /attendance - List attendance records.
async fn list_attendance(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListAttendanceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AttendanceRepository::new((*state.db).clone());
    let (rows, total) = repo
        .list(
            AttendanceFilter {
                student_id: query.student_id,
                schedule_id: query.schedule_id,
                from: query.from,
                to: query.to,
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
