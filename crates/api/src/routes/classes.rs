//! Class group and timetable routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_db::ClassGroupRepository;
use pelita_db::repositories::class_group::{
    CreateClassGroupInput, ScheduleInput, UpdateClassGroupInput,
};
use pelita_shared::types::{PageRequest, PageResponse};

/// Creates the class group router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes).post(create_class))
        .route(
            "/classes/{id}",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route(
            "/classes/{id}/schedules",
            get(list_schedules).post(add_schedule),
        )
        .route(
            "/schedules/{id}",
            axum::routing::put(update_schedule).delete(delete_schedule),
        )
}

#[derive(Debug, Deserialize)]
struct CreateClassRequest {
    name: String,
    academic_year: String,
    homeroom_teacher_id: Option<Uuid>,
    #[serde(default = "default_capacity")]
    capacity: i32,
}

fn default_capacity() -> i32 {
    30
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpdateClassRequest {
    name: Option<String>,
    academic_year: Option<String>,
    homeroom_teacher_id: Option<Option<Uuid>>,
    capacity: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ScheduleRequest {
    teacher_id: Uuid,
    subject: String,
    day_of_week: i16,
    starts_at: NaiveTime,
    ends_at: NaiveTime,
    room: Option<String>,
}

impl From<ScheduleRequest> for ScheduleInput {
    fn from(req: ScheduleRequest) -> Self {
        Self {
            teacher_id: req.teacher_id,
            subject: req.subject,
            day_of_week: req.day_of_week,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            room: req.room,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListClassesQuery {
    #[serde(flatten)]
    page: PageRequest,
    academic_year: Option<String>,
}

/// POST /classes - Create a class group.
async fn create_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    if payload.capacity <= 0 {
        return Err(ApiError::validation("Capacity must be positive"));
    }

    let repo = ClassGroupRepository::new((*state.db).clone());
    let group = repo
        .create(CreateClassGroupInput {
            name: payload.name,
            academic_year: payload.academic_year,
            homeroom_teacher_id: payload.homeroom_teacher_id,
            capacity: payload.capacity,
        })
        .await?;

    info!(class = %group.name, year = %group.academic_year, "Class group created");

    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /classes - List class groups.
async fn list_classes(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListClassesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ClassGroupRepository::new((*state.db).clone());
    let (rows, total) = repo.list(query.academic_year, &query.page).await?;

    Ok(Json(PageResponse::new(
        rows,
        query.page.page,
        query.page.per_page,
        total,
    )))
}

/// GET /classes/{id} - Fetch one class group.
async fn get_class(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ClassGroupRepository::new((*state.db).clone());
    let group = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Class group not found: {id}")))?;

    Ok(Json(group))
}

/// PUT /classes/{id} - Update a class group.
async fn update_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    if let Some(capacity) = payload.capacity
        && capacity <= 0
    {
        return Err(ApiError::validation("Capacity must be positive"));
    }

    let repo = ClassGroupRepository::new((*state.db).clone());
    let group = repo
        .update(
            id,
            UpdateClassGroupInput {
                name: payload.name,
                academic_year: payload.academic_year,
                homeroom_teacher_id: payload.homeroom_teacher_id,
                capacity: payload.capacity,
            },
        )
        .await?;

    Ok(Json(group))
}

/// DELETE /classes/{id} - Delete an empty class group.
async fn delete_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = ClassGroupRepository::new((*state.db).clone());
    repo.delete(id).await?;

    Ok(Json(json!({ "deleted": true })))
}

/// GET /classes/{id}/schedules - Timetable for a class group.
async fn list_schedules(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ClassGroupRepository::new((*state.db).clone());
    let schedules = repo.list_schedules(id).await?;

    Ok(Json(schedules))
}

/// POST /classes/{id}/schedules - Add a timetable slot.
async fn add_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = ClassGroupRepository::new((*state.db).clone());
    let schedule = repo.add_schedule(id, payload.into()).await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

/// PUT /schedules/{id} - Replace a timetable slot.
async fn update_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = ClassGroupRepository::new((*state.db).clone());
    let schedule = repo.update_schedule(id, payload.into()).await?;

    Ok(Json(schedule))
}

/// DELETE /schedules/{id} - Remove a timetable slot.
async fn delete_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = ClassGroupRepository::new((*state.db).clone());
    repo.delete_schedule(id).await?;

    Ok(Json(json!({ "deleted": true })))
}
