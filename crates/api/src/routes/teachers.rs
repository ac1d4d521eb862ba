//! Teacher management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_db::TeacherRepository;
use pelita_db::repositories::teacher::{CreateTeacherInput, UpdateTeacherInput};
use pelita_shared::types::{PageRequest, PageResponse};

/// Creates the teacher router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teachers", get(list_teachers).post(create_teacher))
        .route(
            "/teachers/{id}",
            get(get_teacher).put(update_teacher).delete(deactivate_teacher),
        )
}

#[derive(Debug, Deserialize)]
struct CreateTeacherRequest {
    staff_number: String,
    full_name: String,
    email: Option<String>,
    phone: Option<String>,
    subject: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpdateTeacherRequest {
    full_name: Option<String>,
    email: Option<Option<String>>,
    phone: Option<Option<String>>,
    subject: Option<Option<String>>,
    is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ListTeachersQuery {
    #[serde(flatten)]
    page: PageRequest,
    search: Option<String>,
}

/// POST /teachers - Register a teacher.
async fn create_teacher(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTeacherRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    if payload.full_name.trim().is_empty() {
        return Err(ApiError::validation("Full name must not be empty"));
    }

    let repo = TeacherRepository::new((*state.db).clone());
    let teacher = repo
        .create(CreateTeacherInput {
            staff_number: payload.staff_number,
            full_name: payload.full_name,
            email: payload.email,
            phone: payload.phone,
            subject: payload.subject,
        })
        .await?;

    info!(teacher = %teacher.staff_number, "Teacher registered");

    Ok((StatusCode::CREATED, Json(teacher)))
}

/// GET /teachers - List teachers.
async fn list_teachers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListTeachersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TeacherRepository::new((*state.db).clone());
    let (rows, total) = repo.list(query.search, &query.page).await?;

    Ok(Json(PageResponse::new(
        rows,
        query.page.page,
        query.page.per_page,
        total,
    )))
}

/// GET /teachers/{id} - Fetch one teacher.
async fn get_teacher(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TeacherRepository::new((*state.db).clone());
    let teacher = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Teacher not found: {id}")))?;

    Ok(Json(teacher))
}

/// PUT /teachers/{id} - Update a teacher.
async fn update_teacher(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTeacherRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = TeacherRepository::new((*state.db).clone());
    let teacher = repo
        .update(
            id,
            UpdateTeacherInput {
                full_name: payload.full_name,
                email: payload.email,
                phone: payload.phone,
                subject: payload.subject,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(Json(teacher))
}

/// DELETE /teachers/{id} - Mark a teacher inactive.
async fn deactivate_teacher(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = TeacherRepository::new((*state.db).clone());
    let teacher = repo.deactivate(id).await?;

    info!(teacher = %teacher.staff_number, "Teacher deactivated");

    Ok(Json(teacher))
}
