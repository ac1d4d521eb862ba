//! Student management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_db::StudentRepository;
use pelita_db::entities::sea_orm_active_enums::StudentStatus;
use pelita_db::repositories::student::{CreateStudentInput, StudentFilter, UpdateStudentInput};
use pelita_shared::types::{PageRequest, PageResponse};

/// Creates the student router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(deactivate_student),
        )
        .route("/students/{id}/deactivate", post(deactivate_student))
}

#[derive(Debug, Deserialize)]
struct CreateStudentRequest {
    student_number: String,
    full_name: String,
    guardian_name: Option<String>,
    guardian_phone: Option<String>,
    address: Option<String>,
    class_group_id: Option<Uuid>,
    enrolled_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpdateStudentRequest {
    full_name: Option<String>,
    guardian_name: Option<Option<String>>,
    guardian_phone: Option<Option<String>>,
    address: Option<Option<String>>,
    class_group_id: Option<Option<Uuid>>,
    status: Option<StudentStatus>,
}

#[derive(Debug, Deserialize)]
struct ListStudentsQuery {
    #[serde(flatten)]
    page: PageRequest,
    status: Option<StudentStatus>,
    class_group_id: Option<Uuid>,
    search: Option<String>,
}

/// POST /students - Enroll a student.
async fn create_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    if payload.full_name.trim().is_empty() {
        return Err(ApiError::validation("Full name must not be empty"));
    }

    let repo = StudentRepository::new((*state.db).clone());
    let student = repo
        .create(CreateStudentInput {
            student_number: payload.student_number,
            full_name: payload.full_name,
            guardian_name: payload.guardian_name,
            guardian_phone: payload.guardian_phone,
            address: payload.address,
            class_group_id: payload.class_group_id,
            enrolled_on: payload.enrolled_on,
        })
        .await?;

    info!(student = %student.student_number, "Student enrolled");

    Ok((StatusCode::CREATED, Json(student)))
}

/// GET /students - List students.
async fn list_students(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListStudentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = StudentRepository::new((*state.db).clone());
    let (rows, total) = repo
        .list(
            StudentFilter {
                status: query.status,
                class_group_id: query.class_group_id,
                search: query.search,
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

/// GET /students/{id} - Fetch one student.
async fn get_student(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = StudentRepository::new((*state.db).clone());
    let student = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Student not found: {id}")))?;

    Ok(Json(student))
}

/// PUT /students/{id} - Update a student.
async fn update_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = StudentRepository::new((*state.db).clone());
    let student = repo
        .update(
            id,
            UpdateStudentInput {
                full_name: payload.full_name,
                guardian_name: payload.guardian_name,
                guardian_phone: payload.guardian_phone,
                address: payload.address,
                class_group_id: payload.class_group_id,
                status: payload.status,
            },
        )
        .await?;

    Ok(Json(student))
}

/// DELETE /students/{id} - Mark a student inactive.
async fn deactivate_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_staff()?;

    let repo = StudentRepository::new((*state.db).clone());
    let student = repo.deactivate(id).await?;

    info!(student = %student.student_number, "Student deactivated");

    Ok(Json(student))
}
