//! Authentication routes for login, register, token refresh, and logout.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_core::auth::{hash_password, verify_password};
use pelita_db::{SessionRepository, UserRepository, entities::sea_orm_active_enums::UserRole};
use pelita_shared::auth::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RegisterRequest, UserInfo,
};
use pelita_shared::error::AppError;
use pelita_shared::jwt::JwtError;

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Creates auth routes that require an authenticated user.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_repo = UserRepository::new((*state.db).clone());
    let session_repo = SessionRepository::new((*state.db).clone());

    let Some(user) = user_repo.find_by_email(&payload.email).await? else {
        info!(email = %payload.email, "Login attempt for non-existent user");
        return Err(AppError::Unauthorized("Invalid email or password".into()).into());
    };

    if !user.is_active {
        return Err(AppError::Unauthorized("This account has been disabled".into()).into());
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt");
            return Err(AppError::Unauthorized("Invalid email or password".into()).into());
        }
        Err(e) => return Err(ApiError::internal(e)),
    }

    let role = role_to_string(&user.role);
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &role)
        .map_err(ApiError::internal)?;
    let refresh_token = state
        .jwt_service
        .generate_refresh_token(user.id, &role)
        .map_err(ApiError::internal)?;

    let expires_at = Utc::now() + Duration::days(state.jwt_service.refresh_token_expires_days());
    session_repo
        .create(user.id, &refresh_token, expires_at, None, None)
        .await?;

    info!(user_id = %user.id, "User logged in");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role,
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_repo = UserRepository::new((*state.db).clone());

    if payload.password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    let role = match payload.role.as_deref() {
        None | Some("staff") => UserRole::Staff,
        Some("admin") => UserRole::Admin,
        Some("teacher") => UserRole::Teacher,
        Some(other) => {
            return Err(ApiError::validation(format!("Unknown role '{other}'")));
        }
    };

    if user_repo.email_exists(&payload.email).await? {
        return Err(ApiError(AppError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&payload.password).map_err(ApiError::internal)?;

    let user = user_repo
        .create(&payload.email, &password_hash, &payload.full_name, role)
        .await?;

    info!(user_id = %user.id, email = %user.email, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user": {
                "id": user.id,
                "email": user.email,
                "full_name": user.full_name,
                "role": role_to_string(&user.role),
            }
        })),
    ))
}

/// POST /auth/refresh - Refresh access token using refresh token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token)
        .map_err(|e| match e {
            JwtError::Expired => ApiError(AppError::Unauthorized("Refresh token has expired".into())),
            _ => ApiError(AppError::Unauthorized("Invalid refresh token".into())),
        })?;

    // The session must still be active; a revoked token is dead even when
    // the JWT itself has not expired.
    let session_repo = SessionRepository::new((*state.db).clone());
    let session = session_repo.find_by_token(&payload.refresh_token).await?;
    match session {
        Some(s) if s.expires_at > Utc::now() => {}
        _ => {
            return Err(
                AppError::Unauthorized("Refresh token has been revoked or expired".into()).into(),
            );
        }
    }

    let access_token = state
        .jwt_service
        .generate_access_token(claims.user_id(), &claims.role)
        .map_err(ApiError::internal)?;

    Ok(Json(json!({
        "access_token": access_token,
        "expires_in": state.jwt_service.access_token_expires_in(),
    })))
}

/// POST /auth/logout - Revoke the refresh token's session.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session_repo = SessionRepository::new((*state.db).clone());
    let revoked = session_repo.revoke_by_token(&payload.refresh_token).await?;

    if !revoked {
        error!("Logout with unknown refresh token");
    }

    Ok(Json(json!({ "revoked": revoked })))
}

/// GET /auth/me - Current authenticated user.
async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User no longer exists"))?;

    Ok(Json(UserInfo {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        role: role_to_string(&user.role),
    }))
}

/// Converts `UserRole` enum to string.
fn role_to_string(role: &UserRole) -> String {
    match role {
        UserRole::Admin => "admin".to_string(),
        UserRole::Staff => "staff".to_string(),
        UserRole::Teacher => "teacher".to_string(),
    }
}
