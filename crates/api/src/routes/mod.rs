//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod accounts;
pub mod attendance;
pub mod auth;
pub mod chat;
pub mod classes;
pub mod credits;
pub mod grades;
pub mod health;
pub mod invoices;
pub mod journals;
pub mod students;
pub mod teachers;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(students::routes())
        .merge(teachers::routes())
        .merge(classes::routes())
        .merge(attendance::routes())
        .merge(grades::routes())
        .merge(accounts::routes())
        .merge(journals::routes())
        .merge(invoices::routes())
        .merge(credits::routes())
        .merge(chat::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
