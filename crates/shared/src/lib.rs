//! Shared types, errors, and configuration for Pelita.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for the finance domain
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - JWT token handling and claims
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
