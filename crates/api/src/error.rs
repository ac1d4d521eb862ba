//! Maps repository and domain errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use pelita_db::repositories::{
    account::AccountError, attendance::AttendanceError, chat::ChatError,
    class_group::ClassGroupError, credit::CreditError, grade::GradeError, invoice::InvoiceError,
    journal::JournalError, student::StudentError, teacher::TeacherError,
};
use pelita_shared::error::AppError;

/// API error wrapper that renders as `{ "error": ..., "message": ... }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shorthand for a not-found response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// Shorthand for a validation response.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Shorthand for a forbidden response.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(AppError::Forbidden(message.into()))
    }

    /// Shorthand for an internal error response. The detail is logged, not
    /// returned to the client.
    #[must_use]
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "internal error");
        Self(AppError::Internal("An internal error occurred".into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        error!(error = %err, "database error");
        Self(AppError::Database("A database error occurred".into()))
    }
}

impl From<StudentError> for ApiError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::StudentNotFound(_) | StudentError::ClassGroupNotFound(_) => {
                Self(AppError::NotFound(err.to_string()))
            }
            StudentError::DuplicateNumber(_) => Self(AppError::Conflict(err.to_string())),
            StudentError::Database(e) => e.into(),
        }
    }
}

impl From<TeacherError> for ApiError {
    fn from(err: TeacherError) -> Self {
        match err {
            TeacherError::TeacherNotFound(_) => Self(AppError::NotFound(err.to_string())),
            TeacherError::DuplicateNumber(_) => Self(AppError::Conflict(err.to_string())),
            TeacherError::Database(e) => e.into(),
        }
    }
}

impl From<ClassGroupError> for ApiError {
    fn from(err: ClassGroupError) -> Self {
        match err {
            ClassGroupError::ClassGroupNotFound(_)
            | ClassGroupError::ScheduleNotFound(_)
            | ClassGroupError::TeacherNotFound(_) => Self(AppError::NotFound(err.to_string())),
            ClassGroupError::InvalidSlot(_) => Self(AppError::Validation(err.to_string())),
            ClassGroupError::ScheduleConflict(_) | ClassGroupError::HasStudents(_) => {
                Self(AppError::Conflict(err.to_string()))
            }
            ClassGroupError::Database(e) => e.into(),
        }
    }
}

impl From<AttendanceError> for ApiError {
    fn from(err: AttendanceError) -> Self {
        match err {
            AttendanceError::RecordNotFound(_)
            | AttendanceError::StudentNotFound(_)
            | AttendanceError::ScheduleNotFound(_) => Self(AppError::NotFound(err.to_string())),
            AttendanceError::AlreadyRecorded { .. } => Self(AppError::Conflict(err.to_string())),
            AttendanceError::Database(e) => e.into(),
        }
    }
}

impl From<GradeError> for ApiError {
    fn from(err: GradeError) -> Self {
        match err {
            GradeError::GradeNotFound(_) | GradeError::StudentNotFound(_) => {
                Self(AppError::NotFound(err.to_string()))
            }
            GradeError::InvalidScore(_) => Self(AppError::Validation(err.to_string())),
            GradeError::Database(e) => e.into(),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::AccountNotFound(_) => Self(AppError::NotFound(err.to_string())),
            AccountError::DuplicateCode(_) | AccountError::RoleTaken(_) => {
                Self(AppError::Conflict(err.to_string()))
            }
            AccountError::HasJournalEntries(_) | AccountError::CannotDeleteWithEntries(_) => {
                Self(AppError::BusinessRule(err.to_string()))
            }
            AccountError::Database(e) => e.into(),
        }
    }
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::JournalNotFound(_) => Self(AppError::NotFound(err.to_string())),
            JournalError::Database(e) => e.into(),
        }
    }
}

impl From<InvoiceError> for ApiError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::InvoiceNotFound(_) | InvoiceError::StudentNotFound(_) => {
                Self(AppError::NotFound(err.to_string()))
            }
            InvoiceError::NonPositiveAmount(_) => Self(AppError::Validation(err.to_string())),
            InvoiceError::AlreadyCancelled(_) | InvoiceError::AlreadyPaid(_) => {
                Self(AppError::BusinessRule(err.to_string()))
            }
            InvoiceError::Database(e) => e.into(),
        }
    }
}

impl From<CreditError> for ApiError {
    fn from(err: CreditError) -> Self {
        match err {
            CreditError::PackageNotFound(_) | CreditError::StudentNotFound(_) => {
                Self(AppError::NotFound(err.to_string()))
            }
            CreditError::PackageInactive(_) => Self(AppError::BusinessRule(err.to_string())),
            CreditError::Balance(inner) => match inner {
                pelita_core::credit::CreditError::InsufficientBalance { .. } => {
                    Self(AppError::BusinessRule(inner.to_string()))
                }
                pelita_core::credit::CreditError::NonPositiveHours(_) => {
                    Self(AppError::Validation(inner.to_string()))
                }
            },
            CreditError::Database(e) => e.into(),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::RecipientNotFound(_) => Self(AppError::NotFound(err.to_string())),
            ChatError::EmptyBody | ChatError::SelfMessage => {
                Self(AppError::Validation(err.to_string()))
            }
            ChatError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[rstest]
    #[case::invoice_missing(ApiError::from(InvoiceError::InvoiceNotFound(Uuid::nil())), 404)]
    #[case::already_cancelled(ApiError::from(InvoiceError::AlreadyCancelled(Uuid::nil())), 422)]
    #[case::bad_amount(ApiError::from(InvoiceError::NonPositiveAmount(Decimal::ZERO)), 400)]
    #[case::duplicate_number(ApiError::from(StudentError::DuplicateNumber("S-001".into())), 409)]
    #[case::schedule_clash(ApiError::from(ClassGroupError::ScheduleConflict(Uuid::nil())), 409)]
    #[case::journal_missing(ApiError::from(JournalError::JournalNotFound(Uuid::nil())), 404)]
    #[case::account_referenced(ApiError::from(AccountError::CannotDeleteWithEntries(3)), 422)]
    #[case::empty_chat_body(ApiError::from(ChatError::EmptyBody), 400)]
    fn test_repository_errors_map_to_expected_status(#[case] err: ApiError, #[case] status: u16) {
        assert_eq!(err.0.status_code(), status);
    }
}
