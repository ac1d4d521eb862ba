//! Attendance repository.
//!
//! One record per student, schedule slot, and date; the unique constraint
//! backs that rule and duplicate inserts surface as a conflict error.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RuntimeErr, Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::{attendance_records, schedules, sea_orm_active_enums::AttendanceStatus, students};
use pelita_shared::types::PageRequest;

/// Error types for attendance operations.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    /// Attendance record not found.
    #[error("Attendance record not found: {0}")]
    RecordNotFound(Uuid),

    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Schedule not found.
    #[error("Schedule not found: {0}")]
    ScheduleNotFound(Uuid),

    /// A record for this student, slot, and date already exists.
    #[error("Attendance already recorded for student {student_id} on {record_date}")]
    AlreadyRecorded {
        /// The student.
        student_id: Uuid,
        /// The date.
        record_date: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording attendance.
#[derive(Debug, Clone)]
pub struct RecordAttendanceInput {
    /// The student.
    pub student_id: Uuid,
    /// The schedule slot attended.
    pub schedule_id: Uuid,
    /// The calendar date of the lesson.
    pub record_date: NaiveDate,
    /// Present, sick, excused, or absent.
    pub status: AttendanceStatus,
    /// Free-text note.
    pub note: Option<String>,
    /// Recording user.
    pub recorded_by: Uuid,
}

/// Filter options for listing attendance records.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    /// Filter by student.
    pub student_id: Option<Uuid>,
    /// Filter by schedule slot.
    pub schedule_id: Option<Uuid>,
    /// Start date (inclusive).
    pub from: Option<NaiveDate>,
    /// End date (inclusive).
    pub to: Option<NaiveDate>,
}

/// Attendance repository.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    db: DatabaseConnection,
}

impl AttendanceRepository {
    /// Creates a new attendance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records attendance for a student on one scheduled lesson.
    pub async fn record(
        &self,
        input: RecordAttendanceInput,
    ) -> Result<attendance_records::Model, AttendanceError> {
        students::Entity::find_by_id(input.student_id)
            .one(&self.db)
            .await?
            .ok_or(AttendanceError::StudentNotFound(input.student_id))?;
        schedules::Entity::find_by_id(input.schedule_id)
            .one(&self.db)
            .await?
            .ok_or(AttendanceError::ScheduleNotFound(input.schedule_id))?;

        let now = Utc::now().into();
        let record = attendance_records::ActiveModel {
            id: Set(Uuid::now_v7()),
            student_id: Set(input.student_id),
            schedule_id: Set(input.schedule_id),
            record_date: Set(input.record_date),
            status: Set(input.status),
            note: Set(input.note),
            recorded_by: Set(input.recorded_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match record.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(err) if is_unique_violation(&err) => Err(AttendanceError::AlreadyRecorded {
                student_id: input.student_id,
                record_date: input.record_date,
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Corrects the status and note of an existing record.
    pub async fn correct(
        &self,
        id: Uuid,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> Result<attendance_records::Model, AttendanceError> {
        let record = attendance_records::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AttendanceError::RecordNotFound(id))?;

        let mut active: attendance_records::ActiveModel = record.into();
        active.status = Set(status);
        active.note = Set(note);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Lists attendance records, newest date first, with total count.
    pub async fn list(
        &self,
        filter: AttendanceFilter,
        page: &PageRequest,
    ) -> Result<(Vec<attendance_records::Model>, u64), AttendanceError> {
        let mut query = attendance_records::Entity::find();

        if let Some(student_id) = filter.student_id {
            query = query.filter(attendance_records::Column::StudentId.eq(student_id));
        }
        if let Some(schedule_id) = filter.schedule_id {
            query = query.filter(attendance_records::Column::ScheduleId.eq(schedule_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(attendance_records::Column::RecordDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(attendance_records::Column::RecordDate.lte(to));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(attendance_records::Column::RecordDate)
            .order_by_asc(attendance_records::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => true,
        _ => matches!(err, DbErr::Query(RuntimeErr::SqlxError(_)) if err.to_string().contains("duplicate key")),
    }
}
