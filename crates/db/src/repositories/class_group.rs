//! Class group and schedule repository.
//!
//! Schedule writes run the timetable conflict check against all existing
//! slots for the same day before inserting or updating.

use chrono::{NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{class_groups, schedules, students, teachers};
use pelita_core::schedule::{Slot, conflicts, validate_slot};
use pelita_shared::types::PageRequest;

/// Error types for class group and schedule operations.
#[derive(Debug, thiserror::Error)]
pub enum ClassGroupError {
    /// Class group not found.
    #[error("Class group not found: {0}")]
    ClassGroupNotFound(Uuid),

    /// Schedule not found.
    #[error("Schedule not found: {0}")]
    ScheduleNotFound(Uuid),

    /// Teacher not found.
    #[error("Teacher not found: {0}")]
    TeacherNotFound(Uuid),

    /// The slot is malformed (bad day or empty time range).
    #[error(transparent)]
    InvalidSlot(#[from] pelita_core::schedule::ScheduleError),

    /// The slot overlaps an existing one for the same class or teacher.
    #[error("Schedule conflicts with existing slot {0}")]
    ScheduleConflict(Uuid),

    /// The class group still has students assigned.
    #[error("Class group {0} still has students assigned")]
    HasStudents(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a class group.
#[derive(Debug, Clone)]
pub struct CreateClassGroupInput {
    /// Display name, e.g. "7A".
    pub name: String,
    /// Academic year, e.g. "2026/2027".
    pub academic_year: String,
    /// Homeroom teacher.
    pub homeroom_teacher_id: Option<Uuid>,
    /// Maximum number of students.
    pub capacity: i32,
}

/// Input for updating a class group. `None` leaves the field unchanged;
/// `homeroom_teacher_id` uses `Some(None)` to unassign.
#[derive(Debug, Clone, Default)]
pub struct UpdateClassGroupInput {
    /// Display name.
    pub name: Option<String>,
    /// Academic year.
    pub academic_year: Option<String>,
    /// Homeroom teacher.
    pub homeroom_teacher_id: Option<Option<Uuid>>,
    /// Maximum number of students.
    pub capacity: Option<i32>,
}

/// Input for creating or replacing a schedule slot.
#[derive(Debug, Clone)]
pub struct ScheduleInput {
    /// Teacher giving the lesson.
    pub teacher_id: Uuid,
    /// Subject name.
    pub subject: String,
    /// Day of week, 1 = Monday through 7 = Sunday.
    pub day_of_week: i16,
    /// Start time.
    pub starts_at: NaiveTime,
    /// End time (exclusive).
    pub ends_at: NaiveTime,
    /// Room label.
    pub room: Option<String>,
}

/// Class group repository, also owning the timetable.
#[derive(Debug, Clone)]
pub struct ClassGroupRepository {
    db: DatabaseConnection,
}

impl ClassGroupRepository {
    /// Creates a new class group repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a class group.
    pub async fn create(
        &self,
        input: CreateClassGroupInput,
    ) -> Result<class_groups::Model, ClassGroupError> {
        if let Some(teacher_id) = input.homeroom_teacher_id {
            self.ensure_teacher(teacher_id).await?;
        }

        let now = Utc::now().into();
        let group = class_groups::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            academic_year: Set(input.academic_year),
            homeroom_teacher_id: Set(input.homeroom_teacher_id),
            capacity: Set(input.capacity),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(group.insert(&self.db).await?)
    }

    /// Finds a class group by ID.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<class_groups::Model>, ClassGroupError> {
        Ok(class_groups::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists class groups with total count.
    pub async fn list(
        &self,
        academic_year: Option<String>,
        page: &PageRequest,
    ) -> Result<(Vec<class_groups::Model>, u64), ClassGroupError> {
        let mut query = class_groups::Entity::find();

        if let Some(year) = academic_year {
            query = query.filter(class_groups::Column::AcademicYear.eq(year));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_asc(class_groups::Column::AcademicYear)
            .order_by_asc(class_groups::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Updates a class group.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateClassGroupInput,
    ) -> Result<class_groups::Model, ClassGroupError> {
        let group = class_groups::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ClassGroupError::ClassGroupNotFound(id))?;

        if let Some(Some(teacher_id)) = input.homeroom_teacher_id {
            self.ensure_teacher(teacher_id).await?;
        }

        let mut active: class_groups::ActiveModel = group.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(academic_year) = input.academic_year {
            active.academic_year = Set(academic_year);
        }
        if let Some(homeroom_teacher_id) = input.homeroom_teacher_id {
            active.homeroom_teacher_id = Set(homeroom_teacher_id);
        }
        if let Some(capacity) = input.capacity {
            active.capacity = Set(capacity);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a class group. Refused while students are still assigned.
    pub async fn delete(&self, id: Uuid) -> Result<(), ClassGroupError> {
        let group = class_groups::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ClassGroupError::ClassGroupNotFound(id))?;

        let student_count = students::Entity::find()
            .filter(students::Column::ClassGroupId.eq(id))
            .count(&self.db)
            .await?;
        if student_count > 0 {
            return Err(ClassGroupError::HasStudents(id));
        }

        schedules::Entity::delete_many()
            .filter(schedules::Column::ClassGroupId.eq(id))
            .exec(&self.db)
            .await?;
        group.delete(&self.db).await?;

        Ok(())
    }

    /// Lists the timetable for a class group, ordered by day and start time.
    pub async fn list_schedules(
        &self,
        class_group_id: Uuid,
    ) -> Result<Vec<schedules::Model>, ClassGroupError> {
        self.ensure_class_group(class_group_id).await?;

        Ok(schedules::Entity::find()
            .filter(schedules::Column::ClassGroupId.eq(class_group_id))
            .order_by_asc(schedules::Column::DayOfWeek)
            .order_by_asc(schedules::Column::StartsAt)
            .all(&self.db)
            .await?)
    }

    /// Adds a schedule slot after validating and conflict-checking it.
    pub async fn add_schedule(
        &self,
        class_group_id: Uuid,
        input: ScheduleInput,
    ) -> Result<schedules::Model, ClassGroupError> {
        self.ensure_class_group(class_group_id).await?;
        self.ensure_teacher(input.teacher_id).await?;

        let candidate = Slot {
            class_group_id,
            teacher_id: input.teacher_id,
            day_of_week: input.day_of_week,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
        };
        validate_slot(&candidate)?;
        self.check_conflicts(&candidate, None).await?;

        let now = Utc::now().into();
        let schedule = schedules::ActiveModel {
            id: Set(Uuid::now_v7()),
            class_group_id: Set(class_group_id),
            teacher_id: Set(input.teacher_id),
            subject: Set(input.subject),
            day_of_week: Set(input.day_of_week),
            starts_at: Set(input.starts_at),
            ends_at: Set(input.ends_at),
            room: Set(input.room),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(schedule.insert(&self.db).await?)
    }

    /// Replaces a schedule slot, re-running the conflict check against all
    /// other slots.
    pub async fn update_schedule(
        &self,
        schedule_id: Uuid,
        input: ScheduleInput,
    ) -> Result<schedules::Model, ClassGroupError> {
        let schedule = schedules::Entity::find_by_id(schedule_id)
            .one(&self.db)
            .await?
            .ok_or(ClassGroupError::ScheduleNotFound(schedule_id))?;
        self.ensure_teacher(input.teacher_id).await?;

        let candidate = Slot {
            class_group_id: schedule.class_group_id,
            teacher_id: input.teacher_id,
            day_of_week: input.day_of_week,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
        };
        validate_slot(&candidate)?;
        self.check_conflicts(&candidate, Some(schedule_id)).await?;

        let mut active: schedules::ActiveModel = schedule.into();
        active.teacher_id = Set(input.teacher_id);
        active.subject = Set(input.subject);
        active.day_of_week = Set(input.day_of_week);
        active.starts_at = Set(input.starts_at);
        active.ends_at = Set(input.ends_at);
        active.room = Set(input.room);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Removes a schedule slot.
    pub async fn delete_schedule(&self, schedule_id: Uuid) -> Result<(), ClassGroupError> {
        let schedule = schedules::Entity::find_by_id(schedule_id)
            .one(&self.db)
            .await?
            .ok_or(ClassGroupError::ScheduleNotFound(schedule_id))?;

        schedule.delete(&self.db).await?;
        Ok(())
    }

    /// Runs the conflict check against every slot sharing the candidate's
    /// day. `exclude` skips the slot being updated.
    async fn check_conflicts(
        &self,
        candidate: &Slot,
        exclude: Option<Uuid>,
    ) -> Result<(), ClassGroupError> {
        let mut query = schedules::Entity::find()
            .filter(schedules::Column::DayOfWeek.eq(candidate.day_of_week));
        if let Some(id) = exclude {
            query = query.filter(schedules::Column::Id.ne(id));
        }
        let rows = query.all(&self.db).await?;

        for row in &rows {
            let slot = Slot {
                class_group_id: row.class_group_id,
                teacher_id: row.teacher_id,
                day_of_week: row.day_of_week,
                starts_at: row.starts_at,
                ends_at: row.ends_at,
            };
            if conflicts(candidate, &slot) {
                return Err(ClassGroupError::ScheduleConflict(row.id));
            }
        }

        Ok(())
    }

    async fn ensure_class_group(&self, id: Uuid) -> Result<(), ClassGroupError> {
        class_groups::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ClassGroupError::ClassGroupNotFound(id))?;
        Ok(())
    }

    async fn ensure_teacher(&self, id: Uuid) -> Result<(), ClassGroupError> {
        teachers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ClassGroupError::TeacherNotFound(id))?;
        Ok(())
    }
}
