//! Student repository for enrollment records.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{class_groups, sea_orm_active_enums::StudentStatus, students};
use pelita_shared::types::PageRequest;

/// Error types for student operations.
#[derive(Debug, thiserror::Error)]
pub enum StudentError {
    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Student number already in use.
    #[error("Student number already in use: {0}")]
    DuplicateNumber(String),

    /// Class group not found.
    #[error("Class group not found: {0}")]
    ClassGroupNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a student.
#[derive(Debug, Clone)]
pub struct CreateStudentInput {
    /// Unique student number.
    pub student_number: String,
    /// Full name.
    pub full_name: String,
    /// Guardian name.
    pub guardian_name: Option<String>,
    /// Guardian phone.
    pub guardian_phone: Option<String>,
    /// Home address.
    pub address: Option<String>,
    /// Initial class group assignment.
    pub class_group_id: Option<Uuid>,
    /// Enrollment date; defaults to today.
    pub enrolled_on: Option<NaiveDate>,
}

/// Input for updating a student. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateStudentInput {
    /// New full name.
    pub full_name: Option<String>,
    /// New guardian name.
    pub guardian_name: Option<Option<String>>,
    /// New guardian phone.
    pub guardian_phone: Option<Option<String>>,
    /// New address.
    pub address: Option<Option<String>>,
    /// New class group assignment.
    pub class_group_id: Option<Option<Uuid>>,
    /// New status.
    pub status: Option<StudentStatus>,
}

/// Filter options for listing students.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    /// Filter by status.
    pub status: Option<StudentStatus>,
    /// Filter by class group.
    pub class_group_id: Option<Uuid>,
    /// Case-insensitive name or number search.
    pub search: Option<String>,
}

/// Student repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    db: DatabaseConnection,
}

impl StudentRepository {
    /// Creates a new student repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a student.
    pub async fn create(&self, input: CreateStudentInput) -> Result<students::Model, StudentError> {
        let existing = students::Entity::find()
            .filter(students::Column::StudentNumber.eq(&input.student_number))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(StudentError::DuplicateNumber(input.student_number));
        }

        if let Some(class_group_id) = input.class_group_id {
            self.ensure_class_group(class_group_id).await?;
        }

        let now = Utc::now().into();
        let student = students::ActiveModel {
            id: Set(Uuid::now_v7()),
            student_number: Set(input.student_number),
            full_name: Set(input.full_name),
            guardian_name: Set(input.guardian_name),
            guardian_phone: Set(input.guardian_phone),
            address: Set(input.address),
            class_group_id: Set(input.class_group_id),
            status: Set(StudentStatus::Active),
            enrolled_on: Set(input.enrolled_on.unwrap_or_else(|| Utc::now().date_naive())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(student.insert(&self.db).await?)
    }

    /// Finds a student by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<students::Model>, StudentError> {
        Ok(students::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists students with total count.
    pub async fn list(
        &self,
        filter: StudentFilter,
        page: &PageRequest,
    ) -> Result<(Vec<students::Model>, u64), StudentError> {
        let mut query = students::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(students::Column::Status.eq(status));
        }
        if let Some(class_group_id) = filter.class_group_id {
            query = query.filter(students::Column::ClassGroupId.eq(class_group_id));
        }
        if let Some(search) = filter.search {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(students::Column::FullName.like(pattern.clone()))
                    .add(students::Column::StudentNumber.like(pattern)),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_asc(students::Column::StudentNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Updates a student.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateStudentInput,
    ) -> Result<students::Model, StudentError> {
        let student = students::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StudentError::StudentNotFound(id))?;

        if let Some(Some(class_group_id)) = input.class_group_id {
            self.ensure_class_group(class_group_id).await?;
        }

        let mut active: students::ActiveModel = student.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(guardian_name) = input.guardian_name {
            active.guardian_name = Set(guardian_name);
        }
        if let Some(guardian_phone) = input.guardian_phone {
            active.guardian_phone = Set(guardian_phone);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(class_group_id) = input.class_group_id {
            active.class_group_id = Set(class_group_id);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Marks a student inactive. Records stay for history.
    pub async fn deactivate(&self, id: Uuid) -> Result<students::Model, StudentError> {
        let student = students::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StudentError::StudentNotFound(id))?;

        let mut active: students::ActiveModel = student.into();
        active.status = Set(StudentStatus::Inactive);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    async fn ensure_class_group(&self, id: Uuid) -> Result<(), StudentError> {
        class_groups::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StudentError::ClassGroupNotFound(id))?;
        Ok(())
    }
}
