//! Teacher repository for staff records.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::teachers;
use pelita_shared::types::PageRequest;

/// Error types for teacher operations.
#[derive(Debug, thiserror::Error)]
pub enum TeacherError {
    /// Teacher not found.
    #[error("Teacher not found: {0}")]
    TeacherNotFound(Uuid),

    /// Staff number already in use.
    #[error("Staff number already in use: {0}")]
    DuplicateNumber(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a teacher.
#[derive(Debug, Clone)]
pub struct CreateTeacherInput {
    /// Unique staff number.
    pub staff_number: String,
    /// Full name.
    pub full_name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Main subject taught.
    pub subject: Option<String>,
}

/// Input for updating a teacher. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTeacherInput {
    /// New full name.
    pub full_name: Option<String>,
    /// New contact email.
    pub email: Option<Option<String>>,
    /// New contact phone.
    pub phone: Option<Option<String>>,
    /// New main subject.
    pub subject: Option<Option<String>>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Teacher repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TeacherRepository {
    db: DatabaseConnection,
}

impl TeacherRepository {
    /// Creates a new teacher repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a teacher.
    pub async fn create(&self, input: CreateTeacherInput) -> Result<teachers::Model, TeacherError> {
        let existing = teachers::Entity::find()
            .filter(teachers::Column::StaffNumber.eq(&input.staff_number))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(TeacherError::DuplicateNumber(input.staff_number));
        }

        let now = Utc::now().into();
        let teacher = teachers::ActiveModel {
            id: Set(Uuid::now_v7()),
            staff_number: Set(input.staff_number),
            full_name: Set(input.full_name),
            email: Set(input.email),
            phone: Set(input.phone),
            subject: Set(input.subject),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(teacher.insert(&self.db).await?)
    }

    /// Finds a teacher by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<teachers::Model>, TeacherError> {
        Ok(teachers::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists teachers with total count. Optional case-insensitive search on
    /// name, staff number, or subject.
    pub async fn list(
        &self,
        search: Option<String>,
        page: &PageRequest,
    ) -> Result<(Vec<teachers::Model>, u64), TeacherError> {
        let mut query = teachers::Entity::find();

        if let Some(search) = search {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(teachers::Column::FullName.like(pattern.clone()))
                    .add(teachers::Column::StaffNumber.like(pattern.clone()))
                    .add(teachers::Column::Subject.like(pattern)),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_asc(teachers::Column::StaffNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Updates a teacher.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateTeacherInput,
    ) -> Result<teachers::Model, TeacherError> {
        let teacher = teachers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TeacherError::TeacherNotFound(id))?;

        let mut active: teachers::ActiveModel = teacher.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(subject) = input.subject {
            active.subject = Set(subject);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Marks a teacher inactive. Existing schedules keep their reference.
    pub async fn deactivate(&self, id: Uuid) -> Result<teachers::Model, TeacherError> {
        self.update(
            id,
            UpdateTeacherInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }
}
