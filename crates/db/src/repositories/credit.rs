//! Credit repository: lesson-hour packages and the per-student ledger.
//!
//! The balance is never stored; it is the sum of signed hour deltas over the
//! transaction history. Consumption checks the balance and inserts inside
//! one transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    credit_packages, credit_transactions, sea_orm_active_enums::CreditKind, students,
};
use pelita_core::credit::{CreditError as BalanceError, balance, check_consumption};
use pelita_shared::types::PageRequest;

/// Error types for credit operations.
#[derive(Debug, thiserror::Error)]
pub enum CreditError {
    /// Package not found.
    #[error("Credit package not found: {0}")]
    PackageNotFound(Uuid),

    /// Package is no longer offered.
    #[error("Credit package is inactive: {0}")]
    PackageInactive(Uuid),

    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Balance rule violation (insufficient or non-positive hours).
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a credit package.
#[derive(Debug, Clone)]
pub struct CreatePackageInput {
    /// Display name.
    pub name: String,
    /// Lesson hours granted per purchase.
    pub hours: i32,
    /// Package price.
    pub price: rust_decimal::Decimal,
}

/// Credit repository.
#[derive(Debug, Clone)]
pub struct CreditRepository {
    db: DatabaseConnection,
}

impl CreditRepository {
    /// Creates a new credit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a credit package.
    pub async fn create_package(
        &self,
        input: CreatePackageInput,
    ) -> Result<credit_packages::Model, CreditError> {
        if input.hours <= 0 {
            return Err(BalanceError::NonPositiveHours(i64::from(input.hours)).into());
        }

        let now = Utc::now().into();
        let package = credit_packages::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            hours: Set(input.hours),
            price: Set(input.price),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(package.insert(&self.db).await?)
    }

    /// Lists packages, optionally only active ones.
    pub async fn list_packages(
        &self,
        only_active: bool,
    ) -> Result<Vec<credit_packages::Model>, CreditError> {
        let mut query = credit_packages::Entity::find();
        if only_active {
            query = query.filter(credit_packages::Column::IsActive.eq(true));
        }

        Ok(query
            .order_by_asc(credit_packages::Column::Hours)
            .all(&self.db)
            .await?)
    }

    /// Retires a package. History referencing it is untouched.
    pub async fn deactivate_package(&self, id: Uuid) -> Result<(), CreditError> {
        let package = credit_packages::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::PackageNotFound(id))?;

        let mut active: credit_packages::ActiveModel = package.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Records a package purchase, crediting the package's hours.
    pub async fn purchase(
        &self,
        student_id: Uuid,
        package_id: Uuid,
        created_by: Uuid,
    ) -> Result<credit_transactions::Model, CreditError> {
        self.ensure_student(student_id).await?;

        let package = credit_packages::Entity::find_by_id(package_id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::PackageNotFound(package_id))?;
        if !package.is_active {
            return Err(CreditError::PackageInactive(package_id));
        }

        let transaction = credit_transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            student_id: Set(student_id),
            package_id: Set(Some(package_id)),
            kind: Set(CreditKind::Purchase),
            hours_delta: Set(package.hours),
            note: Set(Some(format!("Purchase of package {}", package.name))),
            created_by: Set(created_by),
            created_at: Set(Utc::now().into()),
        };

        Ok(transaction.insert(&self.db).await?)
    }

    /// Records lesson-hour consumption after checking the balance.
    ///
    /// The balance read and the insert share a transaction so concurrent
    /// consumption cannot drive the balance negative unnoticed.
    pub async fn consume(
        &self,
        student_id: Uuid,
        hours: i32,
        note: Option<String>,
        created_by: Uuid,
    ) -> Result<credit_transactions::Model, CreditError> {
        self.ensure_student(student_id).await?;

        let txn = self.db.begin().await?;

        let current = balance_for(&txn, student_id).await?;
        check_consumption(current, i64::from(hours))?;

        let transaction = credit_transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            student_id: Set(student_id),
            package_id: Set(None),
            kind: Set(CreditKind::Consumption),
            hours_delta: Set(-hours),
            note: Set(note),
            created_by: Set(created_by),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(transaction)
    }

    /// Current hour balance for a student.
    pub async fn balance(&self, student_id: Uuid) -> Result<i64, CreditError> {
        self.ensure_student(student_id).await?;
        Ok(balance_for(&self.db, student_id).await?)
    }

    /// Lists a student's credit transactions, newest first, with total count.
    pub async fn history(
        &self,
        student_id: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<credit_transactions::Model>, u64), CreditError> {
        self.ensure_student(student_id).await?;

        let query = credit_transactions::Entity::find()
            .filter(credit_transactions::Column::StudentId.eq(student_id));

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(credit_transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    async fn ensure_student(&self, id: Uuid) -> Result<(), CreditError> {
        students::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::StudentNotFound(id))?;
        Ok(())
    }
}

async fn balance_for<C: ConnectionTrait>(conn: &C, student_id: Uuid) -> Result<i64, DbErr> {
    let deltas: Vec<i32> = credit_transactions::Entity::find()
        .filter(credit_transactions::Column::StudentId.eq(student_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| t.hours_delta)
        .collect();

    Ok(balance(deltas))
}
