//! Journal repository: persisting journal drafts and reading the ledger.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{journal_entries, journals, sea_orm_active_enums::JournalKind};
use pelita_core::finance::{JournalDraft, JournalKind as DraftKind};
use pelita_shared::types::{JournalId, PageRequest};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Journal not found.
    #[error("Journal not found: {0}")]
    JournalNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A journal with its ordered entries.
#[derive(Debug, Clone)]
pub struct JournalWithEntries {
    /// The journal record.
    pub journal: journals::Model,
    /// Entries ordered by position.
    pub entries: Vec<journal_entries::Model>,
}

/// Filter options for listing journals.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Start date (inclusive).
    pub from: Option<NaiveDate>,
    /// End date (inclusive).
    pub to: Option<NaiveDate>,
    /// Filter by journal kind.
    pub kind: Option<JournalKind>,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists journals, newest first, with total count.
    pub async fn list_journals(
        &self,
        filter: JournalFilter,
        page: &PageRequest,
    ) -> Result<(Vec<journals::Model>, u64), JournalError> {
        let mut query = journals::Entity::find();

        if let Some(from) = filter.from {
            query = query.filter(journals::Column::JournalDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journals::Column::JournalDate.lte(to));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(journals::Column::Kind.eq(kind));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(journals::Column::JournalDate)
            .order_by_desc(journals::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Finds a journal with its entries.
    pub async fn find_journal_with_entries(
        &self,
        id: Uuid,
    ) -> Result<Option<JournalWithEntries>, JournalError> {
        let Some(journal) = journals::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let entries = load_entries(&self.db, id).await?;
        Ok(Some(JournalWithEntries { journal, entries }))
    }
}

/// Loads a journal's entries ordered by position.
pub async fn load_entries<C: ConnectionTrait>(
    conn: &C,
    journal_id: Uuid,
) -> Result<Vec<journal_entries::Model>, DbErr> {
    journal_entries::Entity::find()
        .filter(journal_entries::Column::JournalId.eq(journal_id))
        .order_by_asc(journal_entries::Column::Position)
        .all(conn)
        .await
}

/// Persists a journal draft with its entries on any connection.
///
/// Used by invoice posting and cancellation, which run inside an enclosing
/// transaction. Returns the new journal id.
pub async fn insert_journal_draft<C: ConnectionTrait>(
    conn: &C,
    draft: &JournalDraft,
) -> Result<Uuid, DbErr> {
    let journal_id = Uuid::now_v7();
    let kind = match draft.kind {
        DraftKind::Standard => JournalKind::Standard,
        DraftKind::Reversal => JournalKind::Reversal,
    };

    journals::ActiveModel {
        id: Set(journal_id),
        journal_date: Set(draft.journal_date),
        description: Set(draft.description.clone()),
        total: Set(draft.total),
        kind: Set(kind),
        reverses_journal_id: Set(draft.reverses_journal_id.map(JournalId::into_inner)),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(conn)
    .await?;

    for (position, entry) in draft.entries.iter().enumerate() {
        journal_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            journal_id: Set(journal_id),
            account_id: Set(entry.account_id.into_inner()),
            debit: Set(entry.debit),
            credit: Set(entry.credit),
            position: Set(i16::try_from(position).unwrap_or(i16::MAX)),
        }
        .insert(conn)
        .await?;
    }

    Ok(journal_id)
}
