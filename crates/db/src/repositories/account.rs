//! Account repository for chart of accounts database operations.
//!
//! Besides CRUD, this module resolves the three posting accounts used by
//! invoice journals: receivable, revenue, and output tax.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{
    accounts, journal_entries,
    sea_orm_active_enums::{AccountRole, AccountType},
};
use pelita_core::finance::PostingAccounts;
use pelita_shared::types::AccountId;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Another active account already carries this posting role.
    #[error("An active account with role '{0:?}' already exists")]
    RoleTaken(AccountRole),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Cannot change account type because account has journal entries.
    #[error("Cannot change account type: account has {0} journal entries")]
    HasJournalEntries(u64),

    /// Cannot delete account because it has journal entries.
    #[error("Cannot delete account: account has {0} journal entries")]
    CannotDeleteWithEntries(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Posting role, if this account participates in invoice journals.
    pub role: Option<AccountRole>,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: Option<String>,
    /// Account type (only if no journal entries).
    pub account_type: Option<AccountType>,
    /// Posting role (`Some(None)` clears it).
    pub role: Option<Option<AccountRole>>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// Account repository for CRUD and posting-account resolution.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken or the posting role is already
    /// carried by another active account.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        if let Some(role) = input.role {
            self.ensure_role_free(role, None).await?;
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type),
            role: Set(input.role),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Lists accounts ordered by code.
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Code);

        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(account_type));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds an account by ID.
    pub async fn find_account_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Updates an account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing, the new code is taken,
    /// or the type would change while journal entries reference the account.
    pub async fn update_account(
        &self,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        // Referenced accounts are immutable in type
        if let Some(new_type) = input.account_type
            && new_type != account.account_type
        {
            let entry_count = self.count_journal_entries(id).await?;
            if entry_count > 0 {
                return Err(AccountError::HasJournalEntries(entry_count));
            }
        }

        if let Some(new_code) = &input.code
            && *new_code != account.code
        {
            let existing = accounts::Entity::find()
                .filter(accounts::Column::Code.eq(new_code))
                .filter(accounts::Column::Id.ne(id))
                .one(&self.db)
                .await?;

            if existing.is_some() {
                return Err(AccountError::DuplicateCode(new_code.clone()));
            }
        }

        if let Some(Some(role)) = input.role {
            self.ensure_role_free(role, Some(id)).await?;
        }

        let now = chrono::Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();

        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type);
        }
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    /// Deletes (deactivates) an account.
    ///
    /// Accounts with journal entries cannot be deleted; this performs a soft
    /// delete by setting `is_active = false`.
    pub async fn delete_account(&self, id: Uuid) -> Result<(), AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        let entry_count = self.count_journal_entries(id).await?;
        if entry_count > 0 {
            return Err(AccountError::CannotDeleteWithEntries(entry_count));
        }

        let now = chrono::Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(now);
        active.update(&self.db).await?;

        Ok(())
    }

    /// Resolves the posting accounts for invoice journals.
    ///
    /// Runs on any connection so invoice posting can resolve within its
    /// enclosing transaction.
    pub async fn resolve_posting_accounts<C: ConnectionTrait>(
        conn: &C,
    ) -> Result<PostingAccounts, DbErr> {
        let candidates = accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::Code)
            .all(conn)
            .await?;

        Ok(resolve_from_candidates(&candidates))
    }

    async fn ensure_role_free(
        &self,
        role: AccountRole,
        exclude: Option<Uuid>,
    ) -> Result<(), AccountError> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::Role.eq(role))
            .filter(accounts::Column::IsActive.eq(true));
        if let Some(id) = exclude {
            query = query.filter(accounts::Column::Id.ne(id));
        }

        if query.one(&self.db).await?.is_some() {
            return Err(AccountError::RoleTaken(role));
        }
        Ok(())
    }

    async fn count_journal_entries(&self, account_id: Uuid) -> Result<u64, AccountError> {
        let count = journal_entries::Entity::find()
            .filter(journal_entries::Column::AccountId.eq(account_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}

// ============================================================================
// Pure resolution logic, testable without database access
// ============================================================================

/// Picks the posting accounts from active chart-of-accounts rows.
///
/// The explicit `role` tag wins. Charts that predate roles fall back to the
/// legacy heuristics: receivable by name keyword ("piutang"/"receivable"),
/// revenue as the first income-type account by code, tax output by name
/// keyword ("ppn keluaran"/"tax output"). Candidates must be sorted by code
/// so the first-match fallback is deterministic.
#[must_use]
pub fn resolve_from_candidates(candidates: &[accounts::Model]) -> PostingAccounts {
    let by_role = |role: AccountRole| {
        candidates
            .iter()
            .find(|a| a.role == Some(role))
            .map(|a| AccountId::from_uuid(a.id))
    };
    let by_keyword = |keywords: &[&str]| {
        candidates
            .iter()
            .find(|a| {
                let name = a.name.to_lowercase();
                keywords.iter().any(|k| name.contains(k))
            })
            .map(|a| AccountId::from_uuid(a.id))
    };

    let receivable =
        by_role(AccountRole::Receivable).or_else(|| by_keyword(&["piutang", "receivable"]));
    let revenue = by_role(AccountRole::Revenue).or_else(|| {
        candidates
            .iter()
            .find(|a| a.account_type == AccountType::Income)
            .map(|a| AccountId::from_uuid(a.id))
    });
    let tax_output =
        by_role(AccountRole::TaxOutput).or_else(|| by_keyword(&["ppn keluaran", "tax output"]));

    PostingAccounts {
        receivable,
        revenue,
        tax_output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account(
        code: &str,
        name: &str,
        account_type: AccountType,
        role: Option<AccountRole>,
    ) -> accounts::Model {
        accounts::Model {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            account_type,
            role,
            is_active: true,
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_role_tags_win_over_keywords() {
        let tagged = account("1200", "Trade debtors", AccountType::Asset, Some(AccountRole::Receivable));
        let keyword = account("1300", "Piutang lain-lain", AccountType::Asset, None);
        let revenue = account("4000", "Tuition", AccountType::Income, Some(AccountRole::Revenue));

        let resolved = resolve_from_candidates(&[tagged.clone(), keyword, revenue.clone()]);
        assert_eq!(resolved.receivable, Some(AccountId::from_uuid(tagged.id)));
        assert_eq!(resolved.revenue, Some(AccountId::from_uuid(revenue.id)));
        assert_eq!(resolved.tax_output, None);
    }

    #[test]
    fn test_keyword_fallback_for_untagged_chart() {
        let ar = account("1200", "Piutang Usaha", AccountType::Asset, None);
        let income = account("4000", "Pendapatan Jasa", AccountType::Income, None);
        let tax = account("2100", "PPN Keluaran", AccountType::Liability, None);

        let resolved = resolve_from_candidates(&[ar.clone(), tax.clone(), income.clone()]);
        assert_eq!(resolved.receivable, Some(AccountId::from_uuid(ar.id)));
        assert_eq!(resolved.revenue, Some(AccountId::from_uuid(income.id)));
        assert_eq!(resolved.tax_output, Some(AccountId::from_uuid(tax.id)));
    }

    #[rstest]
    #[case::indonesian("Piutang Usaha")]
    #[case::english("Trade receivable")]
    #[case::uppercase("ACCOUNTS RECEIVABLE")]
    fn test_receivable_keyword_matches(#[case] name: &str) {
        let ar = account("1200", name, AccountType::Asset, None);
        let resolved = resolve_from_candidates(&[ar.clone()]);
        assert_eq!(resolved.receivable, Some(AccountId::from_uuid(ar.id)));
    }

    #[test]
    fn test_revenue_fallback_takes_first_income_by_code() {
        let second = account("4100", "Other income", AccountType::Income, None);
        let first = account("4000", "Tuition income", AccountType::Income, None);

        // Candidates arrive sorted by code from the query
        let resolved = resolve_from_candidates(&[first.clone(), second]);
        assert_eq!(resolved.revenue, Some(AccountId::from_uuid(first.id)));
    }

    #[test]
    fn test_empty_chart_resolves_nothing() {
        let resolved = resolve_from_candidates(&[]);
        assert_eq!(resolved.receivable, None);
        assert_eq!(resolved.revenue, None);
        assert_eq!(resolved.tax_output, None);
    }
}
