//! Invoice repository: creation with automatic journal posting, payment,
//! and cancellation with automatic reversal.
//!
//! Posting and cancellation each run inside one database transaction so an
//! invoice row and its journal can never be persisted half-way.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::{
    invoices, journals, sea_orm_active_enums::InvoiceStatus, students,
};
use crate::repositories::account::AccountRepository;
use crate::repositories::journal::{insert_journal_draft, load_entries};
use pelita_core::finance::{
    InvoicePoster, PostedEntry, PostingInput, PostingOutcome, build_reversal,
};
use pelita_shared::types::{AccountId, JournalId, PageRequest};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Invoice amount must be positive.
    #[error("Invoice amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The invoice is cancelled; `batal` is terminal.
    #[error("Invoice {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    /// The invoice is already paid.
    #[error("Invoice {0} is already paid")]
    AlreadyPaid(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// How the journal posting of an invoice went.
///
/// Part of the repository result, so skipped and tax-less postings are
/// visible to callers instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostingStatus {
    /// A balanced journal was posted.
    Posted,
    /// A journal was posted without a tax line (no tax account resolved).
    PostedWithoutTax,
    /// No journal was posted; the reason is a stable identifier.
    Skipped(&'static str),
}

impl PostingStatus {
    /// Stable identifier for API responses.
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            Self::Posted => "posted".to_string(),
            Self::PostedWithoutTax => "posted_without_tax".to_string(),
            Self::Skipped(reason) => format!("skipped:{reason}"),
        }
    }
}

/// Result of creating an invoice.
#[derive(Debug, Clone)]
pub struct CreatedInvoice {
    /// The invoice record (with `journal_id` set when posting happened).
    pub invoice: invoices::Model,
    /// The posting outcome.
    pub posting: PostingStatus,
}

/// Result of cancelling an invoice.
#[derive(Debug, Clone)]
pub struct CancelledInvoice {
    /// The invoice record, now in `batal` status.
    pub invoice: invoices::Model,
    /// The reversal journal id, when the original journal existed.
    pub reversal_journal_id: Option<Uuid>,
}

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// The billed student.
    pub student_id: Uuid,
    /// Free-text description.
    pub description: Option<String>,
    /// Gross amount.
    pub amount: Decimal,
    /// Issue date; defaults to today.
    pub issued_on: Option<NaiveDate>,
}

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Filter by status.
    pub status: Option<InvoiceStatus>,
    /// Filter by student.
    pub student_id: Option<Uuid>,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice and posts its sales journal atomically.
    ///
    /// Account resolution, journal insertion, and the invoice row all happen
    /// in one transaction. A resolution miss downgrades to a skipped posting
    /// rather than an error; the invoice is still created.
    ///
    /// Note: there is no idempotency key. Submitting the same payload twice
    /// creates two invoices and two journals.
    pub async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
        poster: &InvoicePoster,
    ) -> Result<CreatedInvoice, InvoiceError> {
        if input.amount <= Decimal::ZERO {
            return Err(InvoiceError::NonPositiveAmount(input.amount));
        }

        let student = students::Entity::find_by_id(input.student_id)
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::StudentNotFound(input.student_id))?;

        let issued_on = input
            .issued_on
            .unwrap_or_else(|| Utc::now().date_naive());
        let invoice_id = Uuid::now_v7();
        let invoice_number = invoice_number(issued_on, invoice_id);

        let txn = self.db.begin().await?;

        let accounts = AccountRepository::resolve_posting_accounts(&txn).await?;
        let outcome = poster.post(
            &PostingInput {
                invoice_number: invoice_number.clone(),
                amount: input.amount,
                issued_on,
            },
            accounts,
        );

        let (journal_id, posting) = match &outcome {
            PostingOutcome::Posted(draft) => {
                let id = insert_journal_draft(&txn, draft).await?;
                (Some(id), PostingStatus::Posted)
            }
            PostingOutcome::PostedWithoutTax(draft) => {
                warn!(invoice_number = %invoice_number, "posting without tax account, tax portion unrecorded");
                let id = insert_journal_draft(&txn, draft).await?;
                (Some(id), PostingStatus::PostedWithoutTax)
            }
            PostingOutcome::Skipped(reason) => {
                warn!(invoice_number = %invoice_number, reason = reason.as_str(), "journal posting skipped");
                (None, PostingStatus::Skipped(reason.as_str()))
            }
        };

        let now = Utc::now().into();
        let invoice = invoices::ActiveModel {
            id: Set(invoice_id),
            invoice_number: Set(invoice_number),
            student_id: Set(student.id),
            description: Set(input.description),
            amount: Set(input.amount),
            status: Set(InvoiceStatus::Pending),
            journal_id: Set(journal_id),
            issued_on: Set(issued_on),
            paid_at: Set(None),
            cancelled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            invoice = %invoice.invoice_number,
            posting = %posting.as_str(),
            "invoice created"
        );

        Ok(CreatedInvoice { invoice, posting })
    }

    /// Marks a pending invoice as paid.
    pub async fn pay_invoice(&self, id: Uuid) -> Result<invoices::Model, InvoiceError> {
        let invoice = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::InvoiceNotFound(id))?;

        match invoice.status {
            InvoiceStatus::Batal => return Err(InvoiceError::AlreadyCancelled(id)),
            InvoiceStatus::Paid => return Err(InvoiceError::AlreadyPaid(id)),
            InvoiceStatus::Pending => {}
        }

        let now = Utc::now();
        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(InvoiceStatus::Paid);
        active.paid_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());

        Ok(active.update(&self.db).await?)
    }

    /// Cancels an invoice and posts the reversal journal atomically.
    ///
    /// The original journal is found through `invoices.journal_id`. When the
    /// invoice was never posted, cancellation is only the status change and
    /// `reversal_journal_id` is `None`.
    pub async fn cancel_invoice(&self, id: Uuid) -> Result<CancelledInvoice, InvoiceError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(InvoiceError::InvoiceNotFound(id))?;

        if invoice.status == InvoiceStatus::Batal {
            return Err(InvoiceError::AlreadyCancelled(id));
        }

        let reversal_journal_id = match invoice.journal_id {
            Some(journal_id) => {
                let original = journals::Entity::find_by_id(journal_id)
                    .one(&txn)
                    .await?
                    .ok_or(InvoiceError::Database(DbErr::RecordNotFound(format!(
                        "journal {journal_id} referenced by invoice {id}"
                    ))))?;

                let entries: Vec<PostedEntry> = load_entries(&txn, original.id)
                    .await?
                    .into_iter()
                    .map(|e| PostedEntry {
                        account_id: AccountId::from_uuid(e.account_id),
                        debit: e.debit,
                        credit: e.credit,
                    })
                    .collect();

                let draft = build_reversal(
                    JournalId::from_uuid(original.id),
                    &entries,
                    &invoice.invoice_number,
                    invoice.amount,
                    Utc::now().date_naive(),
                );
                Some(insert_journal_draft(&txn, &draft).await?)
            }
            None => {
                warn!(invoice = %invoice.invoice_number, "cancelling invoice with no posted journal, skipping reversal");
                None
            }
        };

        let now = Utc::now();
        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(InvoiceStatus::Batal);
        active.cancelled_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        let invoice = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            invoice = %invoice.invoice_number,
            reversed = reversal_journal_id.is_some(),
            "invoice cancelled"
        );

        Ok(CancelledInvoice {
            invoice,
            reversal_journal_id,
        })
    }

    /// Finds an invoice by ID.
    pub async fn find_invoice_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<invoices::Model>, InvoiceError> {
        Ok(invoices::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists invoices, newest first, with total count.
    pub async fn list_invoices(
        &self,
        filter: InvoiceFilter,
        page: &PageRequest,
    ) -> Result<(Vec<invoices::Model>, u64), InvoiceError> {
        let mut query = invoices::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(invoices::Column::Status.eq(status));
        }
        if let Some(student_id) = filter.student_id {
            query = query.filter(invoices::Column::StudentId.eq(student_id));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(invoices::Column::IssuedOn)
            .order_by_desc(invoices::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }
}

/// Derives a human-readable invoice number from the issue date and the
/// invoice id: `INV-YYYYMM-XXXXXXXX` with the first id bytes as hex.
#[must_use]
pub fn invoice_number(issued_on: NaiveDate, id: Uuid) -> String {
    let short = id.simple().to_string()[..8].to_uppercase();
    format!("INV-{}-{}", issued_on.format("%Y%m"), short)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_invoice_number_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let id = Uuid::parse_str("0195c2a4-7f00-7000-8000-000000000000").unwrap();
        let number = invoice_number(date, id);
        assert_eq!(number, "INV-202603-0195C2A4");
    }

    #[test]
    fn test_invoice_numbers_differ_per_id() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let a = invoice_number(date, Uuid::now_v7());
        let b = invoice_number(date, Uuid::now_v7());
        assert_ne!(a, b);
    }

    proptest! {
        /// Every generated number is `INV-YYYYMM-` plus eight uppercase hex
        /// characters, for any issue date and invoice id.
        #[test]
        fn prop_invoice_number_shape(bytes in any::<u128>(), days in 0u32..3650) {
            let id = Uuid::from_u128(bytes);
            let date = NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .checked_add_days(chrono::Days::new(u64::from(days)))
                .unwrap();
            let number = invoice_number(date, id);
            prop_assert_eq!(number.len(), 19);
            prop_assert!(number.starts_with("INV-"));
            prop_assert!(
                number[11..]
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
            );
        }
    }

    #[test]
    fn test_posting_status_identifiers() {
        assert_eq!(PostingStatus::Posted.as_str(), "posted");
        assert_eq!(
            PostingStatus::PostedWithoutTax.as_str(),
            "posted_without_tax"
        );
        assert_eq!(
            PostingStatus::Skipped("missing_revenue_account").as_str(),
            "skipped:missing_revenue_account"
        );
    }
}
