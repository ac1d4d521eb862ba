//! Journal draft types produced by posting and reversal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pelita_shared::types::{AccountId, JournalId};

/// Kind of journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalKind {
    /// A journal recording an original financial event.
    Standard,
    /// A journal that negates a prior journal by swapping debits and credits.
    Reversal,
}

/// One drafted journal line: an amount posted to one account as either a
/// debit or a credit. Exactly one of the pair is non-zero by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    /// The account this line posts to.
    pub account_id: AccountId,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
}

impl EntryDraft {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

/// A journal ready to be persisted, with its ordered entries.
///
/// Journals are immutable once persisted; a correction is always a new
/// reversal journal, never a mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalDraft {
    /// Journal date.
    pub journal_date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Journal total (the invoice amount for invoice journals).
    pub total: Decimal,
    /// Standard or reversal.
    pub kind: JournalKind,
    /// The journal this one reverses, if any.
    pub reverses_journal_id: Option<JournalId>,
    /// Ordered journal lines.
    pub entries: Vec<EntryDraft>,
}

impl JournalDraft {
    /// Sum of all debit amounts.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.entries.iter().map(|e| e.debit).sum()
    }

    /// Sum of all credit amounts.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.entries.iter().map(|e| e.credit).sum()
    }

    /// Whether debits equal credits (the double-entry invariant).
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }
}

/// A persisted journal line, as loaded for reversal.
#[derive(Debug, Clone)]
pub struct PostedEntry {
    /// The account the line posted to.
    pub account_id: AccountId,
    /// Debit amount (zero if credit).
    pub debit: Decimal,
    /// Credit amount (zero if debit).
    pub credit: Decimal,
}
