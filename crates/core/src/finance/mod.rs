//! Finance domain: invoice posting and journal reversal.
//!
//! Posting turns a newly issued invoice into a balanced double-entry journal
//! draft (debit receivables, credit revenue net of tax, credit output tax).
//! Reversal neutralizes a posted journal by swapping debits and credits.
//! Both are pure transformations; persistence lives in `pelita-db`.

pub mod posting;
pub mod reversal;
pub mod split;
pub mod types;

pub use posting::{InvoicePoster, PostingAccounts, PostingInput, PostingOutcome, SkipReason};
pub use reversal::build_reversal;
pub use split::{RevenueSplit, SplitAmounts, SplitError};
pub use types::{EntryDraft, JournalDraft, JournalKind, PostedEntry};
