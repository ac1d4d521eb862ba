//! Invoice posting: drafts the sales journal for a newly issued invoice.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use pelita_shared::types::AccountId;

use crate::finance::split::RevenueSplit;
use crate::finance::types::{EntryDraft, JournalDraft, JournalKind};

/// Invoice fields relevant to posting.
#[derive(Debug, Clone)]
pub struct PostingInput {
    /// Invoice number, used in the journal description.
    pub invoice_number: String,
    /// Gross invoice amount.
    pub amount: Decimal,
    /// Invoice issue date; the journal is dated the same day.
    pub issued_on: NaiveDate,
}

/// The posting accounts resolved from the chart of accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostingAccounts {
    /// Accounts receivable.
    pub receivable: Option<AccountId>,
    /// Revenue (income) account.
    pub revenue: Option<AccountId>,
    /// Output tax liability account.
    pub tax_output: Option<AccountId>,
}

/// Why posting was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No receivable account could be resolved.
    MissingReceivableAccount,
    /// No revenue account could be resolved.
    MissingRevenueAccount,
}

impl SkipReason {
    /// Stable identifier for API responses and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingReceivableAccount => "missing_receivable_account",
            Self::MissingRevenueAccount => "missing_revenue_account",
        }
    }
}

/// Outcome of posting one invoice.
///
/// Skips and unbalanced drafts are explicit outcomes rather than silent
/// no-ops, so callers can surface them to the API and logs.
#[derive(Debug, Clone)]
pub enum PostingOutcome {
    /// A balanced journal was drafted.
    Posted(JournalDraft),
    /// A journal was drafted but no tax account resolved, so the tax portion
    /// is unrecorded and the draft does not balance.
    PostedWithoutTax(JournalDraft),
    /// No journal was drafted.
    Skipped(SkipReason),
}

impl PostingOutcome {
    /// The drafted journal, if any.
    #[must_use]
    pub fn journal(&self) -> Option<&JournalDraft> {
        match self {
            Self::Posted(draft) | Self::PostedWithoutTax(draft) => Some(draft),
            Self::Skipped(_) => None,
        }
    }
}

/// Drafts sales journals for invoices.
#[derive(Debug, Clone, Copy)]
pub struct InvoicePoster {
    split: RevenueSplit,
}

impl InvoicePoster {
    /// Creates a poster using the given revenue/tax split.
    #[must_use]
    pub const fn new(split: RevenueSplit) -> Self {
        Self { split }
    }

    /// Drafts the journal for an invoice.
    ///
    /// Entries, in order:
    /// 1. debit receivable for the gross amount;
    /// 2. credit revenue for the net portion;
    /// 3. credit output tax for the tax portion, when a tax account resolved.
    ///
    /// When receivable or revenue is missing the posting is skipped. When
    /// only the tax account is missing the draft omits the tax line, leaving
    /// the tax portion unrecorded; the outcome flags the imbalance.
    #[must_use]
    pub fn post(&self, input: &PostingInput, accounts: PostingAccounts) -> PostingOutcome {
        let Some(receivable) = accounts.receivable else {
            return PostingOutcome::Skipped(SkipReason::MissingReceivableAccount);
        };
        let Some(revenue) = accounts.revenue else {
            return PostingOutcome::Skipped(SkipReason::MissingRevenueAccount);
        };

        let amounts = self.split.split(input.amount);

        let mut entries = vec![
            EntryDraft::debit(receivable, input.amount),
            EntryDraft::credit(revenue, amounts.net),
        ];
        if let Some(tax_output) = accounts.tax_output {
            if amounts.tax > Decimal::ZERO {
                entries.push(EntryDraft::credit(tax_output, amounts.tax));
            }
        }

        let draft = JournalDraft {
            journal_date: input.issued_on,
            description: format!("Sales journal for invoice {}", input.invoice_number),
            total: input.amount,
            kind: JournalKind::Standard,
            reverses_journal_id: None,
            entries,
        };

        if accounts.tax_output.is_none() && amounts.tax > Decimal::ZERO {
            PostingOutcome::PostedWithoutTax(draft)
        } else {
            PostingOutcome::Posted(draft)
        }
    }
}

impl Default for InvoicePoster {
    fn default() -> Self {
        Self::new(RevenueSplit::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn input(amount: Decimal) -> PostingInput {
        PostingInput {
            invoice_number: "INV-2026-0001".to_string(),
            amount,
            issued_on: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
        }
    }

    fn full_accounts() -> PostingAccounts {
        PostingAccounts {
            receivable: Some(AccountId::new()),
            revenue: Some(AccountId::new()),
            tax_output: Some(AccountId::new()),
        }
    }

    #[test]
    fn test_worked_example_from_ledger_rules() {
        // 1,000,000 gross: AR debit 1,000,000; revenue credit 890,000;
        // tax credit 110,000.
        let accounts = full_accounts();
        let outcome = InvoicePoster::default().post(&input(dec!(1_000_000)), accounts);

        let PostingOutcome::Posted(draft) = outcome else {
            panic!("expected posted outcome");
        };
        assert_eq!(draft.entries.len(), 3);
        assert_eq!(draft.entries[0].account_id, accounts.receivable.unwrap());
        assert_eq!(draft.entries[0].debit, dec!(1_000_000));
        assert_eq!(draft.entries[1].account_id, accounts.revenue.unwrap());
        assert_eq!(draft.entries[1].credit, dec!(890_000));
        assert_eq!(draft.entries[2].account_id, accounts.tax_output.unwrap());
        assert_eq!(draft.entries[2].credit, dec!(110_000));
        assert!(draft.is_balanced());
        assert_eq!(draft.total_debit(), dec!(1_000_000));
        assert_eq!(draft.total, dec!(1_000_000));
    }

    #[test]
    fn test_journal_dated_at_issue_date_with_invoice_number() {
        let outcome = InvoicePoster::default().post(&input(dec!(100)), full_accounts());
        let draft = outcome.journal().unwrap();
        assert_eq!(draft.journal_date, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
        assert!(draft.description.contains("INV-2026-0001"));
        assert_eq!(draft.kind, JournalKind::Standard);
        assert!(draft.reverses_journal_id.is_none());
    }

    #[test]
    fn test_missing_tax_account_leaves_tax_unrecorded() {
        let accounts = PostingAccounts {
            tax_output: None,
            ..full_accounts()
        };
        let outcome = InvoicePoster::default().post(&input(dec!(1_000_000)), accounts);

        let PostingOutcome::PostedWithoutTax(draft) = outcome else {
            panic!("expected posted-without-tax outcome");
        };
        assert_eq!(draft.entries.len(), 2);
        assert_eq!(draft.total_credit(), dec!(890_000));
        assert!(!draft.is_balanced());
    }

    #[test]
    fn test_missing_receivable_skips() {
        let accounts = PostingAccounts {
            receivable: None,
            ..full_accounts()
        };
        let outcome = InvoicePoster::default().post(&input(dec!(100)), accounts);
        assert!(matches!(
            outcome,
            PostingOutcome::Skipped(SkipReason::MissingReceivableAccount)
        ));
        assert!(outcome.journal().is_none());
    }

    #[test]
    fn test_missing_revenue_skips() {
        let accounts = PostingAccounts {
            revenue: None,
            ..full_accounts()
        };
        let outcome = InvoicePoster::default().post(&input(dec!(100)), accounts);
        assert!(matches!(
            outcome,
            PostingOutcome::Skipped(SkipReason::MissingRevenueAccount)
        ));
    }

    #[test]
    fn test_zero_tax_rate_omits_tax_line() {
        let poster = InvoicePoster::new(RevenueSplit::new(Decimal::ZERO).unwrap());
        let outcome = poster.post(&input(dec!(250)), full_accounts());

        let PostingOutcome::Posted(draft) = outcome else {
            panic!("expected posted outcome");
        };
        assert_eq!(draft.entries.len(), 2);
        assert_eq!(draft.entries[1].credit, dec!(250));
        assert!(draft.is_balanced());
    }

    proptest! {
        /// With all three accounts resolvable, every drafted journal is
        /// balanced and totals the invoice amount.
        #[test]
        fn prop_posting_balances(cents in 1i64..1_000_000_000) {
            let amount = Decimal::new(cents, 2);
            let outcome = InvoicePoster::default().post(&input(amount), full_accounts());
            let draft = outcome.journal().unwrap();
            prop_assert!(draft.is_balanced());
            prop_assert_eq!(draft.total_debit(), amount);
            prop_assert_eq!(draft.total_credit(), amount);
        }
    }
}
