//! Journal reversal for cancelled invoices.
//!
//! A reversal is a new journal whose entries are the original entries with
//! debit and credit swapped per line. The swap preserves the balance
//! invariant: the reversal balances iff the original did.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use pelita_shared::types::JournalId;

use crate::finance::types::{EntryDraft, JournalDraft, JournalKind, PostedEntry};

/// Builds the reversal draft for a posted invoice journal.
///
/// Accounts and entry count are preserved; each line's debit and credit are
/// swapped. The draft is dated at `reversal_date` (cancellation time, not
/// the original journal date) and references the original journal.
#[must_use]
pub fn build_reversal(
    original_journal_id: JournalId,
    original_entries: &[PostedEntry],
    invoice_number: &str,
    total: Decimal,
    reversal_date: NaiveDate,
) -> JournalDraft {
    let entries = original_entries
        .iter()
        .map(|entry| EntryDraft {
            account_id: entry.account_id,
            debit: entry.credit,
            credit: entry.debit,
        })
        .collect();

    JournalDraft {
        journal_date: reversal_date,
        description: format!("Reversal of sales journal for invoice {invoice_number}"),
        total,
        kind: JournalKind::Reversal,
        reverses_journal_id: Some(original_journal_id),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pelita_shared::types::AccountId;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn posted(account_id: AccountId, debit: Decimal, credit: Decimal) -> PostedEntry {
        PostedEntry {
            account_id,
            debit,
            credit,
        }
    }

    #[test]
    fn test_worked_example_reversal() {
        // Original: [debit AR 1,000,000; credit revenue 890,000;
        // credit tax 110,000]. Reversal: [credit AR; debit revenue; debit tax].
        let ar = AccountId::new();
        let revenue = AccountId::new();
        let tax = AccountId::new();
        let original = vec![
            posted(ar, dec!(1_000_000), Decimal::ZERO),
            posted(revenue, Decimal::ZERO, dec!(890_000)),
            posted(tax, Decimal::ZERO, dec!(110_000)),
        ];

        let date = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let draft =
            build_reversal(JournalId::new(), &original, "INV-2026-0001", dec!(1_000_000), date);

        assert_eq!(draft.entries.len(), 3);
        assert_eq!(draft.entries[0].account_id, ar);
        assert_eq!(draft.entries[0].credit, dec!(1_000_000));
        assert_eq!(draft.entries[0].debit, Decimal::ZERO);
        assert_eq!(draft.entries[1].account_id, revenue);
        assert_eq!(draft.entries[1].debit, dec!(890_000));
        assert_eq!(draft.entries[2].account_id, tax);
        assert_eq!(draft.entries[2].debit, dec!(110_000));
        assert!(draft.is_balanced());
        assert_eq!(draft.kind, JournalKind::Reversal);
        assert_eq!(draft.journal_date, date);
    }

    #[test]
    fn test_references_original_journal_and_invoice() {
        let original_id = JournalId::new();
        let draft = build_reversal(
            original_id,
            &[posted(AccountId::new(), dec!(10), Decimal::ZERO)],
            "INV-7",
            dec!(10),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        );
        assert_eq!(draft.reverses_journal_id, Some(original_id));
        assert!(draft.description.contains("INV-7"));
        assert!(draft.description.starts_with("Reversal"));
    }

    #[test]
    fn test_unbalanced_original_stays_unbalanced() {
        // A journal posted without a tax account is short on the credit
        // side; its reversal is short on the debit side by the same amount.
        let original = vec![
            posted(AccountId::new(), dec!(100), Decimal::ZERO),
            posted(AccountId::new(), Decimal::ZERO, dec!(89)),
        ];
        let draft = build_reversal(
            JournalId::new(),
            &original,
            "INV-8",
            dec!(100),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        );
        assert!(!draft.is_balanced());
        assert_eq!(draft.total_debit(), dec!(89));
        assert_eq!(draft.total_credit(), dec!(100));
    }

    proptest! {
        /// Swapping preserves entry count, accounts, and the balance
        /// invariant for any set of original entries.
        #[test]
        fn prop_swap_preserves_balance(
            lines in prop::collection::vec((0u8..2, 1i64..1_000_000), 1..8)
        ) {
            let original: Vec<PostedEntry> = lines
                .iter()
                .map(|&(side, cents)| {
                    let amount = Decimal::new(cents, 2);
                    if side == 0 {
                        posted(AccountId::new(), amount, Decimal::ZERO)
                    } else {
                        posted(AccountId::new(), Decimal::ZERO, amount)
                    }
                })
                .collect();

            let total_debit: Decimal = original.iter().map(|e| e.debit).sum();
            let total_credit: Decimal = original.iter().map(|e| e.credit).sum();

            let draft = build_reversal(
                JournalId::new(),
                &original,
                "INV-P",
                total_debit,
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            );

            prop_assert_eq!(draft.entries.len(), original.len());
            for (orig, rev) in original.iter().zip(&draft.entries) {
                prop_assert_eq!(orig.account_id, rev.account_id);
                prop_assert_eq!(orig.debit, rev.credit);
                prop_assert_eq!(orig.credit, rev.debit);
            }
            prop_assert_eq!(draft.total_debit(), total_credit);
            prop_assert_eq!(draft.total_credit(), total_debit);
            prop_assert_eq!(
                draft.is_balanced(),
                total_debit == total_credit
            );
        }
    }
}
