//! Guards the non-negative-quantity invariant on transaction deletion.
//!
//! Holdings are always re-derived from the remaining transactions after a
//! deletion commits, so the guard's only job is to refuse deletions whose
//! derivation would represent an impossible state (negative held
//! quantity). Nothing changes on refusal.

use rust_decimal::Decimal;

use crate::transactions::{Transaction, TransactionError};
use crate::valuation;

/// Quantity the asset would hold after removing `transaction` from its
/// log. `asset_transactions` is the full current log including the
/// transaction being deleted.
fn remaining_quantity(transaction: &Transaction, asset_transactions: &[&Transaction]) -> Decimal {
    valuation::quantity(asset_transactions) - transaction.quantity_impact()
}

/// Whether `transaction` can be deleted without driving its asset's
/// derived quantity negative.
pub fn can_delete(transaction: &Transaction, asset_transactions: &[&Transaction]) -> bool {
    remaining_quantity(transaction, asset_transactions) >= Decimal::ZERO
}

/// Checks a deletion request, returning the typed refusal when the
/// invariant would be violated.
pub fn check_delete(
    transaction: &Transaction,
    asset_transactions: &[&Transaction],
) -> std::result::Result<(), TransactionError> {
    let remaining = remaining_quantity(transaction, asset_transactions);
    if remaining < Decimal::ZERO {
        return Err(TransactionError::WouldCauseNegativeQuantity {
            asset_id: transaction.asset_id.clone(),
            resulting_quantity: remaining,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::{NewTransaction, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn make_tx(tx_type: TransactionType, quantity: Decimal) -> Transaction {
        NewTransaction {
            asset_id: "asset-1".to_string(),
            tx_type,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            quantity,
            price_per_unit: dec!(100),
            total_amount: quantity.abs() * dec!(100),
            currency: "usd".to_string(),
            fees: None,
            notes: None,
            source_asset_id: None,
            linked_transaction_id: None,
        }
        .into_transaction()
    }

    #[test]
    fn test_refuses_delete_that_would_go_negative() {
        // buy(10) then sell(8): current quantity = 2. Deleting the buy
        // would leave 2 - 10 = -8.
        let buy = make_tx(TransactionType::Buy, dec!(10));
        let sell = make_tx(TransactionType::Sell, dec!(8));
        let log = vec![&buy, &sell];

        assert!(!can_delete(&buy, &log));
        match check_delete(&buy, &log) {
            Err(TransactionError::WouldCauseNegativeQuantity {
                resulting_quantity, ..
            }) => assert_eq!(resulting_quantity, dec!(-8)),
            other => panic!("expected WouldCauseNegativeQuantity, got {:?}", other),
        }
    }

    #[test]
    fn test_permits_delete_that_stays_non_negative() {
        let buy = make_tx(TransactionType::Buy, dec!(10));
        let sell = make_tx(TransactionType::Sell, dec!(8));
        let log = vec![&buy, &sell];

        // Deleting the sell leaves 2 + 8 = 10.
        assert!(can_delete(&sell, &log));
        assert!(check_delete(&sell, &log).is_ok());
    }

    #[test]
    fn test_cash_events_never_block_deletion() {
        let buy = make_tx(TransactionType::Buy, dec!(5));
        let dividend = make_tx(TransactionType::Dividend, dec!(5));
        let log = vec![&buy, &dividend];

        assert!(can_delete(&dividend, &log));
    }
}
