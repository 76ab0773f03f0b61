//! Pure holding math over transaction and price logs.
//!
//! Every function here takes slices and returns values; state lives in
//! the ledger, which re-runs these on each read. Nothing is cached, so
//! editing or deleting a historical transaction is reflected
//! immediately.

use rust_decimal::Decimal;

use super::valuation_model::HoldingView;
use crate::prices::PriceHistory;
use crate::transactions::Transaction;

/// Net quantity held, folding the signed impact of every transaction.
pub fn quantity(transactions: &[&Transaction]) -> Decimal {
    transactions.iter().map(|tx| tx.quantity_impact()).sum()
}

/// Latest recorded price, by price date. Zero when the log is empty.
pub fn current_price(prices: &[&PriceHistory]) -> Decimal {
    prices
        .iter()
        .max_by_key(|p| p.date)
        .map(|p| p.price)
        .unwrap_or(Decimal::ZERO)
}

/// Average price paid per unit across purchase events.
///
/// Only `Buy` transactions participate; transfers in carry no price
/// information and sells do not reduce the average. Zero when no
/// purchases exist.
pub fn average_cost(transactions: &[&Transaction]) -> Decimal {
    let mut total_cost = Decimal::ZERO;
    let mut total_quantity = Decimal::ZERO;
    for tx in transactions {
        if tx.tx_type.is_acquisition() {
            total_cost += tx.total_amount;
            total_quantity += tx.quantity;
        }
    }
    if total_quantity.is_zero() {
        Decimal::ZERO
    } else {
        total_cost / total_quantity
    }
}

/// Full derived view for one asset.
pub fn holding(asset_id: &str, transactions: &[&Transaction], prices: &[&PriceHistory]) -> HoldingView {
    let quantity = quantity(transactions);
    let current_price = current_price(prices);
    let average_cost = average_cost(transactions);
    HoldingView {
        asset_id: asset_id.to_string(),
        quantity,
        current_price,
        market_value: quantity * current_price,
        average_cost,
        cost_basis: quantity * average_cost,
    }
}

/// An asset with recorded activity cannot change identity-bearing
/// fields; transactions and prices denominated in its currency would
/// silently change meaning.
pub fn is_locked(transactions: &[&Transaction], prices: &[&PriceHistory]) -> bool {
    !transactions.is_empty() || !prices.is_empty()
}

/// True when removing `impact` from the current quantity would leave a
/// short position.
pub fn would_go_negative(transactions: &[&Transaction], impact: Decimal) -> bool {
    quantity(transactions) + impact < Decimal::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::TransactionType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn tx(tx_type: TransactionType, date: NaiveDate, qty: Decimal, price: Decimal) -> Transaction {
        Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            asset_id: "asset-1".to_string(),
            tx_type,
            date,
            quantity: qty,
            price_per_unit: price,
            total_amount: qty * price,
            currency: "USD".to_string(),
            fees: None,
            notes: None,
            source_asset_id: None,
            linked_transaction_id: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn price(date: NaiveDate, value: Decimal) -> PriceHistory {
        PriceHistory::new("asset-1", date, value)
    }

    #[test]
    fn test_empty_logs_yield_zero_holding() {
        let view = holding("asset-1", &[], &[]);
        assert_eq!(view.quantity, Decimal::ZERO);
        assert_eq!(view.market_value, Decimal::ZERO);
        assert_eq!(view.average_cost, Decimal::ZERO);
        assert_eq!(view.cost_basis, Decimal::ZERO);
    }

    #[test]
    fn test_buy_then_partial_sell() {
        let buy = tx(TransactionType::Buy, day(1), dec!(10), dec!(100));
        let sell = tx(TransactionType::Sell, day(2), dec!(4), dec!(120));
        let latest = price(day(3), dec!(120));

        let view = holding("asset-1", &[&buy, &sell], &[&latest]);

        assert_eq!(view.quantity, dec!(6));
        assert_eq!(view.current_price, dec!(120));
        assert_eq!(view.market_value, dec!(720));
        assert_eq!(view.average_cost, dec!(100));
        assert_eq!(view.cost_basis, dec!(600));
    }

    #[test]
    fn test_current_price_takes_latest_by_date() {
        let older = price(day(1), dec!(90));
        let newest = price(day(9), dec!(110));
        let middle = price(day(5), dec!(100));
        assert_eq!(current_price(&[&older, &newest, &middle]), dec!(110));
    }

    #[test]
    fn test_transfers_move_quantity_but_not_cost() {
        let buy = tx(TransactionType::Buy, day(1), dec!(10), dec!(50));
        let transfer = tx(TransactionType::TransferIn, day(2), dec!(5), Decimal::ZERO);

        assert_eq!(quantity(&[&buy, &transfer]), dec!(15));
        assert_eq!(average_cost(&[&buy, &transfer]), dec!(50));
    }

    #[test]
    fn test_cash_events_leave_quantity_untouched() {
        let buy = tx(TransactionType::Buy, day(1), dec!(10), dec!(50));
        let dividend = tx(TransactionType::Dividend, day(2), Decimal::ZERO, Decimal::ZERO);
        let deposit = tx(TransactionType::Deposit, day(3), Decimal::ZERO, Decimal::ZERO);

        assert_eq!(quantity(&[&buy, &dividend, &deposit]), dec!(10));
    }

    #[test]
    fn test_signed_adjustment() {
        let buy = tx(TransactionType::Buy, day(1), dec!(10), dec!(50));
        let shrink = tx(TransactionType::Adjustment, day(2), dec!(-2), Decimal::ZERO);

        assert_eq!(quantity(&[&buy, &shrink]), dec!(8));
    }

    #[test]
    fn test_locked_only_with_activity() {
        let buy = tx(TransactionType::Buy, day(1), dec!(1), dec!(1));
        let quote = price(day(1), dec!(1));
        assert!(!is_locked(&[], &[]));
        assert!(is_locked(&[&buy], &[]));
        assert!(is_locked(&[], &[&quote]));
    }
}
