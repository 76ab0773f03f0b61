//! Target-allocation drift analysis.
//!
//! Recommendations are advisory only; nothing here mutates the ledger
//! or records transactions.

use log::warn;
use rust_decimal::Decimal;

use super::rebalancing_model::{
    CategoryAllocationInput, RebalanceAction, RebalanceRecommendation,
};
use crate::constants::{REBALANCE_THRESHOLD, TARGET_SUM_TOLERANCE};

/// Compares each targeted category's share of the portfolio against
/// its target percentage and recommends the trade that closes the gap.
///
/// `total_value` is supplied by the caller and may exceed the sum of
/// the inputs when untargeted value exists outside them; only
/// categories with a target produce a recommendation. Gaps smaller
/// than one unit of the display currency are reported as `NoAction`.
/// Results are ordered by descending absolute adjustment; equal gaps
/// keep their input order.
pub fn calculate_adjustments(
    inputs: &[CategoryAllocationInput],
    total_value: Decimal,
) -> Vec<RebalanceRecommendation> {
    if total_value.is_zero() {
        return Vec::new();
    }

    let target_sum: Decimal = inputs.iter().filter_map(|i| i.target_percentage).sum();
    if (target_sum - Decimal::ONE_HUNDRED).abs() > TARGET_SUM_TOLERANCE {
        warn!(
            "Category targets sum to {}%, not 100%; recommendations will not converge",
            target_sum
        );
    }

    let mut recommendations: Vec<RebalanceRecommendation> = inputs
        .iter()
        .filter_map(|input| {
            let target_percentage = input.target_percentage?;
            let current_percentage = input.current_value / total_value * Decimal::ONE_HUNDRED;
            let target_value = total_value * target_percentage / Decimal::ONE_HUNDRED;
            let adjustment_amount = target_value - input.current_value;
            let action = if adjustment_amount.abs() < REBALANCE_THRESHOLD {
                RebalanceAction::NoAction
            } else if adjustment_amount > Decimal::ZERO {
                RebalanceAction::Buy
            } else {
                RebalanceAction::Sell
            };
            Some(RebalanceRecommendation {
                category_id: input.category_id.clone(),
                category_name: input.category_name.clone(),
                current_value: input.current_value,
                current_percentage,
                target_percentage,
                target_value,
                adjustment_amount,
                action,
            })
        })
        .collect();

    // sort_by is stable, so ties keep their input order.
    recommendations.sort_by(|a, b| {
        b.adjustment_amount
            .abs()
            .cmp(&a.adjustment_amount.abs())
    });
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(
        name: &str,
        current_value: Decimal,
        target: Option<Decimal>,
    ) -> CategoryAllocationInput {
        CategoryAllocationInput {
            category_id: format!("cat-{}", name),
            category_name: name.to_string(),
            current_value,
            target_percentage: target,
        }
    }

    #[test]
    fn test_recommends_trades_that_close_the_gap() {
        let inputs = vec![
            input("stocks", dec!(70000), Some(dec!(50))),
            input("bonds", dec!(30000), Some(dec!(50))),
        ];

        let recs = calculate_adjustments(&inputs, dec!(100000));

        assert_eq!(recs.len(), 2);
        // Equal absolute gaps keep input order.
        assert_eq!(recs[0].category_name, "stocks");
        assert_eq!(recs[0].current_percentage, dec!(70));
        assert_eq!(recs[0].target_value, dec!(50000));
        assert_eq!(recs[0].adjustment_amount, dec!(-20000));
        assert_eq!(recs[0].action, RebalanceAction::Sell);

        assert_eq!(recs[1].adjustment_amount, dec!(20000));
        assert_eq!(recs[1].action, RebalanceAction::Buy);
    }

    #[test]
    fn test_empty_portfolio_yields_no_recommendations() {
        let inputs = vec![input("stocks", Decimal::ZERO, Some(dec!(100)))];
        assert!(calculate_adjustments(&inputs, Decimal::ZERO).is_empty());
    }

    #[test]
    fn test_untargeted_categories_count_toward_total_but_are_omitted() {
        let inputs = vec![
            input("stocks", dec!(5000), Some(dec!(50))),
            input("collectibles", dec!(5000), None),
        ];

        let recs = calculate_adjustments(&inputs, dec!(10000));

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].category_name, "stocks");
        // Target value is computed over the full 10000 total.
        assert_eq!(recs[0].target_value, dec!(5000));
        assert_eq!(recs[0].action, RebalanceAction::NoAction);
    }

    #[test]
    fn test_caller_supplied_total_can_exceed_input_sum() {
        // Value held outside the listed categories still dilutes shares.
        let inputs = vec![input("stocks", dec!(6000), Some(dec!(50)))];

        let recs = calculate_adjustments(&inputs, dec!(10000));

        assert_eq!(recs[0].current_percentage, dec!(60));
        assert_eq!(recs[0].target_value, dec!(5000));
        assert_eq!(recs[0].adjustment_amount, dec!(-1000));
        assert_eq!(recs[0].action, RebalanceAction::Sell);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 0.99 below target: within tolerance.
        let near = vec![
            input("a", dec!(5999.01), Some(dec!(60))),
            input("b", dec!(4000.99), None),
        ];
        let recs = calculate_adjustments(&near, dec!(10000));
        assert_eq!(recs[0].adjustment_amount, dec!(0.99));
        assert_eq!(recs[0].action, RebalanceAction::NoAction);

        // Exactly 1.00 is actionable.
        let edge = vec![
            input("a", dec!(5999), Some(dec!(60))),
            input("b", dec!(4001), None),
        ];
        let recs = calculate_adjustments(&edge, dec!(10000));
        assert_eq!(recs[0].adjustment_amount, dec!(1));
        assert_eq!(recs[0].action, RebalanceAction::Buy);
    }

    #[test]
    fn test_ordered_by_descending_absolute_adjustment() {
        let inputs = vec![
            input("small", dec!(2400), Some(dec!(25))),
            input("large", dec!(1600), Some(dec!(35))),
            input("rest", dec!(6000), Some(dec!(40))),
        ];

        let recs = calculate_adjustments(&inputs, dec!(10000));

        let gaps: Vec<Decimal> = recs
            .iter()
            .map(|r| r.adjustment_amount.abs())
            .collect();
        assert!(gaps.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(recs[0].category_name, "rest");
        assert_eq!(recs[0].adjustment_amount, dec!(-2000));
    }

    #[test]
    fn test_targets_not_summing_to_hundred_still_compute() {
        let inputs = vec![
            input("a", dec!(5000), Some(dec!(30))),
            input("b", dec!(5000), Some(dec!(30))),
        ];

        let recs = calculate_adjustments(&inputs, dec!(10000));

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].target_value, dec!(3000));
        assert_eq!(recs[0].action, RebalanceAction::Sell);
    }
}
