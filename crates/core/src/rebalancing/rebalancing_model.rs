use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One category's current standing, as fed into the rebalancing
/// calculation. `current_value` is already expressed in the display
/// currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAllocationInput {
    pub category_id: String,
    pub category_name: String,
    pub current_value: Decimal,
    /// Categories without a target are reported nowhere; they still
    /// count toward the portfolio total.
    pub target_percentage: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebalanceAction {
    Buy,
    Sell,
    NoAction,
}

impl RebalanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebalanceAction::Buy => "BUY",
            RebalanceAction::Sell => "SELL",
            RebalanceAction::NoAction => "NO_ACTION",
        }
    }
}

impl std::fmt::Display for RebalanceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceRecommendation {
    pub category_id: String,
    pub category_name: String,
    pub current_value: Decimal,
    pub current_percentage: Decimal,
    pub target_percentage: Decimal,
    pub target_value: Decimal,
    /// Signed amount to trade; positive buys, negative sells.
    pub adjustment_amount: Decimal,
    pub action: RebalanceAction,
}
