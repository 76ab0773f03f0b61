use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time view of a single asset, derived entirely from the
/// transaction and price logs. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingView {
    pub asset_id: String,
    pub quantity: Decimal,
    /// Latest known price, or zero when no price was ever recorded.
    pub current_price: Decimal,
    pub market_value: Decimal,
    /// Average acquisition price over purchase events only.
    pub average_cost: Decimal,
    pub cost_basis: Decimal,
}
