//! Price-history domain model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded price for an asset on a calendar day. Entries are
/// appended, never mutated; the valuation projector reads the entry with
/// the maximum date as the current price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    pub id: String,
    pub asset_id: String,
    pub date: NaiveDate,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl PriceHistory {
    pub fn new(asset_id: &str, date: NaiveDate, price: Decimal) -> Self {
        PriceHistory {
            id: Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            date,
            price,
            created_at: Utc::now(),
        }
    }
}
