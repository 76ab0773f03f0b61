//! Category domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity;

/// A user-defined asset category (e.g. "Stocks", "Bonds").
///
/// Names are stored raw; duplicate detection is case-insensitive and
/// whitespace-normalized at the ledger layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Target allocation percentage for rebalancing, 0-100.
    pub target_percentage: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: &str, target_percentage: Option<Decimal>) -> Self {
        let now = Utc::now();
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            target_percentage,
            created_at: now,
            updated_at: now,
        }
    }

    /// Normalized name used for duplicate detection.
    pub fn normalized_name(&self) -> String {
        identity::normalize(&self.name)
    }
}
