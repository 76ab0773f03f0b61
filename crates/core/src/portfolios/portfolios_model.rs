//! Portfolio domain model.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assets::AssetType;

/// A named grouping of assets with an optional per-asset-type target
/// allocation map. Assets reference the portfolio by id; the portfolio
/// does not contain them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Target allocation per asset type, in percent (0-100).
    pub target_allocations: Option<HashMap<AssetType, Decimal>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input model for creating a new portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_allocations: Option<HashMap<AssetType, Decimal>>,
}

impl NewPortfolio {
    pub(crate) fn into_portfolio(self) -> Portfolio {
        Portfolio {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            description: self.description,
            target_allocations: self.target_allocations,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
