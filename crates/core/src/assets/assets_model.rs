//! Asset domain models.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity;

/// Closed classification of a tracked asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Stock,
    Bond,
    Crypto,
    RealEstate,
    Commodity,
    Cash,
    MutualFund,
    Etf,
    #[default]
    Other,
}

impl AssetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "STOCK",
            AssetType::Bond => "BOND",
            AssetType::Crypto => "CRYPTO",
            AssetType::RealEstate => "REAL_ESTATE",
            AssetType::Commodity => "COMMODITY",
            AssetType::Cash => "CASH",
            AssetType::MutualFund => "MUTUAL_FUND",
            AssetType::Etf => "ETF",
            AssetType::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "STOCK" => Ok(AssetType::Stock),
            "BOND" => Ok(AssetType::Bond),
            "CRYPTO" => Ok(AssetType::Crypto),
            "REAL_ESTATE" => Ok(AssetType::RealEstate),
            "COMMODITY" => Ok(AssetType::Commodity),
            "CASH" => Ok(AssetType::Cash),
            "MUTUAL_FUND" => Ok(AssetType::MutualFund),
            "ETF" => Ok(AssetType::Etf),
            "OTHER" => Ok(AssetType::Other),
            _ => Err(format!("Unknown asset type: {}", s)),
        }
    }
}

/// Domain model representing an asset.
///
/// Holds no stored quantity, price or value — those are derived from the
/// transaction and price logs on every read (see the `valuation` module).
/// The locked flag is derived the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub asset_type: AssetType,
    /// Currency the asset is denominated in. An empty string means "use
    /// the configured display currency at presentation time".
    pub currency: String,
    /// Platform/broker the asset is held at; the identity context.
    pub platform: Option<String>,
    pub notes: Option<String>,
    pub category_id: Option<String>,
    pub portfolio_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Normalized identity used for duplicate detection: the
    /// (name, platform) pair.
    pub fn identity_key(&self) -> String {
        identity::identity(&self.name, self.platform.as_deref().unwrap_or(""))
    }
}

/// Input model for creating a new asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub name: String,
    #[serde(default)]
    pub asset_type: AssetType,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub portfolio_id: Option<String>,
}

impl NewAsset {
    /// Normalized identity of the candidate, for collision checks.
    pub fn identity_key(&self) -> String {
        identity::identity(&self.name, self.platform.as_deref().unwrap_or(""))
    }

    pub(crate) fn into_asset(self) -> Asset {
        let now = Utc::now();
        Asset {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            asset_type: self.asset_type,
            currency: self.currency,
            platform: self.platform,
            notes: self.notes,
            category_id: self.category_id,
            portfolio_id: self.portfolio_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Mutable profile fields of an asset. `asset_type` and `currency`
/// changes are refused by the ledger once the asset is locked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetProfile {
    pub asset_type: Option<AssetType>,
    pub currency: Option<String>,
    pub notes: Option<String>,
}
