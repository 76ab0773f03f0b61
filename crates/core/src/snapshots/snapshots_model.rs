//! Snapshot domain models.
//!
//! A snapshot records the portfolio's state for one calendar day. It owns
//! per-asset market values and cash-flow entries for that day, and at
//! most one exchange-rate record (see the `fx` module).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity;

/// One recording event. The date identifies the calendar day; by type it
/// is already normalized to start-of-day, and the ledger allows at most
/// one snapshot per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(date: NaiveDate) -> Self {
        Snapshot {
            id: Uuid::new_v4().to_string(),
            date,
            created_at: Utc::now(),
        }
    }

    /// Normalizes an arbitrary timestamp to its snapshot day.
    pub fn day_of(timestamp: DateTime<Utc>) -> NaiveDate {
        timestamp.date_naive()
    }
}

/// Market value of one asset as of one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotAssetValue {
    pub id: String,
    pub snapshot_id: String,
    pub asset_id: String,
    pub market_value: Decimal,
}

impl SnapshotAssetValue {
    pub fn new(snapshot_id: &str, asset_id: &str, market_value: Decimal) -> Self {
        SnapshotAssetValue {
            id: Uuid::new_v4().to_string(),
            snapshot_id: snapshot_id.to_string(),
            asset_id: asset_id.to_string(),
            market_value,
        }
    }
}

/// A cash movement recorded against one snapshot. The
/// (snapshot, description) pair is unique per day, matched on the
/// normalized description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowOperation {
    pub id: String,
    pub snapshot_id: String,
    pub description: String,
    pub amount: Decimal,
    /// Empty string means "use the configured display currency".
    pub currency: String,
}

impl CashFlowOperation {
    pub fn new(snapshot_id: &str, description: &str, amount: Decimal, currency: &str) -> Self {
        CashFlowOperation {
            id: Uuid::new_v4().to_string(),
            snapshot_id: snapshot_id.to_string(),
            description: description.to_string(),
            amount,
            currency: currency.to_string(),
        }
    }

    /// Normalized description used for the per-snapshot uniqueness check.
    pub fn normalized_description(&self) -> String {
        identity::normalize(&self.description)
    }
}
