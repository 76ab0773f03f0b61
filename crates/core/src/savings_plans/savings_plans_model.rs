//! Regular saving plan domain models.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Contribution schedule of a saving plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanFrequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl PlanFrequency {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PlanFrequency::Weekly => "WEEKLY",
            PlanFrequency::Monthly => "MONTHLY",
            PlanFrequency::Quarterly => "QUARTERLY",
            PlanFrequency::Yearly => "YEARLY",
        }
    }
}

impl FromStr for PlanFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "WEEKLY" => Ok(PlanFrequency::Weekly),
            "MONTHLY" => Ok(PlanFrequency::Monthly),
            "QUARTERLY" => Ok(PlanFrequency::Quarterly),
            "YEARLY" => Ok(PlanFrequency::Yearly),
            _ => Err(format!("Unknown plan frequency: {}", s)),
        }
    }
}

/// A recurring contribution toward a target asset, optionally funded
/// from a source asset. Shares the asset-reference pattern of the
/// identity resolver but carries no hard ledger invariants of its own;
/// deleting the target asset deletes the plan with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularSavingPlan {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    pub currency: String,
    pub frequency: PlanFrequency,
    pub target_asset_id: String,
    pub source_asset_id: Option<String>,
    pub start_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input model for creating a new saving plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingPlan {
    pub name: String,
    pub amount: Decimal,
    pub currency: String,
    pub frequency: PlanFrequency,
    pub target_asset_id: String,
    #[serde(default)]
    pub source_asset_id: Option<String>,
    pub start_date: NaiveDate,
}

impl NewSavingPlan {
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Plan amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn into_plan(self) -> RegularSavingPlan {
        RegularSavingPlan {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            amount: self.amount,
            currency: self.currency,
            frequency: self.frequency,
            target_asset_id: self.target_asset_id,
            source_asset_id: self.source_asset_id,
            start_date: self.start_date,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
