//! Row models for bulk snapshot imports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::AssetType;

/// One asset row of an import: the asset's identity plus its market
/// value on the import date. Unknown assets are created; known ones are
/// matched through the identity resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetImportRow {
    pub name: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub asset_type: AssetType,
    #[serde(default)]
    pub currency: String,
    pub market_value: Decimal,
}

/// One cash-flow row of an import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowImportRow {
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
}

/// A row the import skipped, with its zero-based position in the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    pub row: usize,
    pub message: String,
}

/// Outcome of one import run. Row failures never abort the run; they
/// are collected here while the remaining rows proceed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub snapshot_id: String,
    pub assets_created: usize,
    pub assets_resolved: usize,
    pub values_recorded: usize,
    pub cash_flows_recorded: usize,
    pub errors: Vec<ImportRowError>,
}
