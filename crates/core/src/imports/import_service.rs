//! Bulk import of a day's asset values and cash flows.
//!
//! Imports are additive: they resolve or create assets, reuse the day's
//! snapshot when one exists, and record values and cash flows row by
//! row. A bad row is reported and skipped, never aborting the run.

use chrono::NaiveDate;
use log::info;

use super::import_model::{AssetImportRow, CashFlowImportRow, ImportRowError, ImportSummary};
use crate::assets::NewAsset;
use crate::errors::Result;
use crate::ledger::Ledger;

pub fn run_import(
    ledger: &mut Ledger,
    date: NaiveDate,
    asset_rows: &[AssetImportRow],
    cash_flow_rows: &[CashFlowImportRow],
) -> Result<ImportSummary> {
    let snapshot_id = match ledger.snapshot_on(date) {
        Some(snapshot) => snapshot.id.clone(),
        None => ledger.create_snapshot(date)?.id,
    };

    let mut summary = ImportSummary {
        snapshot_id: snapshot_id.clone(),
        assets_created: 0,
        assets_resolved: 0,
        values_recorded: 0,
        cash_flows_recorded: 0,
        errors: Vec::new(),
    };

    for (row, entry) in asset_rows.iter().enumerate() {
        match import_asset_row(ledger, &snapshot_id, entry) {
            Ok(created) => {
                if created {
                    summary.assets_created += 1;
                } else {
                    summary.assets_resolved += 1;
                }
                summary.values_recorded += 1;
            }
            Err(e) => summary.errors.push(ImportRowError {
                row,
                message: e.to_string(),
            }),
        }
    }

    for (row, entry) in cash_flow_rows.iter().enumerate() {
        match ledger.record_cash_flow(&snapshot_id, &entry.description, entry.amount, &entry.currency)
        {
            Ok(_) => summary.cash_flows_recorded += 1,
            Err(e) => summary.errors.push(ImportRowError {
                row,
                message: e.to_string(),
            }),
        }
    }

    info!(
        "Import for {}: {} assets created, {} resolved, {} values, {} cash flows, {} rows skipped",
        date,
        summary.assets_created,
        summary.assets_resolved,
        summary.values_recorded,
        summary.cash_flows_recorded,
        summary.errors.len()
    );
    Ok(summary)
}

fn import_asset_row(ledger: &mut Ledger, snapshot_id: &str, entry: &AssetImportRow) -> Result<bool> {
    let (asset, created) = ledger.resolve_or_create_asset(NewAsset {
        name: entry.name.clone(),
        asset_type: entry.asset_type,
        currency: entry.currency.clone(),
        platform: entry.platform.clone(),
        notes: None,
        category_id: None,
        portfolio_id: None,
    })?;
    ledger.record_asset_value(snapshot_id, &asset.id, entry.market_value)?;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetType;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn row(name: &str, platform: Option<&str>, value: rust_decimal::Decimal) -> AssetImportRow {
        AssetImportRow {
            name: name.to_string(),
            platform: platform.map(str::to_string),
            asset_type: AssetType::Stock,
            currency: "USD".to_string(),
            market_value: value,
        }
    }

    #[test]
    fn test_import_creates_and_resolves_assets() {
        let mut ledger = Ledger::in_memory();
        ledger
            .create_asset(NewAsset {
                name: "Apple Inc".to_string(),
                asset_type: AssetType::Stock,
                currency: "USD".to_string(),
                platform: Some("Schwab".to_string()),
                notes: None,
                category_id: None,
                portfolio_id: None,
            })
            .unwrap();

        let rows = vec![
            row(" apple   inc ", Some(" SCHWAB"), dec!(1000)),
            row("Bitcoin", None, dec!(500)),
        ];
        let summary = run_import(&mut ledger, date(), &rows, &[]).unwrap();

        assert_eq!(summary.assets_resolved, 1);
        assert_eq!(summary.assets_created, 1);
        assert_eq!(summary.values_recorded, 2);
        assert!(summary.errors.is_empty());
        assert_eq!(ledger.assets().len(), 2);
        assert_eq!(ledger.asset_values_for(&summary.snapshot_id).len(), 2);
    }

    #[test]
    fn test_import_reuses_existing_snapshot_for_the_day() {
        let mut ledger = Ledger::in_memory();
        let snapshot = ledger.create_snapshot(date()).unwrap();

        let summary = run_import(&mut ledger, date(), &[row("VTI", None, dec!(100))], &[]).unwrap();

        assert_eq!(summary.snapshot_id, snapshot.id);
        assert_eq!(ledger.snapshots().len(), 1);
    }

    #[test]
    fn test_bad_rows_are_reported_without_aborting() {
        let mut ledger = Ledger::in_memory();
        let rows = vec![
            row("VTI", None, dec!(100)),
            row("   ", None, dec!(50)),
            row("BND", None, dec!(200)),
        ];
        let flows = vec![
            CashFlowImportRow {
                description: "Salary".to_string(),
                amount: dec!(3000),
                currency: "USD".to_string(),
            },
            CashFlowImportRow {
                description: " SALARY ".to_string(),
                amount: dec!(1),
                currency: "USD".to_string(),
            },
        ];

        let summary = run_import(&mut ledger, date(), &rows, &flows).unwrap();

        assert_eq!(summary.values_recorded, 2);
        assert_eq!(summary.cash_flows_recorded, 1);
        assert_eq!(summary.errors.len(), 2);
        assert_eq!(summary.errors[0].row, 1);
        assert_eq!(summary.errors[1].row, 1);
    }
}
