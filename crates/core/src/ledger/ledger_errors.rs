use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("An entry with the same normalized identity already exists: '{name}'")]
    DuplicateIdentity { name: String },

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Cannot delete {entity}: {count} entries still reference it")]
    CannotDeleteReferenced { entity: &'static str, count: usize },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Target allocation must be between 0 and 100, got {0}")]
    InvalidTargetAllocation(Decimal),

    #[error("A snapshot already exists for {0}")]
    DuplicateSnapshotDay(NaiveDate),

    #[error("A cash flow with the same description already exists on this snapshot: '{description}'")]
    DuplicateCashFlow { description: String },

    #[error("The snapshot already has an exchange-rate record attached")]
    ExchangeRateAlreadyAttached,

    #[error("Asset has recorded activity; '{0}' can no longer be changed")]
    AssetLocked(&'static str),

    #[error("Repository commit failed: {0}")]
    CommitFailed(String),
}
