//! Transaction domain models.
//!
//! Transactions are append-only: the ledger never mutates one in place,
//! and holdings are re-derived from the full log on every read.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transactions::TransactionError;

/// Closed set of transaction types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Interest,
    Deposit,
    Withdrawal,
    TransferIn,
    TransferOut,
    Adjustment,
}

impl TransactionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
            TransactionType::Dividend => "DIVIDEND",
            TransactionType::Interest => "INTEREST",
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::TransferIn => "TRANSFER_IN",
            TransactionType::TransferOut => "TRANSFER_OUT",
            TransactionType::Adjustment => "ADJUSTMENT",
        }
    }

    /// Whether this type carries acquisition cost (feeds `average_cost`).
    pub const fn is_acquisition(&self) -> bool {
        matches!(self, TransactionType::Buy)
    }

    /// Whether the quantity field may be negative for this type.
    pub const fn allows_signed_quantity(&self) -> bool {
        matches!(self, TransactionType::Adjustment)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(TransactionType::Buy),
            "SELL" => Ok(TransactionType::Sell),
            "DIVIDEND" => Ok(TransactionType::Dividend),
            "INTEREST" => Ok(TransactionType::Interest),
            "DEPOSIT" => Ok(TransactionType::Deposit),
            "WITHDRAWAL" => Ok(TransactionType::Withdrawal),
            "TRANSFER_IN" => Ok(TransactionType::TransferIn),
            "TRANSFER_OUT" => Ok(TransactionType::TransferOut),
            "ADJUSTMENT" => Ok(TransactionType::Adjustment),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// Domain model representing one immutable ledger entry for an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub asset_id: String,
    pub tx_type: TransactionType,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub fees: Option<Decimal>,
    pub notes: Option<String>,
    /// Asset the income was generated by (dividends, interest).
    pub source_asset_id: Option<String>,
    /// Counterpart transaction for transfers and swaps.
    pub linked_transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Signed contribution of this transaction to the asset's held
    /// quantity.
    ///
    /// Buy and transfer-in add units, sell and transfer-out remove them.
    /// Adjustment applies its quantity as recorded, which may be
    /// negative. Dividend, interest, deposit and withdrawal are cash
    /// events and do not change held units; income attribution uses
    /// `source_asset_id` instead.
    pub fn quantity_impact(&self) -> Decimal {
        match self.tx_type {
            TransactionType::Buy | TransactionType::TransferIn => self.quantity,
            TransactionType::Sell | TransactionType::TransferOut => -self.quantity,
            TransactionType::Adjustment => self.quantity,
            TransactionType::Dividend
            | TransactionType::Interest
            | TransactionType::Deposit
            | TransactionType::Withdrawal => Decimal::ZERO,
        }
    }
}

/// Input model for recording a new transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub asset_id: String,
    pub tx_type: TransactionType,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub fees: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source_asset_id: Option<String>,
    #[serde(default)]
    pub linked_transaction_id: Option<String>,
}

impl NewTransaction {
    /// Validates the new transaction data.
    pub fn validate(&self) -> std::result::Result<(), TransactionError> {
        if self.asset_id.trim().is_empty() {
            return Err(TransactionError::InvalidData(
                "Asset ID cannot be empty".to_string(),
            ));
        }
        if self.quantity < Decimal::ZERO && !self.tx_type.allows_signed_quantity() {
            return Err(TransactionError::InvalidData(format!(
                "Quantity must not be negative for {} transactions",
                self.tx_type
            )));
        }
        if self.price_per_unit < Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Price per unit must not be negative".to_string(),
            ));
        }
        if let Some(fees) = self.fees {
            if fees < Decimal::ZERO {
                return Err(TransactionError::InvalidData(
                    "Fees must not be negative".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn into_transaction(self) -> Transaction {
        Transaction {
            id: Uuid::new_v4().to_string(),
            asset_id: self.asset_id,
            tx_type: self.tx_type,
            date: self.date,
            quantity: self.quantity,
            price_per_unit: self.price_per_unit,
            total_amount: self.total_amount,
            currency: self.currency,
            fees: self.fees,
            notes: self.notes,
            source_asset_id: self.source_asset_id,
            linked_transaction_id: self.linked_transaction_id,
            created_at: Utc::now(),
        }
    }
}
