use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error(
        "Operation would leave asset {asset_id} with a negative quantity ({resulting_quantity})"
    )]
    WouldCauseNegativeQuantity {
        asset_id: String,
        resulting_quantity: Decimal,
    },

    #[error("Invalid transaction data: {0}")]
    InvalidData(String),
}
