use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("Invalid rate data: {0}")]
    InvalidRateData(String),

    #[error("Failed to fetch exchange rates: {0}")]
    FetchError(String),
}
