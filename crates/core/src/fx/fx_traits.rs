use async_trait::async_trait;

use crate::errors::Result;
use crate::fx::RateUpdate;

/// Consumed interface to the external exchange-rate fetcher.
///
/// Implementations own all network concerns, including retries,
/// timeouts and cancellation; the core only applies the result.
#[async_trait]
pub trait RateFetchProviderTrait: Send + Sync {
    /// Fetches the latest rate table for the given base currency.
    async fn fetch_latest(&self, base_currency: &str) -> Result<RateUpdate>;
}
