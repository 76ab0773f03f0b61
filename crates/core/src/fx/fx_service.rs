//! Applies fetched rate updates to an exchange-rate record.

use std::sync::Arc;

use log::warn;

use super::fx_model::ExchangeRate;
use super::fx_traits::RateFetchProviderTrait;
use crate::errors::Result;

pub struct FxService {
    provider: Arc<dyn RateFetchProviderTrait>,
}

impl FxService {
    pub fn new(provider: Arc<dyn RateFetchProviderTrait>) -> Self {
        Self { provider }
    }

    /// Fetches the latest rates for the record's base currency and
    /// applies them via `update_rates`. When the fetch fails the
    /// existing rates are kept and flagged as fallback.
    ///
    /// Returns `true` when live rates were applied, `false` when the
    /// previous rates were retained.
    pub async fn refresh(&self, rate: &mut ExchangeRate) -> Result<bool> {
        match self.provider.fetch_latest(&rate.base_currency).await {
            Ok(update) => {
                rate.update_rates(&update.base_currency, &update.rates, update.fetch_date)?;
                Ok(true)
            }
            Err(e) => {
                warn!(
                    "Rate fetch failed, reusing rates fetched {}: {}",
                    rate.fetch_date, e
                );
                rate.mark_fallback();
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::{FxError, RateUpdate};
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    struct StubProvider {
        update: Option<RateUpdate>,
    }

    #[async_trait]
    impl RateFetchProviderTrait for StubProvider {
        async fn fetch_latest(&self, _base_currency: &str) -> Result<RateUpdate> {
            self.update
                .clone()
                .ok_or_else(|| FxError::FetchError("connection refused".to_string()).into())
        }
    }

    fn seeded_rate() -> ExchangeRate {
        let rates: HashMap<String, rust_decimal::Decimal> =
            [("twd".to_string(), dec!(31.5))].into_iter().collect();
        ExchangeRate::new("snapshot-1", "usd", &rates, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_applies_fetched_rates() {
        let update = RateUpdate {
            base_currency: "usd".to_string(),
            rates: [("twd".to_string(), dec!(30))].into_iter().collect(),
            fetch_date: Utc::now(),
        };
        let service = FxService::new(Arc::new(StubProvider {
            update: Some(update),
        }));

        let mut rate = seeded_rate();
        let applied = service.refresh(&mut rate).await.unwrap();

        assert!(applied);
        assert!(!rate.is_fallback);
        assert_eq!(rate.convert(dec!(30), "twd", "usd"), Some(dec!(1)));
    }

    #[tokio::test]
    async fn test_refresh_marks_fallback_on_fetch_failure() {
        let service = FxService::new(Arc::new(StubProvider { update: None }));

        let mut rate = seeded_rate();
        let applied = service.refresh(&mut rate).await.unwrap();

        assert!(!applied);
        assert!(rate.is_fallback);
        // Previous rates remain usable.
        assert_eq!(rate.convert(dec!(31500), "twd", "usd"), Some(dec!(1000)));
    }
}
