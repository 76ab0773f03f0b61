//! Exchange-rate model and the internal rate-map encoding.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fx::FxError;
use crate::identity::normalize;

/// One exchange-rate record, tied 1:1 to a snapshot.
///
/// `rates` is the serialized rate map: lower-cased currency code to
/// multiplier relative to one unit of `base_currency`. The base
/// currency's own rate is implicitly 1.0 and is never stored in the
/// table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub snapshot_id: String,
    pub base_currency: String,
    rates: String,
    pub fetch_date: DateTime<Utc>,
    pub is_fallback: bool,
    // Decode memo; rebuilt lazily, replaced wholesale by update_rates.
    #[serde(skip)]
    decoded: OnceLock<HashMap<String, Decimal>>,
}

impl ExchangeRate {
    pub fn new(
        snapshot_id: &str,
        base_currency: &str,
        rates: &HashMap<String, Decimal>,
        fetch_date: DateTime<Utc>,
    ) -> Result<Self, FxError> {
        Ok(ExchangeRate {
            id: Uuid::new_v4().to_string(),
            snapshot_id: snapshot_id.to_string(),
            base_currency: normalize(base_currency),
            rates: Self::encode_rates(rates)?,
            fetch_date,
            is_fallback: false,
            decoded: OnceLock::new(),
        })
    }

    fn encode_rates(rates: &HashMap<String, Decimal>) -> Result<String, FxError> {
        let normalized: HashMap<String, Decimal> = rates
            .iter()
            .map(|(code, rate)| (normalize(code), *rate))
            .collect();
        serde_json::to_string(&normalized).map_err(|e| FxError::InvalidRateData(e.to_string()))
    }

    /// The decoded rate table. Decoding is memoized per instance; the
    /// memo is invalidated exactly by `update_rates`. An undecodable
    /// table is logged and treated as empty, so conversions against it
    /// return `None` instead of failing the read path.
    pub fn rates(&self) -> &HashMap<String, Decimal> {
        self.decoded.get_or_init(|| {
            serde_json::from_str(&self.rates).unwrap_or_else(|e| {
                log::error!("Failed to decode rate map for {}: {}", self.id, e);
                HashMap::new()
            })
        })
    }

    /// Atomically replaces base currency, rate table and fetch date,
    /// clears the decode memo and resets the fallback flag.
    pub fn update_rates(
        &mut self,
        base_currency: &str,
        rates: &HashMap<String, Decimal>,
        fetch_date: DateTime<Utc>,
    ) -> Result<(), FxError> {
        let encoded = Self::encode_rates(rates)?;
        self.base_currency = normalize(base_currency);
        self.rates = encoded;
        self.fetch_date = fetch_date;
        self.is_fallback = false;
        self.decoded = OnceLock::new();
        Ok(())
    }

    /// Marks the current rates as reused from a previous successful
    /// fetch. Informational only; conversion is never blocked by it.
    pub fn mark_fallback(&mut self) {
        self.is_fallback = true;
    }

    fn rate_for(&self, code: &str) -> Option<Decimal> {
        let code = normalize(code);
        if code == self.base_currency {
            return Some(Decimal::ONE);
        }
        self.rates().get(&code).copied()
    }

    /// Converts `value` between currency codes using this rate record.
    ///
    /// Conversion is a query: it returns `None` when either code is not
    /// resolvable or the source rate is zero, and never raises.
    pub fn convert(&self, value: Decimal, from: &str, to: &str) -> Option<Decimal> {
        if normalize(from) == normalize(to) {
            return Some(value);
        }
        let from_rate = self.rate_for(from)?;
        let to_rate = self.rate_for(to)?;
        if from_rate.is_zero() {
            log::warn!("Zero exchange rate for '{}'; conversion unavailable", from);
            return None;
        }
        Some(value / from_rate * to_rate)
    }
}

/// Payload supplied by the external rate-fetch collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateUpdate {
    pub base_currency: String,
    pub rates: HashMap<String, Decimal>,
    pub fetch_date: DateTime<Utc>,
}
