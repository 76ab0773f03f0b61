//! Presentation-time configuration.
//!
//! Passed explicitly into conversion and aggregation calls; the core has
//! no process-wide settings singleton.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DISPLAY_CURRENCY;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Currency all presentation-time figures are converted into.
    pub display_currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            display_currency: DEFAULT_DISPLAY_CURRENCY.to_string(),
        }
    }
}
