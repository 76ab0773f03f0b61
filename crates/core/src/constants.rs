//! Crate-wide constants.

use rust_decimal::Decimal;

/// Currency-unit threshold under which a rebalancing adjustment is
/// classified as no-action. The comparison is strict: an adjustment of
/// exactly one currency unit is actionable.
pub const REBALANCE_THRESHOLD: Decimal = Decimal::ONE;

/// Tolerance applied when checking that category targets sum to 100%.
pub const TARGET_SUM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Fallback display currency when none is configured.
pub const DEFAULT_DISPLAY_CURRENCY: &str = "USD";
