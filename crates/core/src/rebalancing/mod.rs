pub mod rebalancing_calculator;
pub mod rebalancing_model;

pub use rebalancing_calculator::*;
pub use rebalancing_model::*;
