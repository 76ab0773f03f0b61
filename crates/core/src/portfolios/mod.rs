pub mod portfolios_model;

pub use portfolios_model::*;
