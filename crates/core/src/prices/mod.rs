pub mod prices_model;

pub use prices_model::*;
