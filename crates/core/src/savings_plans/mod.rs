pub mod savings_plans_model;

pub use savings_plans_model::*;
