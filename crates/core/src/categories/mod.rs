pub mod categories_model;

pub use categories_model::*;
