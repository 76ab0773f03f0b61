pub mod snapshots_model;

pub use snapshots_model::*;
