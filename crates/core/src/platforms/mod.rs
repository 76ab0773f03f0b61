pub mod platforms_model;

pub use platforms_model::*;
