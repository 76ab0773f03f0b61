pub mod import_model;
pub mod import_service;

pub use import_model::*;
pub use import_service::*;
