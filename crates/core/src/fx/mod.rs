pub mod fx_errors;
pub mod fx_model;
pub mod fx_service;
pub mod fx_traits;

pub use fx_errors::*;
pub use fx_model::*;
pub use fx_service::*;
pub use fx_traits::*;
