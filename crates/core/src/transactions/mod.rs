pub mod integrity_guard;
pub mod transactions_errors;
pub mod transactions_model;

pub use integrity_guard::*;
pub use transactions_errors::*;
pub use transactions_model::*;
