pub mod entity;
pub mod ledger_errors;
pub mod ledger_store;
pub mod ledger_traits;
pub mod memory_repository;

pub use entity::*;
pub use ledger_errors::*;
pub use ledger_store::*;
pub use ledger_traits::*;
pub use memory_repository::*;
