//! Folio Core - Transaction-sourced portfolio ledger and analytics.
//!
//! This crate contains the core business logic of the portfolio tracker:
//! the entity graph with its referential-integrity rules, derivation of
//! live holdings from the immutable transaction/price log, multi-currency
//! conversion, rebalancing recommendations, and the identity
//! normalization used to deduplicate assets, categories and platforms.
//! It is storage-agnostic: all writes go through an injected repository
//! trait implemented by the embedding application.

pub mod assets;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod identity;
pub mod imports;
pub mod ledger;
pub mod platforms;
pub mod portfolios;
pub mod prices;
pub mod rebalancing;
pub mod savings_plans;
pub mod settings;
pub mod snapshots;
pub mod transactions;
pub mod valuation;

// Re-export the ledger entry point and error types
pub use errors::Error;
pub use errors::Result;
pub use ledger::Ledger;
