use crate::errors::Result;
use crate::ledger::{Entity, EntityKind};

/// Storage backend for the ledger.
///
/// The ledger stages writes through `insert`/`delete` and finishes each
/// logical operation with exactly one `save`. Implementations must make
/// the staged batch durable atomically: when `save` returns an error
/// the whole batch is considered rejected and the ledger discards it
/// without touching its in-memory state.
pub trait LedgerRepositoryTrait: Send {
    fn insert(&mut self, entity: &Entity) -> Result<()>;
    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<()>;
    fn save(&mut self) -> Result<()>;
}
