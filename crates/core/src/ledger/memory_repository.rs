//! In-memory repository, used by tests and throwaway sessions.

use std::collections::HashMap;

use crate::errors::Result;
use crate::ledger::{Entity, EntityKind, LedgerRepositoryTrait};

#[derive(Debug, Clone)]
enum Staged {
    Insert(Entity),
    Delete(EntityKind, String),
}

/// Keeps committed entities in a map keyed by (kind, id). Staged writes
/// become visible only on `save`, mirroring the durability contract of
/// a real backend.
#[derive(Default)]
pub struct MemoryLedgerRepository {
    staged: Vec<Staged>,
    committed: HashMap<(EntityKind, String), Entity>,
}

impl MemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn committed_count(&self) -> usize {
        self.committed.len()
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.committed.contains_key(&(kind, id.to_string()))
    }
}

impl LedgerRepositoryTrait for MemoryLedgerRepository {
    fn insert(&mut self, entity: &Entity) -> Result<()> {
        self.staged.push(Staged::Insert(entity.clone()));
        Ok(())
    }

    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<()> {
        self.staged.push(Staged::Delete(kind, id.to_string()));
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        for write in self.staged.drain(..) {
            match write {
                Staged::Insert(entity) => {
                    self.committed
                        .insert((entity.kind(), entity.id().to_string()), entity);
                }
                Staged::Delete(kind, id) => {
                    self.committed.remove(&(kind, id));
                }
            }
        }
        Ok(())
    }
}
