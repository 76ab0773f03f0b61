//! The closed set of entity types the ledger persists.
//!
//! Repositories receive writes in terms of these wrappers so a single
//! trait covers the whole graph.

use serde::{Deserialize, Serialize};

use crate::assets::Asset;
use crate::categories::Category;
use crate::fx::ExchangeRate;
use crate::platforms::Platform;
use crate::portfolios::Portfolio;
use crate::prices::PriceHistory;
use crate::savings_plans::RegularSavingPlan;
use crate::snapshots::{CashFlowOperation, Snapshot, SnapshotAssetValue};
use crate::transactions::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Category,
    Platform,
    Portfolio,
    Asset,
    Transaction,
    Price,
    Snapshot,
    SnapshotValue,
    CashFlow,
    ExchangeRate,
    SavingPlan,
}

impl EntityKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Category => "Category",
            EntityKind::Platform => "Platform",
            EntityKind::Portfolio => "Portfolio",
            EntityKind::Asset => "Asset",
            EntityKind::Transaction => "Transaction",
            EntityKind::Price => "Price",
            EntityKind::Snapshot => "Snapshot",
            EntityKind::SnapshotValue => "SnapshotValue",
            EntityKind::CashFlow => "CashFlow",
            EntityKind::ExchangeRate => "ExchangeRate",
            EntityKind::SavingPlan => "SavingPlan",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One persistable record. Inserting an entity whose id already exists
/// replaces it, so updates reuse the insert path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "record")]
pub enum Entity {
    Category(Category),
    Platform(Platform),
    Portfolio(Portfolio),
    Asset(Asset),
    Transaction(Transaction),
    Price(PriceHistory),
    Snapshot(Snapshot),
    SnapshotValue(SnapshotAssetValue),
    CashFlow(CashFlowOperation),
    ExchangeRate(ExchangeRate),
    SavingPlan(RegularSavingPlan),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Category(_) => EntityKind::Category,
            Entity::Platform(_) => EntityKind::Platform,
            Entity::Portfolio(_) => EntityKind::Portfolio,
            Entity::Asset(_) => EntityKind::Asset,
            Entity::Transaction(_) => EntityKind::Transaction,
            Entity::Price(_) => EntityKind::Price,
            Entity::Snapshot(_) => EntityKind::Snapshot,
            Entity::SnapshotValue(_) => EntityKind::SnapshotValue,
            Entity::CashFlow(_) => EntityKind::CashFlow,
            Entity::ExchangeRate(_) => EntityKind::ExchangeRate,
            Entity::SavingPlan(_) => EntityKind::SavingPlan,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::Category(c) => &c.id,
            Entity::Platform(p) => &p.id,
            Entity::Portfolio(p) => &p.id,
            Entity::Asset(a) => &a.id,
            Entity::Transaction(t) => &t.id,
            Entity::Price(p) => &p.id,
            Entity::Snapshot(s) => &s.id,
            Entity::SnapshotValue(v) => &v.id,
            Entity::CashFlow(c) => &c.id,
            Entity::ExchangeRate(r) => &r.id,
            Entity::SavingPlan(p) => &p.id,
        }
    }
}

/// A staged write, applied to the in-memory graph only after the
/// repository has accepted the whole batch.
#[derive(Debug, Clone)]
pub(crate) enum Write {
    Insert(Entity),
    Delete(EntityKind, String),
}
