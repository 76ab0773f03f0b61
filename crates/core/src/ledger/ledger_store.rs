//! The entity graph and its referential-integrity rules.
//!
//! `Ledger` owns the in-memory graph and an injected repository. Every
//! mutation stages its writes, hands the batch to the repository, and
//! applies the batch to the graph only after `save` succeeds, so a
//! failed commit leaves the graph exactly as it was.
//!
//! Holdings, totals and allocations are never stored; they are
//! re-derived from the transaction and price logs on every read.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use log::warn;
use rust_decimal::Decimal;

use crate::assets::{Asset, NewAsset, UpdateAssetProfile};
use crate::categories::Category;
use crate::errors::Result;
use crate::fx::{ExchangeRate, RateUpdate};
use crate::identity;
use crate::ledger::entity::Write;
use crate::ledger::memory_repository::MemoryLedgerRepository;
use crate::ledger::{Entity, EntityKind, LedgerError, LedgerRepositoryTrait};
use crate::platforms::Platform;
use crate::portfolios::{NewPortfolio, Portfolio};
use crate::prices::PriceHistory;
use crate::rebalancing::{self, CategoryAllocationInput, RebalanceRecommendation};
use crate::savings_plans::{NewSavingPlan, RegularSavingPlan};
use crate::settings::Settings;
use crate::snapshots::{CashFlowOperation, Snapshot, SnapshotAssetValue};
use crate::transactions::{self, NewTransaction, Transaction};
use crate::valuation::{self, HoldingView};

pub struct Ledger {
    repository: Box<dyn LedgerRepositoryTrait>,
    categories: HashMap<String, Category>,
    platforms: HashMap<String, Platform>,
    portfolios: HashMap<String, Portfolio>,
    assets: HashMap<String, Asset>,
    transactions: HashMap<String, Transaction>,
    prices: HashMap<String, PriceHistory>,
    snapshots: HashMap<String, Snapshot>,
    snapshot_values: HashMap<String, SnapshotAssetValue>,
    cash_flows: HashMap<String, CashFlowOperation>,
    exchange_rates: HashMap<String, ExchangeRate>,
    saving_plans: HashMap<String, RegularSavingPlan>,
}

impl Ledger {
    pub fn new(repository: Box<dyn LedgerRepositoryTrait>) -> Self {
        Ledger {
            repository,
            categories: HashMap::new(),
            platforms: HashMap::new(),
            portfolios: HashMap::new(),
            assets: HashMap::new(),
            transactions: HashMap::new(),
            prices: HashMap::new(),
            snapshots: HashMap::new(),
            snapshot_values: HashMap::new(),
            cash_flows: HashMap::new(),
            exchange_rates: HashMap::new(),
            saving_plans: HashMap::new(),
        }
    }

    /// Ledger backed by the in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryLedgerRepository::new()))
    }

    // ------------------------------------------------------------------
    // Commit machinery
    // ------------------------------------------------------------------

    /// Stages `writes` with the repository, saves, then applies them to
    /// the graph. On any repository error nothing is applied.
    fn commit(&mut self, writes: Vec<Write>) -> Result<()> {
        for write in &writes {
            match write {
                Write::Insert(entity) => self.repository.insert(entity)?,
                Write::Delete(kind, id) => self.repository.delete(*kind, id)?,
            }
        }
        self.repository.save()?;
        for write in writes {
            self.apply(write);
        }
        Ok(())
    }

    fn apply(&mut self, write: Write) {
        match write {
            Write::Insert(entity) => match entity {
                Entity::Category(c) => {
                    self.categories.insert(c.id.clone(), c);
                }
                Entity::Platform(p) => {
                    self.platforms.insert(p.id.clone(), p);
                }
                Entity::Portfolio(p) => {
                    self.portfolios.insert(p.id.clone(), p);
                }
                Entity::Asset(a) => {
                    self.assets.insert(a.id.clone(), a);
                }
                Entity::Transaction(t) => {
                    self.transactions.insert(t.id.clone(), t);
                }
                Entity::Price(p) => {
                    self.prices.insert(p.id.clone(), p);
                }
                Entity::Snapshot(s) => {
                    self.snapshots.insert(s.id.clone(), s);
                }
                Entity::SnapshotValue(v) => {
                    self.snapshot_values.insert(v.id.clone(), v);
                }
                Entity::CashFlow(c) => {
                    self.cash_flows.insert(c.id.clone(), c);
                }
                Entity::ExchangeRate(r) => {
                    self.exchange_rates.insert(r.id.clone(), r);
                }
                Entity::SavingPlan(p) => {
                    self.saving_plans.insert(p.id.clone(), p);
                }
            },
            Write::Delete(kind, id) => match kind {
                EntityKind::Category => {
                    self.categories.remove(&id);
                }
                EntityKind::Platform => {
                    self.platforms.remove(&id);
                }
                EntityKind::Portfolio => {
                    self.portfolios.remove(&id);
                }
                EntityKind::Asset => {
                    self.assets.remove(&id);
                }
                EntityKind::Transaction => {
                    self.transactions.remove(&id);
                }
                EntityKind::Price => {
                    self.prices.remove(&id);
                }
                EntityKind::Snapshot => {
                    self.snapshots.remove(&id);
                }
                EntityKind::SnapshotValue => {
                    self.snapshot_values.remove(&id);
                }
                EntityKind::CashFlow => {
                    self.cash_flows.remove(&id);
                }
                EntityKind::ExchangeRate => {
                    self.exchange_rates.remove(&id);
                }
                EntityKind::SavingPlan => {
                    self.saving_plans.remove(&id);
                }
            },
        }
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub fn create_category(
        &mut self,
        name: &str,
        target_percentage: Option<Decimal>,
    ) -> Result<Category> {
        if name.trim().is_empty() {
            return Err(LedgerError::EmptyName.into());
        }
        validate_target(target_percentage)?;
        let normalized = identity::normalize(name);
        if self
            .categories
            .values()
            .any(|c| c.normalized_name() == normalized)
        {
            return Err(LedgerError::DuplicateIdentity {
                name: name.to_string(),
            }
            .into());
        }
        let category = Category::new(name, target_percentage);
        self.commit(vec![Write::Insert(Entity::Category(category.clone()))])?;
        Ok(category)
    }

    pub fn set_category_target(
        &mut self,
        id: &str,
        target_percentage: Option<Decimal>,
    ) -> Result<Category> {
        validate_target(target_percentage)?;
        let mut category = self.require_category(id)?.clone();
        category.target_percentage = target_percentage;
        category.updated_at = Utc::now();
        self.commit(vec![Write::Insert(Entity::Category(category.clone()))])?;
        Ok(category)
    }

    pub fn rename_category(&mut self, id: &str, new_name: &str) -> Result<Category> {
        if new_name.trim().is_empty() {
            return Err(LedgerError::EmptyName.into());
        }
        let mut category = self.require_category(id)?.clone();
        let normalized = identity::normalize(new_name);
        if self
            .categories
            .values()
            .any(|c| c.id != id && c.normalized_name() == normalized)
        {
            return Err(LedgerError::DuplicateIdentity {
                name: new_name.to_string(),
            }
            .into());
        }
        category.name = new_name.to_string();
        category.updated_at = Utc::now();
        self.commit(vec![Write::Insert(Entity::Category(category.clone()))])?;
        Ok(category)
    }

    /// Refused while any asset still references the category.
    pub fn delete_category(&mut self, id: &str) -> Result<()> {
        self.require_category(id)?;
        let count = self
            .assets
            .values()
            .filter(|a| a.category_id.as_deref() == Some(id))
            .count();
        if count > 0 {
            return Err(LedgerError::CannotDeleteReferenced {
                entity: "category",
                count,
            }
            .into());
        }
        self.commit(vec![Write::Delete(EntityKind::Category, id.to_string())])
    }

    pub fn categories(&self) -> Vec<&Category> {
        let mut list: Vec<&Category> = self.categories.values().collect();
        list.sort_by_key(|c| c.normalized_name());
        list
    }

    fn require_category(&self, id: &str) -> Result<&Category> {
        self.categories.get(id).ok_or_else(|| {
            LedgerError::NotFound {
                kind: "Category",
                id: id.to_string(),
            }
            .into()
        })
    }

    // ------------------------------------------------------------------
    // Platforms
    // ------------------------------------------------------------------

    pub fn create_platform(&mut self, name: &str) -> Result<Platform> {
        if name.trim().is_empty() {
            return Err(LedgerError::EmptyName.into());
        }
        if self.find_platform_by_name(name).is_some() {
            return Err(LedgerError::DuplicateIdentity {
                name: name.to_string(),
            }
            .into());
        }
        let platform = Platform::new(name);
        self.commit(vec![Write::Insert(Entity::Platform(platform.clone()))])?;
        Ok(platform)
    }

    /// Refused while any asset is still held at the platform, matched
    /// on the normalized name.
    pub fn delete_platform(&mut self, id: &str) -> Result<()> {
        let platform = self.platforms.get(id).ok_or_else(|| LedgerError::NotFound {
            kind: "Platform",
            id: id.to_string(),
        })?;
        let normalized = platform.normalized_name();
        let count = self
            .assets
            .values()
            .filter(|a| {
                a.platform
                    .as_deref()
                    .map(identity::normalize)
                    .as_deref()
                    == Some(normalized.as_str())
            })
            .count();
        if count > 0 {
            return Err(LedgerError::CannotDeleteReferenced {
                entity: "platform",
                count,
            }
            .into());
        }
        self.commit(vec![Write::Delete(EntityKind::Platform, id.to_string())])
    }

    pub fn platforms(&self) -> Vec<&Platform> {
        let mut list: Vec<&Platform> = self.platforms.values().collect();
        list.sort_by_key(|p| p.normalized_name());
        list
    }

    fn find_platform_by_name(&self, name: &str) -> Option<&Platform> {
        let normalized = identity::normalize(name);
        self.platforms
            .values()
            .find(|p| p.normalized_name() == normalized)
    }

    // ------------------------------------------------------------------
    // Portfolios
    // ------------------------------------------------------------------

    pub fn create_portfolio(&mut self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        if new_portfolio.name.trim().is_empty() {
            return Err(LedgerError::EmptyName.into());
        }
        if let Some(allocations) = &new_portfolio.target_allocations {
            for target in allocations.values() {
                validate_target(Some(*target))?;
            }
        }
        let normalized = identity::normalize(&new_portfolio.name);
        if self
            .portfolios
            .values()
            .any(|p| identity::normalize(&p.name) == normalized)
        {
            return Err(LedgerError::DuplicateIdentity {
                name: new_portfolio.name,
            }
            .into());
        }
        let portfolio = new_portfolio.into_portfolio();
        self.commit(vec![Write::Insert(Entity::Portfolio(portfolio.clone()))])?;
        Ok(portfolio)
    }

    pub fn set_portfolio_active(&mut self, id: &str, is_active: bool) -> Result<Portfolio> {
        let mut portfolio = self
            .portfolios
            .get(id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: "Portfolio",
                id: id.to_string(),
            })?
            .clone();
        portfolio.is_active = is_active;
        self.commit(vec![Write::Insert(Entity::Portfolio(portfolio.clone()))])?;
        Ok(portfolio)
    }

    pub fn delete_portfolio(&mut self, id: &str) -> Result<()> {
        if !self.portfolios.contains_key(id) {
            return Err(LedgerError::NotFound {
                kind: "Portfolio",
                id: id.to_string(),
            }
            .into());
        }
        let count = self
            .assets
            .values()
            .filter(|a| a.portfolio_id.as_deref() == Some(id))
            .count();
        if count > 0 {
            return Err(LedgerError::CannotDeleteReferenced {
                entity: "portfolio",
                count,
            }
            .into());
        }
        self.commit(vec![Write::Delete(EntityKind::Portfolio, id.to_string())])
    }

    pub fn portfolios(&self) -> Vec<&Portfolio> {
        let mut list: Vec<&Portfolio> = self.portfolios.values().collect();
        list.sort_by_key(|p| identity::normalize(&p.name));
        list
    }

    // ------------------------------------------------------------------
    // Assets
    // ------------------------------------------------------------------

    /// Creates the asset, registering its platform on first sight.
    /// Refused when another asset already carries the same normalized
    /// (name, platform) identity.
    pub fn create_asset(&mut self, new_asset: NewAsset) -> Result<Asset> {
        if new_asset.name.trim().is_empty() {
            return Err(LedgerError::EmptyName.into());
        }
        if let Some(category_id) = &new_asset.category_id {
            self.require_category(category_id)?;
        }
        if let Some(portfolio_id) = &new_asset.portfolio_id {
            if !self.portfolios.contains_key(portfolio_id) {
                return Err(LedgerError::NotFound {
                    kind: "Portfolio",
                    id: portfolio_id.clone(),
                }
                .into());
            }
        }
        let key = new_asset.identity_key();
        if self.assets.values().any(|a| a.identity_key() == key) {
            return Err(LedgerError::DuplicateIdentity {
                name: new_asset.name,
            }
            .into());
        }

        let mut writes = Vec::new();
        if let Some(platform_name) = new_asset.platform.as_deref() {
            if !platform_name.trim().is_empty()
                && self.find_platform_by_name(platform_name).is_none()
            {
                writes.push(Write::Insert(Entity::Platform(Platform::new(platform_name))));
            }
        }
        let asset = new_asset.into_asset();
        writes.push(Write::Insert(Entity::Asset(asset.clone())));
        self.commit(writes)?;
        Ok(asset)
    }

    /// Returns the existing asset matching the candidate's normalized
    /// identity, or creates one from the raw candidate values. The flag
    /// is `true` when a new asset was created.
    pub fn resolve_or_create_asset(&mut self, new_asset: NewAsset) -> Result<(Asset, bool)> {
        let context = new_asset.platform.as_deref().unwrap_or("");
        if let Some(existing) = identity::resolve(
            &new_asset.name,
            context,
            self.assets.values(),
            |a: &Asset| a.identity_key(),
        ) {
            return Ok((existing.clone(), false));
        }
        let asset = self.create_asset(new_asset)?;
        Ok((asset, true))
    }

    /// Renames the asset, optionally moving it to another platform in
    /// the same edit (`None` keeps the current one). The new identity
    /// is re-resolved against every other asset before committing and a
    /// collision fails the rename. Renaming stays available for assets
    /// with recorded activity; only type and currency are frozen by the
    /// lock (see `update_asset_profile`).
    pub fn rename_asset(
        &mut self,
        id: &str,
        new_name: &str,
        new_platform: Option<&str>,
    ) -> Result<Asset> {
        if new_name.trim().is_empty() {
            return Err(LedgerError::EmptyName.into());
        }
        let mut updated = self.require_asset(id)?.clone();
        if let Some(platform) = new_platform {
            updated.platform = if platform.trim().is_empty() {
                None
            } else {
                Some(platform.to_string())
            };
        }
        updated.name = new_name.to_string();
        let key = identity::identity(new_name, updated.platform.as_deref().unwrap_or(""));
        if self
            .assets
            .values()
            .any(|a| a.id != id && a.identity_key() == key)
        {
            return Err(LedgerError::DuplicateIdentity {
                name: new_name.to_string(),
            }
            .into());
        }

        let mut writes = Vec::new();
        if let Some(platform_name) = updated.platform.as_deref() {
            if self.find_platform_by_name(platform_name).is_none() {
                writes.push(Write::Insert(Entity::Platform(Platform::new(platform_name))));
            }
        }
        updated.updated_at = Utc::now();
        writes.push(Write::Insert(Entity::Asset(updated.clone())));
        self.commit(writes)?;
        Ok(updated)
    }

    /// Notes may always change; type and currency only before the asset
    /// has recorded activity.
    pub fn update_asset_profile(
        &mut self,
        id: &str,
        update: UpdateAssetProfile,
    ) -> Result<Asset> {
        let mut asset = self.require_asset(id)?.clone();
        let locked = self.has_activity(id);
        if locked && update.currency.is_some() {
            return Err(LedgerError::AssetLocked("currency").into());
        }
        if locked && update.asset_type.is_some() {
            return Err(LedgerError::AssetLocked("asset type").into());
        }
        if let Some(asset_type) = update.asset_type {
            asset.asset_type = asset_type;
        }
        if let Some(currency) = update.currency {
            asset.currency = currency;
        }
        if let Some(notes) = update.notes {
            asset.notes = Some(notes);
        }
        asset.updated_at = Utc::now();
        self.commit(vec![Write::Insert(Entity::Asset(asset.clone()))])?;
        Ok(asset)
    }

    pub fn assign_category(&mut self, id: &str, category_id: Option<&str>) -> Result<Asset> {
        if let Some(category_id) = category_id {
            self.require_category(category_id)?;
        }
        let mut asset = self.require_asset(id)?.clone();
        asset.category_id = category_id.map(str::to_string);
        asset.updated_at = Utc::now();
        self.commit(vec![Write::Insert(Entity::Asset(asset.clone()))])?;
        Ok(asset)
    }

    /// Deletes the asset unconditionally, removing its whole history in
    /// one atomic batch: transaction log, price history, snapshot
    /// values and the saving plans targeting it. Source-attribution and
    /// transfer links pointing at the deleted records from surviving
    /// entries are cleared in the same batch.
    pub fn delete_asset(&mut self, id: &str) -> Result<()> {
        self.require_asset(id)?;

        let doomed: HashSet<&str> = self
            .transactions
            .values()
            .filter(|t| t.asset_id == id)
            .map(|t| t.id.as_str())
            .collect();

        let mut writes = Vec::new();
        for tx in self.transactions.values().filter(|t| t.asset_id != id) {
            let stale_source = tx.source_asset_id.as_deref() == Some(id);
            let stale_link = tx
                .linked_transaction_id
                .as_deref()
                .is_some_and(|linked| doomed.contains(linked));
            if !stale_source && !stale_link {
                continue;
            }
            let mut unlinked = tx.clone();
            if stale_source {
                unlinked.source_asset_id = None;
            }
            if stale_link {
                unlinked.linked_transaction_id = None;
            }
            writes.push(Write::Insert(Entity::Transaction(unlinked)));
        }
        for plan in self
            .saving_plans
            .values()
            .filter(|p| p.target_asset_id != id && p.source_asset_id.as_deref() == Some(id))
        {
            let mut unlinked = plan.clone();
            unlinked.source_asset_id = None;
            writes.push(Write::Insert(Entity::SavingPlan(unlinked)));
        }
        for tx in self.transactions.values().filter(|t| t.asset_id == id) {
            writes.push(Write::Delete(EntityKind::Transaction, tx.id.clone()));
        }
        for price in self.prices.values().filter(|p| p.asset_id == id) {
            writes.push(Write::Delete(EntityKind::Price, price.id.clone()));
        }
        for value in self.snapshot_values.values().filter(|v| v.asset_id == id) {
            writes.push(Write::Delete(EntityKind::SnapshotValue, value.id.clone()));
        }
        for plan in self.saving_plans.values().filter(|p| p.target_asset_id == id) {
            writes.push(Write::Delete(EntityKind::SavingPlan, plan.id.clone()));
        }
        writes.push(Write::Delete(EntityKind::Asset, id.to_string()));
        self.commit(writes)
    }

    pub fn assets(&self) -> Vec<&Asset> {
        let mut list: Vec<&Asset> = self.assets.values().collect();
        list.sort_by_key(|a| a.identity_key());
        list
    }

    pub fn find_asset(&self, id: &str) -> Result<&Asset> {
        self.require_asset(id)
    }

    fn require_asset(&self, id: &str) -> Result<&Asset> {
        self.assets.get(id).ok_or_else(|| {
            LedgerError::NotFound {
                kind: "Asset",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// An asset is locked once any transaction or price exists for it.
    fn has_activity(&self, asset_id: &str) -> bool {
        self.transactions.values().any(|t| t.asset_id == asset_id)
            || self.prices.values().any(|p| p.asset_id == asset_id)
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Appends to the asset's transaction log. Creation-time entries
    /// are assumed valid by construction, so out-of-order backfill
    /// (entering a sell before its funding buy) is accepted; a log that
    /// currently derives to a negative quantity only draws a warning.
    /// The non-negative invariant is enforced at deletion time.
    pub fn record_transaction(&mut self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;
        self.require_asset(&new_transaction.asset_id)?;
        if let Some(source_id) = &new_transaction.source_asset_id {
            self.require_asset(source_id)?;
        }
        let transaction = new_transaction.into_transaction();
        let log = self.transactions_for(&transaction.asset_id);
        let impact = transaction.quantity_impact();
        if valuation::would_go_negative(&log, impact) {
            warn!(
                "Asset {} derives to negative quantity {} after this entry; expecting backfill",
                transaction.asset_id,
                valuation::quantity(&log) + impact
            );
        }
        self.commit(vec![Write::Insert(Entity::Transaction(transaction.clone()))])?;
        Ok(transaction)
    }

    /// Removes one transaction from the log. The deletion is refused
    /// when re-deriving the holding without it would yield a negative
    /// quantity; nothing changes on refusal.
    pub fn delete_transaction(&mut self, id: &str) -> Result<()> {
        let transaction = self
            .transactions
            .get(id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: "Transaction",
                id: id.to_string(),
            })?
            .clone();
        let log = self.transactions_for(&transaction.asset_id);
        transactions::check_delete(&transaction, &log)?;

        let mut writes = Vec::new();
        for other in self
            .transactions
            .values()
            .filter(|t| t.id != id && t.linked_transaction_id.as_deref() == Some(id))
        {
            let mut unlinked = other.clone();
            unlinked.linked_transaction_id = None;
            writes.push(Write::Insert(Entity::Transaction(unlinked)));
        }
        writes.push(Write::Delete(EntityKind::Transaction, id.to_string()));
        self.commit(writes)
    }

    /// The asset's full log, ordered by date then recording time.
    pub fn transactions_for(&self, asset_id: &str) -> Vec<&Transaction> {
        let mut log: Vec<&Transaction> = self
            .transactions
            .values()
            .filter(|t| t.asset_id == asset_id)
            .collect();
        log.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        log
    }

    // ------------------------------------------------------------------
    // Prices
    // ------------------------------------------------------------------

    /// Records a closing price. A second price for the same asset and
    /// day replaces the first.
    pub fn record_price(
        &mut self,
        asset_id: &str,
        date: NaiveDate,
        price: Decimal,
    ) -> Result<PriceHistory> {
        self.require_asset(asset_id)?;
        if price < Decimal::ZERO {
            return Err(crate::errors::ValidationError::InvalidInput(
                "Price cannot be negative".to_string(),
            )
            .into());
        }
        let mut writes = Vec::new();
        if let Some(existing) = self
            .prices
            .values()
            .find(|p| p.asset_id == asset_id && p.date == date)
        {
            writes.push(Write::Delete(EntityKind::Price, existing.id.clone()));
        }
        let entry = PriceHistory::new(asset_id, date, price);
        writes.push(Write::Insert(Entity::Price(entry.clone())));
        self.commit(writes)?;
        Ok(entry)
    }

    /// The asset's price history, oldest first.
    pub fn prices_for(&self, asset_id: &str) -> Vec<&PriceHistory> {
        let mut history: Vec<&PriceHistory> = self
            .prices
            .values()
            .filter(|p| p.asset_id == asset_id)
            .collect();
        history.sort_by_key(|p| p.date);
        history
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// At most one snapshot may exist per calendar day.
    pub fn create_snapshot(&mut self, date: NaiveDate) -> Result<Snapshot> {
        if self.snapshot_on(date).is_some() {
            return Err(LedgerError::DuplicateSnapshotDay(date).into());
        }
        let snapshot = Snapshot::new(date);
        self.commit(vec![Write::Insert(Entity::Snapshot(snapshot.clone()))])?;
        Ok(snapshot)
    }

    pub fn snapshot_on(&self, date: NaiveDate) -> Option<&Snapshot> {
        self.snapshots.values().find(|s| s.date == date)
    }

    pub fn snapshots(&self) -> Vec<&Snapshot> {
        let mut list: Vec<&Snapshot> = self.snapshots.values().collect();
        list.sort_by_key(|s| s.date);
        list
    }

    /// Records an asset's market value on a snapshot, replacing any
    /// earlier value for the same pair.
    pub fn record_asset_value(
        &mut self,
        snapshot_id: &str,
        asset_id: &str,
        market_value: Decimal,
    ) -> Result<SnapshotAssetValue> {
        self.require_snapshot(snapshot_id)?;
        self.require_asset(asset_id)?;
        let mut writes = Vec::new();
        if let Some(existing) = self
            .snapshot_values
            .values()
            .find(|v| v.snapshot_id == snapshot_id && v.asset_id == asset_id)
        {
            writes.push(Write::Delete(EntityKind::SnapshotValue, existing.id.clone()));
        }
        let value = SnapshotAssetValue::new(snapshot_id, asset_id, market_value);
        writes.push(Write::Insert(Entity::SnapshotValue(value.clone())));
        self.commit(writes)?;
        Ok(value)
    }

    pub fn asset_values_for(&self, snapshot_id: &str) -> Vec<&SnapshotAssetValue> {
        self.snapshot_values
            .values()
            .filter(|v| v.snapshot_id == snapshot_id)
            .collect()
    }

    /// Cash flows are unique per snapshot on the normalized description.
    pub fn record_cash_flow(
        &mut self,
        snapshot_id: &str,
        description: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<CashFlowOperation> {
        self.require_snapshot(snapshot_id)?;
        if description.trim().is_empty() {
            return Err(LedgerError::EmptyName.into());
        }
        let normalized = identity::normalize(description);
        if self
            .cash_flows
            .values()
            .any(|c| c.snapshot_id == snapshot_id && c.normalized_description() == normalized)
        {
            return Err(LedgerError::DuplicateCashFlow {
                description: description.to_string(),
            }
            .into());
        }
        let flow = CashFlowOperation::new(snapshot_id, description, amount, currency);
        self.commit(vec![Write::Insert(Entity::CashFlow(flow.clone()))])?;
        Ok(flow)
    }

    pub fn cash_flows_for(&self, snapshot_id: &str) -> Vec<&CashFlowOperation> {
        self.cash_flows
            .values()
            .filter(|c| c.snapshot_id == snapshot_id)
            .collect()
    }

    /// Each snapshot carries at most one exchange-rate record.
    pub fn attach_exchange_rate(
        &mut self,
        snapshot_id: &str,
        base_currency: &str,
        rates: &HashMap<String, Decimal>,
        fetch_date: chrono::DateTime<Utc>,
    ) -> Result<ExchangeRate> {
        self.require_snapshot(snapshot_id)?;
        if self.exchange_rate_for(snapshot_id).is_some() {
            return Err(LedgerError::ExchangeRateAlreadyAttached.into());
        }
        let rate = ExchangeRate::new(snapshot_id, base_currency, rates, fetch_date)?;
        self.commit(vec![Write::Insert(Entity::ExchangeRate(rate.clone()))])?;
        Ok(rate)
    }

    /// Replaces the rate table on a snapshot's exchange-rate record.
    pub fn update_exchange_rate(
        &mut self,
        snapshot_id: &str,
        update: &RateUpdate,
    ) -> Result<ExchangeRate> {
        let mut rate = self
            .exchange_rate_for(snapshot_id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: "ExchangeRate",
                id: snapshot_id.to_string(),
            })?
            .clone();
        rate.update_rates(&update.base_currency, &update.rates, update.fetch_date)?;
        self.commit(vec![Write::Insert(Entity::ExchangeRate(rate.clone()))])?;
        Ok(rate)
    }

    pub fn exchange_rate_for(&self, snapshot_id: &str) -> Option<&ExchangeRate> {
        self.exchange_rates
            .values()
            .find(|r| r.snapshot_id == snapshot_id)
    }

    fn require_snapshot(&self, id: &str) -> Result<&Snapshot> {
        self.snapshots.get(id).ok_or_else(|| {
            LedgerError::NotFound {
                kind: "Snapshot",
                id: id.to_string(),
            }
            .into()
        })
    }

    // ------------------------------------------------------------------
    // Saving plans
    // ------------------------------------------------------------------

    pub fn create_saving_plan(&mut self, new_plan: NewSavingPlan) -> Result<RegularSavingPlan> {
        new_plan.validate()?;
        self.require_asset(&new_plan.target_asset_id)?;
        if let Some(source_id) = &new_plan.source_asset_id {
            self.require_asset(source_id)?;
        }
        let plan = new_plan.into_plan();
        self.commit(vec![Write::Insert(Entity::SavingPlan(plan.clone()))])?;
        Ok(plan)
    }

    pub fn set_plan_active(&mut self, id: &str, is_active: bool) -> Result<RegularSavingPlan> {
        let mut plan = self
            .saving_plans
            .get(id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: "SavingPlan",
                id: id.to_string(),
            })?
            .clone();
        plan.is_active = is_active;
        self.commit(vec![Write::Insert(Entity::SavingPlan(plan.clone()))])?;
        Ok(plan)
    }

    pub fn delete_saving_plan(&mut self, id: &str) -> Result<()> {
        if !self.saving_plans.contains_key(id) {
            return Err(LedgerError::NotFound {
                kind: "SavingPlan",
                id: id.to_string(),
            }
            .into());
        }
        self.commit(vec![Write::Delete(EntityKind::SavingPlan, id.to_string())])
    }

    pub fn saving_plans(&self) -> Vec<&RegularSavingPlan> {
        let mut list: Vec<&RegularSavingPlan> = self.saving_plans.values().collect();
        list.sort_by_key(|p| identity::normalize(&p.name));
        list
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Live view of one asset, derived from its logs.
    pub fn holding(&self, asset_id: &str) -> Result<HoldingView> {
        self.require_asset(asset_id)?;
        let log = self.transactions_for(asset_id);
        let history = self.prices_for(asset_id);
        Ok(valuation::holding(asset_id, &log, &history))
    }

    /// Whether the asset's identity-bearing fields are frozen.
    pub fn asset_locked(&self, asset_id: &str) -> Result<bool> {
        self.require_asset(asset_id)?;
        Ok(self.has_activity(asset_id))
    }

    pub fn holdings(&self) -> Vec<HoldingView> {
        self.assets()
            .iter()
            .map(|asset| {
                let log = self.transactions_for(&asset.id);
                let history = self.prices_for(&asset.id);
                valuation::holding(&asset.id, &log, &history)
            })
            .collect()
    }

    /// Market value of one asset expressed in the display currency.
    /// `None` when the value cannot be converted with the given rates.
    fn display_value(
        &self,
        asset: &Asset,
        settings: &Settings,
        rate: Option<&ExchangeRate>,
    ) -> Option<Decimal> {
        let log = self.transactions_for(&asset.id);
        let history = self.prices_for(&asset.id);
        let view = valuation::holding(&asset.id, &log, &history);
        let currency = if asset.currency.is_empty() {
            settings.display_currency.as_str()
        } else {
            asset.currency.as_str()
        };
        if identity::normalize(currency) == identity::normalize(&settings.display_currency) {
            return Some(view.market_value);
        }
        let converted = rate.and_then(|r| {
            r.convert(view.market_value, currency, &settings.display_currency)
        });
        if converted.is_none() {
            warn!(
                "Skipping asset '{}': no rate from {} to {}",
                asset.name, currency, settings.display_currency
            );
        }
        converted
    }

    /// Total portfolio value in the display currency. Assets whose
    /// currency cannot be converted are skipped with a warning.
    pub fn total_value(&self, settings: &Settings, rate: Option<&ExchangeRate>) -> Decimal {
        self.assets
            .values()
            .filter_map(|asset| self.display_value(asset, settings, rate))
            .sum()
    }

    /// Total value of one portfolio's assets in the display currency.
    pub fn portfolio_total(
        &self,
        portfolio_id: &str,
        settings: &Settings,
        rate: Option<&ExchangeRate>,
    ) -> Result<Decimal> {
        if !self.portfolios.contains_key(portfolio_id) {
            return Err(LedgerError::NotFound {
                kind: "Portfolio",
                id: portfolio_id.to_string(),
            }
            .into());
        }
        Ok(self
            .assets
            .values()
            .filter(|a| a.portfolio_id.as_deref() == Some(portfolio_id))
            .filter_map(|asset| self.display_value(asset, settings, rate))
            .sum())
    }

    /// Current value per category in the display currency, the input to
    /// the rebalancing calculation. Assets without a category are
    /// aggregated into a synthetic untargeted entry so percentages are
    /// computed over the full portfolio.
    pub fn category_values(
        &self,
        settings: &Settings,
        rate: Option<&ExchangeRate>,
    ) -> Vec<CategoryAllocationInput> {
        let mut inputs: Vec<CategoryAllocationInput> = self
            .categories()
            .iter()
            .map(|category| {
                let current_value = self
                    .assets
                    .values()
                    .filter(|a| a.category_id.as_deref() == Some(category.id.as_str()))
                    .filter_map(|asset| self.display_value(asset, settings, rate))
                    .sum();
                CategoryAllocationInput {
                    category_id: category.id.clone(),
                    category_name: category.name.clone(),
                    current_value,
                    target_percentage: category.target_percentage,
                }
            })
            .collect();

        let uncategorized: Decimal = self
            .assets
            .values()
            .filter(|a| a.category_id.is_none())
            .filter_map(|asset| self.display_value(asset, settings, rate))
            .sum();
        if !uncategorized.is_zero() {
            inputs.push(CategoryAllocationInput {
                category_id: String::new(),
                category_name: "Uncategorized".to_string(),
                current_value: uncategorized,
                target_percentage: None,
            });
        }
        inputs
    }

    /// Advisory rebalancing trades based on category targets.
    pub fn rebalance_recommendations(
        &self,
        settings: &Settings,
        rate: Option<&ExchangeRate>,
    ) -> Vec<RebalanceRecommendation> {
        rebalancing::calculate_adjustments(
            &self.category_values(settings, rate),
            self.total_value(settings, rate),
        )
    }
}

fn validate_target(target: Option<Decimal>) -> Result<()> {
    if let Some(value) = target {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(LedgerError::InvalidTargetAllocation(value).into());
        }
    }
    Ok(())
}
