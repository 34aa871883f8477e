//! The top-level engine object: owns all mutable state, enforces the
//! contract-wide reentrancy discipline, and exposes the read API.
//!
//! Locking model: `state` is a single `RwLock` that write-locks only for
//! the short commit (and rollback) sections of each operation, so reads
//! never block for long and always observe fully committed state. `entry`
//! is the contract-wide mutual-exclusion guard: every mutating operation
//! `try_lock`s it for its whole duration, including any external custody
//! calls, so a collaborator that re-enters gets [`AmmError::Reentrancy`]
//! instead of a view of mid-update state.

use parking_lot::{Mutex, MutexGuard, RwLock};
use std::collections::HashMap;
use tracing::info;

use basin_ledger::ShareLedger;
use basin_types::{AccountId, AssetId, PairId};

use crate::error::AmmError;
use crate::registry::{Pair, PairRegistry};
use crate::traits::{AssetTransfer, TimeSource};

pub(crate) struct EngineState {
    pub(crate) registry: PairRegistry,
    pub(crate) ledger: ShareLedger,
    /// Append-only index of pairs each identity has provided liquidity to.
    pub(crate) user_pairs: HashMap<AccountId, Vec<PairId>>,
}

/// The AMM engine: pair registry, share ledger, and the operations over
/// them. One instance is the whole "contract".
pub struct Amm<T, C> {
    pub(crate) transfers: T,
    pub(crate) clock: C,
    /// Identity under which the engine holds pooled assets in custody.
    pub(crate) custody: AccountId,
    pub(crate) state: RwLock<EngineState>,
    entry: Mutex<()>,
}

impl<T, C> Amm<T, C>
where
    T: AssetTransfer,
    C: TimeSource,
{
    /// Create an empty engine holding custody under `custody`.
    pub fn new(transfers: T, clock: C, custody: AccountId) -> Self {
        Self {
            transfers,
            clock,
            custody,
            state: RwLock::new(EngineState {
                registry: PairRegistry::new(),
                ledger: ShareLedger::new(),
                user_pairs: HashMap::new(),
            }),
            entry: Mutex::new(()),
        }
    }

    /// Acquire the contract-wide entry guard, rejecting nested calls.
    pub(crate) fn enter(&self) -> Result<MutexGuard<'_, ()>, AmmError> {
        self.entry.try_lock().ok_or(AmmError::Reentrancy)
    }

    pub(crate) fn check_deadline(&self, deadline: u64) -> Result<(), AmmError> {
        if self.clock.now() > deadline {
            return Err(AmmError::Expired);
        }
        Ok(())
    }

    /// Register a new pair for two distinct assets.
    pub fn create_pair(&self, asset_a: AssetId, asset_b: AssetId) -> Result<PairId, AmmError> {
        let _entry = self.enter()?;
        let pair_id = self.state.write().registry.create_pair(asset_a, asset_b)?;
        info!(pair = %pair_id, "pair created");
        Ok(pair_id)
    }

    // ---- read API: never takes the entry guard, never blocks on it ----

    /// Deterministic pair id for an asset pair, registered or not.
    pub fn pair_id_for(&self, asset_a: AssetId, asset_b: AssetId) -> PairId {
        PairId::derive(asset_a, asset_b)
    }

    /// Reserves in canonical `(low, high)` order; zeros for an unknown id.
    pub fn reserves(&self, pair_id: PairId) -> (u128, u128) {
        self.state.read().registry.reserves(pair_id)
    }

    /// Snapshot of a pair's public state.
    pub fn pair(&self, pair_id: PairId) -> Option<Pair> {
        self.state.read().registry.get(pair_id).cloned()
    }

    /// Total shares outstanding that are attributable to one pair.
    pub fn total_shares(&self, pair_id: PairId) -> u128 {
        self.state
            .read()
            .registry
            .get(pair_id)
            .map(|p| p.total_shares)
            .unwrap_or(0)
    }

    /// Shares `account` minted through `pair_id` and has not redeemed.
    pub fn share_balance(&self, pair_id: PairId, account: AccountId) -> u128 {
        self.state
            .read()
            .registry
            .get(pair_id)
            .map(|p| p.provider_balance(account))
            .unwrap_or(0)
    }

    /// Every pair `account` has ever provided liquidity to.
    pub fn pairs_of(&self, account: AccountId) -> Vec<PairId> {
        self.state
            .read()
            .user_pairs
            .get(&account)
            .cloned()
            .unwrap_or_default()
    }

    /// Global ledger balance of `account`.
    pub fn ledger_balance(&self, account: AccountId) -> u128 {
        self.state.read().ledger.balance_of(account)
    }

    /// Global ledger allowance from `owner` to `spender`.
    pub fn ledger_allowance(&self, owner: AccountId, spender: AccountId) -> u128 {
        self.state.read().ledger.allowance(owner, spender)
    }

    /// Total global share supply.
    pub fn ledger_total_supply(&self) -> u128 {
        self.state.read().ledger.total_supply()
    }

    // ---- fungible share surface, threaded through the caller identity ----

    /// Move shares from the caller to `to` in the global ledger.
    ///
    /// Moves fungible value only: redemption rights stay with the per-pair
    /// provider balances.
    pub fn transfer_shares(
        &self,
        caller: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), AmmError> {
        let _entry = self.enter()?;
        self.state.write().ledger.transfer(caller, to, amount)?;
        Ok(())
    }

    /// Authorize `spender` to move up to `amount` of the caller's shares.
    pub fn approve_shares(
        &self,
        caller: AccountId,
        spender: AccountId,
        amount: u128,
    ) -> Result<(), AmmError> {
        let _entry = self.enter()?;
        self.state.write().ledger.approve(caller, spender, amount);
        Ok(())
    }

    /// Move shares from `from` to `to` on the caller's allowance.
    pub fn transfer_shares_from(
        &self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), AmmError> {
        let _entry = self.enter()?;
        self.state
            .write()
            .ledger
            .transfer_from(caller, from, to, amount)?;
        Ok(())
    }
}
