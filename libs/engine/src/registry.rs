//! Pair registry: canonical identification and per-pair reserve state.
//!
//! A pair's identity is fixed at creation and pairs are never deleted.
//! Reserves and share totals mutate only through the liquidity and swap
//! operations on [`crate::Amm`]; the registry itself only creates pairs and
//! hands out references.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use basin_types::{canonical_order, AccountId, AssetId, PairId};

use crate::error::AmmError;

/// One pooled market between exactly two distinct assets.
///
/// `provider_shares` records, per identity, how many global ledger shares
/// were minted through *this* pair. Redemption eligibility is checked
/// against it, so shares received by plain ledger transfer carry value but
/// no redemption rights here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pair {
    pub asset_low: AssetId,
    pub asset_high: AssetId,
    pub reserve_low: u128,
    pub reserve_high: u128,
    pub total_shares: u128,
    provider_shares: HashMap<AccountId, u128>,
}

impl Pair {
    fn new(asset_low: AssetId, asset_high: AssetId) -> Self {
        Self {
            asset_low,
            asset_high,
            reserve_low: 0,
            reserve_high: 0,
            total_shares: 0,
            provider_shares: HashMap::new(),
        }
    }

    /// Shares minted to `account` through this pair and not yet redeemed.
    pub fn provider_balance(&self, account: AccountId) -> u128 {
        self.provider_shares.get(&account).copied().unwrap_or(0)
    }

    pub(crate) fn credit_provider(&mut self, account: AccountId, shares: u128) {
        *self.provider_shares.entry(account).or_insert(0) += shares;
    }

    /// Caller must have checked `provider_balance` first.
    pub(crate) fn debit_provider(&mut self, account: AccountId, shares: u128) {
        if let Some(balance) = self.provider_shares.get_mut(&account) {
            *balance -= shares;
        }
    }
}

/// Storage and canonical identification of every pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairRegistry {
    pairs: HashMap<PairId, Pair>,
}

impl PairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new zero-reserve pair for two distinct assets.
    pub fn create_pair(&mut self, asset_a: AssetId, asset_b: AssetId) -> Result<PairId, AmmError> {
        if asset_a == asset_b {
            return Err(AmmError::IdenticalAssets);
        }
        let (low, high) = canonical_order(asset_a, asset_b);
        let pair_id = PairId::derive(low, high);
        if self.pairs.contains_key(&pair_id) {
            return Err(AmmError::PairExists);
        }
        self.pairs.insert(pair_id, Pair::new(low, high));
        Ok(pair_id)
    }

    pub fn get(&self, pair_id: PairId) -> Option<&Pair> {
        self.pairs.get(&pair_id)
    }

    pub(crate) fn get_mut(&mut self, pair_id: PairId) -> Option<&mut Pair> {
        self.pairs.get_mut(&pair_id)
    }

    /// Reserves in canonical `(low, high)` order; zeros for an unknown id.
    ///
    /// Never fails: callers that care about existence must check it
    /// separately.
    pub fn reserves(&self, pair_id: PairId) -> (u128, u128) {
        self.pairs
            .get(&pair_id)
            .map(|p| (p.reserve_low, p.reserve_high))
            .unwrap_or((0, 0))
    }
}
