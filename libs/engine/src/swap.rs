//! Swap engine: constant-product pricing against a pair's reserves.
//!
//! Both directions run under the contract-wide entry guard: validate and
//! price on a committed snapshot, pull the input leg, commit the reserve
//! update, then pay the output leg, rolling back (and refunding the input)
//! if the payout is declined.

use tracing::{debug, error};

use basin_amm::SwapMath;
use basin_types::{AccountId, AssetId, PairId};

use crate::engine::Amm;
use crate::error::AmmError;
use crate::traits::{AssetTransfer, TimeSource};

impl<T, C> Amm<T, C>
where
    T: AssetTransfer,
    C: TimeSource,
{
    /// Swap an exact `amount_in` of `asset_in` for as much of the other
    /// asset as the reserves price it at, requiring at least
    /// `amount_out_min`. Returns the output amount paid to `recipient`.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_in(
        &self,
        caller: AccountId,
        pair_id: PairId,
        amount_in: u128,
        amount_out_min: u128,
        asset_in: AssetId,
        recipient: AccountId,
        deadline: u64,
    ) -> Result<u128, AmmError> {
        let _entry = self.enter()?;
        self.check_deadline(deadline)?;

        let side = self.swap_side(pair_id, asset_in)?;
        let amount_out = SwapMath::get_amount_out(amount_in, side.reserve_in, side.reserve_out)?;
        if amount_out < amount_out_min {
            return Err(AmmError::InsufficientOutputAmount);
        }

        self.settle_swap(caller, pair_id, &side, amount_in, amount_out, recipient)?;
        debug!(pair = %pair_id, amount_in, amount_out, "swap (exact in)");
        Ok(amount_out)
    }

    /// Swap for an exact `amount_out` of the asset opposite `asset_in`,
    /// requiring the priced input not exceed `amount_in_max`. Returns the
    /// input amount pulled from the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_out(
        &self,
        caller: AccountId,
        pair_id: PairId,
        amount_out: u128,
        amount_in_max: u128,
        asset_in: AssetId,
        recipient: AccountId,
        deadline: u64,
    ) -> Result<u128, AmmError> {
        let _entry = self.enter()?;
        self.check_deadline(deadline)?;

        let side = self.swap_side(pair_id, asset_in)?;
        let amount_in = SwapMath::get_amount_in(amount_out, side.reserve_in, side.reserve_out)?;
        if amount_in > amount_in_max {
            return Err(AmmError::ExcessiveInputAmount);
        }

        self.settle_swap(caller, pair_id, &side, amount_in, amount_out, recipient)?;
        debug!(pair = %pair_id, amount_in, amount_out, "swap (exact out)");
        Ok(amount_in)
    }

    /// Resolve which side of the pair `asset_in` is, with the matching
    /// reserve orientation.
    fn swap_side(&self, pair_id: PairId, asset_in: AssetId) -> Result<SwapSide, AmmError> {
        let state = self.state.read();
        let pair = state.registry.get(pair_id).ok_or(AmmError::PairNotFound)?;
        if asset_in == pair.asset_low {
            Ok(SwapSide {
                asset_in,
                asset_out: pair.asset_high,
                reserve_in: pair.reserve_low,
                reserve_out: pair.reserve_high,
                low_in: true,
            })
        } else if asset_in == pair.asset_high {
            Ok(SwapSide {
                asset_in,
                asset_out: pair.asset_low,
                reserve_in: pair.reserve_high,
                reserve_out: pair.reserve_low,
                low_in: false,
            })
        } else {
            Err(AmmError::InvalidInputAsset)
        }
    }

    /// Pull the input, commit the reserve update, pay the output.
    fn settle_swap(
        &self,
        caller: AccountId,
        pair_id: PairId,
        side: &SwapSide,
        amount_in: u128,
        amount_out: u128,
        recipient: AccountId,
    ) -> Result<(), AmmError> {
        if !self
            .transfers
            .transfer_from(side.asset_in, caller, self.custody, amount_in)
        {
            return Err(AmmError::TransferFromFailed);
        }

        self.apply_swap(pair_id, side.low_in, amount_in, amount_out);

        if !self.transfers.transfer(side.asset_out, recipient, amount_out) {
            // Roll the reserves back and hand the input leg back.
            self.unapply_swap(pair_id, side.low_in, amount_in, amount_out);
            if !self.transfers.transfer(side.asset_in, caller, amount_in) {
                error!(pair = %pair_id, "input refund declined after failed payout");
            }
            return Err(AmmError::TransferFailed);
        }
        Ok(())
    }

    fn apply_swap(&self, pair_id: PairId, low_in: bool, amount_in: u128, amount_out: u128) {
        let mut state = self.state.write();
        if let Some(pair) = state.registry.get_mut(pair_id) {
            if low_in {
                pair.reserve_low += amount_in;
                pair.reserve_high -= amount_out;
            } else {
                pair.reserve_high += amount_in;
                pair.reserve_low -= amount_out;
            }
        }
    }

    fn unapply_swap(&self, pair_id: PairId, low_in: bool, amount_in: u128, amount_out: u128) {
        let mut state = self.state.write();
        if let Some(pair) = state.registry.get_mut(pair_id) {
            if low_in {
                pair.reserve_low -= amount_in;
                pair.reserve_high += amount_out;
            } else {
                pair.reserve_high -= amount_in;
                pair.reserve_low += amount_out;
            }
        }
    }
}

/// Orientation of one swap relative to the pair's canonical order.
struct SwapSide {
    asset_in: AssetId,
    asset_out: AssetId,
    reserve_in: u128,
    reserve_out: u128,
    low_in: bool,
}
