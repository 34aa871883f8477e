//! Liquidity engine: deposit and withdrawal against a pair's reserves.
//!
//! Each operation runs Validate, Quote, Settle, Mint/Burn, UpdateReserves
//! as one atomic unit under the contract-wide entry guard. Deposits pull
//! funds before minting; withdrawals burn and decrement reserves in one
//! committed write before paying out, then roll back if a payout is
//! declined.

use tracing::{debug, error};

use basin_amm::{integer_sqrt, MathError, SwapMath, MINIMUM_LIQUIDITY};
use basin_ledger::LedgerError;
use basin_types::{AccountId, PairId};

use crate::engine::Amm;
use crate::error::AmmError;
use crate::traits::{AssetTransfer, TimeSource};

impl<T, C> Amm<T, C>
where
    T: AssetTransfer,
    C: TimeSource,
{
    /// Deposit paired assets and mint liquidity shares to `recipient`.
    ///
    /// Amounts are given in canonical order: "A" is the pair's low asset,
    /// "B" the high asset. The first deposit sets the price freely; later
    /// deposits are matched to the current reserve ratio, with
    /// `amount_a_min`/`amount_b_min` bounding how far the quoted amounts
    /// may fall below the desired ones.
    ///
    /// Returns `(amount_a, amount_b, liquidity)` actually settled and
    /// minted.
    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity(
        &self,
        caller: AccountId,
        pair_id: PairId,
        amount_a_desired: u128,
        amount_b_desired: u128,
        amount_a_min: u128,
        amount_b_min: u128,
        recipient: AccountId,
        deadline: u64,
    ) -> Result<(u128, u128, u128), AmmError> {
        let _entry = self.enter()?;
        self.check_deadline(deadline)?;

        let (asset_low, asset_high, reserve_low, reserve_high, total_shares, supply) = {
            let state = self.state.read();
            let pair = state.registry.get(pair_id).ok_or(AmmError::PairNotFound)?;
            (
                pair.asset_low,
                pair.asset_high,
                pair.reserve_low,
                pair.reserve_high,
                pair.total_shares,
                state.ledger.total_supply(),
            )
        };

        // Quote: match the deposit to the current reserve ratio. The first
        // deposit has no ratio to match.
        let (amount_a, amount_b) = if reserve_low == 0 && reserve_high == 0 {
            (amount_a_desired, amount_b_desired)
        } else {
            let b_optimal = SwapMath::quote(amount_a_desired, reserve_low, reserve_high)?;
            if b_optimal <= amount_b_desired {
                if b_optimal < amount_b_min {
                    return Err(AmmError::InsufficientBAmount);
                }
                (amount_a_desired, b_optimal)
            } else {
                let a_optimal = SwapMath::quote(amount_b_desired, reserve_high, reserve_low)?;
                // b_optimal > b_desired implies a_optimal <= a_desired; a
                // violation is a math bug, not a user error.
                assert!(a_optimal <= amount_a_desired, "liquidity quote out of range");
                if a_optimal < amount_a_min {
                    return Err(AmmError::InsufficientAAmount);
                }
                (a_optimal, amount_b_desired)
            }
        };

        // Compute the mint on the committed snapshot so a too-small deposit
        // is rejected before any settlement leg runs.
        let first_deposit = total_shares == 0;
        let liquidity = if first_deposit {
            let product = amount_a
                .checked_mul(amount_b)
                .ok_or(MathError::Overflow)?;
            integer_sqrt(product)
                .checked_sub(MINIMUM_LIQUIDITY)
                .filter(|l| *l > 0)
                .ok_or(AmmError::InsufficientLiquidityMinted)?
        } else {
            let by_a = amount_a
                .checked_mul(total_shares)
                .ok_or(MathError::Overflow)?
                / reserve_low;
            let by_b = amount_b
                .checked_mul(total_shares)
                .ok_or(MathError::Overflow)?
                / reserve_high;
            let minted = by_a.min(by_b);
            if minted == 0 {
                return Err(AmmError::InsufficientLiquidityMinted);
            }
            minted
        };

        // Rule out supply overflow before settling so the commit below
        // cannot fail halfway through.
        let minted_total = if first_deposit {
            liquidity + MINIMUM_LIQUIDITY
        } else {
            liquidity
        };
        supply
            .checked_add(minted_total)
            .ok_or(LedgerError::SupplyOverflow)?;

        // Settle: pull both legs into custody before minting anything. If
        // the second leg is declined, hand the first back.
        if !self
            .transfers
            .transfer_from(asset_low, caller, self.custody, amount_a)
        {
            return Err(AmmError::TransferFromFailed);
        }
        if !self
            .transfers
            .transfer_from(asset_high, caller, self.custody, amount_b)
        {
            if !self.transfers.transfer(asset_low, caller, amount_a) {
                error!(pair = %pair_id, "deposit refund declined after failed second leg");
            }
            return Err(AmmError::TransferFromFailed);
        }

        // Commit: mint shares, record provenance, grow reserves.
        {
            let mut state = self.state.write();
            if first_deposit {
                state.ledger.mint(AccountId::BURN_SINK, MINIMUM_LIQUIDITY)?;
            }
            state.ledger.mint(recipient, liquidity)?;

            // Guard held since the snapshot, so the pair still exists.
            let pair = state
                .registry
                .get_mut(pair_id)
                .ok_or(AmmError::PairNotFound)?;
            if first_deposit {
                pair.total_shares += MINIMUM_LIQUIDITY;
            }
            pair.total_shares += liquidity;
            pair.credit_provider(recipient, liquidity);
            pair.reserve_low += amount_a;
            pair.reserve_high += amount_b;

            let provided = state.user_pairs.entry(recipient).or_default();
            if !provided.contains(&pair_id) {
                provided.push(pair_id);
            }
        }

        debug!(
            pair = %pair_id,
            amount_a,
            amount_b,
            liquidity,
            "liquidity added"
        );
        Ok((amount_a, amount_b, liquidity))
    }

    /// Burn `liquidity` of the caller's shares in `pair_id` and pay the
    /// proportional reserves to `recipient`.
    ///
    /// Withdrawal amounts truncate, so rounding loss falls on the
    /// withdrawer, never the pool. Returns `(amount_a, amount_b)` paid out
    /// in canonical order.
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity(
        &self,
        caller: AccountId,
        pair_id: PairId,
        liquidity: u128,
        amount_a_min: u128,
        amount_b_min: u128,
        recipient: AccountId,
        deadline: u64,
    ) -> Result<(u128, u128), AmmError> {
        let _entry = self.enter()?;
        self.check_deadline(deadline)?;
        if liquidity == 0 {
            return Err(AmmError::Math(MathError::InvalidAmount));
        }

        let (asset_low, asset_high, amount_a, amount_b) = {
            let state = self.state.read();
            let pair = state.registry.get(pair_id).ok_or(AmmError::PairNotFound)?;
            if liquidity > pair.provider_balance(caller) {
                return Err(AmmError::InsufficientLiquidity);
            }
            let amount_a = liquidity
                .checked_mul(pair.reserve_low)
                .ok_or(MathError::Overflow)?
                / pair.total_shares;
            let amount_b = liquidity
                .checked_mul(pair.reserve_high)
                .ok_or(MathError::Overflow)?
                / pair.total_shares;
            (pair.asset_low, pair.asset_high, amount_a, amount_b)
        };
        if amount_a < amount_a_min {
            return Err(AmmError::InsufficientAAmount);
        }
        if amount_b < amount_b_min {
            return Err(AmmError::InsufficientBAmount);
        }

        // Commit the burn and reserve decrement before any external call:
        // a reentrant redeem attempt must never see stale reserves.
        {
            let mut state = self.state.write();
            state.ledger.burn(caller, liquidity)?;
            let pair = state
                .registry
                .get_mut(pair_id)
                .ok_or(AmmError::PairNotFound)?;
            pair.debit_provider(caller, liquidity);
            pair.total_shares -= liquidity;
            pair.reserve_low -= amount_a;
            pair.reserve_high -= amount_b;
        }

        // Pay out. A declined payout rolls the commit back; the entry
        // guard is still held, so nothing can observe the interim state.
        if !self.transfers.transfer(asset_low, recipient, amount_a) {
            self.restore_withdrawal(pair_id, caller, liquidity, amount_a, amount_b);
            return Err(AmmError::TransferFailed);
        }
        if !self.transfers.transfer(asset_high, recipient, amount_b) {
            self.restore_withdrawal(pair_id, caller, liquidity, amount_a, amount_b);
            // The first leg already landed; recover it. The collaborator
            // has no revert, so this is best-effort with a loud failure.
            if !self
                .transfers
                .transfer_from(asset_low, recipient, self.custody, amount_a)
            {
                error!(pair = %pair_id, "payout recovery declined after failed second leg");
            }
            return Err(AmmError::TransferFailed);
        }

        debug!(
            pair = %pair_id,
            amount_a,
            amount_b,
            liquidity,
            "liquidity removed"
        );
        Ok((amount_a, amount_b))
    }

    /// Undo a committed withdrawal after a declined payout.
    fn restore_withdrawal(
        &self,
        pair_id: PairId,
        caller: AccountId,
        liquidity: u128,
        amount_a: u128,
        amount_b: u128,
    ) {
        let mut state = self.state.write();
        // Re-minting what was just burned cannot overflow supply.
        let _ = state.ledger.mint(caller, liquidity);
        if let Some(pair) = state.registry.get_mut(pair_id) {
            pair.credit_provider(caller, liquidity);
            pair.total_shares += liquidity;
            pair.reserve_low += amount_a;
            pair.reserve_high += amount_b;
        }
    }
}
