//! Global fungible share ledger.
//!
//! One divisible accounting unit represents liquidity ownership across every
//! pool: shares are minted per-pair by the engine but transfer freely here.
//! The ledger is a plain balance/allowance table with a standard fungible
//! surface (`transfer`, `approve`, `transfer_from`, `balance_of`,
//! `allowance`, `total_supply`) and fixed metadata.
//!
//! Invariant maintained by every mutation: the sum of all balances equals
//! `total_supply`. Mint is the only way supply appears, burn the only way it
//! disappears; transfers conserve it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use basin_types::AccountId;

/// Human-readable name of the share unit.
pub const SHARE_NAME: &str = "Basin Liquidity Share";

/// Ticker symbol of the share unit.
pub const SHARE_SYMBOL: &str = "BLS";

/// Decimal places of the share unit.
pub const SHARE_DECIMALS: u8 = 18;

/// Ledger mutation failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// Account balance does not cover the requested debit.
    #[error("insufficient share balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },

    /// Spender allowance does not cover the requested debit.
    #[error("insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: u128, need: u128 },

    /// Mint would push total supply past `u128::MAX`.
    #[error("total supply overflow")]
    SupplyOverflow,
}

/// Balance and allowance table for the global share unit.
///
/// Balances are created lazily at zero and never removed, only reduced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareLedger {
    balances: HashMap<AccountId, u128>,
    allowances: HashMap<(AccountId, AccountId), u128>,
    total_supply: u128,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares outstanding across all accounts.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Balance of `account`, zero if never touched.
    pub fn balance_of(&self, account: AccountId) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Remaining amount `spender` may move out of `owner`'s balance.
    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> u128 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    /// Create `amount` new shares in `to`'s balance.
    pub fn mint(&mut self, to: AccountId, amount: u128) -> Result<(), LedgerError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        self.total_supply = supply;
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }

    /// Destroy `amount` shares from `from`'s balance.
    pub fn burn(&mut self, from: AccountId, amount: u128) -> Result<(), LedgerError> {
        self.debit(from, amount)?;
        // Debit succeeded, so supply >= amount.
        self.total_supply -= amount;
        Ok(())
    }

    /// Move `amount` shares from the caller to `to`.
    pub fn transfer(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.debit(caller, amount)?;
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }

    /// Authorize `spender` to move up to `amount` of the caller's shares.
    ///
    /// Overwrites any previous allowance.
    pub fn approve(&mut self, caller: AccountId, spender: AccountId, amount: u128) {
        self.allowances.insert((caller, spender), amount);
    }

    /// Move `amount` shares from `from` to `to` on the caller's authority,
    /// spending exactly `amount` of the caller's allowance.
    pub fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, caller);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                have: allowed,
                need: amount,
            });
        }
        self.debit(from, amount)?;
        self.allowances.insert((from, caller), allowed - amount);
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }

    fn debit(&mut self, from: AccountId, amount: u128) -> Result<(), LedgerError> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: balance,
                need: amount,
            });
        }
        self.balances.insert(from, balance - amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(tag: u8) -> AccountId {
        AccountId([tag; 20])
    }

    #[test]
    fn mint_and_burn_track_supply() {
        let mut ledger = ShareLedger::new();
        ledger.mint(acct(1), 500).unwrap();
        ledger.mint(acct(2), 300).unwrap();
        assert_eq!(ledger.total_supply(), 800);

        ledger.burn(acct(1), 200).unwrap();
        assert_eq!(ledger.balance_of(acct(1)), 300);
        assert_eq!(ledger.total_supply(), 600);
    }

    #[test]
    fn burn_rejects_overdraft() {
        let mut ledger = ShareLedger::new();
        ledger.mint(acct(1), 100).unwrap();
        let err = ledger.burn(acct(1), 101).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                have: 100,
                need: 101
            }
        );
        // Failed burn leaves supply untouched
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn transfer_conserves_supply() {
        let mut ledger = ShareLedger::new();
        ledger.mint(acct(1), 1000).unwrap();
        ledger.transfer(acct(1), acct(2), 400).unwrap();
        assert_eq!(ledger.balance_of(acct(1)), 600);
        assert_eq!(ledger.balance_of(acct(2)), 400);
        assert_eq!(ledger.total_supply(), 1000);
    }

    #[test]
    fn transfer_from_spends_allowance_exactly() {
        let mut ledger = ShareLedger::new();
        ledger.mint(acct(1), 1000).unwrap();
        ledger.approve(acct(1), acct(9), 500);

        ledger.transfer_from(acct(9), acct(1), acct(2), 300).unwrap();
        assert_eq!(ledger.allowance(acct(1), acct(9)), 200);
        assert_eq!(ledger.balance_of(acct(2)), 300);

        let err = ledger.transfer_from(acct(9), acct(1), acct(2), 201).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientAllowance {
                have: 200,
                need: 201
            }
        );
    }

    #[test]
    fn allowance_is_spender_scoped() {
        let mut ledger = ShareLedger::new();
        ledger.mint(acct(1), 1000).unwrap();
        ledger.approve(acct(1), acct(9), 500);

        // A different spender has no authority.
        let err = ledger.transfer_from(acct(8), acct(1), acct(2), 1).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { .. }));
    }

    #[test]
    fn balances_sum_to_supply() {
        let mut ledger = ShareLedger::new();
        ledger.mint(acct(1), 700).unwrap();
        ledger.mint(acct(2), 300).unwrap();
        ledger.transfer(acct(1), acct(3), 150).unwrap();
        ledger.burn(acct(2), 100).unwrap();

        let sum: u128 = [acct(1), acct(2), acct(3)]
            .iter()
            .map(|a| ledger.balance_of(*a))
            .sum();
        assert_eq!(sum, ledger.total_supply());
    }
}
