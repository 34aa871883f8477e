//! Constant-product pricing and proportional quoting over `u128`.
//!
//! Division always truncates. `get_amount_in` adds one to its truncated
//! quotient so the pool never under-collects input for an exact output;
//! `get_amount_out` truncates down so the pool never over-pays.

use thiserror::Error;

use crate::{FEE_DENOMINATOR, FEE_NUMERATOR};

/// Errors from pricing and quoting arithmetic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Quoted amount is zero.
    #[error("amount must be non-zero")]
    InvalidAmount,

    /// Swap input amount is zero.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// Requested swap output is zero or not coverable by the reserves.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// One or both reserves are empty.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Intermediate product exceeds 128 bits.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Exact integer square root: the largest `z` with `z * z <= y`.
///
/// Newton's method seeded at `y / 2 + 1`, iterating while the candidate
/// strictly decreases. Exact for every `u128`, which first-deposit share
/// minting depends on.
pub fn integer_sqrt(y: u128) -> u128 {
    if y > 3 {
        let mut z = y;
        let mut x = y / 2 + 1;
        while x < z {
            z = x;
            x = (y / x + x) / 2;
        }
        z
    } else if y != 0 {
        1
    } else {
        0
    }
}

/// Constant-product math functions.
pub struct SwapMath;

impl SwapMath {
    /// Proportionally scale `amount_in` from the input reserve to the
    /// output reserve: `amount_in * reserve_out / reserve_in`, truncating.
    ///
    /// Fee-less; used for matching liquidity deposits to the current
    /// reserve ratio, not for pricing swaps.
    pub fn quote(amount_in: u128, reserve_in: u128, reserve_out: u128) -> Result<u128, MathError> {
        if amount_in == 0 {
            return Err(MathError::InvalidAmount);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(MathError::InsufficientLiquidity);
        }
        let scaled = amount_in
            .checked_mul(reserve_out)
            .ok_or(MathError::Overflow)?;
        Ok(scaled / reserve_in)
    }

    /// Exact output for a given input under x*y=k with the fee deducted
    /// from the input:
    ///
    /// ```text
    /// in_with_fee = amount_in * (FEE_DENOMINATOR - FEE_NUMERATOR)
    /// amount_out  = in_with_fee * reserve_out
    ///             / (reserve_in * FEE_DENOMINATOR + in_with_fee)
    /// ```
    ///
    /// Truncation rounds the payout down, so the reserve product after the
    /// swap is always >= the product before it.
    pub fn get_amount_out(
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> Result<u128, MathError> {
        if amount_in == 0 {
            return Err(MathError::InsufficientInputAmount);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(MathError::InsufficientLiquidity);
        }
        let in_with_fee = amount_in
            .checked_mul(FEE_DENOMINATOR - FEE_NUMERATOR)
            .ok_or(MathError::Overflow)?;
        let numerator = in_with_fee
            .checked_mul(reserve_out)
            .ok_or(MathError::Overflow)?;
        let denominator = reserve_in
            .checked_mul(FEE_DENOMINATOR)
            .ok_or(MathError::Overflow)?
            .checked_add(in_with_fee)
            .ok_or(MathError::Overflow)?;
        Ok(numerator / denominator)
    }

    /// Required input for a desired exact output (inverse of
    /// [`get_amount_out`](Self::get_amount_out)).
    ///
    /// The result is `numerator / denominator + 1`: rounding up guarantees
    /// the pool never under-collects for the requested output.
    pub fn get_amount_in(
        amount_out: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> Result<u128, MathError> {
        if amount_out == 0 {
            return Err(MathError::InsufficientOutputAmount);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(MathError::InsufficientLiquidity);
        }
        if amount_out >= reserve_out {
            return Err(MathError::InsufficientOutputAmount);
        }
        let numerator = reserve_in
            .checked_mul(amount_out)
            .ok_or(MathError::Overflow)?
            .checked_mul(FEE_DENOMINATOR)
            .ok_or(MathError::Overflow)?;
        let denominator =
            (reserve_out - amount_out).checked_mul(FEE_DENOMINATOR - FEE_NUMERATOR)
                .ok_or(MathError::Overflow)?;
        let amount_in = (numerator / denominator)
            .checked_add(1)
            .ok_or(MathError::Overflow)?;
        Ok(amount_in)
    }
}
