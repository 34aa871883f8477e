//! # Basin AMM Math - Integer Constant-Product Engine
//!
//! Exact arithmetic for constant-product (x*y=k) pool pricing and
//! liquidity-share accounting. Everything operates on `u128` with truncating
//! division and checked multiplication: no floating point, no decimal
//! scaling, and every rounding decision favours the pool over the trader so
//! value can never be extracted through rounding drift.
//!
//! Three groups of functions live here:
//!
//! - [`integer_sqrt`] — exact integer square root (Newton's method), the
//!   basis of first-deposit share minting.
//! - [`SwapMath`] — output-given-input and input-given-output pricing with
//!   the 0.3% input-side fee baked in.
//! - [`SwapMath::quote`] — fee-less proportional quoting used when matching
//!   a liquidity deposit to the current reserve ratio.

pub mod math;

pub use math::{integer_sqrt, MathError, SwapMath};

/// Share amount permanently locked in the burn sink on a pool's first mint.
pub const MINIMUM_LIQUIDITY: u128 = 1000;

/// Swap fee numerator: 3 parts per [`FEE_DENOMINATOR`] (0.3%).
pub const FEE_NUMERATOR: u128 = 3;

/// Swap fee denominator.
pub const FEE_DENOMINATOR: u128 = 1000;
