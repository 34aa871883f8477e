//! # Basin Engine - Reserve and Liquidity Accounting Core
//!
//! The mutable heart of the Basin AMM: a registry of two-asset pairs, the
//! global fungible share ledger, and the liquidity/swap operations that tie
//! them together under the constant-product pricing rule.
//!
//! ## Architecture Role
//!
//! [`Amm`] owns all engine state behind a single `RwLock` and exposes every
//! mutation as a method taking the authenticated caller identity. External
//! collaborators plug in at two trait seams:
//!
//! - [`AssetTransfer`] — custody of the underlying assets. Treated as
//!   adversarial: it may re-enter the engine before returning, so every
//!   mutating operation first takes a contract-wide non-reentrant entry
//!   guard, and state needed to prevent double-spends commits before the
//!   engine hands control to the collaborator.
//! - [`TimeSource`] — the clock that deadlines are checked against.
//!
//! ## Atomicity
//!
//! Every operation is all-or-nothing. Validation failures return before any
//! mutation; collaborator transfer failures roll the operation back (with a
//! compensating transfer when a first settlement leg already landed). Reads
//! never take the entry guard and always observe fully committed state.

pub mod engine;
pub mod error;
pub mod liquidity;
pub mod registry;
pub mod swap;
pub mod traits;

pub use engine::Amm;
pub use error::AmmError;
pub use registry::{Pair, PairRegistry};
pub use traits::{AssetTransfer, SystemTimeSource, TimeSource};

// The observable protocol constants, re-exported for callers.
pub use basin_amm::{FEE_DENOMINATOR, FEE_NUMERATOR, MINIMUM_LIQUIDITY};
