//! Shared identifier types for the Basin AMM workspace.
//!
//! Everything here is a plain newtype over fixed-size bytes: asset and
//! account identifiers are opaque 20-byte values supplied by the caller's
//! environment, and pair identifiers are derived deterministically from the
//! canonically ordered asset pair. Keeping these as distinct types prevents
//! the classic confusion bugs (passing an account where an asset is
//! expected compiles nowhere in this workspace).

pub mod identifiers;

pub use identifiers::{canonical_order, AccountId, AssetId, IdParseError, PairId};
