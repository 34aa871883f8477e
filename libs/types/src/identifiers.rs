//! Typed identifiers: assets, accounts, and derived pair ids.
//!
//! `PairId` is bijective with the *unordered* asset pair: the two assets are
//! sorted into canonical order before hashing, so `PairId::derive(a, b)` and
//! `PairId::derive(b, a)` always agree and no registry lookup is needed to
//! recompute an id.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure to parse an identifier from its hex form.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdParseError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("wrong length: expected {expected} bytes, got {got}")]
    WrongLength { expected: usize, got: usize },
}

macro_rules! byte_id {
    ($(#[$doc:meta])* $name:ident, $len:expr) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let raw = hex::decode(s)?;
                let bytes: [u8; $len] =
                    raw.try_into().map_err(|v: Vec<u8>| IdParseError::WrongLength {
                        expected: $len,
                        got: v.len(),
                    })?;
                Ok(Self(bytes))
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }
    };
}

byte_id!(
    /// Opaque identifier of a tradable asset.
    AssetId,
    20
);

byte_id!(
    /// Authenticated caller identity, supplied by the access boundary.
    AccountId,
    20
);

byte_id!(
    /// Deterministic identifier of a two-asset pair.
    PairId,
    32
);

impl AccountId {
    /// The burn sink: shares minted here are permanently unredeemable.
    pub const BURN_SINK: AccountId = AccountId([0u8; 20]);
}

impl PairId {
    /// Derive the id for an asset pair, independent of argument order.
    ///
    /// The assets are sorted into canonical order and the id is the
    /// Keccak-256 digest of `asset_low || asset_high`.
    pub fn derive(a: AssetId, b: AssetId) -> PairId {
        let (low, high) = canonical_order(a, b);
        let mut hasher = Keccak256::new();
        hasher.update(low.as_bytes());
        hasher.update(high.as_bytes());
        PairId(hasher.finalize().into())
    }
}

/// Sort two assets into canonical `(low, high)` order.
pub fn canonical_order(a: AssetId, b: AssetId) -> (AssetId, AssetId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
