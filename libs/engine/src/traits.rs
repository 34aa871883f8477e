//! Trait seams for the engine's external collaborators.

use basin_types::{AccountId, AssetId};
use std::time::{SystemTime, UNIX_EPOCH};

/// Custody collaborator that moves underlying assets between parties.
///
/// Both calls are atomic all-or-nothing from the engine's point of view: a
/// `false` return (or anything that cannot be read as success) means no
/// assets moved. Implementations are untrusted and may call back into the
/// engine before returning; the engine's entry guard rejects any such
/// nested mutating call.
pub trait AssetTransfer {
    /// Move `amount` of `asset` out of pool custody to `to`.
    fn transfer(&self, asset: AssetId, to: AccountId, amount: u128) -> bool;

    /// Move `amount` of `asset` from `from` to `to` on prior authority.
    fn transfer_from(&self, asset: AssetId, from: AccountId, to: AccountId, amount: u128) -> bool;
}

/// Monotonic clock used only to reject stale requests.
pub trait TimeSource {
    /// Current time in seconds.
    fn now(&self) -> u64;
}

/// Wall-clock time source for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
