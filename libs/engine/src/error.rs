//! Engine error taxonomy.
//!
//! Every variant aborts its operation with zero state mutation. Validation
//! variants are the caller's fault and are never retried automatically;
//! `TransferFailed`/`TransferFromFailed` mean the external custody
//! collaborator declined, distinguished so callers can tell input errors
//! from settlement errors; `Reentrancy` means a nested mutating call was
//! rejected by the contract-wide entry guard.

use thiserror::Error;

use basin_amm::MathError;
use basin_ledger::LedgerError;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    /// Pair creation was asked for two copies of the same asset.
    #[error("identical assets")]
    IdenticalAssets,

    /// A pair for these assets is already registered.
    #[error("pair already exists")]
    PairExists,

    /// No pair registered under the given id.
    #[error("pair not found")]
    PairNotFound,

    /// The deadline passed before the call started.
    #[error("deadline expired")]
    Expired,

    /// The named input asset is not one of the pair's two assets.
    #[error("invalid input asset")]
    InvalidInputAsset,

    /// Computed low-asset amount fell below the caller's minimum.
    #[error("insufficient A amount")]
    InsufficientAAmount,

    /// Computed high-asset amount fell below the caller's minimum.
    #[error("insufficient B amount")]
    InsufficientBAmount,

    /// Swap output fell below the caller's minimum.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// Required swap input exceeded the caller's maximum.
    #[error("excessive input amount")]
    ExcessiveInputAmount,

    /// Withdrawal asked for more liquidity than the caller provided to
    /// this pair.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Deposit too small relative to the pool: it would mint zero shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// The custody collaborator declined an outbound transfer.
    #[error("transfer failed")]
    TransferFailed,

    /// The custody collaborator declined an inbound transfer.
    #[error("transfer-from failed")]
    TransferFromFailed,

    /// A mutating call re-entered while another was in progress.
    #[error("reentrant call rejected")]
    Reentrancy,

    /// Pricing or quoting arithmetic failed.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Global share ledger rejected a mutation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
