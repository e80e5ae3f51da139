/// Fluxa Pair AMM Error Definitions
///
/// Every failure mode of the registry, the pools and the router maps to one
/// code here. The message of each code is the short machine-readable reason
/// surfaced to operators and programmatic callers.
use anchor_lang::prelude::*;

/// Core error codes for the Fluxa Pair AMM
#[error_code]
pub enum ErrorCode {
    /// Both assets of a pair are the same identifier
    #[msg("IDENTICAL_ADDRESSES")]
    IdenticalAddresses,

    /// One of the assets is the null identifier
    #[msg("ZERO_ADDRESS")]
    ZeroAddress,

    /// A pool already exists for the unordered pair
    #[msg("PAIR_EXISTS")]
    PairExists,

    /// Caller does not hold the fee-configuration authority
    #[msg("FORBIDDEN")]
    Forbidden,

    /// A pool entry point was re-entered while the pool was locked
    #[msg("LOCKED")]
    Locked,

    /// A balance or reserve no longer fits in 112 bits
    #[msg("OVERFLOW")]
    Overflow,

    /// Checked arithmetic failed
    #[msg("MATH_OVERFLOW")]
    MathOverflow,

    /// A mint would award zero shares
    #[msg("INSUFFICIENT_LIQUIDITY_MINTED")]
    InsufficientLiquidityMinted,

    /// A burn would return zero of either asset
    #[msg("INSUFFICIENT_LIQUIDITY_BURNED")]
    InsufficientLiquidityBurned,

    /// Requested or computed output is zero, or below the caller's minimum
    #[msg("INSUFFICIENT_OUTPUT_AMOUNT")]
    InsufficientOutputAmount,

    /// No input reached the pool, or the quoted input is zero
    #[msg("INSUFFICIENT_INPUT_AMOUNT")]
    InsufficientInputAmount,

    /// Reserves cannot cover the request, or a reserve is zero
    #[msg("INSUFFICIENT_LIQUIDITY")]
    InsufficientLiquidity,

    /// Swap recipient is one of the pool's own assets
    #[msg("INVALID_TO")]
    InvalidTo,

    /// The fee-adjusted reserve product decreased
    #[msg("K")]
    InvariantViolation,

    /// Flash-swap data was supplied without a callee to receive it
    #[msg("INVALID_CALLEE")]
    InvalidCallee,

    /// Quote input is zero
    #[msg("INSUFFICIENT_AMOUNT")]
    InsufficientAmount,

    /// Deposit of asset A fell below the caller's minimum
    #[msg("INSUFFICIENT_A_AMOUNT")]
    InsufficientAAmount,

    /// Deposit of asset B fell below the caller's minimum
    #[msg("INSUFFICIENT_B_AMOUNT")]
    InsufficientBAmount,

    /// Required input exceeds the caller's maximum
    #[msg("EXCESSIVE_INPUT_AMOUNT")]
    ExcessiveInputAmount,

    /// Route is shorter than two assets or does not start/end as required
    #[msg("INVALID_PATH")]
    InvalidPath,

    /// A route hop has no pool
    #[msg("POOL_NOT_FOUND")]
    PoolNotFound,

    /// The block time is past the caller's deadline
    #[msg("EXPIRED")]
    Expired,

    /// A gasless approval did not verify against the owner and nonce
    #[msg("INVALID_SIGNATURE")]
    InvalidSignature,

    /// An asset ledger balance cannot cover a transfer
    #[msg("TRANSFER_AMOUNT_EXCEEDS_BALANCE")]
    InsufficientBalance,

    /// An asset ledger allowance cannot cover a transfer
    #[msg("TRANSFER_AMOUNT_EXCEEDS_ALLOWANCE")]
    InsufficientAllowance,

    /// The asset is not registered with the ledger
    #[msg("UNKNOWN_ASSET")]
    UnknownAsset,

    /// Native coin balance cannot cover a transfer or withdrawal
    #[msg("INSUFFICIENT_NATIVE_BALANCE")]
    InsufficientNativeBalance,

    /// Two price observations share a timestamp
    #[msg("PERIOD_NOT_ELAPSED")]
    PeriodNotElapsed,
}
