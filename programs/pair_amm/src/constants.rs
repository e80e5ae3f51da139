/// Fluxa Pair AMM Protocol Constants
///
/// These are protocol constants, not configuration: changing any of them
/// changes the pricing or the share accounting of every pool.
use anchor_lang::prelude::*;

/// Liquidity permanently locked by the first mint of every pool
///
/// Minted to [`BURN_SINK`] so the share supply can never return to zero
/// once a pool is seeded.
pub const MINIMUM_LIQUIDITY: u128 = 1000;

/// Swap fee numerator applied to the input amount (0.3% fee)
pub const FEE_NUMERATOR: u128 = 997;

/// Denominator for [`FEE_NUMERATOR`]
pub const FEE_DENOMINATOR: u128 = 1000;

/// Fee charged per 1000 units of input, used by the invariant check
pub const FEE_PER_MILLE: u128 = FEE_DENOMINATOR - FEE_NUMERATOR;

/// Multiplier applied to the protocol share of fee growth (1/6 of the growth
/// in sqrt(k) goes to the fee recipient: denominator is 5·√k + √k_last)
pub const PROTOCOL_FEE_ROOT_K_MULTIPLIER: u64 = 5;

/// Largest reserve a pool can hold for either asset (2^112 - 1)
pub const U112_MAX: u128 = (1u128 << 112) - 1;

/// Number of fractional bits in the UQ112x112 price format
pub const Q112_RESOLUTION: usize = 112;

/// Width of the truncated block timestamp stored in a pool
pub const TIMESTAMP_MODULUS: u64 = 1u64 << 32;

/// Recipient of permanently locked shares and sender of minted shares
pub const BURN_SINK: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// Seed prefix for deterministic pool addresses
pub const POOL_SEED: &[u8] = b"pool";

/// Name of every pool's liquidity-share token, bound into permit domains
pub const LP_TOKEN_NAME: &str = "Fluxa V2";

/// Version string bound into permit domains
pub const LP_TOKEN_VERSION: &str = "1";

/// Type string of the permit domain
pub const PERMIT_DOMAIN_TYPE: &str =
    "PermitDomain(string name,string version,u64 chainId,pubkey verifyingPool)";

/// Type string of a permit message
pub const PERMIT_TYPE: &str =
    "Permit(pubkey owner,pubkey spender,u128 value,u64 nonce,i64 deadline)";

/// Prefix of the final permit digest
pub const PERMIT_DIGEST_PREFIX: &[u8] = b"\x19\x01";

/// Transfer fee denominator used by fee-on-transfer assets (basis points)
pub const BPS_DENOMINATOR: u128 = 10_000;
