// Swap Router Module
//
// Quoting arithmetic shared by every router entry point, and the hop-by-hop
// execution of a route. Each hop's output is sent straight to the pool of
// the next hop, so intermediate assets never pass through the caller or the
// router.

use crate::constants::{FEE_DENOMINATOR, FEE_NUMERATOR};
use crate::errors::ErrorCode;
use crate::exchange::Exchange;
use crate::ledger::{AssetLedger, IssuingLedger};
use crate::math;
use crate::native::NativeAssetAdapter;
use crate::state::registry::{derive_pool_address, PoolRegistry};
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Orders a pair ascending.
///
/// # Errors
/// * `IdenticalAddresses` - if the assets are equal
/// * `ZeroAddress` - if the lower asset is the null identifier
pub fn sort_tokens(token_a: Pubkey, token_b: Pubkey) -> Result<(Pubkey, Pubkey)> {
    require_keys_neq!(token_a, token_b, ErrorCode::IdenticalAddresses);
    let (token0, token1) = if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };
    require_keys_neq!(token0, Pubkey::default(), ErrorCode::ZeroAddress);
    Ok((token0, token1))
}

/// Address of the pair's pool, computed without reading any state.
pub fn pool_for(program_id: &Pubkey, token_a: Pubkey, token_b: Pubkey) -> Result<Pubkey> {
    let (token0, token1) = sort_tokens(token_a, token_b)?;
    Ok(derive_pool_address(program_id, &token0, &token1).0)
}

/// Reserves of the pair's pool, ordered as `(reserve_a, reserve_b)`.
///
/// # Errors
/// * `PoolNotFound` - if the pair has no pool
pub fn get_reserves(registry: &PoolRegistry, token_a: Pubkey, token_b: Pubkey) -> Result<(u128, u128)> {
    let (token0, _) = sort_tokens(token_a, token_b)?;
    let address = registry
        .get_pool(&token_a, &token_b)
        .ok_or_else(|| error!(ErrorCode::PoolNotFound))?;
    let (reserve0, reserve1, _) = registry.pool(&address)?.reserves();
    Ok(if token_a == token0 {
        (reserve0, reserve1)
    } else {
        (reserve1, reserve0)
    })
}

fn checked_mul(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b).ok_or_else(|| error!(ErrorCode::MathOverflow))
}

/// Amount of B worth `amount_a` of A at the given reserves, floored.
pub fn quote(amount_a: u128, reserve_a: u128, reserve_b: u128) -> Result<u128> {
    require!(amount_a > 0, ErrorCode::InsufficientAmount);
    require!(
        reserve_a > 0 && reserve_b > 0,
        ErrorCode::InsufficientLiquidity
    );
    math::mul_div(amount_a, reserve_b, reserve_a)
}

/// Maximum output for an exact input, after the 0.3% fee.
pub fn get_amount_out(amount_in: u128, reserve_in: u128, reserve_out: u128) -> Result<u128> {
    require!(amount_in > 0, ErrorCode::InsufficientInputAmount);
    require!(
        reserve_in > 0 && reserve_out > 0,
        ErrorCode::InsufficientLiquidity
    );
    let amount_in_with_fee = U256::from(amount_in) * U256::from(FEE_NUMERATOR);
    let numerator = checked_mul(amount_in_with_fee, U256::from(reserve_out))?;
    let denominator = U256::from(reserve_in) * U256::from(FEE_DENOMINATOR) + amount_in_with_fee;
    math::to_u128(numerator / denominator)
}

/// Minimum input for an exact output, rounded up.
pub fn get_amount_in(amount_out: u128, reserve_in: u128, reserve_out: u128) -> Result<u128> {
    require!(amount_out > 0, ErrorCode::InsufficientOutputAmount);
    require!(
        reserve_in > 0 && reserve_out > amount_out,
        ErrorCode::InsufficientLiquidity
    );
    let numerator = checked_mul(math::wide_mul(reserve_in, amount_out), U256::from(FEE_DENOMINATOR))?;
    let denominator = U256::from(reserve_out - amount_out) * U256::from(FEE_NUMERATOR);
    math::add(math::to_u128(numerator / denominator)?, 1)
}

/// Amounts at every step of `path` for an exact input; starts with `amount_in`.
///
/// # Errors
/// * `InvalidPath` - if the path has fewer than two assets
/// * `PoolNotFound` - if a hop has no pool
pub fn get_amounts_out(registry: &PoolRegistry, amount_in: u128, path: &[Pubkey]) -> Result<Vec<u128>> {
    require!(path.len() >= 2, ErrorCode::InvalidPath);
    let mut amounts = Vec::with_capacity(path.len());
    amounts.push(amount_in);
    for hop in path.windows(2) {
        let (reserve_in, reserve_out) = get_reserves(registry, hop[0], hop[1])?;
        let previous = amounts[amounts.len() - 1];
        amounts.push(get_amount_out(previous, reserve_in, reserve_out)?);
    }
    Ok(amounts)
}

/// Amounts at every step of `path` for an exact output; ends with `amount_out`.
pub fn get_amounts_in(registry: &PoolRegistry, amount_out: u128, path: &[Pubkey]) -> Result<Vec<u128>> {
    require!(path.len() >= 2, ErrorCode::InvalidPath);
    let mut amounts = vec![0u128; path.len()];
    let last = path.len() - 1;
    amounts[last] = amount_out;
    for i in (1..path.len()).rev() {
        let (reserve_in, reserve_out) = get_reserves(registry, path[i - 1], path[i])?;
        amounts[i - 1] = get_amount_in(amounts[i], reserve_in, reserve_out)?;
    }
    Ok(amounts)
}

/// Output amounts of a hop oriented by the pool's token order.
fn hop_outputs(input: Pubkey, output: Pubkey, amount_out: u128) -> Result<(u128, u128)> {
    let (token0, _) = sort_tokens(input, output)?;
    Ok(if input == token0 {
        (0, amount_out)
    } else {
        (amount_out, 0)
    })
}

fn hop_pool(registry: &PoolRegistry, input: &Pubkey, output: &Pubkey) -> Result<Pubkey> {
    registry
        .get_pool(input, output)
        .ok_or_else(|| error!(ErrorCode::PoolNotFound))
}

/// Recipient of hop `i`: the next hop's pool, or `to` after the last hop.
fn hop_recipient(registry: &PoolRegistry, path: &[Pubkey], i: usize, to: Pubkey) -> Result<Pubkey> {
    if i + 2 < path.len() {
        hop_pool(registry, &path[i + 1], &path[i + 2])
    } else {
        Ok(to)
    }
}

/// Executes a route whose amounts are already known. The first pool must
/// already hold `amounts[0]` of `path[0]`.
pub fn execute_hops<L, N>(
    exchange: &mut Exchange<L, N>,
    sender: Pubkey,
    amounts: &[u128],
    path: &[Pubkey],
    to: Pubkey,
) -> Result<()>
where
    L: IssuingLedger + Clone,
    N: NativeAssetAdapter + Clone,
{
    require!(path.len() >= 2, ErrorCode::InvalidPath);
    require!(amounts.len() == path.len(), ErrorCode::InvalidPath);
    for i in 0..path.len() - 1 {
        let (input, output) = (path[i], path[i + 1]);
        let (amount0_out, amount1_out) = hop_outputs(input, output, amounts[i + 1])?;
        let pool = hop_pool(exchange.registry(), &input, &output)?;
        let recipient = hop_recipient(exchange.registry(), path, i, to)?;
        exchange.swap_inner(sender, pool, amount0_out, amount1_out, recipient, &[], None)?;
    }
    Ok(())
}

/// Executes a route measuring each hop's actual input as the pool's balance
/// above its reserve, for assets that deliver less than the nominal amount.
pub fn execute_hops_supporting_fee_on_transfer<L, N>(
    exchange: &mut Exchange<L, N>,
    sender: Pubkey,
    path: &[Pubkey],
    to: Pubkey,
) -> Result<()>
where
    L: IssuingLedger + Clone,
    N: NativeAssetAdapter + Clone,
{
    require!(path.len() >= 2, ErrorCode::InvalidPath);
    for i in 0..path.len() - 1 {
        let (input, output) = (path[i], path[i + 1]);
        let pool = hop_pool(exchange.registry(), &input, &output)?;
        let (reserve_in, reserve_out) = get_reserves(exchange.registry(), input, output)?;
        let amount_in = math::sub(exchange.ledger.balance_of(&input, &pool), reserve_in)?;
        let amount_out = get_amount_out(amount_in, reserve_in, reserve_out)?;
        let (amount0_out, amount1_out) = hop_outputs(input, output, amount_out)?;
        let recipient = hop_recipient(exchange.registry(), path, i, to)?;
        exchange.swap_inner(sender, pool, amount0_out, amount1_out, recipient, &[], None)?;
    }
    Ok(())
}
