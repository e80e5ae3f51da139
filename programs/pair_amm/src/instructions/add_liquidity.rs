use super::{ensure_deadline, Router};
use crate::errors::ErrorCode;
use crate::exchange::Exchange;
use crate::ledger::{AssetLedger, IssuingLedger};
use crate::native::NativeAssetAdapter;
use crate::swap_router;
use anchor_lang::prelude::*;

/// Parameters for depositing two assets into their pool.
#[derive(Clone, Debug, AnchorSerialize, AnchorDeserialize)]
pub struct AddLiquidityParams {
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub amount_a_desired: u128,
    pub amount_b_desired: u128,
    pub amount_a_min: u128,
    pub amount_b_min: u128,
    /// Recipient of the minted shares
    pub to: Pubkey,
    pub deadline: i64,
}

/// Parameters for depositing an asset alongside native coin.
#[derive(Clone, Debug, AnchorSerialize, AnchorDeserialize)]
pub struct AddLiquidityNativeParams {
    pub token: Pubkey,
    pub amount_token_desired: u128,
    pub amount_token_min: u128,
    pub amount_native_min: u128,
    pub to: Pubkey,
    pub deadline: i64,
    /// Native coin sent with the call; the part not deposited is refunded
    pub value: u128,
}

/// Deposit amounts that match the pool's current ratio without exceeding
/// either desired amount. Creates the pool if the pair has none.
#[allow(clippy::too_many_arguments)]
fn optimal_amounts<L, N>(
    exchange: &mut Exchange<L, N>,
    token_a: Pubkey,
    token_b: Pubkey,
    amount_a_desired: u128,
    amount_b_desired: u128,
    amount_a_min: u128,
    amount_b_min: u128,
) -> Result<(u128, u128)>
where
    L: IssuingLedger + Clone,
    N: NativeAssetAdapter + Clone,
{
    if exchange.get_pool(&token_a, &token_b).is_none() {
        exchange.create_pool_inner(token_a, token_b)?;
    }
    let (reserve_a, reserve_b) = swap_router::get_reserves(exchange.registry(), token_a, token_b)?;
    if reserve_a == 0 && reserve_b == 0 {
        return Ok((amount_a_desired, amount_b_desired));
    }

    let amount_b_optimal = swap_router::quote(amount_a_desired, reserve_a, reserve_b)?;
    if amount_b_optimal <= amount_b_desired {
        require!(
            amount_b_optimal >= amount_b_min,
            ErrorCode::InsufficientBAmount
        );
        return Ok((amount_a_desired, amount_b_optimal));
    }
    let amount_a_optimal = swap_router::quote(amount_b_desired, reserve_b, reserve_a)?;
    // quoting back from the smaller side can never ask for more A
    require!(
        amount_a_optimal <= amount_a_desired,
        ErrorCode::InsufficientAAmount
    );
    require!(
        amount_a_optimal >= amount_a_min,
        ErrorCode::InsufficientAAmount
    );
    Ok((amount_a_optimal, amount_b_desired))
}

impl Router {
    /// Deposits into the pair's pool at its current ratio and mints shares
    /// to `params.to`. Returns the deposited amounts and the shares minted.
    ///
    /// # Errors
    /// * `Expired` - if the deadline has passed
    /// * `InsufficientAAmount` / `InsufficientBAmount` - if the ratio moved
    ///   beyond the caller's minimums
    pub fn add_liquidity<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: AddLiquidityParams,
    ) -> Result<(u128, u128, u128)>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.transact(|ex| {
            ensure_deadline(params.deadline, ex.now())?;
            let (amount_a, amount_b) = optimal_amounts(
                ex,
                params.token_a,
                params.token_b,
                params.amount_a_desired,
                params.amount_b_desired,
                params.amount_a_min,
                params.amount_b_min,
            )?;
            let pool = swap_router::pool_for(&ex.config.program_id, params.token_a, params.token_b)?;
            ex.ledger
                .transfer_from(&params.token_a, self.id, caller, pool, amount_a)?;
            ex.ledger
                .transfer_from(&params.token_b, self.id, caller, pool, amount_b)?;
            let liquidity = ex.mint_inner(self.id, pool, params.to)?;
            msg!(
                "Added liquidity {} / {} to {}, minted {}",
                amount_a,
                amount_b,
                pool,
                liquidity
            );
            Ok((amount_a, amount_b, liquidity))
        })
    }

    /// Like [`Router::add_liquidity`] with wrapped native coin as asset B.
    /// Returns the token amount, the native amount and the shares minted.
    pub fn add_liquidity_native<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: AddLiquidityNativeParams,
    ) -> Result<(u128, u128, u128)>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.transact(|ex| {
            ensure_deadline(params.deadline, ex.now())?;
            let wrapped = ex.native.wrapped_asset();
            let (amount_token, amount_native) = optimal_amounts(
                ex,
                params.token,
                wrapped,
                params.amount_token_desired,
                params.value,
                params.amount_token_min,
                params.amount_native_min,
            )?;
            let pool = swap_router::pool_for(&ex.config.program_id, params.token, wrapped)?;
            ex.ledger
                .transfer_from(&params.token, self.id, caller, pool, amount_token)?;
            self.pay_native_in(ex, caller, params.value, amount_native, pool)?;
            let liquidity = ex.mint_inner(self.id, pool, params.to)?;
            msg!(
                "Added liquidity {} / {} native to {}, minted {}",
                amount_token,
                amount_native,
                pool,
                liquidity
            );
            Ok((amount_token, amount_native, liquidity))
        })
    }
}
