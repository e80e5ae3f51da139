use super::{ensure_deadline, first_pool, Router};
use crate::errors::ErrorCode;
use crate::exchange::Exchange;
use crate::ledger::{AssetLedger, IssuingLedger};
use crate::native::NativeAssetAdapter;
use crate::swap_router;
use anchor_lang::prelude::*;

/// Parameters for selling an exact amount along a path.
///
/// For the native-in variant `amount_in` is the native coin sent with the call.
#[derive(Clone, Debug, AnchorSerialize, AnchorDeserialize)]
pub struct SwapExactInputParams {
    pub amount_in: u128,
    pub amount_out_min: u128,
    pub path: Vec<Pubkey>,
    pub to: Pubkey,
    pub deadline: i64,
}

impl Router {
    /// Sells exactly `amount_in` of `path[0]` for as much of the last asset
    /// as the route yields. Returns the amounts at every step.
    ///
    /// # Errors
    /// * `Expired` - if the deadline has passed
    /// * `InvalidPath` / `PoolNotFound` - if the route cannot be resolved
    /// * `InsufficientOutputAmount` - if the output is below `amount_out_min`
    pub fn swap_exact_tokens_for_tokens<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: SwapExactInputParams,
    ) -> Result<Vec<u128>>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.transact(|ex| {
            ensure_deadline(params.deadline, ex.now())?;
            let amounts = quote_exact_input(ex, &params)?;
            let pool = first_pool(ex, &params.path)?;
            ex.ledger
                .transfer_from(&params.path[0], self.id, caller, pool, amounts[0])?;
            swap_router::execute_hops(ex, self.id, &amounts, &params.path, params.to)?;
            msg!("Swapped exact input along {} hops", params.path.len() - 1);
            Ok(amounts)
        })
    }

    /// Sells exactly `params.amount_in` of native coin; `path` must start
    /// with the wrapped native asset.
    pub fn swap_exact_native_for_tokens<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: SwapExactInputParams,
    ) -> Result<Vec<u128>>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.transact(|ex| {
            ensure_deadline(params.deadline, ex.now())?;
            require!(
                params.path.first() == Some(&ex.native.wrapped_asset()),
                ErrorCode::InvalidPath
            );
            let amounts = quote_exact_input(ex, &params)?;
            let pool = first_pool(ex, &params.path)?;
            self.pay_native_in(ex, caller, params.amount_in, amounts[0], pool)?;
            swap_router::execute_hops(ex, self.id, &amounts, &params.path, params.to)?;
            Ok(amounts)
        })
    }

    /// Sells exactly `params.amount_in` of `path[0]` for native coin; `path`
    /// must end with the wrapped native asset.
    pub fn swap_exact_tokens_for_native<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: SwapExactInputParams,
    ) -> Result<Vec<u128>>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.transact(|ex| {
            ensure_deadline(params.deadline, ex.now())?;
            require!(
                params.path.last() == Some(&ex.native.wrapped_asset()),
                ErrorCode::InvalidPath
            );
            let amounts = quote_exact_input(ex, &params)?;
            let pool = first_pool(ex, &params.path)?;
            ex.ledger
                .transfer_from(&params.path[0], self.id, caller, pool, amounts[0])?;
            swap_router::execute_hops(ex, self.id, &amounts, &params.path, self.id)?;
            self.pay_native_out(ex, amounts[amounts.len() - 1], params.to)?;
            Ok(amounts)
        })
    }
}

fn quote_exact_input<L, N>(exchange: &Exchange<L, N>, params: &SwapExactInputParams) -> Result<Vec<u128>>
where
    L: IssuingLedger + Clone,
    N: NativeAssetAdapter + Clone,
{
    let amounts = swap_router::get_amounts_out(exchange.registry(), params.amount_in, &params.path)?;
    require!(
        amounts[amounts.len() - 1] >= params.amount_out_min,
        ErrorCode::InsufficientOutputAmount
    );
    Ok(amounts)
}
