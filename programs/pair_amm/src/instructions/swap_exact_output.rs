use super::{ensure_deadline, first_pool, Router};
use crate::errors::ErrorCode;
use crate::exchange::Exchange;
use crate::ledger::{AssetLedger, IssuingLedger};
use crate::native::NativeAssetAdapter;
use crate::swap_router;
use anchor_lang::prelude::*;

/// Parameters for buying an exact amount along a path.
///
/// For the native-in variant `amount_in_max` is the native coin sent with
/// the call; whatever the route does not need is refunded.
#[derive(Clone, Debug, AnchorSerialize, AnchorDeserialize)]
pub struct SwapExactOutputParams {
    pub amount_out: u128,
    pub amount_in_max: u128,
    pub path: Vec<Pubkey>,
    pub to: Pubkey,
    pub deadline: i64,
}

fn quote_exact_output<L, N>(exchange: &Exchange<L, N>, params: &SwapExactOutputParams) -> Result<Vec<u128>>
where
    L: IssuingLedger + Clone,
    N: NativeAssetAdapter + Clone,
{
    let amounts = swap_router::get_amounts_in(exchange.registry(), params.amount_out, &params.path)?;
    require!(
        amounts[0] <= params.amount_in_max,
        ErrorCode::ExcessiveInputAmount
    );
    Ok(amounts)
}

impl Router {
    /// Buys exactly `amount_out` of the last asset for as little of
    /// `path[0]` as the route needs. Returns the amounts at every step.
    ///
    /// # Errors
    /// * `Expired` - if the deadline has passed
    /// * `ExcessiveInputAmount` - if the required input exceeds `amount_in_max`
    pub fn swap_tokens_for_exact_tokens<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: SwapExactOutputParams,
    ) -> Result<Vec<u128>>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.transact(|ex| {
            ensure_deadline(params.deadline, ex.now())?;
            let amounts = quote_exact_output(ex, &params)?;
            let pool = first_pool(ex, &params.path)?;
            ex.ledger
                .transfer_from(&params.path[0], self.id, caller, pool, amounts[0])?;
            swap_router::execute_hops(ex, self.id, &amounts, &params.path, params.to)?;
            msg!("Swapped for exact output along {} hops", params.path.len() - 1);
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of native coin; `path` must end with the
    /// wrapped native asset.
    pub fn swap_tokens_for_exact_native<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: SwapExactOutputParams,
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
            let amounts = quote_exact_output(ex, &params)?;
            let pool = first_pool(ex, &params.path)?;
            ex.ledger
                .transfer_from(&params.path[0], self.id, caller, pool, amounts[0])?;
            swap_router::execute_hops(ex, self.id, &amounts, &params.path, self.id)?;
            self.pay_native_out(ex, amounts[amounts.len() - 1], params.to)?;
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of the last asset with native coin; `path`
    /// must start with the wrapped native asset. Unused native coin is refunded.
    pub fn swap_native_for_exact_tokens<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: SwapExactOutputParams,
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
            let amounts = quote_exact_output(ex, &params)?;
            let pool = first_pool(ex, &params.path)?;
            self.pay_native_in(ex, caller, params.amount_in_max, amounts[0], pool)?;
            swap_router::execute_hops(ex, self.id, &amounts, &params.path, params.to)?;
            Ok(amounts)
        })
    }
}
