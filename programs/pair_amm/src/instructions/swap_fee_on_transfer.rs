use super::{ensure_deadline, first_pool, Router, SwapExactInputParams};
use crate::errors::ErrorCode;
use crate::exchange::Exchange;
use crate::ledger::{AssetLedger, IssuingLedger};
use crate::native::NativeAssetAdapter;
use crate::swap_router;
use anchor_lang::prelude::*;

// Exact-input swaps for assets that deliver less than the nominal amount on
// transfer. Nothing is quoted up front: every hop's input is measured on the
// ledger, and the minimum output is checked against what the recipient's
// balance actually gained.

impl Router {
    /// Returns the amount the recipient actually received.
    pub fn swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: SwapExactInputParams,
    ) -> Result<u128>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.transact(|ex| {
            ensure_deadline(params.deadline, ex.now())?;
            let pool = first_pool(ex, &params.path)?;
            ex.ledger
                .transfer_from(&params.path[0], self.id, caller, pool, params.amount_in)?;
            self.measured_route(ex, &params, params.to)
        })
    }

    /// `path` must start with the wrapped native asset.
    pub fn swap_exact_native_for_tokens_supporting_fee_on_transfer_tokens<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: SwapExactInputParams,
    ) -> Result<u128>
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
            let pool = first_pool(ex, &params.path)?;
            self.pay_native_in(ex, caller, params.amount_in, params.amount_in, pool)?;
            self.measured_route(ex, &params, params.to)
        })
    }

    /// `path` must end with the wrapped native asset.
    pub fn swap_exact_tokens_for_native_supporting_fee_on_transfer_tokens<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: SwapExactInputParams,
    ) -> Result<u128>
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
            let pool = first_pool(ex, &params.path)?;
            ex.ledger
                .transfer_from(&params.path[0], self.id, caller, pool, params.amount_in)?;
            let amount_out = self.measured_route(ex, &params, self.id)?;
            self.pay_native_out(ex, amount_out, params.to)?;
            Ok(amount_out)
        })
    }

    /// Runs the route to `recipient` and enforces `amount_out_min` on the
    /// recipient's balance delta.
    fn measured_route<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        params: &SwapExactInputParams,
        recipient: Pubkey,
    ) -> Result<u128>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        let output = params.path[params.path.len() - 1];
        let balance_before = exchange.ledger.balance_of(&output, &recipient);
        swap_router::execute_hops_supporting_fee_on_transfer(exchange, self.id, &params.path, recipient)?;
        let received = exchange
            .ledger
            .balance_of(&output, &recipient)
            .saturating_sub(balance_before);
        require!(
            received >= params.amount_out_min,
            ErrorCode::InsufficientOutputAmount
        );
        msg!("Fee-on-transfer route delivered {}", received);
        Ok(received)
    }
}
