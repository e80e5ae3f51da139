/// Router entry points: liquidity provision and removal, and swaps along a
/// path of pools, with slippage bounds and a deadline.
///
/// Every entry point runs as one exchange transaction and checks its deadline
/// before touching any state. The router acts as spender of the caller's
/// allowances and never keeps a balance of its own between calls.
pub mod add_liquidity;
pub mod remove_liquidity;
pub mod swap_exact_input;
pub mod swap_exact_output;
pub mod swap_fee_on_transfer;

pub use add_liquidity::{AddLiquidityNativeParams, AddLiquidityParams};
pub use remove_liquidity::{PermitArgs, RemoveLiquidityNativeParams, RemoveLiquidityParams};
pub use swap_exact_input::SwapExactInputParams;
pub use swap_exact_output::SwapExactOutputParams;

use crate::errors::ErrorCode;
use crate::exchange::Exchange;
use crate::ledger::{AssetLedger, IssuingLedger};
use crate::native::NativeAssetAdapter;
use crate::swap_router;
use anchor_lang::prelude::*;

/// The routing engine, identified on the ledger by `id`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Router {
    pub id: Pubkey,
}

impl Router {
    pub fn new(id: Pubkey) -> Self {
        Self { id }
    }

    pub fn quote(&self, amount_a: u128, reserve_a: u128, reserve_b: u128) -> Result<u128> {
        swap_router::quote(amount_a, reserve_a, reserve_b)
    }

    pub fn get_amount_out(&self, amount_in: u128, reserve_in: u128, reserve_out: u128) -> Result<u128> {
        swap_router::get_amount_out(amount_in, reserve_in, reserve_out)
    }

    pub fn get_amount_in(&self, amount_out: u128, reserve_in: u128, reserve_out: u128) -> Result<u128> {
        swap_router::get_amount_in(amount_out, reserve_in, reserve_out)
    }

    pub fn get_amounts_out<L, N>(&self, exchange: &Exchange<L, N>, amount_in: u128, path: &[Pubkey]) -> Result<Vec<u128>>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        swap_router::get_amounts_out(exchange.registry(), amount_in, path)
    }

    pub fn get_amounts_in<L, N>(&self, exchange: &Exchange<L, N>, amount_out: u128, path: &[Pubkey]) -> Result<Vec<u128>>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        swap_router::get_amounts_in(exchange.registry(), amount_out, path)
    }
}

pub(crate) fn ensure_deadline(deadline: i64, now: i64) -> Result<()> {
    require!(deadline >= now, ErrorCode::Expired);
    Ok(())
}

/// Pool of the route's first hop.
pub(crate) fn first_pool<L, N>(exchange: &Exchange<L, N>, path: &[Pubkey]) -> Result<Pubkey>
where
    L: IssuingLedger + Clone,
    N: NativeAssetAdapter + Clone,
{
    require!(path.len() >= 2, ErrorCode::InvalidPath);
    exchange
        .get_pool(&path[0], &path[1])
        .ok_or_else(|| error!(ErrorCode::PoolNotFound))
}

impl Router {
    /// Takes `value` of native coin from `caller`, wraps `amount` of it into
    /// `pool` and refunds the rest.
    pub(crate) fn pay_native_in<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        value: u128,
        amount: u128,
        pool: Pubkey,
    ) -> Result<()>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        let wrapped = exchange.native.wrapped_asset();
        exchange.native.transfer_native(caller, self.id, value)?;
        exchange.native.deposit(&mut exchange.ledger, self.id, amount)?;
        exchange.ledger.transfer(&wrapped, self.id, pool, amount)?;
        if value > amount {
            exchange.native.transfer_native(self.id, caller, value - amount)?;
        }
        Ok(())
    }

    /// Unwraps `amount` of the router's wrapped native balance and sends the
    /// coin to `to`.
    pub(crate) fn pay_native_out<L, N>(&self, exchange: &mut Exchange<L, N>, amount: u128, to: Pubkey) -> Result<()>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.native.withdraw(&mut exchange.ledger, self.id, amount)?;
        exchange.native.transfer_native(self.id, to, amount)
    }
}
