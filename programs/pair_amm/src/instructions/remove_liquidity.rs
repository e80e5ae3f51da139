use super::{ensure_deadline, Router};
use crate::errors::ErrorCode;
use crate::exchange::Exchange;
use crate::ledger::{AssetLedger, IssuingLedger};
use crate::native::NativeAssetAdapter;
use crate::permit::{PermitSignature, SignatureVerifier};
use crate::swap_router;
use anchor_lang::prelude::*;

/// Parameters for redeeming shares of a pool for both of its assets.
#[derive(Clone, Debug, AnchorSerialize, AnchorDeserialize)]
pub struct RemoveLiquidityParams {
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub liquidity: u128,
    pub amount_a_min: u128,
    pub amount_b_min: u128,
    pub to: Pubkey,
    pub deadline: i64,
}

/// Parameters for redeeming shares of an asset/native pool.
#[derive(Clone, Debug, AnchorSerialize, AnchorDeserialize)]
pub struct RemoveLiquidityNativeParams {
    pub token: Pubkey,
    pub liquidity: u128,
    pub amount_token_min: u128,
    pub amount_native_min: u128,
    pub to: Pubkey,
    pub deadline: i64,
}

/// Signed approval of the router over the caller's shares.
#[derive(Clone, Copy, Debug, AnchorSerialize, AnchorDeserialize)]
pub struct PermitArgs {
    /// Approve `u128::MAX` instead of exactly the liquidity being removed
    pub approve_max: bool,
    pub signature: PermitSignature,
}

impl Router {
    fn remove_liquidity_inner<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: &RemoveLiquidityParams,
    ) -> Result<(u128, u128)>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        ensure_deadline(params.deadline, exchange.now())?;
        let pool = exchange
            .get_pool(&params.token_a, &params.token_b)
            .ok_or_else(|| error!(ErrorCode::PoolNotFound))?;
        exchange.transfer_shares_from_inner(pool, self.id, caller, pool, params.liquidity)?;
        let (amount0, amount1) = exchange.burn_inner(self.id, pool, params.to)?;
        let (token0, _) = swap_router::sort_tokens(params.token_a, params.token_b)?;
        let (amount_a, amount_b) = if params.token_a == token0 {
            (amount0, amount1)
        } else {
            (amount1, amount0)
        };
        require!(
            amount_a >= params.amount_a_min,
            ErrorCode::InsufficientAAmount
        );
        require!(
            amount_b >= params.amount_b_min,
            ErrorCode::InsufficientBAmount
        );
        msg!(
            "Removed {} shares of {} for {} / {}",
            params.liquidity,
            pool,
            amount_a,
            amount_b
        );
        Ok((amount_a, amount_b))
    }

    /// Burns `params.liquidity` of the caller's shares and sends both assets
    /// to `params.to`.
    ///
    /// # Errors
    /// * `Expired` - if the deadline has passed
    /// * `InsufficientAAmount` / `InsufficientBAmount` - if an asset's payout
    ///   is below the caller's minimum
    pub fn remove_liquidity<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: RemoveLiquidityParams,
    ) -> Result<(u128, u128)>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.transact(|ex| self.remove_liquidity_inner(ex, caller, &params))
    }

    fn remove_liquidity_native_inner<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: &RemoveLiquidityNativeParams,
    ) -> Result<(u128, u128)>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        let removal = self.via_router(exchange, params);
        let (amount_token, amount_native) = self.remove_liquidity_inner(exchange, caller, &removal)?;
        exchange
            .ledger
            .transfer(&params.token, self.id, params.to, amount_token)?;
        self.pay_native_out(exchange, amount_native, params.to)?;
        Ok((amount_token, amount_native))
    }

    /// Pays the pool's both sides to the router so the native side can be unwrapped.
    fn via_router<L, N>(&self, exchange: &Exchange<L, N>, params: &RemoveLiquidityNativeParams) -> RemoveLiquidityParams
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        RemoveLiquidityParams {
            token_a: params.token,
            token_b: exchange.native.wrapped_asset(),
            liquidity: params.liquidity,
            amount_a_min: params.amount_token_min,
            amount_b_min: params.amount_native_min,
            to: self.id,
            deadline: params.deadline,
        }
    }

    /// Like [`Router::remove_liquidity`] for an asset/native pool, paying the
    /// native side out as native coin.
    pub fn remove_liquidity_native<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: RemoveLiquidityNativeParams,
    ) -> Result<(u128, u128)>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.transact(|ex| self.remove_liquidity_native_inner(ex, caller, &params))
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_permit<L, N, V>(
        &self,
        exchange: &mut Exchange<L, N>,
        pool: Pubkey,
        caller: Pubkey,
        liquidity: u128,
        deadline: i64,
        permit: &PermitArgs,
        verifier: &V,
    ) -> Result<()>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
        V: SignatureVerifier,
    {
        let value = if permit.approve_max {
            u128::MAX
        } else {
            liquidity
        };
        exchange.permit_inner(
            pool,
            caller,
            self.id,
            value,
            deadline,
            &permit.signature,
            verifier,
        )
    }

    fn native_pool<L, N>(&self, exchange: &Exchange<L, N>, token: Pubkey) -> Result<Pubkey>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange
            .get_pool(&token, &exchange.native.wrapped_asset())
            .ok_or_else(|| error!(ErrorCode::PoolNotFound))
    }

    /// [`Router::remove_liquidity`] authorised by a signed approval instead
    /// of a prior allowance.
    pub fn remove_liquidity_with_permit<L, N, V>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: RemoveLiquidityParams,
        permit: PermitArgs,
        verifier: &V,
    ) -> Result<(u128, u128)>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
        V: SignatureVerifier,
    {
        exchange.transact(|ex| {
            ensure_deadline(params.deadline, ex.now())?;
            let pool = ex
                .get_pool(&params.token_a, &params.token_b)
                .ok_or_else(|| error!(ErrorCode::PoolNotFound))?;
            self.apply_permit(ex, pool, caller, params.liquidity, params.deadline, &permit, verifier)?;
            self.remove_liquidity_inner(ex, caller, &params)
        })
    }

    pub fn remove_liquidity_native_with_permit<L, N, V>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: RemoveLiquidityNativeParams,
        permit: PermitArgs,
        verifier: &V,
    ) -> Result<(u128, u128)>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
        V: SignatureVerifier,
    {
        exchange.transact(|ex| {
            ensure_deadline(params.deadline, ex.now())?;
            let pool = self.native_pool(ex, params.token)?;
            self.apply_permit(ex, pool, caller, params.liquidity, params.deadline, &permit, verifier)?;
            self.remove_liquidity_native_inner(ex, caller, &params)
        })
    }

    /// Native removal for assets that charge a transfer fee: forwards
    /// whatever the router actually received of the asset. Returns the
    /// native amount paid out.
    fn remove_liquidity_native_fee_on_transfer_inner<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: &RemoveLiquidityNativeParams,
    ) -> Result<u128>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        let removal = self.via_router(exchange, params);
        let (_, amount_native) = self.remove_liquidity_inner(exchange, caller, &removal)?;
        let received = exchange.ledger.balance_of(&params.token, &self.id);
        exchange
            .ledger
            .transfer(&params.token, self.id, params.to, received)?;
        self.pay_native_out(exchange, amount_native, params.to)?;
        Ok(amount_native)
    }

    pub fn remove_liquidity_native_supporting_fee_on_transfer_tokens<L, N>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: RemoveLiquidityNativeParams,
    ) -> Result<u128>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
    {
        exchange.transact(|ex| self.remove_liquidity_native_fee_on_transfer_inner(ex, caller, &params))
    }

    pub fn remove_liquidity_native_with_permit_supporting_fee_on_transfer_tokens<L, N, V>(
        &self,
        exchange: &mut Exchange<L, N>,
        caller: Pubkey,
        params: RemoveLiquidityNativeParams,
        permit: PermitArgs,
        verifier: &V,
    ) -> Result<u128>
    where
        L: IssuingLedger + Clone,
        N: NativeAssetAdapter + Clone,
        V: SignatureVerifier,
    {
        exchange.transact(|ex| {
            ensure_deadline(params.deadline, ex.now())?;
            let pool = self.native_pool(ex, params.token)?;
            self.apply_permit(ex, pool, caller, params.liquidity, params.deadline, &permit, verifier)?;
            self.remove_liquidity_native_fee_on_transfer_inner(ex, caller, &params)
        })
    }
}
