use crate::constants::{
    BURN_SINK, FEE_DENOMINATOR, FEE_PER_MILLE, MINIMUM_LIQUIDITY, PROTOCOL_FEE_ROOT_K_MULTIPLIER,
    U112_MAX,
};
use crate::errors::ErrorCode;
use crate::events::{BurnEvent, EventLog, MintEvent, SwapEvent, SyncEvent};
use crate::ledger::AssetLedger;
use crate::math;
use crate::oracle::{PriceAccumulator, PriceObservation};
use crate::state::liquidity_token::LiquidityToken;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Defines the state of a constant-product liquidity pool.
///
/// A pool tracks its reserves separately from the asset balances it actually
/// holds on the ledger. Deposits are transferred in before `mint`/`swap` is
/// called and the difference between balance and reserve is what the pool
/// treats as input. Reserves only change through [`Pool::update`].
#[derive(Clone, Debug)]
pub struct Pool {
    /// Derived address; also the pool's account on the asset ledger.
    pub address: Pubkey,
    /// Bump seed of the derived address.
    pub bump: u8,
    /// The registry that created this pool.
    pub registry: Pubkey,
    /// Lower asset identifier of the pair.
    pub token0: Pubkey,
    /// Higher asset identifier of the pair.
    pub token1: Pubkey,
    pub reserve0: u128,
    pub reserve1: u128,
    /// Time-weighted price sums and the timestamp of the last reserve update.
    pub oracle: PriceAccumulator,
    /// reserve0 · reserve1 after the most recent liquidity event, while the
    /// protocol fee is on.
    pub k_last: U256,
    /// Liquidity shares of this pool.
    pub shares: LiquidityToken,
    unlocked: bool,
}

/// Parameters for initializing a new pool.
#[derive(Clone)]
pub struct InitializePoolParams {
    pub address: Pubkey,
    pub bump: u8,
    pub registry: Pubkey,
    pub token0: Pubkey,
    pub token1: Pubkey,
}

/// Capability returned by [`Pool::begin_swap`].
///
/// The optimistic transfers have happened and the pool is still locked. The
/// only way to release the lock is to hand this back to [`Pool::settle_swap`],
/// which checks the invariant and commits the reserves.
#[derive(Debug)]
#[must_use = "a pending swap keeps its pool locked until settled"]
pub struct PendingSwap {
    pool: Pubkey,
    sender: Pubkey,
    amount0_out: u128,
    amount1_out: u128,
    to: Pubkey,
}

impl PendingSwap {
    pub fn pool(&self) -> Pubkey {
        self.pool
    }

    pub fn amounts_out(&self) -> (u128, u128) {
        (self.amount0_out, self.amount1_out)
    }
}

impl Pool {
    pub fn new(params: InitializePoolParams) -> Self {
        Self {
            address: params.address,
            bump: params.bump,
            registry: params.registry,
            token0: params.token0,
            token1: params.token1,
            reserve0: 0,
            reserve1: 0,
            oracle: PriceAccumulator::default(),
            k_last: U256::zero(),
            shares: LiquidityToken::default(),
            unlocked: true,
        }
    }

    /// Reserves and the truncated timestamp of their last update.
    pub fn reserves(&self) -> (u128, u128, u32) {
        (self.reserve0, self.reserve1, self.oracle.block_timestamp_last)
    }

    pub fn is_locked(&self) -> bool {
        !self.unlocked
    }

    /// Cumulative prices as of `block_timestamp`, counting the time elapsed
    /// since the last update without writing it.
    pub fn current_cumulative_prices(&self, block_timestamp: u32) -> Result<PriceObservation> {
        self.oracle
            .observe(self.reserve0, self.reserve1, block_timestamp)
    }

    fn lock(&mut self) -> Result<()> {
        require!(self.unlocked, ErrorCode::Locked);
        self.unlocked = false;
        Ok(())
    }

    fn unlock(&mut self) {
        self.unlocked = true;
    }

    /// Runs `f` under the pool lock and releases it whatever `f` returns.
    fn locked<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.lock()?;
        let result = f(self);
        self.unlock();
        result
    }

    fn balances<L: AssetLedger>(&self, ledger: &L) -> (u128, u128) {
        (
            ledger.balance_of(&self.token0, &self.address),
            ledger.balance_of(&self.token1, &self.address),
        )
    }

    /// Writes new reserves, accumulating prices over the old ones first.
    ///
    /// # Errors
    /// * `Overflow` - if either balance exceeds 112 bits
    pub fn update(
        &mut self,
        balance0: u128,
        balance1: u128,
        block_timestamp: u32,
        events: &mut EventLog,
    ) -> Result<()> {
        require!(
            balance0 <= U112_MAX && balance1 <= U112_MAX,
            ErrorCode::Overflow
        );
        self.oracle
            .accumulate(self.reserve0, self.reserve1, block_timestamp)?;
        self.reserve0 = balance0;
        self.reserve1 = balance1;
        events.sync(SyncEvent {
            pool: self.address,
            reserve0: balance0,
            reserve1: balance1,
        });
        Ok(())
    }

    /// Mints the protocol's share of fee growth since the last liquidity
    /// event, worth 1/6 of the growth in sqrt(k). Returns whether the fee is on.
    pub fn mint_fee(&mut self, fee_to: Option<Pubkey>, events: &mut EventLog) -> Result<bool> {
        let Some(fee_to) = fee_to else {
            if !self.k_last.is_zero() {
                self.k_last = U256::zero();
            }
            return Ok(false);
        };
        if !self.k_last.is_zero() {
            let root_k = math::sqrt(math::wide_mul(self.reserve0, self.reserve1));
            let root_k_last = math::sqrt(self.k_last);
            if root_k > root_k_last {
                let numerator = U256::from(self.shares.total_supply) * (root_k - root_k_last);
                let denominator = root_k * U256::from(PROTOCOL_FEE_ROOT_K_MULTIPLIER) + root_k_last;
                let liquidity = math::to_u128(numerator / denominator)?;
                if liquidity > 0 {
                    self.shares.mint(self.address, fee_to, liquidity, events)?;
                }
            }
        }
        Ok(true)
    }

    /// Issues shares for whatever the pool holds above its reserves.
    ///
    /// # Errors
    /// * `Locked` - if the pool is mid-operation
    /// * `InsufficientLiquidityMinted` - if the deposit is worth zero shares,
    ///   or the first deposit does not exceed the permanently locked minimum
    pub fn mint<L: AssetLedger>(
        &mut self,
        ledger: &L,
        fee_to: Option<Pubkey>,
        sender: Pubkey,
        to: Pubkey,
        block_timestamp: u32,
        events: &mut EventLog,
    ) -> Result<u128> {
        self.locked(|pool| {
            let (balance0, balance1) = pool.balances(ledger);
            let amount0 = math::sub(balance0, pool.reserve0)?;
            let amount1 = math::sub(balance1, pool.reserve1)?;

            let fee_on = pool.mint_fee(fee_to, events)?;
            let total_supply = pool.shares.total_supply;
            let liquidity = if total_supply == 0 {
                let liquidity = math::sqrt_product(amount0, amount1)?
                    .checked_sub(MINIMUM_LIQUIDITY)
                    .ok_or_else(|| error!(ErrorCode::InsufficientLiquidityMinted))?;
                pool.shares
                    .mint(pool.address, BURN_SINK, MINIMUM_LIQUIDITY, events)?;
                liquidity
            } else {
                std::cmp::min(
                    math::mul_div(amount0, total_supply, pool.reserve0)?,
                    math::mul_div(amount1, total_supply, pool.reserve1)?,
                )
            };
            require!(liquidity > 0, ErrorCode::InsufficientLiquidityMinted);
            pool.shares.mint(pool.address, to, liquidity, events)?;

            pool.update(balance0, balance1, block_timestamp, events)?;
            if fee_on {
                pool.k_last = math::wide_mul(pool.reserve0, pool.reserve1);
            }
            events.mint(MintEvent {
                pool: pool.address,
                sender,
                amount0,
                amount1,
            });
            Ok(liquidity)
        })
    }

    /// Redeems the shares the pool holds of itself for a pro-rata cut of its
    /// current balances.
    ///
    /// # Errors
    /// * `Locked` - if the pool is mid-operation
    /// * `InsufficientLiquidityBurned` - if either asset's cut rounds to zero
    pub fn burn<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        fee_to: Option<Pubkey>,
        sender: Pubkey,
        to: Pubkey,
        block_timestamp: u32,
        events: &mut EventLog,
    ) -> Result<(u128, u128)> {
        self.locked(|pool| {
            let (balance0, balance1) = pool.balances(ledger);
            let liquidity = pool.shares.balance_of(&pool.address);

            let fee_on = pool.mint_fee(fee_to, events)?;
            let total_supply = pool.shares.total_supply;
            // pro-rata on balances, not reserves, so donated surplus is swept too
            let amount0 = math::mul_div(liquidity, balance0, total_supply)?;
            let amount1 = math::mul_div(liquidity, balance1, total_supply)?;
            require!(
                amount0 > 0 && amount1 > 0,
                ErrorCode::InsufficientLiquidityBurned
            );
            pool.shares.burn(pool.address, pool.address, liquidity, events)?;
            ledger.transfer(&pool.token0, pool.address, to, amount0)?;
            ledger.transfer(&pool.token1, pool.address, to, amount1)?;

            let (balance0, balance1) = pool.balances(ledger);
            pool.update(balance0, balance1, block_timestamp, events)?;
            if fee_on {
                pool.k_last = math::wide_mul(pool.reserve0, pool.reserve1);
            }
            events.burn(BurnEvent {
                pool: pool.address,
                sender,
                amount0,
                amount1,
                to,
            });
            Ok((amount0, amount1))
        })
    }

    /// First phase of a swap: locks the pool, validates the request and sends
    /// the requested outputs to `to`.
    ///
    /// # Errors
    /// * `Locked` - if the pool is mid-operation
    /// * `InsufficientOutputAmount` - if both outputs are zero
    /// * `InsufficientLiquidity` - if an output is not below its reserve
    /// * `InvalidTo` - if `to` is one of the pool's assets
    pub fn begin_swap<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        sender: Pubkey,
        amount0_out: u128,
        amount1_out: u128,
        to: Pubkey,
    ) -> Result<PendingSwap> {
        self.lock()?;
        let result = self.transfer_out(ledger, amount0_out, amount1_out, to);
        if result.is_err() {
            self.unlock();
        }
        result?;
        Ok(PendingSwap {
            pool: self.address,
            sender,
            amount0_out,
            amount1_out,
            to,
        })
    }

    fn transfer_out<L: AssetLedger>(
        &self,
        ledger: &mut L,
        amount0_out: u128,
        amount1_out: u128,
        to: Pubkey,
    ) -> Result<()> {
        require!(
            amount0_out > 0 || amount1_out > 0,
            ErrorCode::InsufficientOutputAmount
        );
        require!(
            amount0_out < self.reserve0 && amount1_out < self.reserve1,
            ErrorCode::InsufficientLiquidity
        );
        require!(
            to != self.token0 && to != self.token1,
            ErrorCode::InvalidTo
        );
        if amount0_out > 0 {
            ledger.transfer(&self.token0, self.address, to, amount0_out)?;
        }
        if amount1_out > 0 {
            ledger.transfer(&self.token1, self.address, to, amount1_out)?;
        }
        Ok(())
    }

    /// Second phase of a swap: measures what came in, enforces the
    /// fee-adjusted invariant and commits the new reserves. Unlocks the pool.
    ///
    /// # Errors
    /// * `InsufficientInputAmount` - if nothing was paid in on either side
    /// * `InvariantViolation` - if the fee-adjusted product fell
    pub fn settle_swap<L: AssetLedger>(
        &mut self,
        ledger: &L,
        pending: PendingSwap,
        block_timestamp: u32,
        events: &mut EventLog,
    ) -> Result<()> {
        require_keys_eq!(pending.pool, self.address, ErrorCode::PoolNotFound);
        let result = self.settle(ledger, &pending, block_timestamp, events);
        self.unlock();
        result
    }

    fn settle<L: AssetLedger>(
        &mut self,
        ledger: &L,
        pending: &PendingSwap,
        block_timestamp: u32,
        events: &mut EventLog,
    ) -> Result<()> {
        let (balance0, balance1) = self.balances(ledger);
        let retained0 = self.reserve0 - pending.amount0_out;
        let retained1 = self.reserve1 - pending.amount1_out;
        let amount0_in = balance0.saturating_sub(retained0);
        let amount1_in = balance1.saturating_sub(retained1);
        require!(
            amount0_in > 0 || amount1_in > 0,
            ErrorCode::InsufficientInputAmount
        );

        let scale = U256::from(FEE_DENOMINATOR);
        let adjusted0 = U256::from(balance0) * scale - U256::from(amount0_in) * U256::from(FEE_PER_MILLE);
        let adjusted1 = U256::from(balance1) * scale - U256::from(amount1_in) * U256::from(FEE_PER_MILLE);
        let k_before = math::wide_mul(self.reserve0, self.reserve1) * scale * scale;
        let k_after = adjusted0
            .checked_mul(adjusted1)
            .ok_or_else(|| error!(ErrorCode::Overflow))?;
        require!(k_after >= k_before, ErrorCode::InvariantViolation);

        self.update(balance0, balance1, block_timestamp, events)?;
        events.swap(SwapEvent {
            pool: self.address,
            sender: pending.sender,
            amount0_in,
            amount1_in,
            amount0_out: pending.amount0_out,
            amount1_out: pending.amount1_out,
            to: pending.to,
        });
        Ok(())
    }

    /// Sends any balance above the reserves to `to`.
    pub fn skim<L: AssetLedger>(&mut self, ledger: &mut L, to: Pubkey) -> Result<(u128, u128)> {
        self.locked(|pool| {
            let (balance0, balance1) = pool.balances(ledger);
            let excess0 = math::sub(balance0, pool.reserve0)?;
            let excess1 = math::sub(balance1, pool.reserve1)?;
            if excess0 > 0 {
                ledger.transfer(&pool.token0, pool.address, to, excess0)?;
            }
            if excess1 > 0 {
                ledger.transfer(&pool.token1, pool.address, to, excess1)?;
            }
            Ok((excess0, excess1))
        })
    }

    /// Resets the reserves to the balances the pool actually holds.
    pub fn sync<L: AssetLedger>(
        &mut self,
        ledger: &L,
        block_timestamp: u32,
        events: &mut EventLog,
    ) -> Result<()> {
        self.locked(|pool| {
            let (balance0, balance1) = pool.balances(ledger);
            pool.update(balance0, balance1, block_timestamp, events)
        })
    }
}
