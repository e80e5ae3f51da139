/// Fluxa Exchange Host
///
/// Owns everything a transaction can touch (the asset ledger, the native coin
/// adapter, the pool registry and the event journal) and executes every
/// public mutating entry point atomically: if the entry point fails, the
/// whole state is restored to what it was before the call.
///
/// Identities passed as `sender`, `caller` or `owner` are taken to be the
/// authenticated signer of the call.
use crate::constants::LP_TOKEN_NAME;
use crate::errors::ErrorCode;
use crate::events::EventLog;
use crate::ledger::{IssuingLedger, TokenLedger};
use crate::native::{NativeAssetAdapter, WrappedNative};
use crate::oracle::{self, PriceObservation};
use crate::permit::{self, PermitSignature, SignatureVerifier};
use crate::state::pool::Pool;
use crate::state::registry::PoolRegistry;
use anchor_lang::prelude::*;

/// Deployment parameters of an exchange
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Registry identity; pool addresses are derived from it
    pub program_id: Pubkey,
    /// Chain identifier bound into permit domains
    pub chain_id: u64,
    /// Initial holder of the fee-configuration authority. The null default
    /// leaves the fee configuration frozen.
    pub fee_to_setter: Pubkey,
    /// Name of the liquidity-share token, bound into permit domains
    pub lp_token_name: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            program_id: crate::ID,
            chain_id: 1,
            fee_to_setter: Pubkey::default(),
            lp_token_name: LP_TOKEN_NAME.to_string(),
        }
    }
}

/// Receiver of a flash swap.
///
/// Invoked between the optimistic transfer and the invariant check, with the
/// full exchange available. The pool being swapped stays locked for the
/// duration of the call.
pub trait FlashSwapCallee<L = TokenLedger, N = WrappedNative>
where
    L: IssuingLedger + Clone,
    N: NativeAssetAdapter + Clone,
{
    fn on_flash_swap(
        &mut self,
        exchange: &mut Exchange<L, N>,
        sender: Pubkey,
        amount0_out: u128,
        amount1_out: u128,
        data: &[u8],
    ) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct Exchange<L = TokenLedger, N = WrappedNative> {
    pub config: ExchangeConfig,
    pub ledger: L,
    pub native: N,
    clock: Clock,
    registry: PoolRegistry,
    events: EventLog,
}

impl Exchange<TokenLedger, WrappedNative> {
    /// In-memory exchange whose wrapped native coin is the asset `wrapped_native`.
    pub fn in_memory(config: ExchangeConfig, wrapped_native: Pubkey) -> Self {
        let mut ledger = TokenLedger::new();
        ledger.create_asset(wrapped_native, 0);
        Self::new(config, ledger, WrappedNative::new(wrapped_native))
    }
}

impl<L, N> Exchange<L, N>
where
    L: IssuingLedger + Clone,
    N: NativeAssetAdapter + Clone,
{
    pub fn new(config: ExchangeConfig, ledger: L, native: N) -> Self {
        let registry = PoolRegistry::new(config.program_id, config.fee_to_setter);
        Self {
            config,
            ledger,
            native,
            clock: Clock::default(),
            registry,
            events: EventLog::default(),
        }
    }

    /// Runs `f` as one transaction: on error every change it made is undone.
    ///
    /// The event journal is append-only, so it is rolled back by truncating
    /// to its length at entry rather than copied.
    pub fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let journal_mark = self.events.len();
        let snapshot = (
            self.config.clone(),
            self.ledger.clone(),
            self.native.clone(),
            self.clock.clone(),
            self.registry.clone(),
        );
        let result = f(self);
        if result.is_err() {
            let (config, ledger, native, clock, registry) = snapshot;
            self.config = config;
            self.ledger = ledger;
            self.native = native;
            self.clock = clock;
            self.registry = registry;
            self.events.truncate(journal_mark);
        }
        result
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn now(&self) -> i64 {
        self.clock.unix_timestamp
    }

    pub fn set_unix_timestamp(&mut self, unix_timestamp: i64) {
        self.clock.unix_timestamp = unix_timestamp;
    }

    pub fn advance_clock(&mut self, seconds: i64) {
        self.clock.unix_timestamp += seconds;
        self.clock.slot += 1;
    }

    /// Block time truncated to the 32-bit epoch pools store.
    pub fn block_timestamp(&self) -> u32 {
        oracle::block_timestamp(self.clock.unix_timestamp)
    }

    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn pool(&self, address: &Pubkey) -> Result<&Pool> {
        self.registry.pool(address)
    }

    pub fn get_pool(&self, token_a: &Pubkey, token_b: &Pubkey) -> Option<Pubkey> {
        self.registry.get_pool(token_a, token_b)
    }

    pub fn all_pools(&self, index: usize) -> Option<Pubkey> {
        self.registry.all_pools(index)
    }

    pub fn all_pools_length(&self) -> usize {
        self.registry.all_pools_length()
    }

    pub fn create_pool(&mut self, token_a: Pubkey, token_b: Pubkey) -> Result<Pubkey> {
        self.transact(|ex| ex.create_pool_inner(token_a, token_b))
    }

    pub(crate) fn create_pool_inner(&mut self, token_a: Pubkey, token_b: Pubkey) -> Result<Pubkey> {
        self.registry.create_pool(token_a, token_b, &mut self.events)
    }

    pub fn set_fee_to(&mut self, caller: Pubkey, fee_to: Option<Pubkey>) -> Result<()> {
        self.registry.set_fee_to(caller, fee_to)
    }

    pub fn set_fee_to_setter(&mut self, caller: Pubkey, fee_to_setter: Pubkey) -> Result<()> {
        self.registry.set_fee_to_setter(caller, fee_to_setter)
    }

    /// Issues shares of `pool` to `to` for whatever it holds above its reserves.
    pub fn mint(&mut self, sender: Pubkey, pool: Pubkey, to: Pubkey) -> Result<u128> {
        self.transact(|ex| ex.mint_inner(sender, pool, to))
    }

    pub(crate) fn mint_inner(&mut self, sender: Pubkey, pool: Pubkey, to: Pubkey) -> Result<u128> {
        let fee_to = self.registry.fee_to();
        let block_timestamp = self.block_timestamp();
        let pool = self.registry.pool_mut(&pool)?;
        pool.mint(&self.ledger, fee_to, sender, to, block_timestamp, &mut self.events)
    }

    /// Redeems the shares `pool` holds of itself, paying both assets to `to`.
    pub fn burn(&mut self, sender: Pubkey, pool: Pubkey, to: Pubkey) -> Result<(u128, u128)> {
        self.transact(|ex| ex.burn_inner(sender, pool, to))
    }

    pub(crate) fn burn_inner(&mut self, sender: Pubkey, pool: Pubkey, to: Pubkey) -> Result<(u128, u128)> {
        let fee_to = self.registry.fee_to();
        let block_timestamp = self.block_timestamp();
        let pool = self.registry.pool_mut(&pool)?;
        pool.burn(&mut self.ledger, fee_to, sender, to, block_timestamp, &mut self.events)
    }

    /// Swaps out of `pool`. With non-empty `data` this is a flash swap: the
    /// outputs are sent first and `callee` runs before the invariant is
    /// checked, so it can pay for them.
    ///
    /// # Errors
    /// * `InvalidCallee` - if `data` is non-empty and there is no callee
    /// * any error of the pool's swap phases or of the callee
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        sender: Pubkey,
        pool: Pubkey,
        amount0_out: u128,
        amount1_out: u128,
        to: Pubkey,
        data: &[u8],
        callee: Option<&mut dyn FlashSwapCallee<L, N>>,
    ) -> Result<()> {
        self.transact(|ex| ex.swap_inner(sender, pool, amount0_out, amount1_out, to, data, callee))
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn swap_inner(
        &mut self,
        sender: Pubkey,
        pool: Pubkey,
        amount0_out: u128,
        amount1_out: u128,
        to: Pubkey,
        data: &[u8],
        callee: Option<&mut dyn FlashSwapCallee<L, N>>,
    ) -> Result<()> {
        require!(
            data.is_empty() || callee.is_some(),
            ErrorCode::InvalidCallee
        );
        let pending = self
            .registry
            .pool_mut(&pool)?
            .begin_swap(&mut self.ledger, sender, amount0_out, amount1_out, to)?;
        if let Some(callee) = callee.filter(|_| !data.is_empty()) {
            callee.on_flash_swap(self, sender, amount0_out, amount1_out, data)?;
        }
        let block_timestamp = self.block_timestamp();
        self.registry
            .pool_mut(&pool)?
            .settle_swap(&self.ledger, pending, block_timestamp, &mut self.events)
    }

    /// Sends `pool`'s balances above its reserves to `to`.
    pub fn skim(&mut self, pool: Pubkey, to: Pubkey) -> Result<(u128, u128)> {
        self.transact(|ex| ex.registry.pool_mut(&pool)?.skim(&mut ex.ledger, to))
    }

    /// Resets `pool`'s reserves to its balances.
    pub fn sync(&mut self, pool: Pubkey) -> Result<()> {
        self.transact(|ex| {
            let block_timestamp = ex.block_timestamp();
            ex.registry
                .pool_mut(&pool)?
                .sync(&ex.ledger, block_timestamp, &mut ex.events)
        })
    }

    /// Cumulative prices of `pool` as of the current block time.
    pub fn current_cumulative_prices(&self, pool: &Pubkey) -> Result<PriceObservation> {
        self.registry
            .pool(pool)?
            .current_cumulative_prices(self.block_timestamp())
    }

    pub fn share_balance(&self, pool: &Pubkey, owner: &Pubkey) -> Result<u128> {
        Ok(self.registry.pool(pool)?.shares.balance_of(owner))
    }

    pub fn share_supply(&self, pool: &Pubkey) -> Result<u128> {
        Ok(self.registry.pool(pool)?.shares.total_supply)
    }

    pub fn share_allowance(&self, pool: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> Result<u128> {
        Ok(self.registry.pool(pool)?.shares.allowance(owner, spender))
    }

    pub fn share_nonce(&self, pool: &Pubkey, owner: &Pubkey) -> Result<u64> {
        Ok(self.registry.pool(pool)?.shares.nonce(owner))
    }

    pub fn transfer_shares(&mut self, pool: Pubkey, from: Pubkey, to: Pubkey, amount: u128) -> Result<()> {
        self.transact(|ex| {
            ex.registry
                .pool_mut(&pool)?
                .shares
                .transfer(pool, from, to, amount, &mut ex.events)
        })
    }

    pub(crate) fn transfer_shares_from_inner(
        &mut self,
        pool: Pubkey,
        spender: Pubkey,
        from: Pubkey,
        to: Pubkey,
        amount: u128,
    ) -> Result<()> {
        self.registry
            .pool_mut(&pool)?
            .shares
            .transfer_from(pool, spender, from, to, amount, &mut self.events)
    }

    pub fn transfer_shares_from(
        &mut self,
        pool: Pubkey,
        spender: Pubkey,
        from: Pubkey,
        to: Pubkey,
        amount: u128,
    ) -> Result<()> {
        self.transact(|ex| ex.transfer_shares_from_inner(pool, spender, from, to, amount))
    }

    pub fn approve_shares(&mut self, pool: Pubkey, owner: Pubkey, spender: Pubkey, amount: u128) -> Result<()> {
        self.transact(|ex| {
            ex.registry
                .pool_mut(&pool)?
                .shares
                .approve(pool, owner, spender, amount, &mut ex.events);
            Ok(())
        })
    }

    /// Permit domain of `pool`'s share token on this deployment.
    pub fn domain_separator(&self, pool: &Pubkey) -> [u8; 32] {
        permit::domain_separator(&self.config.lp_token_name, self.config.chain_id, pool)
    }

    /// Applies `owner`'s signed approval of `spender` over `pool`'s shares.
    #[allow(clippy::too_many_arguments)]
    pub fn permit<V: SignatureVerifier>(
        &mut self,
        pool: Pubkey,
        owner: Pubkey,
        spender: Pubkey,
        value: u128,
        deadline: i64,
        signature: &PermitSignature,
        verifier: &V,
    ) -> Result<()> {
        self.transact(|ex| ex.permit_inner(pool, owner, spender, value, deadline, signature, verifier))
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn permit_inner<V: SignatureVerifier>(
        &mut self,
        pool: Pubkey,
        owner: Pubkey,
        spender: Pubkey,
        value: u128,
        deadline: i64,
        signature: &PermitSignature,
        verifier: &V,
    ) -> Result<()> {
        let domain_separator = self.domain_separator(&pool);
        let now = self.now();
        self.registry.pool_mut(&pool)?.shares.permit(
            pool,
            &domain_separator,
            owner,
            spender,
            value,
            deadline,
            now,
            signature,
            verifier,
            &mut self.events,
        )
    }
}
