// Shared fixtures for the unit tests: deterministic identities and an
// in-memory exchange with one token pair already registered.

use crate::events::ExchangeEvent;
use crate::exchange::{Exchange, ExchangeConfig};
use crate::ledger::{AssetLedger, IssuingLedger};
use crate::state::pool::Pool;
use anchor_lang::prelude::*;

pub const START_TIME: i64 = 1_700_000_000;

pub fn mock_pubkey(seed: u8) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes[0] = seed;
    Pubkey::new_from_array(bytes)
}

/// `n` whole units of an 18-decimal asset.
pub fn e18(n: u128) -> u128 {
    n * 1_000_000_000_000_000_000
}

pub fn wallet() -> Pubkey {
    mock_pubkey(100)
}

pub fn other() -> Pubkey {
    mock_pubkey(101)
}

pub fn fee_to_setter() -> Pubkey {
    mock_pubkey(90)
}

pub fn wrapped_native() -> Pubkey {
    mock_pubkey(50)
}

pub fn exchange() -> Exchange {
    let config = ExchangeConfig {
        fee_to_setter: fee_to_setter(),
        ..ExchangeConfig::default()
    };
    let mut exchange = Exchange::in_memory(config, wrapped_native());
    exchange.set_unix_timestamp(START_TIME);
    exchange
}

/// Exchange with `token0`/`token1` registered, `wallet` funded with 10 000
/// units of each and an empty pool for the pair.
pub struct TestEnv {
    pub exchange: Exchange,
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub pool: Pubkey,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_transfer_fees(0, 0)
    }

    pub fn with_transfer_fees(fee0_bps: u16, fee1_bps: u16) -> Self {
        let mut exchange = exchange();
        let token0 = mock_pubkey(1);
        let token1 = mock_pubkey(2);
        exchange.ledger.create_asset(token0, fee0_bps);
        exchange.ledger.create_asset(token1, fee1_bps);
        exchange.ledger.mint_to(&token0, wallet(), e18(10_000)).unwrap();
        exchange.ledger.mint_to(&token1, wallet(), e18(10_000)).unwrap();
        let pool = exchange.create_pool(token0, token1).unwrap();
        Self {
            exchange,
            token0,
            token1,
            pool,
        }
    }

    pub fn pool(&self) -> &Pool {
        self.exchange.pool(&self.pool).unwrap()
    }

    pub fn balance(&self, token: &Pubkey, owner: &Pubkey) -> u128 {
        self.exchange.ledger.balance_of(token, owner)
    }

    pub fn shares(&self, owner: &Pubkey) -> u128 {
        self.exchange.share_balance(&self.pool, owner).unwrap()
    }

    /// Sends `amount` of `token` from the wallet to the pool.
    pub fn deposit(&mut self, token: Pubkey, amount: u128) {
        let pool = self.pool;
        self.exchange
            .ledger
            .transfer(&token, wallet(), pool, amount)
            .unwrap();
    }

    /// Seeds the pool and mints the shares to the wallet.
    pub fn add_liquidity(&mut self, amount0: u128, amount1: u128) -> u128 {
        self.deposit(self.token0, amount0);
        self.deposit(self.token1, amount1);
        self.exchange.mint(wallet(), self.pool, wallet()).unwrap()
    }

    pub fn events_since(&self, mark: usize) -> Vec<ExchangeEvent> {
        self.exchange.events().since(mark).to_vec()
    }
}
