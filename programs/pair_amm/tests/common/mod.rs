// Fixture shared by the router integration tests: an in-memory exchange with
// funded wallets and a router that is approved to spend everything.
#![allow(dead_code)]

use anchor_lang::prelude::Pubkey;
use ed25519_dalek::{Signer, SigningKey};
use pair_amm::instructions::PermitArgs;
use pair_amm::permit::{Permit, PermitSignature};
use pair_amm::{AssetLedger, Exchange, ExchangeConfig, IssuingLedger, NativeAssetAdapter, Router};

pub const START_TIME: i64 = 1_700_000_000;
pub const DEADLINE: i64 = START_TIME + 600;

pub fn key(seed: u8) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes[0] = seed;
    Pubkey::new_from_array(bytes)
}

pub fn e18(n: u128) -> u128 {
    n * 1_000_000_000_000_000_000
}

/// Permit signer whose public key doubles as its share-owner identity.
pub fn permit_signer(seed: u8) -> (SigningKey, Pubkey) {
    let signer = SigningKey::from_bytes(&[seed; 32]);
    let owner = Pubkey::new_from_array(signer.verifying_key().to_bytes());
    (signer, owner)
}

pub struct Fixture {
    pub exchange: Exchange,
    pub router: Router,
    pub wallet: Pubkey,
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub token_c: Pubkey,
    pub wrapped: Pubkey,
}

impl Fixture {
    pub fn new() -> Self {
        let config = ExchangeConfig {
            fee_to_setter: key(90),
            ..ExchangeConfig::default()
        };
        let wrapped = key(50);
        let mut fixture = Self {
            exchange: Exchange::in_memory(config, wrapped),
            router: Router::new(key(200)),
            wallet: key(100),
            token_a: key(1),
            token_b: key(2),
            token_c: key(3),
            wrapped,
        };
        fixture.exchange.set_unix_timestamp(START_TIME);
        for token in [fixture.token_a, fixture.token_b, fixture.token_c] {
            fixture.add_asset(token, 0);
        }
        fixture
            .exchange
            .native
            .credit(fixture.wallet, e18(1_000))
            .unwrap();
        fixture.approve(wrapped);
        fixture
    }

    /// Registers `token`, funds the wallet and approves the router.
    pub fn add_asset(&mut self, token: Pubkey, transfer_fee_bps: u16) {
        self.exchange.ledger.create_asset(token, transfer_fee_bps);
        self.exchange
            .ledger
            .mint_to(&token, self.wallet, e18(10_000))
            .unwrap();
        self.approve(token);
    }

    fn approve(&mut self, token: Pubkey) {
        self.exchange
            .ledger
            .approve(&token, self.wallet, self.router.id, u128::MAX)
            .unwrap();
    }

    pub fn balance(&self, token: &Pubkey) -> u128 {
        self.exchange.ledger.balance_of(token, &self.wallet)
    }

    pub fn native_balance(&self) -> u128 {
        self.exchange.native.native_balance(&self.wallet)
    }

    /// Seeds a fresh pool for `token_a`/`token_b` by direct deposit.
    pub fn seed_pool(&mut self, token_a: Pubkey, amount_a: u128, token_b: Pubkey, amount_b: u128) -> Pubkey {
        let pool = self.exchange.create_pool(token_a, token_b).unwrap();
        let wallet = self.wallet;
        self.exchange
            .ledger
            .transfer(&token_a, wallet, pool, amount_a)
            .unwrap();
        self.exchange
            .ledger
            .transfer(&token_b, wallet, pool, amount_b)
            .unwrap();
        self.exchange.mint(wallet, pool, wallet).unwrap();
        pool
    }

    /// Seeds a `token`/native pool, wrapping the native side first.
    pub fn seed_native_pool(&mut self, token: Pubkey, amount_token: u128, amount_native: u128) -> Pubkey {
        let wallet = self.wallet;
        let exchange = &mut self.exchange;
        exchange
            .native
            .deposit(&mut exchange.ledger, wallet, amount_native)
            .unwrap();
        let wrapped = self.wrapped;
        self.seed_pool(token, amount_token, wrapped, amount_native)
    }

    pub fn reserves(&self, pool: &Pubkey, token: &Pubkey) -> (u128, u128) {
        let pool = self.exchange.pool(pool).unwrap();
        let (reserve0, reserve1, _) = pool.reserves();
        if *token == pool.token0 {
            (reserve0, reserve1)
        } else {
            (reserve1, reserve0)
        }
    }

    /// Signs a permit letting the router spend `value` of `signer`'s shares
    /// in `pool`, at the owner's current nonce.
    pub fn sign_permit(&self, signer: &SigningKey, pool: &Pubkey, value: u128) -> PermitArgs {
        let owner = Pubkey::new_from_array(signer.verifying_key().to_bytes());
        let permit = Permit {
            owner,
            spender: self.router.id,
            value,
            nonce: self.exchange.share_nonce(pool, &owner).unwrap(),
            deadline: DEADLINE,
        };
        let digest = permit.digest(&self.exchange.domain_separator(pool));
        PermitArgs {
            approve_max: false,
            signature: PermitSignature(signer.sign(&digest).to_bytes()),
        }
    }

    /// The router must end every call without a balance of its own.
    pub fn assert_router_empty(&self) {
        let router = self.router.id;
        for token in [self.token_a, self.token_b, self.token_c, self.wrapped] {
            assert_eq!(self.exchange.ledger.balance_of(&token, &router), 0);
        }
        assert_eq!(self.exchange.native.native_balance(&router), 0);
    }
}
