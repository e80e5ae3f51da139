#![no_main]

use anchor_lang::prelude::Pubkey;
use arbitrary::{Arbitrary, Unstructured};
use honggfuzz::fuzz;
use pair_amm::math::wide_mul;
use pair_amm::swap_router::get_amount_out;
use pair_amm::{AssetLedger, Exchange, ExchangeConfig, IssuingLedger};

const MAX_SEED: u128 = 1 << 100;

fn key(seed: u8) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes[0] = seed;
    Pubkey::new_from_array(bytes)
}

#[derive(Debug, Clone, Arbitrary)]
enum PoolAction {
    /// Deposit `amount_in` and take the quoted output, plus `greed` extra units
    Swap {
        zero_for_one: bool,
        amount_in: u64,
        greed: u8,
    },
    Donate { zero: bool, amount: u64 },
    Sync,
    Skim,
}

#[derive(Debug, Clone)]
struct SwapScenario {
    seed0: u128,
    seed1: u128,
    actions: Vec<PoolAction>,
}

impl<'a> Arbitrary<'a> for SwapScenario {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        // first mint must clear the locked minimum
        let seed0 = u.int_in_range(1_001..=MAX_SEED)?;
        let seed1 = u.int_in_range(1_001..=MAX_SEED)?;
        let len = u.int_in_range(1..=16)?;
        let actions = (0..len)
            .map(|_| u.arbitrary())
            .collect::<arbitrary::Result<Vec<_>>>()?;
        Ok(SwapScenario {
            seed0,
            seed1,
            actions,
        })
    }
}

fn fuzz_swap_invariant(scenario: SwapScenario) {
    let wallet = key(100);
    let (token0, token1) = (key(1), key(2));
    let mut exchange = Exchange::in_memory(ExchangeConfig::default(), key(50));
    for token in [token0, token1] {
        exchange.ledger.create_asset(token, 0);
        exchange.ledger.mint_to(&token, wallet, u128::MAX >> 8).unwrap();
    }
    let pool = exchange.create_pool(token0, token1).unwrap();
    exchange.ledger.transfer(&token0, wallet, pool, scenario.seed0).unwrap();
    exchange.ledger.transfer(&token1, wallet, pool, scenario.seed1).unwrap();
    if exchange.mint(wallet, pool, wallet).is_err() {
        // sqrt(seed0 * seed1) did not clear the minimum
        return;
    }

    for action in scenario.actions {
        let (reserve0, reserve1, _) = exchange.pool(&pool).unwrap().reserves();
        let k_before = wide_mul(reserve0, reserve1);
        let supply_before = exchange.share_supply(&pool).unwrap();

        match action {
            PoolAction::Swap {
                zero_for_one,
                amount_in,
                greed,
            } => {
                let amount_in = amount_in as u128;
                let (token_in, reserve_in, reserve_out) = if zero_for_one {
                    (token0, reserve0, reserve1)
                } else {
                    (token1, reserve1, reserve0)
                };
                let Ok(quoted) = get_amount_out(amount_in, reserve_in, reserve_out) else {
                    continue;
                };
                let amount_out = quoted + greed as u128;
                // a donation would count as extra input and pay for the greed
                let exact = exchange.ledger.balance_of(&token0, &pool) == reserve0
                    && exchange.ledger.balance_of(&token1, &pool) == reserve1;
                let snapshot = exchange.clone();
                if amount_in > 0 {
                    exchange.ledger.transfer(&token_in, wallet, pool, amount_in).unwrap();
                }
                let (out0, out1) = if zero_for_one { (0, amount_out) } else { (amount_out, 0) };
                let result = exchange.swap(wallet, pool, out0, out1, wallet, &[], None);
                if exact && greed > 0 && result.is_ok() {
                    panic!("over-withdrawal accepted: {:?}", (amount_in, quoted, greed));
                }
                if result.is_err() {
                    exchange = snapshot;
                }
            }
            PoolAction::Donate { zero, amount } => {
                let token = if zero { token0 } else { token1 };
                exchange.ledger.transfer(&token, wallet, pool, amount as u128).unwrap();
            }
            PoolAction::Sync => exchange.sync(pool).unwrap(),
            PoolAction::Skim => {
                exchange.skim(pool, wallet).unwrap();
            }
        }

        let state = exchange.pool(&pool).unwrap();
        let (reserve0, reserve1, _) = state.reserves();
        assert!(!state.is_locked());
        assert!(wide_mul(reserve0, reserve1) >= k_before);
        assert_eq!(exchange.share_supply(&pool).unwrap(), supply_before);
        // reserves never claim more than the pool holds
        assert!(exchange.ledger.balance_of(&token0, &pool) >= reserve0);
        assert!(exchange.ledger.balance_of(&token1, &pool) >= reserve1);
    }
}

fn main() {
    loop {
        fuzz!(|data: SwapScenario| {
            fuzz_swap_invariant(data);
        });
    }
}
