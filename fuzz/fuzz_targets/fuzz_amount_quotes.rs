#![no_main]

use arbitrary::Arbitrary;
use honggfuzz::fuzz;
use pair_amm::swap_router::{get_amount_in, get_amount_out, quote};
use pair_amm::ErrorCode;

#[derive(Debug, Clone, Arbitrary)]
struct QuoteInput {
    amount: u128,
    reserve_in: u128,
    reserve_out: u128,
}

#[derive(Debug, Clone, Arbitrary)]
enum QuoteOp {
    Quote,
    AmountOut,
    AmountIn,
}

#[derive(Debug, Clone, Arbitrary)]
struct QuoteTest {
    input: QuoteInput,
    operation: QuoteOp,
}

fn fuzz_quotes(test: QuoteTest) {
    let QuoteTest { input, operation } = test;
    let QuoteInput {
        amount,
        reserve_in,
        reserve_out,
    } = input;

    match operation {
        QuoteOp::Quote => match quote(amount, reserve_in, reserve_out) {
            Ok(_) => assert!(amount > 0 && reserve_in > 0 && reserve_out > 0),
            Err(e) => {
                if amount == 0 {
                    assert_eq!(e, ErrorCode::InsufficientAmount.into());
                }
            }
        },

        QuoteOp::AmountOut => match get_amount_out(amount, reserve_in, reserve_out) {
            Ok(amount_out) => {
                assert!(amount > 0);
                // the fee and the curve keep the output strictly inside the reserve
                assert!(amount_out < reserve_out);
                if amount_out > 0 {
                    if let Ok(required) = get_amount_in(amount_out, reserve_in, reserve_out) {
                        assert!(required <= amount.saturating_add(1));
                    }
                }
            }
            Err(e) => {
                if amount == 0 {
                    assert_eq!(e, ErrorCode::InsufficientInputAmount.into());
                } else if reserve_in == 0 || reserve_out == 0 {
                    assert_eq!(e, ErrorCode::InsufficientLiquidity.into());
                } else {
                    assert_eq!(e, ErrorCode::MathOverflow.into());
                }
            }
        },

        QuoteOp::AmountIn => match get_amount_in(amount, reserve_in, reserve_out) {
            Ok(amount_in) => {
                assert!(amount_in > 0);
                if let Ok(bought) = get_amount_out(amount_in, reserve_in, reserve_out) {
                    assert!(bought >= amount);
                }
            }
            Err(e) => {
                if amount == 0 {
                    assert_eq!(e, ErrorCode::InsufficientOutputAmount.into());
                } else if reserve_in == 0 || reserve_out <= amount {
                    assert_eq!(e, ErrorCode::InsufficientLiquidity.into());
                }
            }
        },
    }
}

fn main() {
    loop {
        fuzz!(|data: QuoteTest| {
            fuzz_quotes(data);
        });
    }
}
