#![no_main]

use arbitrary::Arbitrary;
use honggfuzz::fuzz;
use pair_amm::math::{sqrt, sqrt_product, wide_mul};
use primitive_types::U256;

#[derive(Debug, Clone, Arbitrary)]
struct SqrtInput {
    a: u128,
    b: u128,
}

fn fuzz_sqrt(input: SqrtInput) {
    let SqrtInput { a, b } = input;
    let product = wide_mul(a, b);
    let root = sqrt(product);

    assert!(root * root <= product);
    let next = root + U256::one();
    if let Some(square) = next.checked_mul(next) {
        assert!(square > product);
    }

    // the root of a product of two u128 values always fits in u128
    let narrowed = sqrt_product(a, b).expect("root fits");
    assert_eq!(U256::from(narrowed), root);
    assert!(narrowed <= a.max(b));
}

fn main() {
    loop {
        fuzz!(|data: SqrtInput| {
            fuzz_sqrt(data);
        });
    }
}
