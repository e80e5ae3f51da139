/// Fluxa Pair AMM Math Library
///
/// Integer-only helpers shared by the pools and the router. Every product that
/// is later divided is formed in 256 bits so no intermediate can overflow
/// silently; narrowing back to `u128` is checked.
use crate::constants::Q112_RESOLUTION;
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
// Use primitive type U256 for intermediary calculations to avoid overflow and keep precision
use primitive_types::U256;

/// Narrows a 256-bit value to `u128`, failing with `MathOverflow` when it does not fit.
#[inline(always)]
pub fn to_u128(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return err!(ErrorCode::MathOverflow);
    }
    Ok(value.low_u128())
}

/// Computes `floor(a * b / denominator)` with a 256-bit intermediate product.
///
/// # Errors
/// * `MathOverflow` - if the denominator is zero or the quotient exceeds `u128`
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    require!(denominator != 0, ErrorCode::MathOverflow);
    let product = U256::from(a) * U256::from(b);
    to_u128(product / U256::from(denominator))
}

/// Product of two `u128` values, widened. Never overflows.
#[inline(always)]
pub fn wide_mul(a: u128, b: u128) -> U256 {
    U256::from(a) * U256::from(b)
}

/// Calculates `floor(sqrt(y))` using the Babylonian method
///
/// Converges from above: the first guess is `y / 2 + 1` and every iteration
/// strictly decreases the estimate until it stops moving.
///
/// # Example
///
/// ```
/// use pair_amm::math::sqrt;
/// use primitive_types::U256;
/// assert_eq!(sqrt(U256::from(4_000_000u64)), U256::from(2_000u64));
/// assert_eq!(sqrt(U256::from(8u64)), U256::from(2u64));
/// ```
pub fn sqrt(y: U256) -> U256 {
    if y > U256::from(3u8) {
        let mut z = y;
        let mut x = y / 2 + 1;
        while x < z {
            z = x;
            x = (y / x + x) / 2;
        }
        z
    } else if !y.is_zero() {
        U256::one()
    } else {
        U256::zero()
    }
}

/// `floor(sqrt(a * b))`, the geometric mean used to size a pool's first mint.
pub fn sqrt_product(a: u128, b: u128) -> Result<u128> {
    to_u128(sqrt(wide_mul(a, b)))
}

/// Encodes an integer as UQ112x112 (`y * 2^112`).
#[inline(always)]
pub fn encode_uq112x112(y: u128) -> U256 {
    U256::from(y) << Q112_RESOLUTION
}

/// Divides a UQ112x112 value by an integer, returning UQ112x112.
///
/// # Errors
/// * `MathOverflow` - if `y` is zero
pub fn uq_div(x: U256, y: u128) -> Result<U256> {
    require!(y != 0, ErrorCode::MathOverflow);
    Ok(x / U256::from(y))
}

/// Price of one unit of the base asset in terms of the quote asset, as UQ112x112.
pub fn price_uq112x112(base_reserve: u128, quote_reserve: u128) -> Result<U256> {
    uq_div(encode_uq112x112(quote_reserve), base_reserve)
}

/// Checked `u128` addition mapped to `MathOverflow`.
#[inline(always)]
pub fn add(a: u128, b: u128) -> Result<u128> {
    a.checked_add(b).ok_or_else(|| error!(ErrorCode::MathOverflow))
}

/// Checked `u128` subtraction mapped to `MathOverflow`.
#[inline(always)]
pub fn sub(a: u128, b: u128) -> Result<u128> {
    a.checked_sub(b).ok_or_else(|| error!(ErrorCode::MathOverflow))
}

/// Checked `u128` multiplication mapped to `MathOverflow`.
#[inline(always)]
pub fn mul(a: u128, b: u128) -> Result<u128> {
    a.checked_mul(b).ok_or_else(|| error!(ErrorCode::MathOverflow))
}
