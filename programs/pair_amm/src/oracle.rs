// Oracle Module for Time-Weighted Average Price (TWAP) accumulation
//
// Every pool keeps two running sums of its spot price weighted by the seconds
// the price was in effect. Consumers sample the sums at two points in time and
// divide the difference by the elapsed seconds. The sums are allowed to wrap
// modulo 2^256 and the timestamps modulo 2^32, so all differences are taken
// with wrapping arithmetic.

use crate::constants::{Q112_RESOLUTION, TIMESTAMP_MODULUS};
use crate::errors::ErrorCode;
use crate::math;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Truncates a unix timestamp to the 32-bit epoch stored by pools.
pub fn block_timestamp(unix_timestamp: i64) -> u32 {
    unix_timestamp.rem_euclid(TIMESTAMP_MODULUS as i64) as u32
}

#[inline(always)]
pub fn wrapping_add(a: U256, b: U256) -> U256 {
    a.overflowing_add(b).0
}

#[inline(always)]
pub fn wrapping_sub(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0
}

#[inline(always)]
pub fn wrapping_mul(a: U256, b: U256) -> U256 {
    a.overflowing_mul(b).0
}

/// Cumulative prices of a pool sampled at one block timestamp
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceObservation {
    /// Truncated block timestamp of the sample
    pub block_timestamp: u32,
    /// Sum of (reserve1 / reserve0) × seconds, UQ112x112
    pub price0_cumulative: U256,
    /// Sum of (reserve0 / reserve1) × seconds, UQ112x112
    pub price1_cumulative: U256,
}

/// Running time-weighted price sums held by every pool
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceAccumulator {
    pub price0_cumulative_last: U256,
    pub price1_cumulative_last: U256,
    pub block_timestamp_last: u32,
}

impl PriceAccumulator {
    /// Folds the prices implied by the pre-update reserves into the sums.
    ///
    /// Must run before the reserves change. Skipped for zero elapsed time or
    /// when either reserve is empty; the timestamp always advances.
    pub fn accumulate(&mut self, reserve0: u128, reserve1: u128, block_timestamp: u32) -> Result<()> {
        let time_elapsed = block_timestamp.wrapping_sub(self.block_timestamp_last);
        if time_elapsed > 0 && reserve0 != 0 && reserve1 != 0 {
            let (price0, price1) = spot_prices(reserve0, reserve1)?;
            let elapsed = U256::from(time_elapsed);
            self.price0_cumulative_last =
                wrapping_add(self.price0_cumulative_last, wrapping_mul(price0, elapsed));
            self.price1_cumulative_last =
                wrapping_add(self.price1_cumulative_last, wrapping_mul(price1, elapsed));
        }
        self.block_timestamp_last = block_timestamp;
        Ok(())
    }

    /// The sums as they would read at `block_timestamp` if the pool were
    /// updated now, without touching the stored state.
    pub fn observe(&self, reserve0: u128, reserve1: u128, block_timestamp: u32) -> Result<PriceObservation> {
        let mut projected = self.clone();
        projected.accumulate(reserve0, reserve1, block_timestamp)?;
        Ok(PriceObservation {
            block_timestamp,
            price0_cumulative: projected.price0_cumulative_last,
            price1_cumulative: projected.price1_cumulative_last,
        })
    }
}

/// Spot prices of token0 and token1 as UQ112x112.
pub fn spot_prices(reserve0: u128, reserve1: u128) -> Result<(U256, U256)> {
    Ok((
        math::price_uq112x112(reserve0, reserve1)?,
        math::price_uq112x112(reserve1, reserve0)?,
    ))
}

/// Time-weighted average prices between two samples, as UQ112x112.
///
/// # Errors
/// * `PeriodNotElapsed` - if both samples carry the same timestamp
pub fn consult(older: &PriceObservation, newer: &PriceObservation) -> Result<(U256, U256)> {
    let elapsed = newer.block_timestamp.wrapping_sub(older.block_timestamp);
    require!(elapsed > 0, ErrorCode::PeriodNotElapsed);
    let elapsed = U256::from(elapsed);
    Ok((
        wrapping_sub(newer.price0_cumulative, older.price0_cumulative) / elapsed,
        wrapping_sub(newer.price1_cumulative, older.price1_cumulative) / elapsed,
    ))
}

/// Applies a UQ112x112 average price to an input amount, flooring.
pub fn amount_at_price(average_price: U256, amount_in: u128) -> Result<u128> {
    let scaled = average_price
        .checked_mul(U256::from(amount_in))
        .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
    math::to_u128(scaled >> Q112_RESOLUTION)
}
