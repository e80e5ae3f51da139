// Tests for the time-weighted price accumulator, including the wraparound
// behaviour of both the 32-bit timestamps and the 256-bit sums.

use crate::errors::ErrorCode;
use crate::oracle::*;
use primitive_types::U256;

#[cfg(test)]
mod tests {
    use super::*;

    fn q112() -> U256 {
        U256::one() << 112
    }

    #[test]
    fn test_block_timestamp_truncates_to_32_bits() {
        assert_eq!(block_timestamp(0), 0);
        assert_eq!(block_timestamp(1_700_000_000), 1_700_000_000);
        assert_eq!(block_timestamp((1i64 << 32) + 5), 5);
        assert_eq!(block_timestamp(-1), u32::MAX);
    }

    #[test]
    fn test_accumulate_weights_price_by_elapsed_time() {
        let mut acc = PriceAccumulator::default();
        acc.accumulate(0, 0, 100).unwrap();
        // empty reserves only move the timestamp
        assert_eq!(acc.price0_cumulative_last, U256::zero());
        assert_eq!(acc.block_timestamp_last, 100);

        acc.accumulate(2, 4, 110).unwrap();
        assert_eq!(acc.price0_cumulative_last, q112() * 2 * 10);
        assert_eq!(acc.price1_cumulative_last, (q112() / 2) * 10);
        assert_eq!(acc.block_timestamp_last, 110);
    }

    #[test]
    fn test_accumulate_same_timestamp_is_noop() {
        let mut acc = PriceAccumulator {
            price0_cumulative_last: U256::from(7u8),
            price1_cumulative_last: U256::from(9u8),
            block_timestamp_last: 50,
        };
        acc.accumulate(1, 1, 50).unwrap();
        assert_eq!(acc.price0_cumulative_last, U256::from(7u8));
        assert_eq!(acc.price1_cumulative_last, U256::from(9u8));
    }

    #[test]
    fn test_cumulative_sums_wrap() {
        let mut acc = PriceAccumulator {
            price0_cumulative_last: U256::MAX,
            price1_cumulative_last: U256::MAX,
            block_timestamp_last: 0,
        };
        acc.accumulate(1, 1, 1).unwrap();
        assert_eq!(acc.price0_cumulative_last, q112() - 1);
        assert_eq!(acc.price1_cumulative_last, q112() - 1);
    }

    #[test]
    fn test_elapsed_time_wraps_across_epoch() {
        let mut acc = PriceAccumulator {
            block_timestamp_last: u32::MAX - 1,
            ..Default::default()
        };
        acc.accumulate(1, 1, 3).unwrap();
        // u32::MAX - 1 -> 3 is five seconds
        assert_eq!(acc.price0_cumulative_last, q112() * 5);
    }

    #[test]
    fn test_observe_projects_without_writing() {
        let acc = PriceAccumulator {
            block_timestamp_last: 10,
            ..Default::default()
        };
        let observation = acc.observe(1, 3, 20).unwrap();
        assert_eq!(observation.price0_cumulative, q112() * 3 * 10);
        assert_eq!(observation.block_timestamp, 20);
        assert_eq!(acc.price0_cumulative_last, U256::zero());
    }

    #[test]
    fn test_consult_averages_and_tolerates_wrap() {
        let older = PriceObservation {
            block_timestamp: u32::MAX - 4,
            price0_cumulative: U256::MAX - q112() + 1,
            price1_cumulative: U256::zero(),
        };
        let newer = PriceObservation {
            block_timestamp: 5,
            price0_cumulative: q112() * 9,
            price1_cumulative: q112() * 20,
        };
        let (price0, price1) = consult(&older, &newer).unwrap();
        assert_eq!(price0, q112());
        assert_eq!(price1, q112() * 2);
        assert_eq!(amount_at_price(price1, 250).unwrap(), 500);
    }

    #[test]
    fn test_consult_requires_elapsed_time() {
        let sample = PriceObservation {
            block_timestamp: 7,
            price0_cumulative: U256::zero(),
            price1_cumulative: U256::zero(),
        };
        assert_eq!(
            consult(&sample, &sample).err().unwrap(),
            ErrorCode::PeriodNotElapsed.into()
        );
    }
}
