use crate::errors::ErrorCode;
use crate::swap_router::*;
use crate::unit_test::test_utils::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_tokens() {
        let (a, b) = (mock_pubkey(2), mock_pubkey(1));
        assert_eq!(sort_tokens(a, b).unwrap(), (b, a));
        assert_eq!(sort_tokens(b, a).unwrap(), (b, a));
        assert_eq!(
            sort_tokens(a, a).err().unwrap(),
            ErrorCode::IdenticalAddresses.into()
        );
        assert_eq!(
            sort_tokens(a, anchor_lang::prelude::Pubkey::default())
                .err()
                .unwrap(),
            ErrorCode::ZeroAddress.into()
        );
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote(1, 100, 200).unwrap(), 2);
        assert_eq!(quote(2, 200, 100).unwrap(), 1);
        assert_eq!(
            quote(0, 100, 200).err().unwrap(),
            ErrorCode::InsufficientAmount.into()
        );
        assert_eq!(
            quote(1, 0, 200).err().unwrap(),
            ErrorCode::InsufficientLiquidity.into()
        );
        assert_eq!(
            quote(1, 100, 0).err().unwrap(),
            ErrorCode::InsufficientLiquidity.into()
        );
    }

    #[test]
    fn test_get_amount_out() {
        assert_eq!(get_amount_out(2, 100, 100).unwrap(), 1);
        assert_eq!(
            get_amount_out(0, 100, 100).err().unwrap(),
            ErrorCode::InsufficientInputAmount.into()
        );
        assert_eq!(
            get_amount_out(2, 0, 100).err().unwrap(),
            ErrorCode::InsufficientLiquidity.into()
        );
        assert_eq!(
            get_amount_out(2, 100, 0).err().unwrap(),
            ErrorCode::InsufficientLiquidity.into()
        );
        assert_eq!(
            get_amount_out(e18(1), e18(5), e18(10)).unwrap(),
            1_662_497_915_624_478_906
        );
    }

    #[test]
    fn test_get_amount_in() {
        assert_eq!(get_amount_in(1, 100, 100).unwrap(), 2);
        assert_eq!(
            get_amount_in(0, 100, 100).err().unwrap(),
            ErrorCode::InsufficientOutputAmount.into()
        );
        assert_eq!(
            get_amount_in(1, 0, 100).err().unwrap(),
            ErrorCode::InsufficientLiquidity.into()
        );
        assert_eq!(
            get_amount_in(1, 100, 0).err().unwrap(),
            ErrorCode::InsufficientLiquidity.into()
        );
        assert_eq!(
            get_amount_in(100, 100, 100).err().unwrap(),
            ErrorCode::InsufficientLiquidity.into()
        );
        assert_eq!(
            get_amount_in(e18(1), e18(5), e18(10)).unwrap(),
            557_227_237_267_357_629
        );
    }

    #[test]
    fn test_quoting_rejects_overflowing_products() {
        assert_eq!(
            get_amount_out(u128::MAX, u128::MAX, u128::MAX).err().unwrap(),
            ErrorCode::MathOverflow.into()
        );
    }

    #[test]
    fn test_get_amounts_along_path() {
        let mut env = TestEnv::new();
        env.add_liquidity(10_000, 10_000);
        let path = [env.token0, env.token1];
        let registry = env.exchange.registry();

        assert_eq!(get_amounts_out(registry, 2, &path).unwrap(), vec![2, 1]);
        assert_eq!(get_amounts_in(registry, 1, &path).unwrap(), vec![2, 1]);

        assert_eq!(
            get_amounts_out(registry, 2, &path[..1]).err().unwrap(),
            ErrorCode::InvalidPath.into()
        );
        assert_eq!(
            get_amounts_in(registry, 1, &path[..1]).err().unwrap(),
            ErrorCode::InvalidPath.into()
        );
        let unknown = [env.token0, mock_pubkey(9)];
        assert_eq!(
            get_amounts_out(registry, 2, &unknown).err().unwrap(),
            ErrorCode::PoolNotFound.into()
        );
    }

    #[test]
    fn test_hop_execution_rejects_malformed_routes() {
        let mut env = TestEnv::new();
        env.add_liquidity(10_000, 10_000);
        let path = [env.token0, env.token1];
        let exchange = &mut env.exchange;

        let result = execute_hops(exchange, wallet(), &[], &[], wallet());
        assert_eq!(result.err().unwrap(), ErrorCode::InvalidPath.into());
        let result = execute_hops(exchange, wallet(), &[2], &path, wallet());
        assert_eq!(result.err().unwrap(), ErrorCode::InvalidPath.into());
        let result = execute_hops(exchange, wallet(), &[2, 1], &path[..1], wallet());
        assert_eq!(result.err().unwrap(), ErrorCode::InvalidPath.into());

        let result = execute_hops_supporting_fee_on_transfer(exchange, wallet(), &[], wallet());
        assert_eq!(result.err().unwrap(), ErrorCode::InvalidPath.into());
        let result =
            execute_hops_supporting_fee_on_transfer(exchange, wallet(), &path[..1], wallet());
        assert_eq!(result.err().unwrap(), ErrorCode::InvalidPath.into());

        assert_eq!(env.pool().reserves().0, 10_000);
    }

    #[test]
    fn test_get_reserves_follows_argument_order() {
        let mut env = TestEnv::new();
        env.add_liquidity(e18(1), e18(4));
        let registry = env.exchange.registry();
        assert_eq!(
            get_reserves(registry, env.token0, env.token1).unwrap(),
            (e18(1), e18(4))
        );
        assert_eq!(
            get_reserves(registry, env.token1, env.token0).unwrap(),
            (e18(4), e18(1))
        );
    }
}
