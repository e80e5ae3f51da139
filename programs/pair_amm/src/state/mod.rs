pub mod liquidity_token;
pub mod pool;
pub mod registry;
