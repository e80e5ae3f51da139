#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

// Registry identity of the default deployment. Pool addresses are derived
// from it.
declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

pub mod constants;
pub mod errors;
pub mod events;
pub mod exchange;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod native;
pub mod oracle;
pub mod permit;
pub mod state;
pub mod swap_router;

pub use errors::ErrorCode;
pub use exchange::{Exchange, ExchangeConfig, FlashSwapCallee};
pub use instructions::Router;
pub use ledger::{AssetLedger, IssuingLedger, TokenLedger};
pub use native::{NativeAssetAdapter, WrappedNative};
pub use state::pool::{PendingSwap, Pool};
pub use state::registry::{FeeConfig, PoolRegistry};

#[cfg(test)]
pub mod unit_test;
