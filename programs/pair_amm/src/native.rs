//! Native coin adapter
//!
//! Pools only trade ledger assets, so the chain's native coin enters them in
//! wrapped form. The adapter keeps native balances and converts between the
//! coin and its wrapped asset 1:1.

use crate::errors::ErrorCode;
use crate::ledger::IssuingLedger;
use crate::math;
use anchor_lang::prelude::*;
use std::collections::BTreeMap;

/// Deposit/withdraw interface between the native coin and its wrapped asset
pub trait NativeAssetAdapter {
    /// Ledger identifier of the wrapped asset
    fn wrapped_asset(&self) -> Pubkey;

    fn native_balance(&self, owner: &Pubkey) -> u128;

    fn transfer_native(&mut self, from: Pubkey, to: Pubkey, amount: u128) -> Result<()>;

    /// Locks `amount` of `owner`'s native coin and credits the same amount of
    /// the wrapped asset to `owner`.
    fn deposit<L: IssuingLedger>(&mut self, ledger: &mut L, owner: Pubkey, amount: u128) -> Result<()>;

    /// Burns `amount` of `owner`'s wrapped asset and releases the native coin to `owner`.
    fn withdraw<L: IssuingLedger>(&mut self, ledger: &mut L, owner: Pubkey, amount: u128) -> Result<()>;
}

/// In-process wrapped native coin. Locked coin is held at the wrapped asset's
/// own address.
#[derive(Clone, Debug)]
pub struct WrappedNative {
    mint: Pubkey,
    native_balances: BTreeMap<Pubkey, u128>,
}

impl WrappedNative {
    pub fn new(mint: Pubkey) -> Self {
        Self {
            mint,
            native_balances: BTreeMap::new(),
        }
    }

    /// Credits native coin to `owner` out of thin air (genesis funding).
    pub fn credit(&mut self, owner: Pubkey, amount: u128) -> Result<()> {
        let balance = math::add(self.native_balance(&owner), amount)?;
        self.native_balances.insert(owner, balance);
        Ok(())
    }
}

impl NativeAssetAdapter for WrappedNative {
    fn wrapped_asset(&self) -> Pubkey {
        self.mint
    }

    fn native_balance(&self, owner: &Pubkey) -> u128 {
        self.native_balances.get(owner).copied().unwrap_or_default()
    }

    fn transfer_native(&mut self, from: Pubkey, to: Pubkey, amount: u128) -> Result<()> {
        let from_balance = self.native_balance(&from);
        require!(from_balance >= amount, ErrorCode::InsufficientNativeBalance);
        self.native_balances.insert(from, from_balance - amount);
        self.credit(to, amount)
    }

    fn deposit<L: IssuingLedger>(&mut self, ledger: &mut L, owner: Pubkey, amount: u128) -> Result<()> {
        let mint = self.mint;
        self.transfer_native(owner, mint, amount)?;
        ledger.mint_to(&mint, owner, amount)
    }

    fn withdraw<L: IssuingLedger>(&mut self, ledger: &mut L, owner: Pubkey, amount: u128) -> Result<()> {
        let mint = self.mint;
        ledger.burn_from(&mint, owner, amount)?;
        self.transfer_native(mint, owner, amount)
    }
}
