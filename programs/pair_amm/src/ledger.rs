/// Fluxa Asset Ledger interface
///
/// The pools and the router never own asset balances directly: they read and
/// move them through [`AssetLedger`], the balance/allowance interface of the
/// underlying fungible assets. [`TokenLedger`] is the in-process implementation
/// used by the exchange host, including assets that burn part of every
/// transfer (fee-on-transfer assets).
use crate::constants::BPS_DENOMINATOR;
use crate::errors::ErrorCode;
use crate::math;
use anchor_lang::prelude::*;
use std::collections::BTreeMap;

/// Balance and allowance bookkeeping consumed by the AMM core
///
/// `from` on [`AssetLedger::transfer`] is the authorising account: the core
/// only ever passes its own identities (a pool, the router) there. Transfers
/// on behalf of users go through [`AssetLedger::transfer_from`].
pub trait AssetLedger {
    fn balance_of(&self, asset: &Pubkey, owner: &Pubkey) -> u128;

    fn total_supply(&self, asset: &Pubkey) -> u128;

    fn allowance(&self, asset: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> u128;

    fn approve(&mut self, asset: &Pubkey, owner: Pubkey, spender: Pubkey, amount: u128) -> Result<()>;

    /// Moves `amount` out of `from`. The recipient may be credited less when
    /// the asset charges a transfer fee.
    fn transfer(&mut self, asset: &Pubkey, from: Pubkey, to: Pubkey, amount: u128) -> Result<()>;

    /// Like [`AssetLedger::transfer`], spending `spender`'s allowance over `from`.
    fn transfer_from(
        &mut self,
        asset: &Pubkey,
        spender: Pubkey,
        from: Pubkey,
        to: Pubkey,
        amount: u128,
    ) -> Result<()>;
}

/// Ledger that can create and destroy supply, needed by the native-asset adapter
pub trait IssuingLedger: AssetLedger {
    fn mint_to(&mut self, asset: &Pubkey, to: Pubkey, amount: u128) -> Result<()>;

    fn burn_from(&mut self, asset: &Pubkey, from: Pubkey, amount: u128) -> Result<()>;
}

/// Accounts of a single asset
#[derive(Clone, Debug, Default)]
pub struct AssetAccounts {
    /// Portion of every transfer burned before crediting, in basis points
    pub transfer_fee_bps: u16,
    total_supply: u128,
    balances: BTreeMap<Pubkey, u128>,
    allowances: BTreeMap<(Pubkey, Pubkey), u128>,
}

impl AssetAccounts {
    fn balance(&self, owner: &Pubkey) -> u128 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    fn debit(&mut self, owner: Pubkey, amount: u128) -> Result<()> {
        let balance = self.balance(&owner);
        require!(balance >= amount, ErrorCode::InsufficientBalance);
        self.balances.insert(owner, balance - amount);
        Ok(())
    }

    fn credit(&mut self, owner: Pubkey, amount: u128) -> Result<()> {
        let balance = math::add(self.balance(&owner), amount)?;
        self.balances.insert(owner, balance);
        Ok(())
    }

    fn transfer_fee(&self, amount: u128) -> Result<u128> {
        math::mul_div(amount, self.transfer_fee_bps as u128, BPS_DENOMINATOR)
    }
}

/// In-process multi-asset ledger
#[derive(Clone, Debug, Default)]
pub struct TokenLedger {
    assets: BTreeMap<Pubkey, AssetAccounts>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asset. `transfer_fee_bps` is 0 for ordinary assets.
    ///
    /// Registering an existing asset only updates its transfer fee.
    pub fn create_asset(&mut self, asset: Pubkey, transfer_fee_bps: u16) {
        self.assets.entry(asset).or_default().transfer_fee_bps = transfer_fee_bps;
    }

    pub fn contains(&self, asset: &Pubkey) -> bool {
        self.assets.contains_key(asset)
    }

    fn accounts(&self, asset: &Pubkey) -> Option<&AssetAccounts> {
        self.assets.get(asset)
    }

    fn accounts_mut(&mut self, asset: &Pubkey) -> Result<&mut AssetAccounts> {
        self.assets
            .get_mut(asset)
            .ok_or_else(|| error!(ErrorCode::UnknownAsset))
    }
}

impl AssetLedger for TokenLedger {
    fn balance_of(&self, asset: &Pubkey, owner: &Pubkey) -> u128 {
        self.accounts(asset).map(|a| a.balance(owner)).unwrap_or_default()
    }

    fn total_supply(&self, asset: &Pubkey) -> u128 {
        self.accounts(asset).map(|a| a.total_supply).unwrap_or_default()
    }

    fn allowance(&self, asset: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> u128 {
        self.accounts(asset)
            .and_then(|a| a.allowances.get(&(*owner, *spender)).copied())
            .unwrap_or_default()
    }

    fn approve(&mut self, asset: &Pubkey, owner: Pubkey, spender: Pubkey, amount: u128) -> Result<()> {
        self.accounts_mut(asset)?
            .allowances
            .insert((owner, spender), amount);
        Ok(())
    }

    fn transfer(&mut self, asset: &Pubkey, from: Pubkey, to: Pubkey, amount: u128) -> Result<()> {
        let accounts = self.accounts_mut(asset)?;
        let fee = accounts.transfer_fee(amount)?;
        accounts.debit(from, amount)?;
        if fee > 0 {
            accounts.total_supply = math::sub(accounts.total_supply, fee)?;
        }
        accounts.credit(to, amount - fee)
    }

    fn transfer_from(
        &mut self,
        asset: &Pubkey,
        spender: Pubkey,
        from: Pubkey,
        to: Pubkey,
        amount: u128,
    ) -> Result<()> {
        let accounts = self.accounts_mut(asset)?;
        let allowed = accounts
            .allowances
            .get(&(from, spender))
            .copied()
            .unwrap_or_default();
        if allowed != u128::MAX {
            require!(allowed >= amount, ErrorCode::InsufficientAllowance);
            accounts.allowances.insert((from, spender), allowed - amount);
        }
        self.transfer(asset, from, to, amount)
    }
}

impl IssuingLedger for TokenLedger {
    fn mint_to(&mut self, asset: &Pubkey, to: Pubkey, amount: u128) -> Result<()> {
        let accounts = self.accounts_mut(asset)?;
        accounts.total_supply = math::add(accounts.total_supply, amount)?;
        accounts.credit(to, amount)
    }

    fn burn_from(&mut self, asset: &Pubkey, from: Pubkey, amount: u128) -> Result<()> {
        let accounts = self.accounts_mut(asset)?;
        accounts.debit(from, amount)?;
        accounts.total_supply = math::sub(accounts.total_supply, amount)?;
        Ok(())
    }
}
