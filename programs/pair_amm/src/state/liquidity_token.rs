use crate::constants::BURN_SINK;
use crate::errors::ErrorCode;
use crate::events::{ApprovalEvent, EventLog, TransferEvent};
use crate::math;
use crate::permit::{Permit, PermitSignature, SignatureVerifier};
use anchor_lang::prelude::*;
use std::collections::BTreeMap;

/// Liquidity-share token of a single pool.
///
/// Shares are addressed by the pool's own address; a pool's balance of its
/// own shares is what a burn redeems. Minting credits from and burning debits
/// to [`BURN_SINK`] in the emitted transfer events.
#[derive(Clone, Debug, Default)]
pub struct LiquidityToken {
    pub total_supply: u128,
    balances: BTreeMap<Pubkey, u128>,
    allowances: BTreeMap<(Pubkey, Pubkey), u128>,
    nonces: BTreeMap<Pubkey, u64>,
}

impl LiquidityToken {
    pub fn balance_of(&self, owner: &Pubkey) -> u128 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// Next nonce a permit from `owner` must be signed with.
    pub fn nonce(&self, owner: &Pubkey) -> u64 {
        self.nonces.get(owner).copied().unwrap_or_default()
    }

    pub(crate) fn mint(&mut self, pool: Pubkey, to: Pubkey, amount: u128, events: &mut EventLog) -> Result<()> {
        self.total_supply = math::add(self.total_supply, amount)?;
        self.credit(to, amount)?;
        events.transfer(TransferEvent {
            pool,
            from: BURN_SINK,
            to,
            amount,
        });
        Ok(())
    }

    pub(crate) fn burn(&mut self, pool: Pubkey, from: Pubkey, amount: u128, events: &mut EventLog) -> Result<()> {
        self.debit(from, amount)?;
        self.total_supply = math::sub(self.total_supply, amount)?;
        events.transfer(TransferEvent {
            pool,
            from,
            to: BURN_SINK,
            amount,
        });
        Ok(())
    }

    pub fn transfer(
        &mut self,
        pool: Pubkey,
        from: Pubkey,
        to: Pubkey,
        amount: u128,
        events: &mut EventLog,
    ) -> Result<()> {
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        events.transfer(TransferEvent {
            pool,
            from,
            to,
            amount,
        });
        Ok(())
    }

    /// Spends `spender`'s allowance over `from`; an allowance of `u128::MAX`
    /// is never decremented.
    pub fn transfer_from(
        &mut self,
        pool: Pubkey,
        spender: Pubkey,
        from: Pubkey,
        to: Pubkey,
        amount: u128,
        events: &mut EventLog,
    ) -> Result<()> {
        let allowed = self.allowance(&from, &spender);
        if allowed != u128::MAX {
            require!(allowed >= amount, ErrorCode::InsufficientAllowance);
            self.allowances.insert((from, spender), allowed - amount);
        }
        self.transfer(pool, from, to, amount, events)
    }

    pub fn approve(&mut self, pool: Pubkey, owner: Pubkey, spender: Pubkey, amount: u128, events: &mut EventLog) {
        self.allowances.insert((owner, spender), amount);
        events.approval(ApprovalEvent {
            pool,
            owner,
            spender,
            amount,
        });
    }

    /// Applies a signed approval.
    ///
    /// # Errors
    /// * `Expired` - if `now` is past `deadline`
    /// * `InvalidSignature` - if the signature does not verify for `owner`
    ///   over the digest bound to `owner`'s current nonce
    #[allow(clippy::too_many_arguments)]
    pub fn permit<V: SignatureVerifier>(
        &mut self,
        pool: Pubkey,
        domain_separator: &[u8; 32],
        owner: Pubkey,
        spender: Pubkey,
        value: u128,
        deadline: i64,
        now: i64,
        signature: &PermitSignature,
        verifier: &V,
        events: &mut EventLog,
    ) -> Result<()> {
        require!(deadline >= now, ErrorCode::Expired);
        let nonce = self.nonce(&owner);
        let digest = Permit {
            owner,
            spender,
            value,
            nonce,
            deadline,
        }
        .digest(domain_separator);
        require!(
            owner != BURN_SINK && verifier.verify(&owner, &digest, signature),
            ErrorCode::InvalidSignature
        );
        self.nonces.insert(owner, nonce + 1);
        self.approve(pool, owner, spender, value, events);
        Ok(())
    }

    fn debit(&mut self, owner: Pubkey, amount: u128) -> Result<()> {
        let balance = self.balance_of(&owner);
        require!(balance >= amount, ErrorCode::InsufficientBalance);
        self.balances.insert(owner, balance - amount);
        Ok(())
    }

    fn credit(&mut self, owner: Pubkey, amount: u128) -> Result<()> {
        let balance = math::add(self.balance_of(&owner), amount)?;
        self.balances.insert(owner, balance);
        Ok(())
    }
}
