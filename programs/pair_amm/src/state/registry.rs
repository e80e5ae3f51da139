use crate::constants::POOL_SEED;
use crate::errors::ErrorCode;
use crate::events::{EventLog, PoolCreatedEvent};
use crate::state::pool::{InitializePoolParams, Pool};
use crate::swap_router::sort_tokens;
use anchor_lang::prelude::*;
use std::collections::HashMap;

/// Protocol fee configuration owned by the registry.
///
/// `fee_to` switches the protocol fee on when set; only `fee_to_setter` may
/// change either field.
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FeeConfig {
    pub fee_to: Option<Pubkey>,
    pub fee_to_setter: Pubkey,
}

impl FeeConfig {
    pub const LEN: usize = 8 // discriminator
        + 1 + 32 // fee_to
        + 32; // fee_to_setter
}

/// Derives the address of the pool for an already sorted pair.
pub fn derive_pool_address(program_id: &Pubkey, token0: &Pubkey, token1: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_SEED, token0.as_ref(), token1.as_ref()], program_id)
}

/// Creates pools once per unordered pair and keeps them in creation order.
#[derive(Clone, Debug)]
pub struct PoolRegistry {
    pub program_id: Pubkey,
    fee_config: FeeConfig,
    pools: Vec<Pool>,
    pairs: HashMap<(Pubkey, Pubkey), usize>,
    addresses: HashMap<Pubkey, usize>,
}

impl PoolRegistry {
    pub fn new(program_id: Pubkey, fee_to_setter: Pubkey) -> Self {
        Self {
            program_id,
            fee_config: FeeConfig {
                fee_to: None,
                fee_to_setter,
            },
            pools: Vec::new(),
            pairs: HashMap::new(),
            addresses: HashMap::new(),
        }
    }

    /// Creates the pool of the pair `(token_a, token_b)` and returns its address.
    ///
    /// # Errors
    /// * `IdenticalAddresses` - if both assets are the same
    /// * `ZeroAddress` - if either asset is the null identifier
    /// * `PairExists` - if the pair has a pool, in either order
    pub fn create_pool(
        &mut self,
        token_a: Pubkey,
        token_b: Pubkey,
        events: &mut EventLog,
    ) -> Result<Pubkey> {
        let (token0, token1) = sort_tokens(token_a, token_b)?;
        require!(
            !self.pairs.contains_key(&(token0, token1)),
            ErrorCode::PairExists
        );
        let (address, bump) = derive_pool_address(&self.program_id, &token0, &token1);

        let index = self.pools.len();
        self.pools.push(Pool::new(InitializePoolParams {
            address,
            bump,
            registry: self.program_id,
            token0,
            token1,
        }));
        self.pairs.insert((token0, token1), index);
        self.pairs.insert((token1, token0), index);
        self.addresses.insert(address, index);

        msg!("Pool created for {} / {} at {}", token0, token1, address);
        events.pool_created(PoolCreatedEvent {
            token0,
            token1,
            pool: address,
            pool_count: self.pools.len() as u64,
        });
        Ok(address)
    }

    /// Address of the pair's pool, in either order.
    pub fn get_pool(&self, token_a: &Pubkey, token_b: &Pubkey) -> Option<Pubkey> {
        self.pairs
            .get(&(*token_a, *token_b))
            .map(|&index| self.pools[index].address)
    }

    /// Address of the `index`-th pool created.
    pub fn all_pools(&self, index: usize) -> Option<Pubkey> {
        self.pools.get(index).map(|pool| pool.address)
    }

    pub fn all_pools_length(&self) -> usize {
        self.pools.len()
    }

    pub fn pool(&self, address: &Pubkey) -> Result<&Pool> {
        self.addresses
            .get(address)
            .map(|&index| &self.pools[index])
            .ok_or_else(|| error!(ErrorCode::PoolNotFound))
    }

    pub(crate) fn pool_mut(&mut self, address: &Pubkey) -> Result<&mut Pool> {
        let index = *self
            .addresses
            .get(address)
            .ok_or_else(|| error!(ErrorCode::PoolNotFound))?;
        Ok(&mut self.pools[index])
    }

    pub fn fee_config(&self) -> &FeeConfig {
        &self.fee_config
    }

    pub fn fee_to(&self) -> Option<Pubkey> {
        self.fee_config.fee_to
    }

    /// Sets or clears the protocol fee recipient. Setting the null identifier
    /// clears it.
    pub fn set_fee_to(&mut self, caller: Pubkey, fee_to: Option<Pubkey>) -> Result<()> {
        require_keys_neq!(caller, Pubkey::default(), ErrorCode::Forbidden);
        require_keys_eq!(
            caller,
            self.fee_config.fee_to_setter,
            ErrorCode::Forbidden
        );
        self.fee_config.fee_to = fee_to.filter(|key| *key != Pubkey::default());
        msg!("Protocol fee recipient set to {:?}", self.fee_config.fee_to);
        Ok(())
    }

    /// Hands the fee authority to `fee_to_setter`. Handing it to the null
    /// identifier leaves the fee configuration frozen for good.
    pub fn set_fee_to_setter(&mut self, caller: Pubkey, fee_to_setter: Pubkey) -> Result<()> {
        require_keys_neq!(caller, Pubkey::default(), ErrorCode::Forbidden);
        require_keys_eq!(
            caller,
            self.fee_config.fee_to_setter,
            ErrorCode::Forbidden
        );
        self.fee_config.fee_to_setter = fee_to_setter;
        msg!("Fee authority transferred to {}", fee_to_setter);
        Ok(())
    }
}
