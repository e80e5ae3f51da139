/// Fluxa Pair AMM Events
///
/// Each public event is an Anchor `#[event]` logged with `emit!`, and also
/// appended to the exchange's [`EventLog`] so callers and indexers running
/// against an in-process exchange can read them back in emission order.
///
/// Field order matches the published layout. `pool` comes first on pool
/// events and identifies the emitting pool.
use anchor_lang::prelude::*;

/// Emitted once per pair when the registry creates its pool
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolCreatedEvent {
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub pool: Pubkey,
    /// Number of pools after this one was appended
    pub pool_count: u64,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintEvent {
    pub pool: Pubkey,
    pub sender: Pubkey,
    pub amount0: u128,
    pub amount1: u128,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurnEvent {
    pub pool: Pubkey,
    pub sender: Pubkey,
    pub amount0: u128,
    pub amount1: u128,
    pub to: Pubkey,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapEvent {
    pub pool: Pubkey,
    pub sender: Pubkey,
    pub amount0_in: u128,
    pub amount1_in: u128,
    pub amount0_out: u128,
    pub amount1_out: u128,
    pub to: Pubkey,
}

/// Emitted whenever a pool's reserves are rewritten
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncEvent {
    pub pool: Pubkey,
    pub reserve0: u128,
    pub reserve1: u128,
}

/// Liquidity-share movement. Mints come from and burns go to the burn sink.
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferEvent {
    pub pool: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u128,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalEvent {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub spender: Pubkey,
    pub amount: u128,
}

/// Any event recorded by the exchange
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeEvent {
    PoolCreated(PoolCreatedEvent),
    Mint(MintEvent),
    Burn(BurnEvent),
    Swap(SwapEvent),
    Sync(SyncEvent),
    Transfer(TransferEvent),
    Approval(ApprovalEvent),
}

/// Append-only journal of emitted events
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    entries: Vec<ExchangeEvent>,
}

impl EventLog {
    pub fn pool_created(&mut self, event: PoolCreatedEvent) {
        emit!(event.clone());
        self.entries.push(ExchangeEvent::PoolCreated(event));
    }

    pub fn mint(&mut self, event: MintEvent) {
        emit!(event.clone());
        self.entries.push(ExchangeEvent::Mint(event));
    }

    pub fn burn(&mut self, event: BurnEvent) {
        emit!(event.clone());
        self.entries.push(ExchangeEvent::Burn(event));
    }

    pub fn swap(&mut self, event: SwapEvent) {
        emit!(event.clone());
        self.entries.push(ExchangeEvent::Swap(event));
    }

    pub fn sync(&mut self, event: SyncEvent) {
        emit!(event.clone());
        self.entries.push(ExchangeEvent::Sync(event));
    }

    pub fn transfer(&mut self, event: TransferEvent) {
        emit!(event.clone());
        self.entries.push(ExchangeEvent::Transfer(event));
    }

    pub fn approval(&mut self, event: ApprovalEvent) {
        emit!(event.clone());
        self.entries.push(ExchangeEvent::Approval(event));
    }

    /// All events in emission order.
    pub fn entries(&self) -> &[ExchangeEvent] {
        &self.entries
    }

    /// Number of events recorded so far; pass it to [`EventLog::since`] to
    /// read only what a later call emitted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn since(&self, mark: usize) -> &[ExchangeEvent] {
        &self.entries[mark.min(self.entries.len())..]
    }

    pub fn last(&self) -> Option<&ExchangeEvent> {
        self.entries.last()
    }

    /// Drops every event recorded after the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }
}
