//! # Outbound Ports
//!
//! Collaborators the transfer module drives: the token ledger, the escrow
//! registry and the channel registry.

use crate::domain::{Address, Amount, ChannelId, PortId, TransferError, TransferEvent};

/// Token ledger - outbound port.
///
/// Every mutation is checked against the ledger's single operator and is
/// atomic: it either applies fully and returns its event, or fails leaving
/// balances untouched.
pub trait TokenLedger: Send + Sync {
    /// Balance of `account` in `denom`.
    fn balance_of(&self, account: &Address, denom: &str) -> Amount;

    /// Credit `to`. Fails with `Overflow` past `U256::MAX`.
    fn mint(
        &self,
        caller: &Address,
        to: &Address,
        denom: &str,
        amount: Amount,
    ) -> Result<TransferEvent, TransferError>;

    /// Debit `from`. Fails with `InsufficientBalance`.
    fn burn(
        &self,
        caller: &Address,
        from: &Address,
        denom: &str,
        amount: Amount,
    ) -> Result<TransferEvent, TransferError>;

    /// Move between accounts. Fails with `InsufficientBalance`.
    fn transfer(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        denom: &str,
        amount: Amount,
    ) -> Result<TransferEvent, TransferError>;
}

/// Escrow lookup - outbound port.
pub trait EscrowResolver: Send + Sync {
    /// Escrow account of `channel`, `None` when not configured.
    fn escrow_address(&self, channel: &ChannelId) -> Option<Address>;
}

/// Channel lookup - outbound port.
pub trait ChannelReader: Send + Sync {
    /// Port the module is bound to, if any.
    fn bound_port(&self) -> Option<PortId>;

    /// Counterparty end of a local channel.
    fn counterparty(&self, port: &PortId, channel: &ChannelId) -> Option<(PortId, ChannelId)>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Channel reader with one counterparty for every channel.
#[derive(Clone, Debug, Default)]
pub struct MockChannelReader {
    /// Bound port.
    pub bound_port: Option<PortId>,
    /// Counterparty returned for any channel; `None` means no channel is open.
    pub counterparty: Option<(PortId, ChannelId)>,
}

impl MockChannelReader {
    /// Every channel open towards `transfer/channel-counterparty`.
    pub fn open() -> Self {
        Self {
            bound_port: None,
            counterparty: Some((
                PortId::from("transfer"),
                ChannelId::from("channel-counterparty"),
            )),
        }
    }
}

impl ChannelReader for MockChannelReader {
    fn bound_port(&self) -> Option<PortId> {
        self.bound_port.clone()
    }

    fn counterparty(&self, _port: &PortId, _channel: &ChannelId) -> Option<(PortId, ChannelId)> {
        self.counterparty.clone()
    }
}

/// Escrow resolver backed by a fixed map.
#[derive(Clone, Debug, Default)]
pub struct MockEscrowResolver {
    /// Configured escrows.
    pub escrows: std::collections::HashMap<ChannelId, Address>,
}

impl EscrowResolver for MockEscrowResolver {
    fn escrow_address(&self, channel: &ChannelId) -> Option<Address> {
        self.escrows.get(channel).copied()
    }
}
