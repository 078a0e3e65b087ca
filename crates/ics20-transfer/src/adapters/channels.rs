//! Channel Registry Adapter
//!
//! Owner-administered port binding and channel ends. Handshakes are out of
//! scope: an administrator records the outcome directly.

use super::ownership::Ownership;
use crate::domain::{Address, ChannelId, PortId, TransferError};
use crate::ports::inbound::Owned;
use crate::ports::outbound::ChannelReader;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

/// In-memory channel registry.
pub struct InMemoryChannelRegistry {
    ownership: Ownership,
    bound_port: RwLock<Option<PortId>>,
    /// (port, channel) -> (counterparty port, counterparty channel).
    channels: RwLock<HashMap<(PortId, ChannelId), (PortId, ChannelId)>>,
}

impl InMemoryChannelRegistry {
    /// Create an empty registry owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            ownership: Ownership::new(owner),
            bound_port: RwLock::new(None),
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Bind the module to `port`. Owner-only.
    pub fn bind_port(&self, caller: &Address, port: PortId) -> Result<(), TransferError> {
        self.ownership.ensure_owner(caller)?;
        info!("[ics20] Bound port '{}'", port);
        *self.bound_port.write() = Some(port);
        Ok(())
    }

    /// Record an open channel end and its counterparty. Owner-only.
    pub fn open_channel(
        &self,
        caller: &Address,
        port: PortId,
        channel: ChannelId,
        counterparty_port: PortId,
        counterparty_channel: ChannelId,
    ) -> Result<(), TransferError> {
        self.ownership.ensure_owner(caller)?;
        info!(
            "[ics20] Opened channel {}/{} <-> {}/{}",
            port, channel, counterparty_port, counterparty_channel
        );
        self.channels
            .write()
            .insert((port, channel), (counterparty_port, counterparty_channel));
        Ok(())
    }
}

impl ChannelReader for InMemoryChannelRegistry {
    fn bound_port(&self) -> Option<PortId> {
        self.bound_port.read().clone()
    }

    fn counterparty(&self, port: &PortId, channel: &ChannelId) -> Option<(PortId, ChannelId)> {
        self.channels
            .read()
            .get(&(port.clone(), channel.clone()))
            .cloned()
    }
}

impl Owned for InMemoryChannelRegistry {
    fn owner(&self) -> Address {
        self.ownership.owner()
    }

    fn transfer_ownership(
        &self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), TransferError> {
        self.ownership.transfer(caller, new_owner)
    }
}
