//! Escrow Registry Adapter
//!
//! Owner-administered map from channel identifier to escrow account.

use super::ownership::Ownership;
use crate::algorithms::derive_escrow_address;
use crate::domain::{Address, ChannelId, PortId, TransferError, ZERO_ADDRESS};
use crate::ports::inbound::Owned;
use crate::ports::outbound::EscrowResolver;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

/// Channel escrow registry.
///
/// Setting an address never moves funds. Re-setting overwrites without
/// migrating the balance held by the previous account.
pub struct EscrowRegistry {
    ownership: Ownership,
    escrows: RwLock<HashMap<ChannelId, Address>>,
}

impl EscrowRegistry {
    /// Create an empty registry owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            ownership: Ownership::new(owner),
            escrows: RwLock::new(HashMap::new()),
        }
    }

    /// Point `channel` at `address`. Owner-only.
    ///
    /// The zero address reads back as "not configured".
    pub fn set_escrow_address(
        &self,
        caller: &Address,
        channel: ChannelId,
        address: Address,
    ) -> Result<(), TransferError> {
        self.ownership.ensure_owner(caller)?;

        info!(
            "[ics20] Escrow for channel '{}' set to 0x{}",
            channel,
            hex::encode(address)
        );
        self.escrows.write().insert(channel, address);
        Ok(())
    }

    /// Point `channel` at the deterministic escrow of `port/channel`.
    /// Owner-only. Returns the derived address.
    pub fn set_derived_escrow_address(
        &self,
        caller: &Address,
        port: &PortId,
        channel: ChannelId,
    ) -> Result<Address, TransferError> {
        let address = derive_escrow_address(port, &channel);
        self.set_escrow_address(caller, channel, address)?;
        Ok(address)
    }
}

impl EscrowResolver for EscrowRegistry {
    fn escrow_address(&self, channel: &ChannelId) -> Option<Address> {
        self.escrows
            .read()
            .get(channel)
            .copied()
            .filter(|address| *address != ZERO_ADDRESS)
    }
}

impl Owned for EscrowRegistry {
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
