//! Single-owner access control shared by the administered adapters.

use crate::domain::{invariant_authorized, Address, Role, TransferError};
use parking_lot::RwLock;
use tracing::info;

/// Owner slot of an administered component.
#[derive(Debug)]
pub struct Ownership {
    owner: RwLock<Address>,
}

impl Ownership {
    /// Start owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            owner: RwLock::new(owner),
        }
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        *self.owner.read()
    }

    /// Fail with `Unauthorized` unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), TransferError> {
        invariant_authorized(caller, &self.owner.read(), Role::Owner)
    }

    /// Hand ownership over. Owner-only.
    pub fn transfer(&self, caller: &Address, new_owner: Address) -> Result<(), TransferError> {
        let mut owner = self.owner.write();
        invariant_authorized(caller, &owner, Role::Owner)?;
        info!(
            "[ics20] Ownership transferred 0x{} -> 0x{}",
            hex::encode(*owner),
            hex::encode(new_owner)
        );
        *owner = new_owner;
        Ok(())
    }
}
