//! # Inbound Ports
//!
//! What the transfer module offers to the transport and to administrators.

use crate::domain::{Address, MsgTransfer, Packet, TransferError, TransferEvent};

/// Result of a successful `send_transfer`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentPacket {
    /// Packet to hand to the transport.
    pub packet: Packet,
    /// Ledger debit of the sender (escrow transfer or burn).
    pub event: TransferEvent,
}

/// Packet lifecycle callbacks - inbound port.
///
/// Every call takes the caller principal explicitly. The three lifecycle
/// callbacks are transport-only; `send_transfer` debits the caller.
pub trait TransferModule: Send + Sync {
    /// Credit the receiver of an inbound packet, by escrow release or by
    /// voucher mint.
    fn on_recv_packet(
        &self,
        caller: &Address,
        packet: &Packet,
        relayer: &Address,
    ) -> Result<TransferEvent, TransferError>;

    /// Settle an outgoing packet. A failure acknowledgement refunds the
    /// sender; a success acknowledgement returns `None`.
    fn on_acknowledgement_packet(
        &self,
        caller: &Address,
        packet: &Packet,
        acknowledgement: &[u8],
        relayer: &Address,
    ) -> Result<Option<TransferEvent>, TransferError>;

    /// Refund the sender of an expired outgoing packet.
    fn on_timeout_packet(
        &self,
        caller: &Address,
        packet: &Packet,
        relayer: &Address,
    ) -> Result<TransferEvent, TransferError>;

    /// Debit the caller and build the outgoing packet.
    fn send_transfer(&self, caller: &Address, msg: MsgTransfer)
        -> Result<SentPacket, TransferError>;
}

/// Owner-administered component - inbound port.
pub trait Owned {
    /// Current owner.
    fn owner(&self) -> Address;

    /// Hand ownership to `new_owner`. Owner-only.
    fn transfer_ownership(&self, caller: &Address, new_owner: Address)
        -> Result<(), TransferError>;
}
