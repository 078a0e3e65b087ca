//! # ICS20 Transfer Module
//!
//! Fungible token transfer application: the mint/burn/escrow decision engine
//! driven by packet lifecycle callbacks.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! For every packet delivered by the transport, decide which single ledger
//! mutation keeps total supply conserved across chains:
//! - Tokens returning over the channel they left by are released from escrow
//! - Tokens moving further from their origin are minted as vouchers
//! - Failed or expired outgoing transfers are refunded the way they were debited
//!
//! ## Security
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Transport gate | Packet callbacks accept only the configured transport principal |
//! | Operator gate | Ledger mutations accept only the configured operator |
//! | Owner gate | Escrow, channel and operator configuration are owner-only |
//! | Atomic callbacks | Every check precedes the single ledger mutation |
//!
//! ## Module Structure
//!
//! ```text
//! ics20-transfer/
//! ├── domain/          # Packet, DenomTrace, Acknowledgement, errors, invariants
//! ├── algorithms/      # Denomination classification, payload codec
//! ├── ports/           # TransferModule, TokenLedger, EscrowResolver, ChannelReader
//! ├── adapters/        # In-memory ledger, escrow and channel registries
//! ├── config.rs        # TOML configuration
//! └── service.rs       # TransferApplication
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{EscrowRegistry, InMemoryChannelRegistry, InMemoryLedger, Ownership};
pub use algorithms::{
    classify, derive_escrow_address, is_source_chain, sender_chain_is_source,
    unprefixed_denomination, voucher_denomination, DenomClass, PacketDataCodec, PayloadEncoding,
};
pub use config::{ConfigError, TransferConfig};
pub use domain::{
    Acknowledgement, Address, Amount, ChannelId, DecodeError, Debit, DenomTrace,
    FungibleTokenPacketData, Height, InFlightTransfer, MsgTransfer, Packet, PacketId, PortId,
    Role, Signer, TracePrefix, TransferError, TransferEvent, ACK_SUCCESS_RAW, ZERO_ADDRESS,
};
pub use ports::{
    ChannelReader, EscrowResolver, MockChannelReader, MockEscrowResolver, Owned, SentPacket,
    TokenLedger, TransferModule,
};
pub use service::TransferApplication;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
