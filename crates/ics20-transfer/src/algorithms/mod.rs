//! # Algorithms Module
//!
//! Denomination classification, escrow address derivation and the packet
//! payload codec.

pub mod codec;
pub mod denom;

pub use codec::{PacketDataCodec, PayloadEncoding};
pub use denom::{
    classify, derive_escrow_address, is_source_chain, sender_chain_is_source,
    unprefixed_denomination, voucher_denomination, DenomClass, ICS20_VERSION,
};
