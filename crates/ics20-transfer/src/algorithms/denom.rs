//! # Denomination Trace Resolution
//!
//! Classifies the denomination of a packet against the hop it travelled
//! over and derives the denomination credited on the receiving side.
//!
//! Every decision here is a single prefix test or prepend. Multi-hop
//! traces are never normalized: each chain only looks at its own
//! immediate port/channel pair.

use crate::domain::{Address, ChannelId, PortId, TracePrefix};
use sha2::{Digest, Sha256};

/// Version string mixed into derived escrow addresses.
pub const ICS20_VERSION: &str = "ics20-1";

/// What a receiving chain must do with an inbound denomination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenomClass {
    /// Token returning to its origin: release from escrow.
    NativeReturning,
    /// Token moving away from its origin: mint a voucher.
    ForwardedVoucher,
}

/// True when `denom` carries the `source_port/source_channel/` hop, i.e.
/// the local chain is the origin of a token arriving over that hop.
///
/// Pure: depends only on its three inputs.
pub fn is_source_chain(source_port: &PortId, source_channel: &ChannelId, denom: &str) -> bool {
    let prefix = TracePrefix::new(source_port.clone(), source_channel.clone());
    denom.starts_with(&prefix.as_denom_prefix())
}

/// Send-side view of the same test: the sending chain is the origin of
/// `denom` when the denomination does not carry the outgoing hop.
pub fn sender_chain_is_source(
    source_port: &PortId,
    source_channel: &ChannelId,
    denom: &str,
) -> bool {
    !is_source_chain(source_port, source_channel, denom)
}

/// Classify an inbound denomination.
pub fn classify(source_port: &PortId, source_channel: &ChannelId, denom: &str) -> DenomClass {
    if is_source_chain(source_port, source_channel, denom) {
        DenomClass::NativeReturning
    } else {
        DenomClass::ForwardedVoucher
    }
}

/// Denomination minted on the receiving chain for a forwarded token.
pub fn voucher_denomination(
    destination_port: &PortId,
    destination_channel: &ChannelId,
    denom: &str,
) -> String {
    let prefix = TracePrefix::new(destination_port.clone(), destination_channel.clone());
    format!("{}{}", prefix.as_denom_prefix(), denom)
}

/// `denom` without its `port/channel/` hop, if it carries it.
pub fn unprefixed_denomination<'a>(
    port: &PortId,
    channel: &ChannelId,
    denom: &'a str,
) -> Option<&'a str> {
    let prefix = TracePrefix::new(port.clone(), channel.clone());
    denom.strip_prefix(prefix.as_denom_prefix().as_str())
}

/// Deterministic escrow account for a port/channel pair.
///
/// First 20 bytes of `SHA-256(version || 0x00 || "port/channel")`, the
/// ADR-028 module-account scheme.
pub fn derive_escrow_address(port: &PortId, channel: &ChannelId) -> Address {
    let contents = format!("{}/{}", port, channel);

    let mut hasher = Sha256::new();
    hasher.update(ICS20_VERSION.as_bytes());
    hasher.update([0u8]);
    hasher.update(contents.as_bytes());
    let digest = hasher.finalize();

    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[..20]);
    address
}
