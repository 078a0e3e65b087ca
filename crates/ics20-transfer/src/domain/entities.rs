//! # Domain Entities
//!
//! Packets, their decoded payload, acknowledgements, ledger events and the
//! record kept for every outgoing transfer until it settles.

use super::errors::{Address, Amount, TransferError, ZERO_ADDRESS};
use super::value_objects::{ChannelId, Height, PortId, Signer};
use serde::{Deserialize, Serialize};

/// Prefix of every error acknowledgement written by this module.
pub const ACK_ERR_STR: &str = "error handling packet on destination chain: see events for details";

/// Base64 of `0x01`, the success acknowledgement result.
pub const ACK_SUCCESS_B64: &[u8] = b"AQ==";

/// Raw success result the transport commits for a delivered packet.
pub const ACK_SUCCESS_RAW: &[u8] = &[0x01];

/// An IBC packet as delivered by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Per-channel send sequence.
    pub sequence: u64,
    /// Port on the sending chain.
    pub source_port: PortId,
    /// Channel on the sending chain.
    pub source_channel: ChannelId,
    /// Port on the receiving chain.
    pub destination_port: PortId,
    /// Channel on the receiving chain.
    pub destination_channel: ChannelId,
    /// Encoded `FungibleTokenPacketData`.
    pub data: Vec<u8>,
    /// Height timeout (zero disables).
    pub timeout_height: Height,
    /// Timestamp timeout in nanoseconds (zero disables).
    pub timeout_timestamp: u64,
}

impl Packet {
    /// Identity of this packet.
    pub fn id(&self) -> PacketId {
        PacketId {
            source_port: self.source_port.clone(),
            source_channel: self.source_channel.clone(),
            destination_port: self.destination_port.clone(),
            destination_channel: self.destination_channel.clone(),
            sequence: self.sequence,
        }
    }
}

/// Packet identity: both channel ends plus the sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PacketId {
    /// Port on the sending chain.
    pub source_port: PortId,
    /// Channel on the sending chain.
    pub source_channel: ChannelId,
    /// Port on the receiving chain.
    pub destination_port: PortId,
    /// Channel on the receiving chain.
    pub destination_channel: ChannelId,
    /// Per-channel send sequence.
    pub sequence: u64,
}

/// Decoded ICS20 packet payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleTokenPacketData {
    /// Full denomination, trace included.
    pub denom: String,
    /// Amount, always positive once decoded.
    pub amount: Amount,
    /// Account debited on the sending chain.
    pub sender: Signer,
    /// Account credited on the receiving chain.
    pub receiver: Signer,
    /// Free-form memo, never interpreted.
    pub memo: String,
}

/// Ledger state change, the externally visible proof of a mint, burn or
/// transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    /// Debited account, zero for a mint.
    pub from: Address,
    /// Credited account, zero for a burn.
    pub to: Address,
    /// Denomination moved.
    pub denom: String,
    /// Amount moved.
    pub amount: Amount,
}

impl TransferEvent {
    /// Event of a mint to `to`.
    pub fn mint(to: Address, denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            from: ZERO_ADDRESS,
            to,
            denom: denom.into(),
            amount,
        }
    }

    /// Event of a burn from `from`.
    pub fn burn(from: Address, denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            from,
            to: ZERO_ADDRESS,
            denom: denom.into(),
            amount,
        }
    }

    /// Event of a transfer between two accounts.
    pub fn transfer(from: Address, to: Address, denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            from,
            to,
            denom: denom.into(),
            amount,
        }
    }

    /// True for a mint.
    pub fn is_mint(&self) -> bool {
        self.from == ZERO_ADDRESS
    }

    /// True for a burn.
    pub fn is_burn(&self) -> bool {
        self.to == ZERO_ADDRESS
    }
}

/// Request to send tokens to another chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransfer {
    /// Local port the packet leaves from.
    pub source_port: PortId,
    /// Local channel the packet leaves from.
    pub source_channel: ChannelId,
    /// Full denomination held by the sender.
    pub denom: String,
    /// Amount to send.
    pub amount: Amount,
    /// Account on the counterparty chain.
    pub receiver: Signer,
    /// Free-form memo.
    pub memo: String,
    /// Height timeout (zero disables).
    pub timeout_height: Height,
    /// Timestamp timeout in nanoseconds (zero disables).
    pub timeout_timestamp: u64,
}

/// How an outgoing transfer debited its sender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Debit {
    /// Native token moved into the channel escrow.
    Escrowed {
        /// Escrow account holding the tokens.
        escrow: Address,
    },
    /// Voucher burned on its way back to its origin.
    Burned,
}

/// Outgoing transfer awaiting acknowledgement or timeout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlightTransfer {
    /// Debited account.
    pub sender: Address,
    /// Denomination debited.
    pub denom: String,
    /// Amount debited.
    pub amount: Amount,
    /// Mechanism a refund must mirror.
    pub debit: Debit,
}

/// ICS20 acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Acknowledgement {
    /// Raw success acknowledgement bytes.
    Success(Vec<u8>),
    /// Error acknowledgement text.
    Error(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum AckJson {
    Result(String),
    Error(String),
}

impl Acknowledgement {
    /// The success acknowledgement `{"result":"AQ=="}`.
    pub fn success() -> Self {
        Self::Success(br#"{"result":"AQ=="}"#.to_vec())
    }

    /// Error acknowledgement for a failed receive.
    pub fn from_error(err: &TransferError) -> Self {
        Self::Error(format!("{}: {}", ACK_ERR_STR, err))
    }

    /// Parse acknowledgement bytes written by the counterparty.
    ///
    /// Anything not recognizably a success is treated as a failure.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<AckJson>(bytes) {
            Ok(AckJson::Result(_)) => Self::Success(bytes.to_vec()),
            Ok(AckJson::Error(msg)) => Self::Error(msg),
            Err(_) if bytes == ACK_SUCCESS_RAW || bytes == ACK_SUCCESS_B64 => {
                Self::Success(bytes.to_vec())
            }
            Err(_) => Self::Error(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Encode as the JSON object the transport commits to.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Success(bytes) => bytes.clone(),
            Self::Error(msg) => serde_json::json!({ "error": msg }).to_string().into_bytes(),
        }
    }

    /// True for a success acknowledgement.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
