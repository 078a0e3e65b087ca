//! # Domain Errors
//!
//! Error types for the ICS20 transfer module.

use primitive_types::U256;
use std::fmt;
use thiserror::Error;

/// Account address type (20-byte).
pub type Address = [u8; 20];

/// The zero address. Source of every mint, sink of every burn.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Token amount (unsigned 256-bit).
pub type Amount = U256;

/// Privileged role a caller was checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The trusted IBC transport (packet handler).
    Transport,
    /// Administrator of an owned component.
    Owner,
    /// The single caller allowed to move ledger balances.
    Operator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Transport => "transport",
            Role::Owner => "owner",
            Role::Operator => "operator",
        };
        f.write_str(name)
    }
}

/// Packet payload decoding errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// ABI tuple could not be decoded.
    #[error("bad abi data: {0}")]
    Abi(String),

    /// JSON object could not be decoded.
    #[error("bad json data: {0}")]
    Json(String),

    /// ABI tokens did not have the expected tuple shape.
    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),

    /// Denomination missing or empty.
    #[error("denom not found")]
    DenomNotFound,

    /// Amount missing or empty.
    #[error("amount not found")]
    AmountNotFound,

    /// Amount is not a 256-bit decimal integer.
    #[error("amount has unknown format: {0}")]
    AmountFormat(String),

    /// Amount is zero.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// Sender missing or empty.
    #[error("sender not found")]
    SenderNotFound,

    /// Receiver missing or empty.
    #[error("receiver not found")]
    ReceiverNotFound,

    /// Party is not a `0x`-prefixed 20-byte hex address.
    #[error("bad address: {0}")]
    BadAddress(String),

    /// Byte-string party is neither 20 bytes nor UTF-8.
    #[error("party bytes are not valid utf-8")]
    InvalidUtf8,

    /// 20-byte party that would read back as an address.
    #[error("party '{0}' cannot be told apart from a raw address")]
    AmbiguousParty(String),
}

/// Transfer module error types.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Caller does not hold the required role.
    #[error("Unauthorized: 0x{} is not the {role}", hex::encode(.caller))]
    Unauthorized {
        /// Rejected caller
        caller: Address,
        /// Role the call requires
        role: Role,
    },

    /// Packet data failed to decode.
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] DecodeError),

    /// Escrow missing or holding less than the released amount.
    #[error("Insufficient escrow balance on channel '{channel}' for {denom}: required {required}, available {available}")]
    InsufficientEscrowBalance {
        /// Channel whose escrow was consulted
        channel: String,
        /// Released denomination
        denom: String,
        /// Amount to release
        required: Amount,
        /// Escrow balance
        available: Amount,
    },

    /// Account balance below the debited amount.
    #[error("insufficient balance for transfer: 0x{} holds {available} {denom}, required {required}", hex::encode(.account))]
    InsufficientBalance {
        /// Debited account
        account: Address,
        /// Denomination
        denom: String,
        /// Amount to debit
        required: Amount,
        /// Current balance
        available: Amount,
    },

    /// Mint would exceed the representable balance.
    #[error("Balance overflow: 0x{} {denom}", hex::encode(.account))]
    Overflow {
        /// Credited account
        account: Address,
        /// Denomination
        denom: String,
    },

    /// Inbound transfers are disabled.
    #[error("Receive disabled")]
    ReceiveDisabled,

    /// Outbound transfers are disabled.
    #[error("Send disabled")]
    SendDisabled,

    /// Packet targets a port other than the bound one.
    #[error("Invalid port: expected '{expected}', got '{got}'")]
    InvalidPort {
        /// Bound port
        expected: String,
        /// Port on the packet
        got: String,
    },

    /// No counterparty registered for the channel.
    #[error("Channel not found: {port}/{channel}")]
    ChannelNotFound {
        /// Port identifier
        port: String,
        /// Channel identifier
        channel: String,
    },

    /// Native token sent over a channel with no escrow account.
    #[error("Escrow not configured for channel '{channel}'")]
    EscrowNotConfigured {
        /// Channel identifier
        channel: String,
    },

    /// Acknowledgement or timeout for a packet that was already settled.
    #[error("Packet {port}/{channel}#{sequence} already settled")]
    PacketAlreadySettled {
        /// Source port
        port: String,
        /// Source channel
        channel: String,
        /// Packet sequence
        sequence: u64,
    },
}

impl TransferError {
    /// Short label for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            TransferError::Unauthorized { .. } => "unauthorized",
            TransferError::MalformedPayload(_) => "malformed_payload",
            TransferError::InsufficientEscrowBalance { .. } => "insufficient_escrow_balance",
            TransferError::InsufficientBalance { .. } => "insufficient_balance",
            TransferError::Overflow { .. } => "overflow",
            TransferError::ReceiveDisabled => "receive_disabled",
            TransferError::SendDisabled => "send_disabled",
            TransferError::InvalidPort { .. } => "invalid_port",
            TransferError::ChannelNotFound { .. } => "channel_not_found",
            TransferError::EscrowNotConfigured { .. } => "escrow_not_configured",
            TransferError::PacketAlreadySettled { .. } => "packet_already_settled",
        }
    }
}
