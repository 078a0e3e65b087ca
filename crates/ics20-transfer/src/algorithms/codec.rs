//! # Packet Data Codec
//!
//! Decodes and encodes `FungibleTokenPacketData` in the three wire profiles
//! a deployment may use.
//!
//! | Profile | Layout |
//! |---------|--------|
//! | `abi-address` | `(string, uint256, string, address, string)` |
//! | `abi-bytes` | `(string, uint256, bytes, bytes, string)` |
//! | `json` | `{"denom","amount","sender","receiver","memo"}` |
//!
//! Every profile rejects a zero amount. In `abi-bytes` a party is written
//! as its raw 20 address bytes only when those bytes cannot be mistaken for
//! text; every other party travels as UTF-8.

use crate::domain::{invariant_positive_amount, Amount, DecodeError, FungibleTokenPacketData, Signer};
use ethabi::{ParamType, Token};
use serde::{Deserialize, Serialize};

/// Length of a local account address.
const ADDRESS_LEN: usize = 20;

/// Wire profile of the packet payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadEncoding {
    /// ABI tuple, sender as `string`, receiver as `address`.
    #[default]
    AbiAddress,
    /// ABI tuple, sender and receiver as `bytes`.
    AbiBytes,
    /// Canonical ICS20 JSON object, amount as a decimal string.
    Json,
}

/// JSON form of the payload. Every field is optional so that each missing
/// field surfaces its own error.
#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonPacketData {
    #[serde(default)]
    denom: Option<String>,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memo: Option<String>,
}

/// Payload codec for a fixed wire profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PacketDataCodec {
    encoding: PayloadEncoding,
}

impl PacketDataCodec {
    /// Create a codec for `encoding`.
    pub fn new(encoding: PayloadEncoding) -> Self {
        Self { encoding }
    }

    /// Wire profile of this codec.
    pub fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    /// Decode packet data.
    pub fn decode(&self, data: &[u8]) -> Result<FungibleTokenPacketData, DecodeError> {
        let decoded = match self.encoding {
            PayloadEncoding::AbiAddress => decode_abi(data, false)?,
            PayloadEncoding::AbiBytes => decode_abi(data, true)?,
            PayloadEncoding::Json => decode_json(data)?,
        };
        invariant_positive_amount(decoded.amount)?;
        Ok(decoded)
    }

    /// Encode packet data.
    ///
    /// Fails when a party cannot be represented in this profile, e.g. a
    /// non-hex receiver in `abi-address`.
    pub fn encode(&self, data: &FungibleTokenPacketData) -> Result<Vec<u8>, DecodeError> {
        invariant_positive_amount(data.amount)?;
        match self.encoding {
            PayloadEncoding::AbiAddress => encode_abi(data, false),
            PayloadEncoding::AbiBytes => encode_abi(data, true),
            PayloadEncoding::Json => encode_json(data),
        }
    }
}

fn abi_layout(bytes_parties: bool) -> ParamType {
    let (sender, receiver) = if bytes_parties {
        (ParamType::Bytes, ParamType::Bytes)
    } else {
        (ParamType::String, ParamType::Address)
    };
    ParamType::Tuple(vec![
        ParamType::String,
        ParamType::Uint(256),
        sender,
        receiver,
        ParamType::String,
    ])
}

fn decode_abi(data: &[u8], bytes_parties: bool) -> Result<FungibleTokenPacketData, DecodeError> {
    let mut tokens = ethabi::decode(&[abi_layout(bytes_parties)], data)
        .map_err(|e| DecodeError::Abi(e.to_string()))?;

    let fields = match tokens.pop() {
        Some(Token::Tuple(fields)) if tokens.is_empty() && fields.len() == 5 => fields,
        other => return Err(DecodeError::UnexpectedShape(format!("{:?}", other))),
    };
    let mut fields = fields.into_iter();

    let denom = match fields.next() {
        Some(Token::String(denom)) => denom,
        other => return Err(DecodeError::UnexpectedShape(format!("denom {:?}", other))),
    };
    let amount = match fields.next() {
        Some(Token::Uint(value)) => {
            let mut buf = [0u8; 32];
            value.to_big_endian(&mut buf);
            Amount::from_big_endian(&buf)
        }
        other => return Err(DecodeError::UnexpectedShape(format!("amount {:?}", other))),
    };
    let sender = party_from_token(fields.next())?;
    let receiver = party_from_token(fields.next())?;
    let memo = match fields.next() {
        Some(Token::String(memo)) => memo,
        other => return Err(DecodeError::UnexpectedShape(format!("memo {:?}", other))),
    };

    if denom.is_empty() {
        return Err(DecodeError::DenomNotFound);
    }

    Ok(FungibleTokenPacketData {
        denom,
        amount,
        sender,
        receiver,
        memo,
    })
}

fn party_from_token(token: Option<Token>) -> Result<Signer, DecodeError> {
    match token {
        Some(Token::String(s)) => Ok(Signer::new(s)),
        Some(Token::Address(address)) => Ok(Signer::from_address(&address.0)),
        Some(Token::Bytes(bytes)) => party_from_bytes(bytes),
        other => Err(DecodeError::UnexpectedShape(format!("party {:?}", other))),
    }
}

/// True when `bytes` are UTF-8 without control characters.
fn reads_as_text(bytes: &[u8]) -> bool {
    std::str::from_utf8(bytes).map_or(false, |s| !s.chars().any(char::is_control))
}

/// A 20-byte party that does not read as text is a local account,
/// anything else is a UTF-8 string.
fn party_from_bytes(bytes: Vec<u8>) -> Result<Signer, DecodeError> {
    if bytes.len() == ADDRESS_LEN && !reads_as_text(&bytes) {
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&bytes);
        return Ok(Signer::from_address(&address));
    }
    String::from_utf8(bytes)
        .map(Signer::new)
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Inverse of [`party_from_bytes`]. An address whose raw bytes happen to
/// read as text is written in its `0x` form instead.
fn party_to_bytes(party: &Signer) -> Result<Vec<u8>, DecodeError> {
    let text = party.as_str().as_bytes();
    match party.to_address() {
        Ok(address) if !reads_as_text(&address) => Ok(address.to_vec()),
        Ok(_) => Ok(text.to_vec()),
        Err(_) if text.len() == ADDRESS_LEN && !reads_as_text(text) => {
            Err(DecodeError::AmbiguousParty(party.as_str().to_string()))
        }
        Err(_) => Ok(text.to_vec()),
    }
}

fn encode_abi(data: &FungibleTokenPacketData, bytes_parties: bool) -> Result<Vec<u8>, DecodeError> {
    let mut buf = [0u8; 32];
    data.amount.to_big_endian(&mut buf);
    let amount = ethabi::Uint::from_big_endian(&buf);

    let (sender, receiver) = if bytes_parties {
        (
            Token::Bytes(party_to_bytes(&data.sender)?),
            Token::Bytes(party_to_bytes(&data.receiver)?),
        )
    } else {
        let receiver = data.receiver.to_address()?;
        (
            Token::String(data.sender.as_str().to_string()),
            Token::Address(ethabi::Address::from(receiver)),
        )
    };

    Ok(ethabi::encode(&[Token::Tuple(vec![
        Token::String(data.denom.clone()),
        Token::Uint(amount),
        sender,
        receiver,
        Token::String(data.memo.clone()),
    ])]))
}

fn decode_json(data: &[u8]) -> Result<FungibleTokenPacketData, DecodeError> {
    let raw: JsonPacketData =
        serde_json::from_slice(data).map_err(|e| DecodeError::Json(e.to_string()))?;

    let denom = non_empty(raw.denom).ok_or(DecodeError::DenomNotFound)?;
    let amount_str = non_empty(raw.amount).ok_or(DecodeError::AmountNotFound)?;
    let amount = Amount::from_dec_str(&amount_str)
        .map_err(|_| DecodeError::AmountFormat(amount_str.clone()))?;
    let sender = non_empty(raw.sender).ok_or(DecodeError::SenderNotFound)?;
    let receiver = non_empty(raw.receiver).ok_or(DecodeError::ReceiverNotFound)?;

    Ok(FungibleTokenPacketData {
        denom,
        amount,
        sender: Signer::new(sender),
        receiver: Signer::new(receiver),
        memo: raw.memo.unwrap_or_default(),
    })
}

fn encode_json(data: &FungibleTokenPacketData) -> Result<Vec<u8>, DecodeError> {
    let raw = JsonPacketData {
        denom: Some(data.denom.clone()),
        amount: Some(data.amount.to_string()),
        sender: Some(data.sender.as_str().to_string()),
        receiver: Some(data.receiver.as_str().to_string()),
        memo: (!data.memo.is_empty()).then(|| data.memo.clone()),
    };
    serde_json::to_vec(&raw).map_err(|e| DecodeError::Json(e.to_string()))
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}
