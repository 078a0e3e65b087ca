//! # Domain Value Objects
//!
//! Immutable value types for the ICS20 transfer module: port and channel
//! identifiers, denomination traces, packet parties and timeout heights.

use super::errors::{Address, DecodeError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Separator between trace segments in a denomination string.
pub const DENOM_SEPARATOR: char = '/';

/// Prefix of hashed IBC denominations.
pub const IBC_DENOM_PREFIX: &str = "ibc";

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier. Any string, including the empty one, is accepted.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

identifier!(
    /// Port identifier (opaque).
    PortId
);

identifier!(
    /// Channel identifier (opaque).
    ChannelId
);

/// One `port/channel` hop of a denomination trace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TracePrefix {
    /// Port of the hop.
    pub port_id: PortId,
    /// Channel of the hop.
    pub channel_id: ChannelId,
}

impl TracePrefix {
    /// Create a prefix for the given port and channel.
    pub fn new(port_id: PortId, channel_id: ChannelId) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }

    /// The `port/channel/` string a denomination starts with when it
    /// carries this hop.
    pub fn as_denom_prefix(&self) -> String {
        format!(
            "{}{}{}{}",
            self.port_id, DENOM_SEPARATOR, self.channel_id, DENOM_SEPARATOR
        )
    }
}

impl fmt::Display for TracePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.port_id, DENOM_SEPARATOR, self.channel_id)
    }
}

/// A denomination split into its hops and base token identifier.
///
/// `"transfer/channel-0/transfer/channel-7/USDT"` parses into the trace
/// `[transfer/channel-0, transfer/channel-7]` and the base `USDT`. Segments
/// are consumed in pairs while at least one segment remains for the base,
/// so `"gamm/pool"` stays a bare base denomination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DenomTrace {
    /// Hops, outermost (most recent) first.
    pub trace_path: Vec<TracePrefix>,
    /// Base token identifier.
    pub base_denom: String,
}

impl DenomTrace {
    /// Parse a full denomination string.
    pub fn parse(denom: &str) -> Self {
        let segments: Vec<&str> = denom.split(DENOM_SEPARATOR).collect();
        let mut trace_path = Vec::new();
        let mut idx = 0;
        while segments.len() - idx >= 3 {
            trace_path.push(TracePrefix::new(
                PortId::new(segments[idx]),
                ChannelId::new(segments[idx + 1]),
            ));
            idx += 2;
        }
        let base_denom = segments[idx..].join("/");
        Self {
            trace_path,
            base_denom,
        }
    }

    /// True when the token has not crossed any channel.
    pub fn is_native(&self) -> bool {
        self.trace_path.is_empty()
    }

    /// True when the outermost hop equals `prefix`.
    pub fn has_prefix(&self, prefix: &TracePrefix) -> bool {
        self.trace_path.first() == Some(prefix)
    }

    /// Prepend a hop.
    pub fn add_prefix(&mut self, prefix: TracePrefix) {
        self.trace_path.insert(0, prefix);
    }

    /// Drop the outermost hop if it equals `prefix`. Returns whether it did.
    pub fn remove_prefix(&mut self, prefix: &TracePrefix) -> bool {
        if self.has_prefix(prefix) {
            self.trace_path.remove(0);
            true
        } else {
            false
        }
    }

    /// The trace path alone, e.g. `"transfer/channel-0"`.
    pub fn path(&self) -> String {
        self.trace_path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Hashed form `ibc/{SHA256}` for traced tokens, the base otherwise.
    pub fn ibc_denom(&self) -> String {
        if self.is_native() {
            return self.base_denom.clone();
        }
        let digest = Sha256::digest(self.to_string().as_bytes());
        format!("{}/{}", IBC_DENOM_PREFIX, hex::encode_upper(digest))
    }
}

impl fmt::Display for DenomTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prefix in &self.trace_path {
            write!(f, "{}{}", prefix, DENOM_SEPARATOR)?;
        }
        f.write_str(&self.base_denom)
    }
}

/// Sender or receiver as carried in packet data.
///
/// Local accounts are rendered as `0x`-prefixed lowercase hex; remote
/// accounts may be any string (bech32 and the like).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signer(String);

impl Signer {
    /// Wrap a raw party string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Render a local account.
    pub fn from_address(address: &Address) -> Self {
        Self(format!("0x{}", hex::encode(address)))
    }

    /// Borrow the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for an empty party.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve to a local account.
    pub fn to_address(&self) -> Result<Address, DecodeError> {
        let digits = self
            .0
            .strip_prefix("0x")
            .or_else(|| self.0.strip_prefix("0X"))
            .ok_or_else(|| DecodeError::BadAddress(self.0.clone()))?;
        let bytes = hex::decode(digits).map_err(|_| DecodeError::BadAddress(self.0.clone()))?;
        bytes
            .try_into()
            .map_err(|_| DecodeError::BadAddress(self.0.clone()))
    }
}

impl fmt::Display for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Signer {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Signer {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Packet timeout height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Height {
    /// Revision (chain upgrade epoch).
    pub revision_number: u64,
    /// Block height within the revision.
    pub revision_height: u64,
}

impl Height {
    /// Create a height.
    pub fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// Height timeout disabled.
    pub fn zero() -> Self {
        Self::default()
    }

    /// True when the height timeout is disabled.
    pub fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}
