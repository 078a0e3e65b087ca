//! # Transfer Module Configuration
//!
//! Runtime switches of the transfer application, loaded from TOML.
//!
//! ```toml
//! [transfer]
//! transport = "0x00000000000000000000000000000000000000a1"
//! receive_enabled = true
//! send_enabled = true
//! payload_encoding = "abi-address"   # abi-address | abi-bytes | json
//! release_unprefixed = false
//! ```

use crate::algorithms::PayloadEncoding;
use crate::domain::{Address, Signer};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read config file '{path}': {error}")]
    Io {
        /// Config file path
        path: String,
        /// Underlying error
        error: String,
    },

    /// File is not valid TOML or misses a required field.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Principal is not a `0x`-prefixed 20-byte hex address.
    #[error("Invalid address for '{field}': {value}")]
    InvalidAddress {
        /// Config key
        field: String,
        /// Rejected value
        value: String,
    },
}

/// Transfer application configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferConfig {
    /// Trusted transport principal allowed to deliver packet callbacks.
    pub transport: Address,
    /// Accept inbound transfers.
    pub receive_enabled: bool,
    /// Accept outbound transfers.
    pub send_enabled: bool,
    /// Wire profile of the packet payload.
    pub payload_encoding: PayloadEncoding,
    /// Strip the returning hop before releasing from escrow.
    pub release_unprefixed: bool,
}

impl TransferConfig {
    /// Defaults for everything except the transport principal.
    pub fn new(transport: Address) -> Self {
        Self {
            transport,
            receive_enabled: true,
            send_enabled: true,
            payload_encoding: PayloadEncoding::default(),
            release_unprefixed: false,
        }
    }

    /// Use the given payload profile.
    #[must_use]
    pub fn with_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.payload_encoding = encoding;
        self
    }

    /// Release escrowed tokens under their unprefixed name.
    #[must_use]
    pub fn with_release_unprefixed(mut self, release_unprefixed: bool) -> Self {
        self.release_unprefixed = release_unprefixed;
        self
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let tc = file.transfer;

        let transport = Signer::new(tc.transport.as_str())
            .to_address()
            .map_err(|_| ConfigError::InvalidAddress {
                field: "transport".to_string(),
                value: tc.transport.clone(),
            })?;

        let defaults = Self::new(transport);
        Ok(Self {
            transport,
            receive_enabled: tc.receive_enabled.unwrap_or(defaults.receive_enabled),
            send_enabled: tc.send_enabled.unwrap_or(defaults.send_enabled),
            payload_encoding: tc.payload_encoding.unwrap_or(defaults.payload_encoding),
            release_unprefixed: tc.release_unprefixed.unwrap_or(defaults.release_unprefixed),
        })
    }
}

/// Configuration file structure.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    transfer: TransferSection,
}

#[derive(Debug, Deserialize)]
struct TransferSection {
    transport: String,
    receive_enabled: Option<bool>,
    send_enabled: Option<bool>,
    payload_encoding: Option<PayloadEncoding>,
    release_unprefixed: Option<bool>,
}
