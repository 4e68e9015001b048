//! Shared types for the signing engine
//!
//! Data structures that cross module boundaries are defined here
//! for consistent serialization.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SignerError, SignerResult};

// =============================================================================
// Network Types
// =============================================================================

/// Shelley network ids as carried in the address header
pub mod network_ids {
    pub const TESTNET: u8 = 0;
    pub const MAINNET: u8 = 1;
}

/// Byron protocol magics
pub mod protocol_magics {
    pub const MAINNET: u32 = 764_824_073;
    pub const TESTNET: u32 = 1_097_911_063;
}

/// Cardano network the transaction is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    #[serde(rename = "networkId")]
    pub network_id: u8,
    #[serde(rename = "protocolMagic")]
    pub protocol_magic: u32,
}

impl Network {
    pub const MAINNET: Network = Network {
        network_id: network_ids::MAINNET,
        protocol_magic: protocol_magics::MAINNET,
    };

    pub fn mainnet() -> Self {
        Self::MAINNET
    }

    pub fn testnet(protocol_magic: u32) -> Self {
        Self {
            network_id: network_ids::TESTNET,
            protocol_magic,
        }
    }

    pub fn is_mainnet(&self) -> bool {
        self.network_id == network_ids::MAINNET
    }

    /// Parse a network name the way the command line accepts it
    ///
    /// `"mainnet"` takes no magic; `"testnet"` uses the given magic or the
    /// legacy public testnet magic when none is given.
    pub fn parse(name: &str, magic: Option<&str>) -> SignerResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::mainnet()),
            "testnet" => {
                let protocol_magic = match magic {
                    Some(m) => m.trim().parse::<u32>().map_err(|e| {
                        SignerError::InvalidConfig(format!("invalid testnet magic '{}': {}", m, e))
                    })?,
                    None => protocol_magics::TESTNET,
                };
                Ok(Self::testnet(protocol_magic))
            }
            other => Err(SignerError::InvalidConfig(format!(
                "unknown network '{}'",
                other
            ))),
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mainnet() {
            write!(f, "mainnet")
        } else {
            write!(f, "testnet(magic={})", self.protocol_magic)
        }
    }
}

// =============================================================================
// Key Material
// =============================================================================

/// Blake2b-224 hash of a public key, as found in certificates and addresses
pub type KeyHash = Vec<u8>;

/// Public key and chain code as exported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedPublicKey {
    #[serde(with = "hex_array")]
    pub public_key: [u8; 32],
    #[serde(with = "hex_array")]
    pub chain_code: [u8; 32],
}

impl ExtendedPublicKey {
    pub fn new(public_key: [u8; 32], chain_code: [u8; 32]) -> Self {
        Self {
            public_key,
            chain_code,
        }
    }

    /// Split 64 bytes of `public key ‖ chain code`
    pub fn from_bytes(bytes: &[u8]) -> SignerResult<Self> {
        if bytes.len() != 64 {
            return Err(SignerError::InternalInvalidType(format!(
                "extended public key must be 64 bytes, got {}",
                bytes.len()
            )));
        }
        let mut public_key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        public_key.copy_from_slice(&bytes[..32]);
        chain_code.copy_from_slice(&bytes[32..]);
        Ok(Self::new(public_key, chain_code))
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.public_key);
        out[32..].copy_from_slice(&self.chain_code);
        out
    }

    /// 128-character hex of `public key ‖ chain code`
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

mod hex_array {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let v = hex::decode(&s).map_err(serde::de::Error::custom)?;
        v.try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}
