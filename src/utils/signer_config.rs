//! Signer Configuration
//!
//! Settings that shape one signing session:
//! - Target network (id and protocol magic)
//! - Whether returned witnesses are re-verified locally
//! - Debug logging

use serde::{Deserialize, Serialize};

use crate::error::{SignerError, SignerResult};
use crate::types::{protocol_magics, Network};
use crate::utils::logging;

/// Settings for a signing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SignerConfig {
    /// Network transactions and addresses belong to
    pub network: Network,
    /// Verify every device signature against the transaction id before
    /// accepting it
    pub verify_witness_signatures: bool,
    /// Emit debug-level log lines
    pub debug_logging: bool,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl SignerConfig {
    /// Mainnet preset
    pub fn mainnet() -> Self {
        Self {
            network: Network::mainnet(),
            verify_witness_signatures: true,
            debug_logging: false,
        }
    }

    /// Testnet preset with the given protocol magic
    pub fn testnet(protocol_magic: u32) -> Self {
        Self {
            network: Network::testnet(protocol_magic),
            ..Self::mainnet()
        }
    }

    /// Load from a JSON document; missing keys take their defaults
    pub fn from_json(json: &str) -> SignerResult<Self> {
        let config: SignerConfig = serde_json::from_str(json)?;
        config.ensure_valid()?;
        Ok(config)
    }

    /// Non-fatal observations about the settings
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.verify_witness_signatures {
            warnings.push(
                "Warning: device signatures are accepted without local verification".to_string(),
            );
        }

        if self.debug_logging {
            warnings.push("Warning: debug logging prints derivation paths".to_string());
        }

        warnings
    }

    /// Reject settings that cannot describe a real network
    pub fn ensure_valid(&self) -> SignerResult<()> {
        if self.network.network_id > 15 {
            return Err(SignerError::InvalidConfig(format!(
                "network id {} does not fit the address header",
                self.network.network_id
            )));
        }
        if !self.network.is_mainnet() && self.network.protocol_magic == protocol_magics::MAINNET {
            return Err(SignerError::InvalidConfig(
                "testnet configured with the mainnet protocol magic".to_string(),
            ));
        }
        if self.network.is_mainnet() && self.network.protocol_magic != protocol_magics::MAINNET {
            return Err(SignerError::InvalidConfig(
                "mainnet configured with a non-mainnet protocol magic".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply process-wide side effects of the settings
    pub fn apply(&self) {
        if self.debug_logging {
            logging::enable_debug();
        } else {
            logging::disable_debug();
        }
    }
}
