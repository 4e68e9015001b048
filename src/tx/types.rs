//! Transaction Type Definitions
//!
//! In-memory model of an already-decoded Shelley-era transaction body.
//! The exact body bytes travel alongside the decoded fields; the transaction
//! id is always computed from those bytes, never from a re-encoding.

use serde::{Deserialize, Serialize};

use crate::types::KeyHash;
use crate::utils::crypto;

// =============================================================================
// Inputs and Outputs
// =============================================================================

/// Reference to an output of an earlier transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    #[serde(with = "hex::serde")]
    pub tx_hash: Vec<u8>,
    pub output_index: u32,
}

impl TxInput {
    pub fn new(tx_hash: Vec<u8>, output_index: u32) -> Self {
        Self {
            tx_hash,
            output_index,
        }
    }
}

/// Native token quantity under one policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(with = "hex::serde")]
    pub asset_name: Vec<u8>,
    pub amount: u64,
}

/// All tokens of one policy carried by an output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiAsset {
    #[serde(with = "hex::serde")]
    pub policy_id: Vec<u8>,
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    #[serde(with = "hex::serde")]
    pub address: Vec<u8>,
    pub coins: u64,
    #[serde(default)]
    pub token_bundle: Vec<MultiAsset>,
}

impl TxOutput {
    pub fn new(address: Vec<u8>, coins: u64) -> Self {
        Self {
            address,
            coins,
            token_bundle: Vec::new(),
        }
    }

    pub fn with_tokens(mut self, token_bundle: Vec<MultiAsset>) -> Self {
        self.token_bundle = token_bundle;
        self
    }
}

/// Reward withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// Raw reward address bytes (header + staking key hash)
    #[serde(with = "hex::serde")]
    pub address: Vec<u8>,
    pub coins: u64,
}

// =============================================================================
// Certificates
// =============================================================================

/// Certificate type tags as they appear on chain
pub mod certificate_types {
    pub const STAKE_REGISTRATION: u64 = 0;
    pub const STAKE_DEREGISTRATION: u64 = 1;
    pub const DELEGATION: u64 = 2;
    pub const POOL_REGISTRATION: u64 = 3;
    pub const POOL_RETIREMENT: u64 = 4;
}

/// Relay type tags as they appear on chain
pub mod relay_types {
    pub const SINGLE_HOST_IP: u64 = 0;
    pub const SINGLE_HOST_NAME: u64 = 1;
    pub const MULTI_HOST_NAME: u64 = 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub numerator: u64,
    pub denominator: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMetadata {
    pub url: String,
    #[serde(with = "hex::serde")]
    pub hash: Vec<u8>,
}

/// Pool relay as declared in a registration certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolRelay {
    SingleHostIp {
        port: Option<u16>,
        ipv4: Option<Vec<u8>>,
        ipv6: Option<Vec<u8>>,
    },
    SingleHostName {
        port: Option<u16>,
        dns_name: String,
    },
    MultiHostName {
        dns_name: String,
    },
    /// A relay kind this engine cannot forward to the device
    Other { relay_type: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRegistrationCert {
    pub pool_key_hash: KeyHash,
    pub vrf_pub_key_hash: Vec<u8>,
    pub pledge: u64,
    pub cost: u64,
    pub margin: Margin,
    pub reward_account: Vec<u8>,
    pub pool_owners_pub_key_hashes: Vec<KeyHash>,
    pub relays: Vec<PoolRelay>,
    pub metadata: Option<PoolMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Certificate {
    StakeRegistration { pub_key_hash: KeyHash },
    StakeDeregistration { pub_key_hash: KeyHash },
    Delegation { pub_key_hash: KeyHash, pool_hash: KeyHash },
    PoolRegistration(PoolRegistrationCert),
    PoolRetirement { pool_key_hash: KeyHash, retirement_epoch: u64 },
    /// Certificate kind the engine does not know
    Unknown { cert_type: u64 },
}

impl Certificate {
    /// On-chain type tag
    pub fn cert_type(&self) -> u64 {
        match self {
            Certificate::StakeRegistration { .. } => certificate_types::STAKE_REGISTRATION,
            Certificate::StakeDeregistration { .. } => certificate_types::STAKE_DEREGISTRATION,
            Certificate::Delegation { .. } => certificate_types::DELEGATION,
            Certificate::PoolRegistration(_) => certificate_types::POOL_REGISTRATION,
            Certificate::PoolRetirement { .. } => certificate_types::POOL_RETIREMENT,
            Certificate::Unknown { cert_type } => *cert_type,
        }
    }

    /// Registration, deregistration and delegation are signed by a staking key
    pub fn needs_stake_witness(&self) -> bool {
        matches!(
            self,
            Certificate::StakeRegistration { .. }
                | Certificate::StakeDeregistration { .. }
                | Certificate::Delegation { .. }
        )
    }

    pub fn is_pool_registration(&self) -> bool {
        matches!(self, Certificate::PoolRegistration(_))
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A decoded unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub fee: u64,
    pub ttl: Option<u64>,
    pub certificates: Vec<Certificate>,
    pub withdrawals: Vec<Withdrawal>,
    pub metadata_hash: Option<Vec<u8>>,
    pub validity_interval_start: Option<u64>,
    /// Exact CBOR of the transaction body
    #[serde(with = "hex::serde")]
    pub body_cbor: Vec<u8>,
    /// Exact CBOR of the auxiliary data, carried into the signed transaction
    #[serde(default)]
    pub auxiliary_data_cbor: Option<Vec<u8>>,
}

impl UnsignedTransaction {
    /// Empty transaction over the given body bytes
    pub fn new(body_cbor: Vec<u8>) -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            fee: 0,
            ttl: None,
            certificates: Vec::new(),
            withdrawals: Vec::new(),
            metadata_hash: None,
            validity_interval_start: None,
            body_cbor,
            auxiliary_data_cbor: None,
        }
    }

    pub fn with_input(mut self, input: TxInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_output(mut self, output: TxOutput) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn with_certificate(mut self, certificate: Certificate) -> Self {
        self.certificates.push(certificate);
        self
    }

    pub fn with_withdrawal(mut self, withdrawal: Withdrawal) -> Self {
        self.withdrawals.push(withdrawal);
        self
    }

    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_validity_interval_start(mut self, start: u64) -> Self {
        self.validity_interval_start = Some(start);
        self
    }

    pub fn with_metadata_hash(mut self, hash: Vec<u8>) -> Self {
        self.metadata_hash = Some(hash);
        self
    }

    pub fn with_auxiliary_data(mut self, hash: Vec<u8>, auxiliary_data_cbor: Vec<u8>) -> Self {
        self.metadata_hash = Some(hash);
        self.auxiliary_data_cbor = Some(auxiliary_data_cbor);
        self
    }

    /// Blake2b-256 of the body bytes
    pub fn id_bytes(&self) -> [u8; 32] {
        crypto::blake2b_256(&self.body_cbor)
    }

    /// Transaction id as lowercase hex
    pub fn id(&self) -> String {
        hex::encode(self.id_bytes())
    }

    pub fn pool_registration(&self) -> Option<&PoolRegistrationCert> {
        self.certificates.iter().find_map(|c| match c {
            Certificate::PoolRegistration(cert) => Some(cert),
            _ => None,
        })
    }

    pub fn has_pool_registration(&self) -> bool {
        self.certificates.iter().any(Certificate::is_pool_registration)
    }

    pub fn has_multi_assets(&self) -> bool {
        self.outputs.iter().any(|o| !o.token_bundle.is_empty())
    }
}
