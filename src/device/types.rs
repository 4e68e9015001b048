//! Device Request and Response Types
//!
//! The structured, device-agnostic form of a signing exchange. Amounts are
//! decimal strings so that no value is ever narrowed on the way to the
//! device.

use serde::{Deserialize, Serialize};

use crate::types::Network;
use crate::wallet::{AddressType, DerivationPath};

// =============================================================================
// Signing Mode
// =============================================================================

/// Role the signer plays in the transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningMode {
    Ordinary,
    PoolRegistrationAsOwner,
    PoolRegistrationAsOperator,
}

// =============================================================================
// Inputs and Outputs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInputRequest {
    pub tx_hash_hex: String,
    pub output_index: u32,
    /// Absent when the input is not signed by this device
    pub path: Option<DerivationPath>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub asset_name_hex: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroup {
    pub policy_id_hex: String,
    pub tokens: Vec<Token>,
}

/// Address described by the paths the device derives it from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceOwnedAddress {
    pub address_type: AddressType,
    pub spending_path: Option<DerivationPath>,
    pub staking_path: Option<DerivationPath>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputDestination {
    ThirdParty { address_hex: String },
    DeviceOwned(DeviceOwnedAddress),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutputRequest {
    pub destination: OutputDestination,
    pub amount: String,
    pub token_bundle: Vec<AssetGroup>,
}

impl TxOutputRequest {
    pub fn is_device_owned(&self) -> bool {
        matches!(self.destination, OutputDestination::DeviceOwned(_))
    }
}

// =============================================================================
// Certificates and Withdrawals
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginRequest {
    pub numerator: String,
    pub denominator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolOwnerRequest {
    DeviceOwned { staking_path: DerivationPath },
    ThirdParty { staking_key_hash_hex: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelayRequest {
    SingleHostIp {
        port: Option<u16>,
        ipv4: Option<String>,
        ipv6: Option<String>,
    },
    SingleHostName {
        port: Option<u16>,
        dns_name: String,
    },
    MultiHost {
        dns_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMetadataRequest {
    pub url: String,
    pub hash_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRegistrationParams {
    pub pool_key_hash_hex: String,
    pub vrf_key_hash_hex: String,
    pub pledge: String,
    pub cost: String,
    pub margin: MarginRequest,
    pub reward_account_hex: String,
    pub pool_owners: Vec<PoolOwnerRequest>,
    pub relays: Vec<RelayRequest>,
    pub metadata: Option<PoolMetadataRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateRequest {
    StakeRegistration { path: DerivationPath },
    StakeDeregistration { path: DerivationPath },
    StakeDelegation {
        path: DerivationPath,
        pool_key_hash_hex: String,
    },
    PoolRegistration(PoolRegistrationParams),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub path: DerivationPath,
    pub amount: String,
}

// =============================================================================
// Auxiliary Data
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingRegistrationParams {
    pub voting_public_key_hex: String,
    pub staking_path: DerivationPath,
    pub rewards_destination: DeviceOwnedAddress,
    pub nonce: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuxiliaryDataRequest {
    /// Hash of auxiliary data the device does not inspect
    ArbitraryHash { hash_hex: String },
    /// Voting registration the device builds and signs itself
    VotingRegistration(VotingRegistrationParams),
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub network: Network,
    pub inputs: Vec<TxInputRequest>,
    pub outputs: Vec<TxOutputRequest>,
    pub fee: String,
    pub ttl: Option<String>,
    pub certificates: Vec<CertificateRequest>,
    pub withdrawals: Vec<WithdrawalRequest>,
    pub auxiliary_data: Option<AuxiliaryDataRequest>,
    pub validity_interval_start: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningRequest {
    pub signing_mode: SigningMode,
    pub tx: TransactionRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowAddressRequest {
    pub network: Network,
    pub address: DeviceOwnedAddress,
}

// =============================================================================
// Responses
// =============================================================================

/// One signature produced by the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceWitness {
    pub path: DerivationPath,
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
}

/// Extra data returned when the device built auxiliary data itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryDataSupplement {
    pub auxiliary_data_hash_hex: String,
    pub voting_registration_signature_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTxResponse {
    pub tx_hash_hex: String,
    pub witnesses: Vec<DeviceWitness>,
    pub auxiliary_data_supplement: Option<AuxiliaryDataSupplement>,
}

impl SignTxResponse {
    pub fn new(tx_hash_hex: impl Into<String>, witnesses: Vec<DeviceWitness>) -> Self {
        Self {
            tx_hash_hex: tx_hash_hex.into(),
            witnesses,
            auxiliary_data_supplement: None,
        }
    }

    pub fn with_supplement(mut self, supplement: AuxiliaryDataSupplement) -> Self {
        self.auxiliary_data_supplement = Some(supplement);
        self
    }
}
