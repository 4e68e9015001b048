//! Voting Registration
//!
//! The device signs a voting registration only as auxiliary data of a
//! transaction. A fixed dummy transaction carries it; the device returns
//! the registration signature and the hash of the auxiliary data it built,
//! and the metadata is reassembled here and checked against that hash.

use minicbor::Encoder;

use crate::device::{
    AuxiliaryDataRequest, DeviceOwnedAddress, OutputDestination, SigningMode, SigningRequest,
    TransactionRequest, TxInputRequest, TxOutputRequest, VotingRegistrationParams,
};
use crate::error::{SignerError, SignerResult};
use crate::types::Network;
use crate::utils::crypto;
use crate::wallet::{h, AddressParameters, AddressType, DerivationPath, SigningFile};

/// Metadata labels of a voting registration
pub mod labels {
    pub const REGISTRATION: u64 = 61284;
    pub const SIGNATURE: u64 = 61285;
}

/// Voting registration metadata as put on chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingRegistrationMetadata {
    pub voting_public_key: Vec<u8>,
    pub stake_public_key: Vec<u8>,
    pub reward_address: Vec<u8>,
    pub nonce: u64,
    pub signature: Vec<u8>,
}

impl VotingRegistrationMetadata {
    fn encode_into(&self, enc: &mut Encoder<Vec<u8>>) -> SignerResult<()> {
        enc.map(2)?;
        enc.u64(labels::REGISTRATION)?
            .map(4)?
            .u8(1)?
            .bytes(&self.voting_public_key)?
            .u8(2)?
            .bytes(&self.stake_public_key)?
            .u8(3)?
            .bytes(&self.reward_address)?
            .u8(4)?
            .u64(self.nonce)?;
        enc.u64(labels::SIGNATURE)?
            .map(1)?
            .u8(1)?
            .bytes(&self.signature)?;
        Ok(())
    }

    /// `{61284: {1: vote key, 2: stake key, 3: address, 4: nonce}, 61285: {1: sig}}`
    pub fn to_cbor(&self) -> SignerResult<Vec<u8>> {
        let mut enc = Encoder::new(Vec::new());
        self.encode_into(&mut enc)?;
        Ok(enc.into_writer())
    }

    /// Auxiliary data `[metadata, []]`
    pub fn auxiliary_data_cbor(&self) -> SignerResult<Vec<u8>> {
        let mut enc = Encoder::new(Vec::new());
        enc.array(2)?;
        self.encode_into(&mut enc)?;
        enc.array(0)?;
        Ok(enc.into_writer())
    }

    pub fn auxiliary_data_hash(&self) -> SignerResult<[u8; 32]> {
        Ok(crypto::blake2b_256(&self.auxiliary_data_cbor()?))
    }
}

/// Rewards of a voting registration go to a base or reward address
pub fn validate_voting_registration_address_type(address_type: AddressType) -> SignerResult<()> {
    match address_type {
        AddressType::Base | AddressType::Reward => Ok(()),
        _ => Err(SignerError::InvalidVotingRegistrationAddressType),
    }
}

pub fn prepare_vote_auxiliary_data(
    stake_file: &SigningFile,
    voting_public_key_hex: &str,
    address_params: &AddressParameters,
    nonce: u64,
) -> AuxiliaryDataRequest {
    AuxiliaryDataRequest::VotingRegistration(VotingRegistrationParams {
        voting_public_key_hex: voting_public_key_hex.to_string(),
        staking_path: stake_file.path.clone(),
        rewards_destination: DeviceOwnedAddress::from(address_params),
        nonce: nonce.to_string(),
    })
}

fn dummy_spending_path() -> DerivationPath {
    DerivationPath::new(vec![h(1852), h(1815), h(0), 0, 0])
}

fn dummy_staking_path() -> DerivationPath {
    DerivationPath::new(vec![h(1852), h(1815), h(0), 2, 0])
}

/// Placeholder transaction whose only purpose is to carry `auxiliary_data`
pub fn prepare_dummy_tx(network: &Network, auxiliary_data: AuxiliaryDataRequest) -> SigningRequest {
    SigningRequest {
        signing_mode: SigningMode::Ordinary,
        tx: TransactionRequest {
            network: *network,
            inputs: vec![TxInputRequest {
                tx_hash_hex: "0".repeat(64),
                output_index: 0,
                path: Some(dummy_spending_path()),
            }],
            outputs: vec![TxOutputRequest {
                destination: OutputDestination::DeviceOwned(DeviceOwnedAddress {
                    address_type: AddressType::Base,
                    spending_path: Some(dummy_spending_path()),
                    staking_path: Some(dummy_staking_path()),
                }),
                amount: "1".to_string(),
                token_bundle: Vec::new(),
            }],
            fee: "0".to_string(),
            ttl: Some("0".to_string()),
            certificates: Vec::new(),
            withdrawals: Vec::new(),
            auxiliary_data: Some(auxiliary_data),
            validity_interval_start: None,
        },
    }
}
