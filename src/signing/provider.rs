//! Hardware Signing Provider
//!
//! Ties validation, request building and reconciliation around one
//! [`SigningDevice`]. All local checks run before the device is contacted;
//! once an exchange has started its errors are returned unchanged.

use crate::device::{
    ensure_supported, DeviceOwnedAddress, DeviceVersion, DeviceWitness, Feature,
    ShowAddressRequest, SigningDevice,
};
use crate::error::{SignerError, SignerResult};
use crate::signing::builder::build_signing_request;
use crate::signing::reconcile::{create_witnesses, verify_tx_id};
use crate::signing::usecase::{determine_use_case, ensure_firmware_supports_params};
use crate::signing::voting::{
    prepare_dummy_tx, prepare_vote_auxiliary_data, validate_voting_registration_address_type,
    VotingRegistrationMetadata,
};
use crate::tx::{
    encode_signed_tx, validate_signing, validate_witnessing, TxWitness, UnsignedTransaction,
    WitnessSet,
};
use crate::types::Network;
use crate::utils::SignerConfig;
use crate::wallet::{
    address_attributes, decode_address, get_address_parameters, DerivationPath, SigningFile,
};
use crate::{log_debug, log_error, log_info, log_warn};

const MODULE: &str = "signer";

/// Signing engine bound to one connected device
pub struct HwSigner<D: SigningDevice> {
    device: D,
    version: DeviceVersion,
    config: SignerConfig,
}

impl<D: SigningDevice> HwSigner<D> {
    /// Validate `config`, then query the device for its app version
    pub async fn connect(mut device: D, config: SignerConfig) -> SignerResult<Self> {
        config.ensure_valid()?;
        config.apply();
        for warning in config.validate() {
            log_warn!(MODULE, warning);
        }

        let version = device.get_version().await?;
        log_info!(MODULE, "device connected", version = version, network = config.network);

        Ok(Self {
            device,
            version,
            config,
        })
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    pub fn device_version(&self) -> DeviceVersion {
        self.version
    }

    pub fn network(&self) -> &Network {
        &self.config.network
    }

    /// Human-readable device app version
    pub fn get_version(&self) -> String {
        format!("Cardano app version {}", self.version)
    }

    /// Show `address` on the device, derived from the given paths
    pub async fn show_address(
        &mut self,
        payment_path: Option<DerivationPath>,
        staking_path: Option<DerivationPath>,
        address: &str,
    ) -> SignerResult<()> {
        let attributes = address_attributes(address)?;
        let request = ShowAddressRequest {
            network: Network {
                network_id: attributes.network_id,
                protocol_magic: attributes.protocol_magic,
            },
            address: DeviceOwnedAddress {
                address_type: attributes.address_type,
                spending_path: payment_path,
                staking_path,
            },
        };
        log_debug!(MODULE, "showing address", address = address);
        self.device.show_address(request).await
    }

    /// Fully sign an ordinary transaction; returns the signed transaction CBOR
    pub async fn sign_tx(
        &mut self,
        tx: &UnsignedTransaction,
        files: &[SigningFile],
        change_files: &[SigningFile],
    ) -> SignerResult<Vec<u8>> {
        validate_signing(tx, files)?;
        log_debug!(MODULE, "signing files validated", operation = "sign");

        let device_witnesses = self.exchange(tx, files, change_files).await?;
        let witnesses = self.reconcile(tx, &device_witnesses, files)?;
        encode_signed_tx(
            &tx.body_cbor,
            tx.auxiliary_data_cbor.as_deref(),
            &witnesses.byron,
            &witnesses.shelley,
        )
    }

    /// Witness a pool registration; Shelley witnesses come first
    pub async fn witness_tx(
        &mut self,
        tx: &UnsignedTransaction,
        files: &[SigningFile],
        change_files: &[SigningFile],
    ) -> SignerResult<Vec<TxWitness>> {
        validate_witnessing(tx, files)?;
        log_debug!(MODULE, "signing files validated", operation = "witness");

        let device_witnesses = self.exchange(tx, files, change_files).await?;
        Ok(self.reconcile(tx, &device_witnesses, files)?.into_typed())
    }

    async fn exchange(
        &mut self,
        tx: &UnsignedTransaction,
        files: &[SigningFile],
        change_files: &[SigningFile],
    ) -> SignerResult<Vec<DeviceWitness>> {
        ensure_firmware_supports_params(tx, files, &self.version)?;
        let mode = determine_use_case(&tx.certificates, files);
        log_info!(MODULE, "use case determined", mode = format!("{:?}", mode));

        let request = build_signing_request(tx, files, &self.config.network, change_files)?;
        log_info!(
            MODULE,
            "sending signing request",
            inputs = request.tx.inputs.len(),
            outputs = request.tx.outputs.len(),
            certificates = request.tx.certificates.len(),
            withdrawals = request.tx.withdrawals.len(),
        );

        let response = self.device.sign_transaction(request).await?;
        if let Err(err) = verify_tx_id(tx, &response.tx_hash_hex) {
            log_error!(
                MODULE,
                "device signed a different transaction",
                expected_tx_id = tx.id(),
                reported_tx_id = response.tx_hash_hex,
            );
            return Err(err);
        }
        log_info!(MODULE, "transaction id verified", tx_id = tx.id());
        Ok(response.witnesses)
    }

    fn reconcile(
        &self,
        tx: &UnsignedTransaction,
        device_witnesses: &[DeviceWitness],
        files: &[SigningFile],
    ) -> SignerResult<WitnessSet> {
        let tx_id = tx.id_bytes();
        let verify = self.config.verify_witness_signatures.then_some(&tx_id[..]);
        let witnesses = create_witnesses(device_witnesses, files, verify)?;
        log_info!(
            MODULE,
            "witnesses assembled",
            shelley = witnesses.shelley.len(),
            byron = witnesses.byron.len(),
        );
        Ok(witnesses)
    }

    /// Extended public keys as 128-character hex, one per path
    pub async fn get_xpub_keys(&mut self, paths: &[DerivationPath]) -> SignerResult<Vec<String>> {
        let xpubs = self.device.get_extended_public_keys(paths).await?;
        if xpubs.len() != paths.len() {
            return Err(SignerError::InternalInvalidType(format!(
                "requested {} keys, device returned {}",
                paths.len(),
                xpubs.len()
            )));
        }
        Ok(xpubs.iter().map(|x| x.to_hex()).collect())
    }

    /// Operational certificates cannot be signed through this provider
    pub async fn sign_operational_certificate(
        &mut self,
        _kes_vkey: &[u8],
        _kes_period: u64,
        _issue_counter: u64,
        _files: &[SigningFile],
    ) -> SignerResult<Vec<u8>> {
        Err(SignerError::UnsupportedProviderCall("operational certificate signing"))
    }

    /// Have the device sign a voting registration; returns the metadata CBOR as hex
    pub async fn sign_voting_registration_metadata(
        &mut self,
        reward_address_files: &[SigningFile],
        stake_file: &SigningFile,
        reward_address: &str,
        voting_public_key_hex: &str,
        nonce: u64,
    ) -> SignerResult<String> {
        let address = decode_address(reward_address)?;
        let params = get_address_parameters(reward_address_files, &address, &self.config.network)
            .filter(|p| p.matches(&address))
            .ok_or(SignerError::AuxSigningFileNotFoundForVotingRewardAddress)?;
        validate_voting_registration_address_type(params.address_type)?;
        ensure_supported(&self.version, Feature::VotingRegistration)?;
        let voting_public_key = hex::decode(voting_public_key_hex.trim())?;

        let aux = prepare_vote_auxiliary_data(stake_file, voting_public_key_hex, &params, nonce);
        let request = prepare_dummy_tx(&self.config.network, aux);
        log_info!(MODULE, "sending voting registration", nonce = nonce);

        let response = self.device.sign_transaction(request).await?;
        let supplement = response
            .auxiliary_data_supplement
            .ok_or(SignerError::MissingAuxiliaryDataSupplement)?;

        let metadata = VotingRegistrationMetadata {
            voting_public_key,
            stake_public_key: stake_file.xpub.public_key.to_vec(),
            reward_address: address,
            nonce,
            signature: hex::decode(supplement.voting_registration_signature_hex.trim())?,
        };

        let expected = hex::encode(metadata.auxiliary_data_hash()?);
        if !supplement
            .auxiliary_data_hash_hex
            .trim()
            .eq_ignore_ascii_case(&expected)
        {
            log_error!(
                MODULE,
                "auxiliary data hash mismatch",
                expected_hash = expected,
                reported_hash = supplement.auxiliary_data_hash_hex,
            );
            return Err(SignerError::MetadataSerializationMismatch);
        }

        Ok(hex::encode(metadata.to_cbor()?))
    }
}
