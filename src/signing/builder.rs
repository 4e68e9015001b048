//! Signing Request Builder
//!
//! Walks every input, output, certificate and withdrawal of a transaction
//! and maps it to the device request model. Key hashes found in
//! certificates and withdrawals are resolved back to signing-file paths;
//! outputs the user's own keys can re-derive are sent as device-owned.

use crate::device::{
    AssetGroup, AuxiliaryDataRequest, CertificateRequest, DeviceOwnedAddress, MarginRequest,
    OutputDestination, PoolMetadataRequest, PoolOwnerRequest, PoolRegistrationParams,
    RelayRequest, SigningMode, SigningRequest, Token, TransactionRequest, TxInputRequest,
    TxOutputRequest, WithdrawalRequest,
};
use crate::error::{SignerError, SignerResult};
use crate::signing::usecase::determine_use_case;
use crate::tx::{
    Certificate, MultiAsset, PoolRegistrationCert, PoolRelay, TxInput, TxOutput,
    UnsignedTransaction, Withdrawal,
};
use crate::types::{KeyHash, Network};
use crate::wallet::{
    find_path_for_key_hash, get_address_parameters, ipv4_to_string, ipv6_to_string, partition,
    resolve_input_path, reward_address_to_key_hash, AddressParameters, DerivationPath,
    SigningFile,
};

// =============================================================================
// Inputs and Outputs
// =============================================================================

/// Owner-witnessed pool registrations carry their inputs without paths
pub fn prepare_input(mode: SigningMode, input: &TxInput, path: Option<DerivationPath>) -> TxInputRequest {
    let path = match mode {
        SigningMode::PoolRegistrationAsOwner => None,
        _ => path,
    };
    TxInputRequest {
        tx_hash_hex: hex::encode(&input.tx_hash),
        output_index: input.output_index,
        path,
    }
}

pub fn prepare_token_bundle(multi_assets: &[MultiAsset]) -> Vec<AssetGroup> {
    multi_assets
        .iter()
        .map(|group| AssetGroup {
            policy_id_hex: hex::encode(&group.policy_id),
            tokens: group
                .assets
                .iter()
                .map(|asset| Token {
                    asset_name_hex: hex::encode(&asset.asset_name),
                    amount: asset.amount.to_string(),
                })
                .collect(),
        })
        .collect()
}

impl From<&AddressParameters> for DeviceOwnedAddress {
    fn from(params: &AddressParameters) -> Self {
        Self {
            address_type: params.address_type,
            spending_path: params.payment_path.clone(),
            staking_path: params.stake_path.clone(),
        }
    }
}

/// Device-owned when `change_files` re-derive the exact address
pub fn prepare_output(output: &TxOutput, change_files: &[SigningFile], network: &Network) -> TxOutputRequest {
    let destination = match get_address_parameters(change_files, &output.address, network) {
        Some(params) if params.matches(&output.address) => {
            OutputDestination::DeviceOwned(DeviceOwnedAddress::from(&params))
        }
        _ => OutputDestination::ThirdParty {
            address_hex: hex::encode(&output.address),
        },
    };
    TxOutputRequest {
        destination,
        amount: output.coins.to_string(),
        token_bundle: prepare_token_bundle(&output.token_bundle),
    }
}

// =============================================================================
// Certificates
// =============================================================================

fn certificate_path(key_hash: &[u8], files: &[SigningFile]) -> SignerResult<DerivationPath> {
    find_path_for_key_hash(key_hash, files).ok_or(SignerError::MissingSigningFileForCertificate)
}

/// Owners backed by a local file become device-owned, but only when
/// signing as owner; at most one may be
pub fn prepare_pool_owners(
    mode: SigningMode,
    owners: &[KeyHash],
    files: &[SigningFile],
) -> SignerResult<Vec<PoolOwnerRequest>> {
    let pool_owners: Vec<PoolOwnerRequest> = owners
        .iter()
        .map(|owner| match find_path_for_key_hash(owner, files) {
            Some(staking_path) if mode == SigningMode::PoolRegistrationAsOwner => {
                PoolOwnerRequest::DeviceOwned { staking_path }
            }
            _ => PoolOwnerRequest::ThirdParty {
                staking_key_hash_hex: hex::encode(owner),
            },
        })
        .collect();

    let device_owned = pool_owners
        .iter()
        .filter(|o| matches!(o, PoolOwnerRequest::DeviceOwned { .. }))
        .count();
    if device_owned > 1 {
        return Err(SignerError::OwnerMultipleTimesInTx);
    }
    Ok(pool_owners)
}

pub fn prepare_relays(relays: &[PoolRelay]) -> SignerResult<Vec<RelayRequest>> {
    relays
        .iter()
        .map(|relay| match relay {
            PoolRelay::SingleHostIp { port, ipv4, ipv6 } => Ok(RelayRequest::SingleHostIp {
                port: *port,
                ipv4: ipv4.as_deref().map(ipv4_to_string),
                ipv6: ipv6.as_deref().map(ipv6_to_string),
            }),
            PoolRelay::SingleHostName { port, dns_name } => Ok(RelayRequest::SingleHostName {
                port: *port,
                dns_name: dns_name.clone(),
            }),
            PoolRelay::MultiHostName { dns_name } => Ok(RelayRequest::MultiHost {
                dns_name: dns_name.clone(),
            }),
            PoolRelay::Other { relay_type } => Err(SignerError::UnsupportedRelayType(*relay_type)),
        })
        .collect()
}

pub fn prepare_pool_registration(
    cert: &PoolRegistrationCert,
    files: &[SigningFile],
) -> SignerResult<CertificateRequest> {
    let mode = match find_path_for_key_hash(&cert.pool_key_hash, files) {
        Some(_) => SigningMode::PoolRegistrationAsOperator,
        None => SigningMode::PoolRegistrationAsOwner,
    };

    Ok(CertificateRequest::PoolRegistration(PoolRegistrationParams {
        pool_key_hash_hex: hex::encode(&cert.pool_key_hash),
        vrf_key_hash_hex: hex::encode(&cert.vrf_pub_key_hash),
        pledge: cert.pledge.to_string(),
        cost: cert.cost.to_string(),
        margin: MarginRequest {
            numerator: cert.margin.numerator.to_string(),
            denominator: cert.margin.denominator.to_string(),
        },
        reward_account_hex: hex::encode(&cert.reward_account),
        pool_owners: prepare_pool_owners(mode, &cert.pool_owners_pub_key_hashes, files)?,
        relays: prepare_relays(&cert.relays)?,
        metadata: cert.metadata.as_ref().map(|m| PoolMetadataRequest {
            url: m.url.clone(),
            hash_hex: hex::encode(&m.hash),
        }),
    }))
}

/// Map one certificate; `files` are the stake files followed by pool cold files
pub fn prepare_certificate(certificate: &Certificate, files: &[SigningFile]) -> SignerResult<CertificateRequest> {
    match certificate {
        Certificate::StakeRegistration { pub_key_hash } => Ok(CertificateRequest::StakeRegistration {
            path: certificate_path(pub_key_hash, files)?,
        }),
        Certificate::StakeDeregistration { pub_key_hash } => {
            Ok(CertificateRequest::StakeDeregistration {
                path: certificate_path(pub_key_hash, files)?,
            })
        }
        Certificate::Delegation {
            pub_key_hash,
            pool_hash,
        } => Ok(CertificateRequest::StakeDelegation {
            path: certificate_path(pub_key_hash, files)?,
            pool_key_hash_hex: hex::encode(pool_hash),
        }),
        Certificate::PoolRegistration(cert) => prepare_pool_registration(cert, files),
        Certificate::PoolRetirement { .. } => {
            Err(SignerError::UnsupportedProviderCall("pool retirement certificate"))
        }
        Certificate::Unknown { cert_type } => Err(SignerError::UnknownCertificate(*cert_type)),
    }
}

// =============================================================================
// Withdrawals and the full request
// =============================================================================

pub fn prepare_withdrawal(withdrawal: &Withdrawal, stake_files: &[SigningFile]) -> SignerResult<WithdrawalRequest> {
    let key_hash = reward_address_to_key_hash(&withdrawal.address);
    let path = find_path_for_key_hash(&key_hash, stake_files)
        .ok_or(SignerError::MissingSigningFileForWithdrawal)?;
    Ok(WithdrawalRequest {
        path,
        amount: withdrawal.coins.to_string(),
    })
}

/// Build the complete device request for `tx`
///
/// The signing mode is the use-case the certificates and files imply.
pub fn build_signing_request(
    tx: &UnsignedTransaction,
    files: &[SigningFile],
    network: &Network,
    change_files: &[SigningFile],
) -> SignerResult<SigningRequest> {
    let parts = partition(files);
    let mode = determine_use_case(&tx.certificates, files);
    let certificate_files = parts.certificate_files();

    let inputs = tx
        .inputs
        .iter()
        .enumerate()
        .map(|(i, input)| prepare_input(mode, input, resolve_input_path(&parts.payment, i)))
        .collect();
    let outputs = tx
        .outputs
        .iter()
        .map(|output| prepare_output(output, change_files, network))
        .collect();
    let certificates = tx
        .certificates
        .iter()
        .map(|c| prepare_certificate(c, &certificate_files))
        .collect::<SignerResult<Vec<_>>>()?;
    let withdrawals = tx
        .withdrawals
        .iter()
        .map(|w| prepare_withdrawal(w, &parts.stake))
        .collect::<SignerResult<Vec<_>>>()?;
    let auxiliary_data = tx
        .metadata_hash
        .as_ref()
        .map(|hash| AuxiliaryDataRequest::ArbitraryHash {
            hash_hex: hex::encode(hash),
        });

    Ok(SigningRequest {
        signing_mode: mode,
        tx: TransactionRequest {
            network: *network,
            inputs,
            outputs,
            fee: tx.fee.to_string(),
            ttl: tx.ttl.map(|t| t.to_string()),
            certificates,
            withdrawals,
            auxiliary_data,
            validity_interval_start: tx.validity_interval_start.map(|v| v.to_string()),
        },
    })
}
