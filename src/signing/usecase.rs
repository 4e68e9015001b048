//! Use-Case Determination
//!
//! Picks the signing mode from the certificates and checks that the device
//! firmware can handle every optional part of the transaction.

use crate::device::{ensure_supported, DeviceVersion, Feature, SigningMode};
use crate::error::SignerResult;
use crate::tx::{Certificate, UnsignedTransaction};
use crate::wallet::{find_path_for_key_hash, SigningFile};

/// Signing mode implied by the certificates and the files at hand
///
/// Without a pool registration the mode is ordinary. With one, the signer
/// is the operator when the pool key itself belongs to one of the files,
/// and an owner otherwise.
pub fn determine_use_case(certificates: &[Certificate], files: &[SigningFile]) -> SigningMode {
    let pool_registration = certificates.iter().find_map(|c| match c {
        Certificate::PoolRegistration(cert) => Some(cert),
        _ => None,
    });

    match pool_registration {
        None => SigningMode::Ordinary,
        Some(cert) => match find_path_for_key_hash(&cert.pool_key_hash, files) {
            Some(_) => SigningMode::PoolRegistrationAsOperator,
            None => SigningMode::PoolRegistrationAsOwner,
        },
    }
}

/// Reject transactions using capabilities the firmware lacks
pub fn ensure_firmware_supports_params(
    tx: &UnsignedTransaction,
    files: &[SigningFile],
    version: &DeviceVersion,
) -> SignerResult<()> {
    if tx.ttl.is_none() {
        ensure_supported(version, Feature::OptionalTtl)?;
    }
    if tx.validity_interval_start.is_some() {
        ensure_supported(version, Feature::ValidityIntervalStart)?;
    }
    if tx.has_multi_assets() {
        ensure_supported(version, Feature::MultiAsset)?;
    }
    if determine_use_case(&tx.certificates, files) == SigningMode::PoolRegistrationAsOperator {
        ensure_supported(version, Feature::PoolRegistrationOperator)?;
    }
    Ok(())
}
