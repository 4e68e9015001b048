//! Key Generation Outputs
//!
//! The device never exports private keys. "Key generation" exports the
//! extended public key at a path and writes two files for it:
//! - a hardware signing file (path + xpub), used later to sign
//! - a verification key file (public key only), for other tooling

use serde::{Deserialize, Serialize};

use crate::error::{SignerError, SignerResult};
use crate::types::ExtendedPublicKey;
use crate::utils::cbor;
use crate::wallet::derivation_path::{DerivationPath, PathRole};
use crate::wallet::signing_file::{SigningFile, SigningRole};

/// Verification key JSON envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKeyFile {
    #[serde(rename = "type")]
    pub file_type: String,
    pub description: String,
    #[serde(rename = "cborHex")]
    pub cbor_hex: String,
}

/// Both files produced for one exported key
#[derive(Debug, Clone)]
pub struct KeyGenOutput {
    pub signing_file: SigningFile,
    pub signing_file_json: String,
    pub verification_key_json: String,
}

/// Paths, signing file names and verification key file names line up one to one
pub fn validate_key_gen_inputs(
    paths: &[DerivationPath],
    hw_signing_files: &[String],
    verification_key_files: &[String],
) -> SignerResult<()> {
    if paths.is_empty()
        || paths.len() != hw_signing_files.len()
        || paths.len() != verification_key_files.len()
    {
        return Err(SignerError::InvalidKeyGenInputs);
    }
    Ok(())
}

/// Signing role implied by a path
pub fn role_for_path(path: &DerivationPath) -> SignerResult<SigningRole> {
    match path.role() {
        PathRole::ShelleySpendingKey | PathRole::ByronSpendingKey => Ok(SigningRole::Payment),
        PathRole::StakingKey => Ok(SigningRole::Stake),
        PathRole::PoolColdKey => Ok(SigningRole::PoolCold),
        PathRole::WalletAccount | PathRole::Invalid => Err(SignerError::InvalidPath(format!(
            "{} is not a signing key path",
            path
        ))),
    }
}

fn descriptions(role: SigningRole) -> (&'static str, &'static str, &'static str) {
    match role {
        SigningRole::Payment => (
            "Payment Hardware Signing File",
            "PaymentVerificationKeyShelley_ed25519",
            "Payment Verification Key",
        ),
        SigningRole::Stake => (
            "Stake Hardware Signing File",
            "StakeVerificationKeyShelley_ed25519",
            "Stake Verification Key",
        ),
        SigningRole::PoolCold => (
            "Stake Pool Cold Hardware Signing File",
            "StakePoolVerificationKey_ed25519",
            "Stake Pool Operator Verification Key",
        ),
    }
}

/// Build the signing file and verification key file for `path`
pub fn build_key_files(path: &DerivationPath, xpub: ExtendedPublicKey) -> SignerResult<KeyGenOutput> {
    let role = role_for_path(path)?;
    let (signing_description, vkey_type, vkey_description) = descriptions(role);

    let signing_file = SigningFile::new(role, path.clone(), xpub);
    let signing_file_json = signing_file.to_json(signing_description)?;

    let vkey = VerificationKeyFile {
        file_type: vkey_type.to_string(),
        description: vkey_description.to_string(),
        cbor_hex: hex::encode(cbor::encode_bytes(&xpub.public_key)?),
    };

    Ok(KeyGenOutput {
        signing_file,
        signing_file_json,
        verification_key_json: serde_json::to_string_pretty(&vkey)?,
    })
}
