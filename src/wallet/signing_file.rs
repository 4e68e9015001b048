//! Hardware Signing Files
//!
//! A signing file names a key on the device: its role, derivation path and
//! extended public key. It holds no secret material. The functions here
//! group files by role and resolve key hashes found in a transaction back
//! to the path that can sign for them.

use serde::{Deserialize, Serialize};

use crate::error::{SignerError, SignerResult};
use crate::types::ExtendedPublicKey;
use crate::utils::{cbor, crypto};
use crate::wallet::derivation_path::DerivationPath;

/// File type strings as written by key generation
pub mod file_types {
    pub const PAYMENT: &str = "PaymentHWSigningFileShelley_ed25519";
    pub const STAKE: &str = "StakeHWSigningFileShelley_ed25519";
    pub const POOL_COLD: &str = "StakePoolHWSigningFile_ed25519";
}

/// Role a signing file was generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningRole {
    Payment,
    Stake,
    PoolCold,
}

impl SigningRole {
    pub fn file_type(&self) -> &'static str {
        match self {
            SigningRole::Payment => file_types::PAYMENT,
            SigningRole::Stake => file_types::STAKE,
            SigningRole::PoolCold => file_types::POOL_COLD,
        }
    }

    pub fn from_file_type(file_type: &str) -> Option<Self> {
        match file_type {
            file_types::PAYMENT => Some(SigningRole::Payment),
            file_types::STAKE => Some(SigningRole::Stake),
            file_types::POOL_COLD => Some(SigningRole::PoolCold),
            _ => None,
        }
    }
}

/// One user-supplied signing key descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningFile {
    pub role: SigningRole,
    pub path: DerivationPath,
    pub xpub: ExtendedPublicKey,
}

/// On-disk JSON shape of a hardware signing file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HwSigningFileJson {
    #[serde(rename = "type")]
    pub file_type: String,
    pub description: String,
    pub path: String,
    #[serde(rename = "cborXPubKeyHex")]
    pub cbor_xpub_key_hex: String,
}

impl SigningFile {
    pub fn new(role: SigningRole, path: DerivationPath, xpub: ExtendedPublicKey) -> Self {
        Self { role, path, xpub }
    }

    /// Blake2b-224 hash of the public key
    pub fn key_hash(&self) -> Vec<u8> {
        crypto::pub_key_hash(&self.xpub.public_key)
    }

    pub fn from_json(json: &str) -> SignerResult<Self> {
        let raw: HwSigningFileJson = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    pub fn to_json(&self, description: &str) -> SignerResult<String> {
        let raw = HwSigningFileJson {
            file_type: self.role.file_type().to_string(),
            description: description.to_string(),
            path: self.path.to_string(),
            cbor_xpub_key_hex: hex::encode(cbor::encode_bytes(&self.xpub.to_bytes())?),
        };
        Ok(serde_json::to_string_pretty(&raw)?)
    }
}

impl TryFrom<HwSigningFileJson> for SigningFile {
    type Error = SignerError;

    fn try_from(raw: HwSigningFileJson) -> SignerResult<Self> {
        let role = SigningRole::from_file_type(&raw.file_type).ok_or_else(|| {
            SignerError::InvalidSigningFile(format!("unknown type '{}'", raw.file_type))
        })?;
        let path = DerivationPath::parse(&raw.path)?;
        let xpub_bytes = cbor::decode_bytes(&hex::decode(raw.cbor_xpub_key_hex.trim())?)?;
        let xpub = ExtendedPublicKey::from_bytes(&xpub_bytes)
            .map_err(|e| SignerError::InvalidSigningFile(e.to_string()))?;
        Ok(Self { role, path, xpub })
    }
}

/// Signing files grouped by role, each group in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedFiles {
    pub payment: Vec<SigningFile>,
    pub stake: Vec<SigningFile>,
    pub pool_cold: Vec<SigningFile>,
}

impl PartitionedFiles {
    /// Stake files followed by pool cold files; what certificates resolve against
    pub fn certificate_files(&self) -> Vec<SigningFile> {
        self.stake.iter().chain(&self.pool_cold).cloned().collect()
    }
}

/// Group files by their role tag
pub fn partition(files: &[SigningFile]) -> PartitionedFiles {
    let by_role = |role: SigningRole| -> Vec<SigningFile> {
        files.iter().filter(|f| f.role == role).cloned().collect()
    };
    PartitionedFiles {
        payment: by_role(SigningRole::Payment),
        stake: by_role(SigningRole::Stake),
        pool_cold: by_role(SigningRole::PoolCold),
    }
}

/// Path of the first file whose public key hashes to `key_hash`
pub fn find_path_for_key_hash(key_hash: &[u8], files: &[SigningFile]) -> Option<DerivationPath> {
    files
        .iter()
        .find(|f| f.key_hash() == key_hash)
        .map(|f| f.path.clone())
}

/// Path of the first file carrying exactly `public_key`
pub fn find_path_for_key(public_key: &[u8], files: &[SigningFile]) -> Option<DerivationPath> {
    files
        .iter()
        .find(|f| f.xpub.public_key.as_slice() == public_key)
        .map(|f| f.path.clone())
}

/// Path to attach to input `input_index`
///
/// Returns the file at the same position, or the first file when there are
/// fewer files than inputs. The device only needs the set of paths, not a
/// positional mapping, so short lists fall back instead of failing. `None`
/// when there are no payment files at all (owner-witnessed pool registration).
pub fn resolve_input_path(payment_files: &[SigningFile], input_index: usize) -> Option<DerivationPath> {
    payment_files
        .get(input_index)
        .or_else(|| payment_files.first())
        .map(|f| f.path.clone())
}

/// Exact path lookup, used when matching device witnesses
pub fn find_by_path<'a>(files: &'a [SigningFile], path: &DerivationPath) -> Option<&'a SigningFile> {
    files.iter().find(|f| &f.path == path)
}
