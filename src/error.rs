//! Unified error types for the signing engine
//!
//! Every condition the engine can reject a request for has its own variant,
//! so callers (and tests) can match on exactly what went wrong. Each variant
//! also maps to a serializable [`ErrorCode`] for reporting.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::device::firmware::Feature;

/// Main error type for all signing operations
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    // Signing-file / transaction correspondence
    #[error("Transaction has no inputs")]
    MissingInput,

    #[error("Missing payment signing file")]
    MissingPaymentSigningFile,

    #[error("Too many payment signing files")]
    TooManyPaymentSigningFiles,

    #[error("Payment signing files are not allowed when witnessing a pool registration as owner")]
    TooManyPaymentFilesWithPoolRegistration,

    #[error("Missing stake signing file")]
    MissingStakeSigningFile,

    #[error("Too many stake signing files")]
    TooManyStakeSigningFiles,

    #[error("Missing pool cold signing file")]
    MissingPoolColdSigningFile,

    #[error("Too many pool cold signing files")]
    TooManyPoolColdSigningFiles,

    #[error("A pool registration certificate must be the only certificate in the transaction")]
    MultipleCertificatesWithPoolRegistration,

    #[error("Withdrawals are not allowed in a transaction with a pool registration certificate")]
    WithdrawalIncludedWithPoolRegistration,

    #[error("Transactions containing a pool registration can only be witnessed, not signed")]
    CantSignTxWithPoolRegistration,

    #[error("Only transactions containing a pool registration certificate can be witnessed")]
    CantWitnessTxWithoutPoolRegistration,

    // Request construction
    #[error("Missing signing file for certificate")]
    MissingSigningFileForCertificate,

    #[error("Missing signing file for withdrawal")]
    MissingSigningFileForWithdrawal,

    #[error("Unsupported relay type: {0}")]
    UnsupportedRelayType(u64),

    #[error("Unknown certificate type: {0}")]
    UnknownCertificate(u64),

    #[error("A pool owner backed by a local signing file may appear only once")]
    OwnerMultipleTimesInTx,

    // Firmware gating
    #[error("Device firmware does not support {feature} (requires {required}, device has {actual})")]
    FeatureNotSupported {
        feature: Feature,
        required: String,
        actual: String,
    },

    // Device response reconciliation
    #[error("Transaction id returned by the device does not match the unsigned transaction")]
    TxSerializationMismatch,

    #[error("Auxiliary data hash returned by the device does not match the serialized metadata")]
    MetadataSerializationMismatch,

    #[error("Device response is missing the auxiliary data supplement")]
    MissingAuxiliaryDataSupplement,

    #[error("No signing file matches witness path {0}")]
    MissingSigningDataAtPath(String),

    #[error("Witness signature for path {0} does not verify against the transaction")]
    InvalidWitnessSignature(String),

    // Addresses
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Voting registration rewards address must be a base or reward address")]
    InvalidVotingRegistrationAddressType,

    #[error("No signing file reproduces the voting registration rewards address")]
    AuxSigningFileNotFoundForVotingRewardAddress,

    // Inputs and files
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Invalid signing file: {0}")]
    InvalidSigningFile(String),

    #[error("Invalid key-gen inputs: paths, signing files and verification key files must be non-empty and of equal length")]
    InvalidKeyGenInputs,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Device returned data of an unexpected shape: {0}")]
    InternalInvalidType(String),

    // Provider
    #[error("Operation not supported by this signing provider: {0}")]
    UnsupportedProviderCall(&'static str),

    #[error("Device operation failed: {0}")]
    DeviceOperation(String),

    // Conversions
    #[error("CBOR encoding failed: {0}")]
    CborEncode(#[from] minicbor::encode::Error<Infallible>),

    #[error("CBOR decoding failed: {0}")]
    CborDecode(#[from] minicbor::decode::Error),

    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bech32 error: {0}")]
    Bech32(#[from] bech32::Error),
}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidSigningFiles,
    InvalidTransaction,
    MissingSigningFile,
    Unsupported,
    FeatureNotSupported,
    SerializationMismatch,
    InvalidWitness,
    InvalidAddress,
    InvalidInput,
    DeviceError,
    ParseError,
}

impl SignerError {
    pub fn code(&self) -> ErrorCode {
        use SignerError::*;
        match self {
            MissingPaymentSigningFile
            | TooManyPaymentSigningFiles
            | TooManyPaymentFilesWithPoolRegistration
            | MissingStakeSigningFile
            | TooManyStakeSigningFiles
            | MissingPoolColdSigningFile
            | TooManyPoolColdSigningFiles => ErrorCode::InvalidSigningFiles,

            MissingInput
            | MultipleCertificatesWithPoolRegistration
            | WithdrawalIncludedWithPoolRegistration
            | CantSignTxWithPoolRegistration
            | CantWitnessTxWithoutPoolRegistration
            | OwnerMultipleTimesInTx
            | UnknownCertificate(_) => ErrorCode::InvalidTransaction,

            MissingSigningFileForCertificate
            | MissingSigningFileForWithdrawal
            | MissingSigningDataAtPath(_)
            | AuxSigningFileNotFoundForVotingRewardAddress => ErrorCode::MissingSigningFile,

            UnsupportedRelayType(_) | UnsupportedProviderCall(_) => ErrorCode::Unsupported,

            FeatureNotSupported { .. } => ErrorCode::FeatureNotSupported,

            TxSerializationMismatch | MetadataSerializationMismatch => {
                ErrorCode::SerializationMismatch
            }

            InvalidWitnessSignature(_) => ErrorCode::InvalidWitness,

            InvalidAddress(_) | InvalidVotingRegistrationAddressType => ErrorCode::InvalidAddress,

            InvalidPath(_) | InvalidSigningFile(_) | InvalidKeyGenInputs | InvalidConfig(_) => {
                ErrorCode::InvalidInput
            }

            DeviceOperation(_) | MissingAuxiliaryDataSupplement | InternalInvalidType(_) => {
                ErrorCode::DeviceError
            }

            CborEncode(_) | CborDecode(_) | Hex(_) | Json(_) | Bech32(_) => ErrorCode::ParseError,
        }
    }

    /// True when the device answered with something other than what was asked for.
    ///
    /// These are never retried and never downgraded.
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self,
            SignerError::TxSerializationMismatch
                | SignerError::MetadataSerializationMismatch
                | SignerError::InvalidWitnessSignature(_)
        )
    }
}

/// Serializable error report, suitable for handing to a CLI or FFI layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&SignerError> for ErrorReport {
    fn from(err: &SignerError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for signing operations
pub type SignerResult<T> = Result<T, SignerError>;
