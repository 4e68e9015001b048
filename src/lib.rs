//! Cardano Hardware Signer
//!
//! Orchestrates transaction signing against a Cardano hardware wallet.
//!
//! # Architecture
//!
//! This crate provides:
//! - **wallet**: Derivation path classification, signing files, addresses
//! - **tx**: Unsigned transactions, signing-file validation, witnesses
//! - **device**: The device seam, firmware gating and request/response types
//! - **signing**: Use-case determination, request building, reconciliation
//! - **utils**: Hashing, CBOR helpers, logging and configuration
//!
//! Nothing here talks to USB or HID. A [`device::SigningDevice`]
//! implementation carries requests to the hardware; [`device::RecordingDevice`]
//! is a scripted stand-in for tests and dry runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use cardano_hw_signer::{HwSigner, SignerConfig};
//!
//! let mut signer = HwSigner::connect(device, SignerConfig::mainnet()).await?;
//! let signed = signer.sign_tx(&tx, &signing_files, &[]).await?;
//! println!("{}", hex::encode(signed));
//! ```

pub mod device;
pub mod error;
pub mod signing;
pub mod tx;
pub mod types;
pub mod utils;
pub mod wallet;

// Re-export key types for convenience
pub use error::{ErrorCode, ErrorReport, SignerError, SignerResult};
pub use types::*;

pub use device::{DeviceVersion, Feature, RecordingDevice, SigningDevice, SigningMode};
pub use signing::HwSigner;
pub use tx::{TxWitness, UnsignedTransaction, WitnessFile};
pub use utils::SignerConfig;
pub use wallet::{DerivationPath, PathRole, SigningFile, SigningRole};
