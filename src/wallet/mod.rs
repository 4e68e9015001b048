//! Wallet Module
//!
//! Key-side building blocks of the signing engine: derivation paths and
//! their classification, hardware signing files, address packing and the
//! re-derivation of change addresses from signing files.

mod address;
mod address_params;
mod derivation_path;
mod keygen;
mod signing_file;

pub use address::*;
pub use address_params::*;
pub use derivation_path::*;
pub use keygen::*;
pub use signing_file::*;

/// True when none of the files is a Byron (legacy) spending key
pub fn are_signing_files_non_byron(files: &[SigningFile]) -> bool {
    files
        .iter()
        .all(|f| f.path.role() != PathRole::ByronSpendingKey)
}
