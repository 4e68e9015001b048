//! Utilities Module
//!
//! Hashing, CBOR helpers, logging and signer configuration shared by the
//! rest of the crate.

pub mod cbor;
pub mod crypto;
pub mod logging;
pub mod signer_config;

pub use signer_config::*;
