//! Signing Device Boundary
//!
//! The hardware device is reached only through [`SigningDevice`]. Every
//! call is a single awaited request/response exchange; the device may wait
//! on a human for confirmation, so callers impose no timeout. Methods take
//! `&mut self`, which keeps at most one exchange outstanding per device.
//!
//! - `firmware`: capability table keyed by device version
//! - `types`: request and response model
//! - `recording`: deterministic in-memory device

pub mod firmware;
pub mod recording;
pub mod types;

pub use firmware::*;
pub use recording::*;
pub use types::*;

use async_trait::async_trait;

use crate::error::SignerResult;
use crate::types::ExtendedPublicKey;
use crate::wallet::DerivationPath;

/// Abstract hardware signing device
#[async_trait]
pub trait SigningDevice: Send {
    /// App version running on the device
    async fn get_version(&mut self) -> SignerResult<DeviceVersion>;

    /// Extended public keys, positionally matched to `paths`
    async fn get_extended_public_keys(
        &mut self,
        paths: &[DerivationPath],
    ) -> SignerResult<Vec<ExtendedPublicKey>>;

    /// Display an address on the device screen for verification
    async fn show_address(&mut self, request: ShowAddressRequest) -> SignerResult<()>;

    /// Sign a transaction (or the dummy transaction of an auxiliary-data exchange)
    async fn sign_transaction(&mut self, request: SigningRequest) -> SignerResult<SignTxResponse>;
}
