//! Recording Device
//!
//! In-memory [`SigningDevice`] that records every request it receives and
//! answers signing requests with responses scripted in advance, in order.
//! It never signs anything itself.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};

use crate::device::{
    DeviceVersion, ShowAddressRequest, SignTxResponse, SigningDevice, SigningRequest,
};
use crate::error::{SignerError, SignerResult};
use crate::types::ExtendedPublicKey;
use crate::wallet::DerivationPath;

/// A request as seen by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    GetVersion,
    GetExtendedPublicKeys(Vec<DerivationPath>),
    ShowAddress(ShowAddressRequest),
    SignTransaction(SigningRequest),
}

#[derive(Debug, Clone)]
pub struct RecordingDevice {
    version: DeviceVersion,
    xpubs: HashMap<DerivationPath, ExtendedPublicKey>,
    responses: VecDeque<SignTxResponse>,
    requests: Vec<RecordedRequest>,
}

impl RecordingDevice {
    pub fn new(version: DeviceVersion) -> Self {
        Self {
            version,
            xpubs: HashMap::new(),
            responses: VecDeque::new(),
            requests: Vec::new(),
        }
    }

    /// Key returned for `path` by `get_extended_public_keys`
    pub fn with_xpub(mut self, path: DerivationPath, xpub: ExtendedPublicKey) -> Self {
        self.xpubs.insert(path, xpub);
        self
    }

    /// Queue the answer to the next signing request
    pub fn with_response(mut self, response: SignTxResponse) -> Self {
        self.responses.push_back(response);
        self
    }

    pub fn push_response(&mut self, response: SignTxResponse) {
        self.responses.push_back(response);
    }

    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }

    /// Signing requests only, in arrival order
    pub fn signing_requests(&self) -> Vec<&SigningRequest> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                RecordedRequest::SignTransaction(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    /// Number of scripted responses not yet consumed
    pub fn pending_responses(&self) -> usize {
        self.responses.len()
    }
}

#[async_trait]
impl SigningDevice for RecordingDevice {
    async fn get_version(&mut self) -> SignerResult<DeviceVersion> {
        self.requests.push(RecordedRequest::GetVersion);
        Ok(self.version)
    }

    async fn get_extended_public_keys(
        &mut self,
        paths: &[DerivationPath],
    ) -> SignerResult<Vec<ExtendedPublicKey>> {
        self.requests
            .push(RecordedRequest::GetExtendedPublicKeys(paths.to_vec()));
        paths
            .iter()
            .map(|path| {
                self.xpubs.get(path).copied().ok_or_else(|| {
                    SignerError::DeviceOperation(format!("no key scripted for {}", path))
                })
            })
            .collect()
    }

    async fn show_address(&mut self, request: ShowAddressRequest) -> SignerResult<()> {
        self.requests.push(RecordedRequest::ShowAddress(request));
        Ok(())
    }

    async fn sign_transaction(&mut self, request: SigningRequest) -> SignerResult<SignTxResponse> {
        self.requests.push(RecordedRequest::SignTransaction(request));
        self.responses.pop_front().ok_or_else(|| {
            SignerError::DeviceOperation("no scripted response for signing request".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_and_replays() {
        let path = DerivationPath::parse("1852H/1815H/0H/0/0").unwrap();
        let xpub = ExtendedPublicKey::new([1u8; 32], [2u8; 32]);
        let mut device = RecordingDevice::new(DeviceVersion::new(2, 4, 0))
            .with_xpub(path.clone(), xpub)
            .with_response(SignTxResponse::new("00", Vec::new()));

        assert_eq!(device.get_version().await.unwrap(), DeviceVersion::new(2, 4, 0));
        assert_eq!(
            device.get_extended_public_keys(&[path.clone()]).await.unwrap(),
            vec![xpub]
        );
        assert!(device
            .get_extended_public_keys(&[DerivationPath::parse("1852H/1815H/1H/0/0").unwrap()])
            .await
            .is_err());
        assert_eq!(device.pending_responses(), 1);
        assert_eq!(device.requests().len(), 3);
        assert_eq!(
            device.requests()[1],
            RecordedRequest::GetExtendedPublicKeys(vec![path])
        );
    }
}
