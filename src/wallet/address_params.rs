//! Address Parameter Derivation
//!
//! Re-derives an address from the user's signing files so that outputs
//! paying back to the user's own keys can be shown on the device as
//! "yours" (change) rather than as a third-party destination.

use serde::{Deserialize, Serialize};

use crate::error::SignerResult;
use crate::types::Network;
use crate::wallet::address::{self, AddressType};
use crate::wallet::derivation_path::{DerivationPath, PathRole};
use crate::wallet::signing_file::SigningFile;

/// An address together with the paths that reproduce it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParameters {
    pub address: Vec<u8>,
    pub address_type: AddressType,
    pub payment_path: Option<DerivationPath>,
    pub stake_path: Option<DerivationPath>,
}

impl AddressParameters {
    /// True when the derived bytes are exactly `address`
    pub fn matches(&self, address: &[u8]) -> bool {
        self.address.as_slice() == address
    }
}

fn is_staking(file: &SigningFile) -> bool {
    file.path.role() == PathRole::StakingKey
}

fn derive_bootstrap(file: &SigningFile, network: &Network) -> SignerResult<Option<AddressParameters>> {
    let address = address::pack_bootstrap_address(&file.xpub, network.protocol_magic)?;
    Ok(address::address_type(&address).map(|address_type| AddressParameters {
        address,
        address_type,
        payment_path: Some(file.path.clone()),
        stake_path: None,
    }))
}

fn derive_base(files: &[SigningFile], network: &Network) -> Option<AddressParameters> {
    let stake_file = files.iter().find(|f| is_staking(f))?;
    let payment_file = files.iter().find(|f| !is_staking(f))?;
    let address = address::pack_base_address(
        &payment_file.key_hash(),
        &stake_file.key_hash(),
        network.network_id,
    );
    Some(AddressParameters {
        address,
        address_type: AddressType::Base,
        payment_path: Some(payment_file.path.clone()),
        stake_path: Some(stake_file.path.clone()),
    })
}

fn derive_enterprise(file: &SigningFile, network: &Network) -> AddressParameters {
    AddressParameters {
        address: address::pack_enterprise_address(&file.key_hash(), network.network_id),
        address_type: AddressType::Enterprise,
        payment_path: Some(file.path.clone()),
        stake_path: None,
    }
}

fn derive_reward(files: &[SigningFile], network: &Network) -> Option<AddressParameters> {
    let stake_file = files.iter().find(|f| is_staking(f))?;
    Some(AddressParameters {
        address: address::pack_reward_address(&stake_file.key_hash(), network.network_id),
        address_type: AddressType::Reward,
        payment_path: None,
        stake_path: Some(stake_file.path.clone()),
    })
}

/// Derive the address of the same structural type as `target` from `files`
///
/// `None` means the address cannot be attributed to these files; derivation
/// errors are reported the same way. Callers still compare the derived bytes
/// against `target` (see [`AddressParameters::matches`]).
pub fn get_address_parameters(
    files: &[SigningFile],
    target: &[u8],
    network: &Network,
) -> Option<AddressParameters> {
    match address::address_type(target)? {
        AddressType::Bootstrap => derive_bootstrap(files.first()?, network).ok().flatten(),
        AddressType::Base => derive_base(files, network),
        AddressType::Enterprise => Some(derive_enterprise(files.first()?, network)),
        AddressType::Reward => derive_reward(files, network),
        AddressType::Pointer => None,
    }
}
