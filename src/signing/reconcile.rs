//! Response Reconciliation
//!
//! Checks what came back from the device against what was asked for and
//! turns raw device signatures into typed witnesses.

use crate::device::DeviceWitness;
use crate::error::{SignerError, SignerResult};
use crate::tx::{ByronWitness, ShelleyWitness, TxWitness, UnsignedTransaction, WitnessSet};
use crate::wallet::{find_by_path, PathRole, SigningFile};

/// The device must report the id of exactly the body it was given
pub fn verify_tx_id(tx: &UnsignedTransaction, reported_hex: &str) -> SignerResult<()> {
    match hex::decode(reported_hex.trim()) {
        Ok(reported) if reported.as_slice() == tx.id_bytes().as_slice() => Ok(()),
        _ => Err(SignerError::TxSerializationMismatch),
    }
}

/// Rebuild typed witnesses for the device signatures
///
/// Each signature is matched to the signing file with the same path. Byron
/// spending-key paths produce Byron witnesses; every other path produces a
/// Shelley witness. When `verify_message` is given, each signature must
/// verify against it.
pub fn create_witnesses(
    device_witnesses: &[DeviceWitness],
    files: &[SigningFile],
    verify_message: Option<&[u8]>,
) -> SignerResult<WitnessSet> {
    let mut set = WitnessSet::default();

    for witness in device_witnesses {
        let file = find_by_path(files, &witness.path)
            .ok_or_else(|| SignerError::MissingSigningDataAtPath(witness.path.to_string()))?;

        let typed = if witness.path.role() == PathRole::ByronSpendingKey {
            TxWitness::Byron(ByronWitness::new(
                file.xpub.public_key,
                witness.signature.clone(),
                file.xpub.chain_code,
            )?)
        } else {
            TxWitness::Shelley(ShelleyWitness {
                public_key: file.xpub.public_key,
                signature: witness.signature.clone(),
            })
        };

        if let Some(message) = verify_message {
            if !typed.verify(message) {
                return Err(SignerError::InvalidWitnessSignature(witness.path.to_string()));
            }
        }

        match typed {
            TxWitness::Byron(w) => set.byron.push(w),
            TxWitness::Shelley(w) => set.shelley.push(w),
        }
    }

    Ok(set)
}
