//! Transaction Witnesses
//!
//! Typed witnesses rebuilt from device signatures and their CBOR forms:
//! - Shelley: `[vkey, signature]`
//! - Byron:   `[vkey, signature, chain_code, attributes]`
//!
//! A signed transaction is `[body, witness_set, auxiliary_data | null]`
//! where the body is spliced in as the exact bytes that were hashed.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use minicbor::Encoder;
use serde::{Deserialize, Serialize};

use crate::error::SignerResult;
use crate::utils::cbor;

/// Witness set keys
pub mod witness_keys {
    pub const SHELLEY: u64 = 0;
    pub const BYRON: u64 = 2;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelleyWitness {
    #[serde(with = "hex::serde")]
    pub public_key: [u8; 32],
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByronWitness {
    #[serde(with = "hex::serde")]
    pub public_key: [u8; 32],
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub chain_code: [u8; 32],
    /// CBOR of the (always empty) address attributes map
    #[serde(with = "hex::serde")]
    pub attributes: Vec<u8>,
}

impl ByronWitness {
    pub fn new(public_key: [u8; 32], signature: Vec<u8>, chain_code: [u8; 32]) -> SignerResult<Self> {
        Ok(Self {
            public_key,
            signature,
            chain_code,
            attributes: cbor::empty_map()?,
        })
    }
}

/// A witness of either era
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxWitness {
    Shelley(ShelleyWitness),
    Byron(ByronWitness),
}

impl TxWitness {
    pub fn public_key(&self) -> &[u8; 32] {
        match self {
            TxWitness::Shelley(w) => &w.public_key,
            TxWitness::Byron(w) => &w.public_key,
        }
    }

    pub fn signature(&self) -> &[u8] {
        match self {
            TxWitness::Shelley(w) => &w.signature,
            TxWitness::Byron(w) => &w.signature,
        }
    }

    pub fn is_byron(&self) -> bool {
        matches!(self, TxWitness::Byron(_))
    }

    /// Ed25519 check of the signature over `message` (the transaction id)
    pub fn verify(&self, message: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(self.public_key()) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(self.signature()) else {
            return false;
        };
        key.verify(message, &signature).is_ok()
    }

    /// Standalone encoding: `[0, shelley]` or `[1, byron]`
    pub fn to_cbor(&self) -> SignerResult<Vec<u8>> {
        let mut enc = Encoder::new(Vec::new());
        enc.array(2)?;
        match self {
            TxWitness::Shelley(w) => {
                enc.u8(0)?;
                encode_shelley(&mut enc, w)?;
            }
            TxWitness::Byron(w) => {
                enc.u8(1)?;
                encode_byron(&mut enc, w)?;
            }
        }
        Ok(enc.into_writer())
    }

    /// JSON envelope written to a witness file
    pub fn to_file(&self) -> SignerResult<WitnessFile> {
        Ok(WitnessFile {
            file_type: WitnessFile::TYPE.to_string(),
            description: String::new(),
            cbor_hex: hex::encode(self.to_cbor()?),
        })
    }
}

/// Witnesses rebuilt from one device response, grouped by era
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WitnessSet {
    pub byron: Vec<ByronWitness>,
    pub shelley: Vec<ShelleyWitness>,
}

impl WitnessSet {
    pub fn len(&self) -> usize {
        self.byron.len() + self.shelley.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shelley witnesses first, then Byron
    pub fn into_typed(self) -> Vec<TxWitness> {
        self.shelley
            .into_iter()
            .map(TxWitness::Shelley)
            .chain(self.byron.into_iter().map(TxWitness::Byron))
            .collect()
    }
}

/// On-disk witness envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessFile {
    #[serde(rename = "type")]
    pub file_type: String,
    pub description: String,
    #[serde(rename = "cborHex")]
    pub cbor_hex: String,
}

impl WitnessFile {
    pub const TYPE: &'static str = "TxWitnessShelley";
}

fn encode_shelley(enc: &mut Encoder<Vec<u8>>, w: &ShelleyWitness) -> SignerResult<()> {
    enc.array(2)?.bytes(&w.public_key)?.bytes(&w.signature)?;
    Ok(())
}

fn encode_byron(enc: &mut Encoder<Vec<u8>>, w: &ByronWitness) -> SignerResult<()> {
    enc.array(4)?
        .bytes(&w.public_key)?
        .bytes(&w.signature)?
        .bytes(&w.chain_code)?
        .bytes(&w.attributes)?;
    Ok(())
}

/// Full signed transaction
///
/// Empty witness groups are left out of the witness set.
pub fn encode_signed_tx(
    body_cbor: &[u8],
    auxiliary_data_cbor: Option<&[u8]>,
    byron: &[ByronWitness],
    shelley: &[ShelleyWitness],
) -> SignerResult<Vec<u8>> {
    let mut head = Encoder::new(Vec::new());
    head.array(3)?;
    let mut out = head.into_writer();
    out.extend_from_slice(body_cbor);

    let mut enc = Encoder::new(out);
    let groups = u64::from(!shelley.is_empty()) + u64::from(!byron.is_empty());
    enc.map(groups)?;
    if !shelley.is_empty() {
        enc.u64(witness_keys::SHELLEY)?.array(shelley.len() as u64)?;
        for w in shelley {
            encode_shelley(&mut enc, w)?;
        }
    }
    if !byron.is_empty() {
        enc.u64(witness_keys::BYRON)?.array(byron.len() as u64)?;
        for w in byron {
            encode_byron(&mut enc, w)?;
        }
    }

    let mut out = enc.into_writer();
    match auxiliary_data_cbor {
        Some(aux) => out.extend_from_slice(aux),
        None => {
            let mut tail = Encoder::new(out);
            tail.null()?;
            out = tail.into_writer();
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};
    use minicbor::Decoder;

    fn signed_witness(message: &[u8]) -> ShelleyWitness {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        ShelleyWitness {
            public_key: key.verifying_key().to_bytes(),
            signature: key.sign(message).to_bytes().to_vec(),
        }
    }

    #[test]
    fn test_verify() {
        let witness = TxWitness::Shelley(signed_witness(b"tx id"));
        assert!(witness.verify(b"tx id"));
        assert!(!witness.verify(b"other id"));

        let garbage = TxWitness::Shelley(ShelleyWitness {
            public_key: [0u8; 32],
            signature: vec![1, 2, 3],
        });
        assert!(!garbage.verify(b"tx id"));
    }

    #[test]
    fn test_standalone_encoding() {
        let shelley = TxWitness::Shelley(signed_witness(b"x"));
        let cbor = shelley.to_cbor().unwrap();
        assert_eq!(&cbor[..3], &[0x82, 0x00, 0x82]);

        let byron = TxWitness::Byron(ByronWitness::new([1u8; 32], vec![2u8; 64], [3u8; 32]).unwrap());
        let cbor = byron.to_cbor().unwrap();
        assert_eq!(&cbor[..3], &[0x82, 0x01, 0x84]);
        // attributes: bytes(0xa0)
        assert_eq!(&cbor[cbor.len() - 2..], &[0x41, 0xa0]);

        let file = byron.to_file().unwrap();
        assert_eq!(file.file_type, WitnessFile::TYPE);
        assert_eq!(file.cbor_hex, hex::encode(&cbor));
    }

    #[test]
    fn test_signed_tx_splices_body() {
        let body = vec![0xa1, 0x02, 0x18, 0x2a]; // {2: 42}
        let shelley = vec![signed_witness(b"x")];
        let tx = encode_signed_tx(&body, None, &[], &shelley).unwrap();

        assert_eq!(tx[0], 0x83);
        assert_eq!(&tx[1..5], body.as_slice());
        assert_eq!(*tx.last().unwrap(), 0xf6);

        let mut dec = Decoder::new(&tx);
        assert_eq!(dec.array().unwrap(), Some(3));
        dec.skip().unwrap();
        assert_eq!(dec.map().unwrap(), Some(1));
        assert_eq!(dec.u64().unwrap(), witness_keys::SHELLEY);
    }

    #[test]
    fn test_signed_tx_with_both_groups_and_aux_data() {
        let body = vec![0xa0];
        let byron = vec![ByronWitness::new([1u8; 32], vec![2u8; 64], [3u8; 32]).unwrap()];
        let shelley = vec![signed_witness(b"x")];
        let aux = vec![0x82, 0xa0, 0x80];
        let tx = encode_signed_tx(&body, Some(&aux), &byron, &shelley).unwrap();

        assert!(tx.ends_with(&aux));
        let mut dec = Decoder::new(&tx);
        dec.array().unwrap();
        dec.skip().unwrap();
        assert_eq!(dec.map().unwrap(), Some(2));
    }
}
