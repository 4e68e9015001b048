//! Hashing Primitives
//!
//! The hash functions Cardano builds addresses, key hashes and transaction
//! ids from.

use blake2::digest::consts::{U28, U32};
use blake2::{Blake2b, Digest};
use sha3::Sha3_256;

/// Blake2b-224 (key hashes, address roots)
pub fn blake2b_224(data: &[u8]) -> [u8; 28] {
    let mut hasher = Blake2b::<U28>::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Blake2b-256 (transaction ids, auxiliary data hashes)
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA3-256, used only inside Byron address roots
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    Sha3_256::digest(data).into()
}

/// Key hash of a 32-byte Ed25519 public key
pub fn pub_key_hash(public_key: &[u8]) -> Vec<u8> {
    blake2b_224(public_key).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake2b_empty_vectors() {
        assert_eq!(
            hex::encode(blake2b_256(b"")),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
        assert_eq!(
            hex::encode(blake2b_224(b"")),
            "836cc68931c2e4e3e838602eca1902591d216837bafddfe6f0c8cb07"
        );
    }

    #[test]
    fn test_sha3_empty_vector() {
        assert_eq!(
            hex::encode(sha3_256(b"")),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_pub_key_hash_length() {
        assert_eq!(pub_key_hash(&[7u8; 32]).len(), 28);
    }
}
