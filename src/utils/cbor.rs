//! CBOR Helpers
//!
//! Thin wrappers over `minicbor` for the handful of shapes the engine
//! produces itself. Transaction bodies are never re-encoded here; they are
//! spliced in as the exact bytes the user supplied.

use minicbor::{Decoder, Encoder};

use crate::error::SignerResult;

/// Encode a single CBOR byte string
pub fn encode_bytes(bytes: &[u8]) -> SignerResult<Vec<u8>> {
    let mut enc = Encoder::new(Vec::new());
    enc.bytes(bytes)?;
    Ok(enc.into_writer())
}

/// Decode a single CBOR byte string
pub fn decode_bytes(cbor: &[u8]) -> SignerResult<Vec<u8>> {
    let mut dec = Decoder::new(cbor);
    Ok(dec.bytes()?.to_vec())
}

/// Encode an unsigned integer on its own
pub fn encode_u64(value: u64) -> SignerResult<Vec<u8>> {
    let mut enc = Encoder::new(Vec::new());
    enc.u64(value)?;
    Ok(enc.into_writer())
}

/// Encoding of the empty map `{}`
pub fn empty_map() -> SignerResult<Vec<u8>> {
    let mut enc = Encoder::new(Vec::new());
    enc.map(0)?;
    Ok(enc.into_writer())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_header() {
        let encoded = encode_bytes(&[0xab; 64]).unwrap();
        assert_eq!(&encoded[..2], &[0x58, 0x40]);
        assert_eq!(decode_bytes(&encoded).unwrap(), vec![0xab; 64]);
    }

    #[test]
    fn test_small_values() {
        assert_eq!(encode_u64(42).unwrap(), vec![0x18, 0x2a]);
        assert_eq!(empty_map().unwrap(), vec![0xa0]);
    }

    #[test]
    fn test_decode_rejects_non_bytes() {
        assert!(decode_bytes(&[0x01]).is_err());
    }
}
