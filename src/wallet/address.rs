//! Cardano Address Encoding
//!
//! Structural address types, packing of Shelley and Byron (bootstrap)
//! addresses from key material, and text encoding:
//! - Shelley: header byte `type << 4 | network_id` followed by key hashes,
//!   bech32 with `addr`/`stake` (plus `_test`) prefixes
//! - Byron: CBOR `[tag24(payload), crc32(payload)]`, base58

use bech32::{FromBase32, ToBase32, Variant};
use minicbor::data::Tag;
use minicbor::{Decoder, Encoder};
use serde::{Deserialize, Serialize};

use crate::error::{SignerError, SignerResult};
use crate::types::{network_ids, protocol_magics, ExtendedPublicKey};
use crate::utils::{cbor, crypto};

/// Address header types the engine knows how to attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    Base,
    Pointer,
    Enterprise,
    Bootstrap,
    Reward,
}

impl AddressType {
    /// Header nibble value
    pub fn nibble(&self) -> u8 {
        match self {
            AddressType::Base => 0b0000,
            AddressType::Pointer => 0b0100,
            AddressType::Enterprise => 0b0110,
            AddressType::Bootstrap => 0b1000,
            AddressType::Reward => 0b1110,
        }
    }

    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0b0000 => Some(AddressType::Base),
            0b0100 => Some(AddressType::Pointer),
            0b0110 => Some(AddressType::Enterprise),
            0b1000 => Some(AddressType::Bootstrap),
            0b1110 => Some(AddressType::Reward),
            _ => None,
        }
    }
}

/// Structural type of raw address bytes; `None` for anything unrecognized
/// (including script-hash variants)
pub fn address_type(address: &[u8]) -> Option<AddressType> {
    address.first().and_then(|b| AddressType::from_nibble(b >> 4))
}

fn shelley_header(address_type: AddressType, network_id: u8) -> u8 {
    (address_type.nibble() << 4) | (network_id & 0x0f)
}

/// Network id from a Shelley header
pub fn shelley_network_id(address: &[u8]) -> Option<u8> {
    address.first().map(|b| b & 0x0f)
}

/// Base address: payment key hash followed by staking key hash
pub fn pack_base_address(payment_key_hash: &[u8], stake_key_hash: &[u8], network_id: u8) -> Vec<u8> {
    let mut address = Vec::with_capacity(57);
    address.push(shelley_header(AddressType::Base, network_id));
    address.extend_from_slice(payment_key_hash);
    address.extend_from_slice(stake_key_hash);
    address
}

/// Enterprise address: payment key hash only
pub fn pack_enterprise_address(payment_key_hash: &[u8], network_id: u8) -> Vec<u8> {
    let mut address = Vec::with_capacity(29);
    address.push(shelley_header(AddressType::Enterprise, network_id));
    address.extend_from_slice(payment_key_hash);
    address
}

/// Reward address: staking key hash only
pub fn pack_reward_address(stake_key_hash: &[u8], network_id: u8) -> Vec<u8> {
    let mut address = Vec::with_capacity(29);
    address.push(shelley_header(AddressType::Reward, network_id));
    address.extend_from_slice(stake_key_hash);
    address
}

/// Staking key hash carried by a reward address
pub fn reward_address_to_key_hash(address: &[u8]) -> Vec<u8> {
    address.get(1..).map(<[u8]>::to_vec).unwrap_or_default()
}

/// Key of the protocol magic in Byron address attributes
const ATTR_PROTOCOL_MAGIC: u64 = 2;

fn encode_bootstrap_attributes(enc: &mut Encoder<Vec<u8>>, protocol_magic: u32) -> SignerResult<()> {
    if protocol_magic == protocol_magics::MAINNET {
        enc.map(0)?;
    } else {
        enc.map(1)?
            .u64(ATTR_PROTOCOL_MAGIC)?
            .bytes(&cbor::encode_u64(protocol_magic.into())?)?;
    }
    Ok(())
}

/// Byron address for a hardware-wallet key (derivation scheme 2, so no
/// encrypted path attribute)
pub fn pack_bootstrap_address(xpub: &ExtendedPublicKey, protocol_magic: u32) -> SignerResult<Vec<u8>> {
    // [addr_type, [0, xpub], attributes]
    let mut root_input = Encoder::new(Vec::new());
    root_input.array(3)?.u8(0)?.array(2)?.u8(0)?.bytes(&xpub.to_bytes())?;
    encode_bootstrap_attributes(&mut root_input, protocol_magic)?;
    let root = crypto::blake2b_224(&crypto::sha3_256(&root_input.into_writer()));

    // [root, attributes, addr_type]
    let mut payload = Encoder::new(Vec::new());
    payload.array(3)?.bytes(&root)?;
    encode_bootstrap_attributes(&mut payload, protocol_magic)?;
    payload.u8(0)?;
    let payload = payload.into_writer();

    let mut address = Encoder::new(Vec::new());
    address
        .array(2)?
        .tag(Tag::new(24))?
        .bytes(&payload)?
        .u32(crc32fast::hash(&payload))?;
    Ok(address.into_writer())
}

/// Protocol magic of a Byron address (mainnet when the attribute is absent)
pub fn bootstrap_protocol_magic(address: &[u8]) -> SignerResult<u32> {
    let mut outer = Decoder::new(address);
    outer.array()?;
    let tag = outer.tag()?;
    if tag.as_u64() != 24 {
        return Err(SignerError::InvalidAddress(format!(
            "unexpected bootstrap tag {}",
            tag.as_u64()
        )));
    }
    let payload = outer.bytes()?;
    let checksum = outer.u32()?;
    if checksum != crc32fast::hash(payload) {
        return Err(SignerError::InvalidAddress(
            "bootstrap address checksum mismatch".to_string(),
        ));
    }

    let mut inner = Decoder::new(payload);
    inner.array()?;
    inner.bytes()?;
    let entries = inner.map()?.unwrap_or(0);
    for _ in 0..entries {
        let key = inner.u64()?;
        let value = inner.bytes()?;
        if key == ATTR_PROTOCOL_MAGIC {
            return Ok(Decoder::new(value).u32()?);
        }
    }
    Ok(protocol_magics::MAINNET)
}

/// Text form of an address: base58 for Byron, bech32 otherwise
pub fn encode_address(address: &[u8]) -> SignerResult<String> {
    let kind = address_type(address)
        .ok_or_else(|| SignerError::InvalidAddress(hex::encode(address)))?;
    if kind == AddressType::Bootstrap {
        return Ok(bs58::encode(address).into_string());
    }
    let prefix = match kind {
        AddressType::Reward => "stake",
        _ => "addr",
    };
    let hrp = if shelley_network_id(address) == Some(network_ids::TESTNET) {
        format!("{}_test", prefix)
    } else {
        prefix.to_string()
    };
    Ok(bech32::encode(&hrp, address.to_base32(), Variant::Bech32)?)
}

/// Raw bytes of a bech32 or base58 address
pub fn decode_address(text: &str) -> SignerResult<Vec<u8>> {
    let trimmed = text.trim();
    if let Ok((_, data, _)) = bech32::decode(trimmed) {
        return Ok(Vec::<u8>::from_base32(&data)?);
    }
    let bytes = bs58::decode(trimmed)
        .into_vec()
        .map_err(|e| SignerError::InvalidAddress(format!("{}: {}", trimmed, e)))?;
    if address_type(&bytes) != Some(AddressType::Bootstrap) {
        return Err(SignerError::InvalidAddress(trimmed.to_string()));
    }
    Ok(bytes)
}

/// What the device needs to know about an address it is asked to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressAttributes {
    pub address_type: AddressType,
    pub network_id: u8,
    pub protocol_magic: u32,
}

/// Type, network id and protocol magic of a textual address
pub fn address_attributes(text: &str) -> SignerResult<AddressAttributes> {
    let bytes = decode_address(text)?;
    let address_type = address_type(&bytes)
        .ok_or_else(|| SignerError::InvalidAddress(text.to_string()))?;

    if address_type == AddressType::Bootstrap {
        let protocol_magic = bootstrap_protocol_magic(&bytes)?;
        let network_id = if protocol_magic == protocol_magics::MAINNET {
            network_ids::MAINNET
        } else {
            network_ids::TESTNET
        };
        return Ok(AddressAttributes {
            address_type,
            network_id,
            protocol_magic,
        });
    }

    let network_id = shelley_network_id(&bytes)
        .ok_or_else(|| SignerError::InvalidAddress(text.to_string()))?;
    let protocol_magic = if network_id == network_ids::MAINNET {
        protocol_magics::MAINNET
    } else {
        protocol_magics::TESTNET
    };
    Ok(AddressAttributes {
        address_type,
        network_id,
        protocol_magic,
    })
}

/// Dotted-quad rendering of a relay IPv4 address
pub fn ipv4_to_string(ipv4: &[u8]) -> String {
    ipv4.iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Relay IPv6 rendering: each 4-byte word is stored little-endian on chain
pub fn ipv6_to_string(ipv6: &[u8]) -> String {
    let swapped: Vec<u8> = ipv6
        .chunks(4)
        .flat_map(|word| word.iter().rev().copied())
        .collect();
    let hex = hex::encode(swapped);
    hex.as_bytes()
        .chunks(4)
        .map(|group| String::from_utf8_lossy(group).into_owned())
        .collect::<Vec<_>>()
        .join(":")
}
