//! BIP32 Derivation Paths
//!
//! Parsing, formatting and role classification of Cardano key paths:
//! - `44'/1815'/a'/c/i`   Byron (legacy) wallet keys
//! - `1852'/1815'/a'/c/i` Shelley wallet keys (`c = 2, i = 0` is the staking key)
//! - `1853'/1815'/0'/i'`  stake pool cold keys

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SignerError, SignerResult};

/// Hardened offset for BIP-32 derivation
pub const HARDENED: u32 = 0x8000_0000;

/// Purposes and coin type used by Cardano paths
pub mod purposes {
    pub const BYRON: u32 = 44;
    pub const SHELLEY: u32 = 1852;
    pub const POOL_COLD_KEY: u32 = 1853;
    pub const ADA_COIN_TYPE: u32 = 1815;
}

/// Harden an index
pub const fn h(index: u32) -> u32 {
    index + HARDENED
}

/// Ordered sequence of path segments, hardened ones carrying the offset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    pub fn new(segments: Vec<u32>) -> Self {
        Self(segments)
    }

    /// Parse `1852H/1815H/0H/0/0` (also `'`/`h` suffixes and an `m/` prefix)
    pub fn parse(path: &str) -> SignerResult<Self> {
        let trimmed = path.trim();
        let body = trimmed
            .strip_prefix("m/")
            .or_else(|| trimmed.strip_prefix("M/"))
            .unwrap_or(trimmed);

        if body.is_empty() {
            return Err(SignerError::InvalidPath("empty derivation path".to_string()));
        }

        body.split('/')
            .map(parse_segment)
            .collect::<SignerResult<Vec<_>>>()
            .map(Self)
    }

    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn role(&self) -> PathRole {
        classify(self)
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(segments: Vec<u32>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            if *segment >= HARDENED {
                write!(f, "{}H", segment - HARDENED)?;
            } else {
                write!(f, "{}", segment)?;
            }
        }
        Ok(())
    }
}

fn parse_segment(s: &str) -> SignerResult<u32> {
    let trimmed = s.trim();

    let (number_str, hardened) = match trimmed.strip_suffix(['\'', 'h', 'H']) {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };

    let index: u32 = number_str
        .parse()
        .map_err(|e| SignerError::InvalidPath(format!("invalid segment '{}': {}", s, e)))?;

    if index >= HARDENED {
        return Err(SignerError::InvalidPath(format!(
            "segment {} exceeds maximum value",
            index
        )));
    }

    Ok(if hardened { h(index) } else { index })
}

/// What a path is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathRole {
    /// HD wallet account (`purpose'/1815'/account'`)
    WalletAccount,
    /// Legacy spending key, witnessed Byron-style
    ByronSpendingKey,
    /// Shelley spending key
    ShelleySpendingKey,
    /// Reward address key, withdrawal witness, pool owner
    StakingKey,
    /// Pool cold key in pool registrations and retirements
    PoolColdKey,
    /// Not one of the above
    Invalid,
}

/// Classify a path by its shape; total over all inputs
pub fn classify(path: &DerivationPath) -> PathRole {
    let p = path.segments();
    if p.len() < 3 {
        return PathRole::Invalid;
    }

    let coin = h(purposes::ADA_COIN_TYPE);

    if p[0] == h(purposes::POOL_COLD_KEY) {
        if p.len() != 4 || p[1] != coin || p[2] != h(0) || p[3] < HARDENED {
            return PathRole::Invalid;
        }
        return PathRole::PoolColdKey;
    }

    if p[0] == h(purposes::BYRON) {
        if p[1] != coin {
            return PathRole::Invalid;
        }
        return match p.len() {
            3 => PathRole::WalletAccount,
            5 => match p[3] {
                0 | 1 => PathRole::ByronSpendingKey,
                _ => PathRole::Invalid,
            },
            _ => PathRole::Invalid,
        };
    }

    if p[0] == h(purposes::SHELLEY) {
        if p[1] != coin {
            return PathRole::Invalid;
        }
        return match p.len() {
            3 => PathRole::WalletAccount,
            5 => match (p[3], p[4]) {
                (0 | 1, _) => PathRole::ShelleySpendingKey,
                (2, 0) => PathRole::StakingKey,
                _ => PathRole::Invalid,
            },
            _ => PathRole::Invalid,
        };
    }

    PathRole::Invalid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> DerivationPath {
        DerivationPath::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let p = path("m/1852'/1815'/0'/0/3");
        assert_eq!(p.segments(), &[h(1852), h(1815), h(0), 0, 3]);
        assert_eq!(p.to_string(), "1852H/1815H/0H/0/3");
        assert_eq!(path("44h/1815h/1h"), path("44H/1815H/1H"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(DerivationPath::parse("").is_err());
        assert!(DerivationPath::parse("m/").is_err());
        assert!(DerivationPath::parse("1852H/abc").is_err());
        assert!(DerivationPath::parse("1852H//0").is_err());
        assert!(DerivationPath::parse("2147483648").is_err());
    }

    #[test]
    fn test_short_paths_are_invalid() {
        assert_eq!(classify(&DerivationPath::default()), PathRole::Invalid);
        assert_eq!(classify(&path("1852H/1815H")), PathRole::Invalid);
    }

    #[test]
    fn test_shelley_paths() {
        assert_eq!(classify(&path("1852H/1815H/0H")), PathRole::WalletAccount);
        assert_eq!(classify(&path("1852H/1815H/0H/0/0")), PathRole::ShelleySpendingKey);
        assert_eq!(classify(&path("1852H/1815H/0H/1/7")), PathRole::ShelleySpendingKey);
        assert_eq!(classify(&path("1852H/1815H/4H/2/0")), PathRole::StakingKey);
        assert_eq!(classify(&path("1852H/1815H/0H/2/1")), PathRole::Invalid);
        assert_eq!(classify(&path("1852H/1815H/0H/3/0")), PathRole::Invalid);
        assert_eq!(classify(&path("1852H/1815H/0H/0")), PathRole::Invalid);
        assert_eq!(classify(&path("1852H/1816H/0H/0/0")), PathRole::Invalid);
    }

    #[test]
    fn test_byron_paths() {
        assert_eq!(classify(&path("44H/1815H/0H")), PathRole::WalletAccount);
        assert_eq!(classify(&path("44H/1815H/0H/0/1")), PathRole::ByronSpendingKey);
        assert_eq!(classify(&path("44H/1815H/0H/1/1")), PathRole::ByronSpendingKey);
        assert_eq!(classify(&path("44H/1815H/0H/2/0")), PathRole::Invalid);
        assert_eq!(classify(&path("44H/0H/0H/0/0")), PathRole::Invalid);
    }

    #[test]
    fn test_pool_cold_paths() {
        assert_eq!(classify(&path("1853H/1815H/0H/0H")), PathRole::PoolColdKey);
        assert_eq!(classify(&path("1853H/1815H/0H/0")), PathRole::Invalid);
        assert_eq!(classify(&path("1853H/1815H/1H/0H")), PathRole::Invalid);
        assert_eq!(classify(&path("1853H/1815H/0H/0H/0")), PathRole::Invalid);
    }

    #[test]
    fn test_unknown_purpose() {
        assert_eq!(classify(&path("84H/0H/0H/0/0")), PathRole::Invalid);
    }
}
