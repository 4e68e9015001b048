//! Firmware Capability Gating
//!
//! Each optional capability is unlocked at a minimum device app version.
//! Versions compare component-wise, earlier components dominating.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{SignerError, SignerResult};

/// Semantic version reported by the device app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl DeviceVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// `self >= threshold`
    pub fn is_at_least(&self, threshold: &DeviceVersion) -> bool {
        self >= threshold
    }
}

impl Ord for DeviceVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for DeviceVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DeviceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Capabilities that depend on the device firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    OptionalTtl,
    ValidityIntervalStart,
    MultiAsset,
    PoolRegistrationOperator,
    VotingRegistration,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::OptionalTtl => "optional ttl",
            Feature::ValidityIntervalStart => "validity interval start",
            Feature::MultiAsset => "multi-asset outputs",
            Feature::PoolRegistrationOperator => "pool registration as operator",
            Feature::VotingRegistration => "voting registration",
        };
        write!(f, "{}", name)
    }
}

/// Minimum firmware version per capability
pub const MIN_VERSIONS: [(Feature, DeviceVersion); 5] = [
    (Feature::OptionalTtl, DeviceVersion::new(2, 1, 0)),
    (Feature::ValidityIntervalStart, DeviceVersion::new(2, 1, 0)),
    (Feature::MultiAsset, DeviceVersion::new(2, 2, 0)),
    (Feature::VotingRegistration, DeviceVersion::new(2, 3, 0)),
    (Feature::PoolRegistrationOperator, DeviceVersion::new(2, 4, 0)),
];

impl Feature {
    pub fn min_version(&self) -> Option<DeviceVersion> {
        MIN_VERSIONS
            .iter()
            .find(|(feature, _)| feature == self)
            .map(|(_, version)| *version)
    }
}

/// Whether `version` supports `feature`; capabilities missing from the
/// table are unsupported
pub fn is_supported(version: &DeviceVersion, feature: Feature) -> bool {
    feature
        .min_version()
        .map_or(false, |min| version.is_at_least(&min))
}

pub fn ensure_supported(version: &DeviceVersion, feature: Feature) -> SignerResult<()> {
    if is_supported(version, feature) {
        return Ok(());
    }
    Err(SignerError::FeatureNotSupported {
        feature,
        required: feature
            .min_version()
            .map_or_else(|| "unknown".to_string(), |v| v.to_string()),
        actual: version.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        let v = DeviceVersion::new(2, 2, 0);
        assert!(v.is_at_least(&DeviceVersion::new(2, 2, 0)));
        assert!(v.is_at_least(&DeviceVersion::new(2, 1, 9)));
        assert!(v.is_at_least(&DeviceVersion::new(1, 9, 9)));
        assert!(!v.is_at_least(&DeviceVersion::new(2, 2, 1)));
        assert!(!v.is_at_least(&DeviceVersion::new(3, 0, 0)));
        // earlier components dominate
        assert!(DeviceVersion::new(3, 0, 0).is_at_least(&DeviceVersion::new(2, 9, 9)));
    }

    #[test]
    fn test_every_feature_has_a_threshold() {
        for feature in [
            Feature::OptionalTtl,
            Feature::ValidityIntervalStart,
            Feature::MultiAsset,
            Feature::PoolRegistrationOperator,
            Feature::VotingRegistration,
        ] {
            assert!(feature.min_version().is_some());
        }
    }

    #[test]
    fn test_ensure_supported() {
        let old = DeviceVersion::new(2, 0, 4);
        assert!(ensure_supported(&old, Feature::OptionalTtl).is_err());
        let err = ensure_supported(&DeviceVersion::new(2, 3, 5), Feature::PoolRegistrationOperator)
            .unwrap_err();
        assert!(err.to_string().contains("2.4.0"));
        assert!(ensure_supported(&DeviceVersion::new(2, 4, 0), Feature::PoolRegistrationOperator).is_ok());
    }
}
