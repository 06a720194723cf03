//! Platform capability detection.
//!
//! Behaviour that depends on the OS version under test is decided once, up
//! front, into a [`PlatformCapabilities`] value. Accessors consult the flags
//! and never compare version strings themselves.

use crate::result::{PomError, PomResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating system family of the application under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// iOS / iPadOS
    Ios,
    /// macOS
    MacOs,
    /// tvOS
    TvOs,
    /// watchOS
    WatchOs,
    /// visionOS
    VisionOs,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ios => "iOS",
            Self::MacOs => "macOS",
            Self::TvOs => "tvOS",
            Self::WatchOs => "watchOS",
            Self::VisionOs => "visionOS",
        };
        f.write_str(name)
    }
}

/// Dotted OS version (`17`, `16.4`, `14.2.1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformVersion {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
    /// Patch component
    pub patch: u32,
}

impl PlatformVersion {
    /// Create a version
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dotted version string
    pub fn parse(raw: &str) -> PomResult<Self> {
        let invalid = || PomError::InvalidConfig {
            message: format!("invalid platform version {raw:?}"),
        };
        let mut parts = raw.trim().split('.');
        let mut next = |required: bool| -> PomResult<u32> {
            match parts.next() {
                Some(part) => part.parse().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };
        let version = Self::new(next(true)?, next(false)?, next(false)?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }

    /// Whether this version is at least `major.minor`
    #[must_use]
    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl FromStr for PlatformVersion {
    type Err = PomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Platform-dependent behaviour switches, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformCapabilities {
    /// Containers must be drilled into their first matching descendant
    pub requires_descendant_drill_down: bool,
    /// The driver can run accessibility audits
    pub supports_accessibility_audit: bool,
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::modern()
    }
}

impl PlatformCapabilities {
    /// Every capability enabled
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            requires_descendant_drill_down: true,
            supports_accessibility_audit: true,
        }
    }

    /// Every capability disabled
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            requires_descendant_drill_down: false,
            supports_accessibility_audit: false,
        }
    }

    /// Resolve the capabilities of a platform release
    #[must_use]
    pub fn resolve(platform: Platform, version: PlatformVersion) -> Self {
        let requires_descendant_drill_down = match platform {
            Platform::Ios => version.at_least(16, 0),
            Platform::MacOs | Platform::TvOs | Platform::WatchOs | Platform::VisionOs => true,
        };
        let supports_accessibility_audit = match platform {
            Platform::Ios | Platform::TvOs => version.at_least(17, 0),
            Platform::MacOs => version.at_least(14, 0),
            Platform::WatchOs => version.at_least(10, 0),
            Platform::VisionOs => true,
        };
        Self {
            requires_descendant_drill_down,
            supports_accessibility_audit,
        }
    }

    /// Minimum release that supports accessibility audits
    #[must_use]
    pub const fn audit_requirement(platform: Platform) -> &'static str {
        match platform {
            Platform::Ios => "iOS 17.0",
            Platform::TvOs => "tvOS 17.0",
            Platform::MacOs => "macOS 14.0",
            Platform::WatchOs => "watchOS 10.0",
            Platform::VisionOs => "visionOS 1.0",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod version_tests {
        use super::*;

        #[test]
        fn test_parse_major_only() {
            assert_eq!(PlatformVersion::parse("17").unwrap(), PlatformVersion::new(17, 0, 0));
        }

        #[test]
        fn test_parse_full() {
            let v: PlatformVersion = "14.2.1".parse().unwrap();
            assert_eq!(v, PlatformVersion::new(14, 2, 1));
            assert_eq!(v.to_string(), "14.2.1");
        }

        #[test]
        fn test_parse_rejects_garbage() {
            assert!(PlatformVersion::parse("").is_err());
            assert!(PlatformVersion::parse("seventeen").is_err());
            assert!(PlatformVersion::parse("17.x").is_err());
            assert!(PlatformVersion::parse("1.2.3.4").is_err());
        }

        #[test]
        fn test_at_least() {
            let v = PlatformVersion::new(16, 4, 0);
            assert!(v.at_least(16, 0));
            assert!(v.at_least(16, 4));
            assert!(!v.at_least(16, 5));
            assert!(!v.at_least(17, 0));
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_ios_15_is_legacy() {
            let caps = PlatformCapabilities::resolve(Platform::Ios, PlatformVersion::new(15, 5, 0));
            assert_eq!(caps, PlatformCapabilities::legacy());
        }

        #[test]
        fn test_ios_16_drills_down_without_audit() {
            let caps = PlatformCapabilities::resolve(Platform::Ios, PlatformVersion::new(16, 0, 0));
            assert!(caps.requires_descendant_drill_down);
            assert!(!caps.supports_accessibility_audit);
        }

        #[test]
        fn test_ios_17_is_modern() {
            let caps = PlatformCapabilities::resolve(Platform::Ios, PlatformVersion::new(17, 0, 0));
            assert_eq!(caps, PlatformCapabilities::modern());
        }

        #[test]
        fn test_audit_boundaries_per_platform() {
            let cases = [
                (Platform::MacOs, 13, false),
                (Platform::MacOs, 14, true),
                (Platform::TvOs, 16, false),
                (Platform::TvOs, 17, true),
                (Platform::WatchOs, 9, false),
                (Platform::WatchOs, 10, true),
                (Platform::VisionOs, 1, true),
            ];
            for (platform, major, expected) in cases {
                let caps = PlatformCapabilities::resolve(platform, PlatformVersion::new(major, 0, 0));
                assert_eq!(
                    caps.supports_accessibility_audit, expected,
                    "{platform} {major}"
                );
                assert!(caps.requires_descendant_drill_down);
            }
        }

        #[test]
        fn test_audit_requirement_text() {
            assert_eq!(PlatformCapabilities::audit_requirement(Platform::Ios), "iOS 17.0");
            assert_eq!(PlatformCapabilities::audit_requirement(Platform::MacOs), "macOS 14.0");
        }
    }
}
