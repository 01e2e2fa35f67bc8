//! Numeric version type with component arithmetic
//!
//! A version is four non-negative integers (major.minor.bugfix.build) with a
//! total order by component precedence. "Next" operations reset all lower
//! components to zero. Values are immutable; every operation returns a new
//! instance.

use crate::error::VersionError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

// Accepted forms: 1.2, 1.2.3, 1.2.3.4
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?(?:\.(\d+))?$").unwrap());

/// An immutable numeric version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major version component
    pub major: u32,
    /// Minor version component
    pub minor: u32,
    /// Bugfix version component
    pub bugfix: u32,
    /// Build version component
    pub build: u32,
}

impl Version {
    /// Creates a new version with zero bugfix and build components
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            bugfix: 0,
            build: 0,
        }
    }

    /// Parses a version from `major.minor[.bugfix[.build]]`
    ///
    /// Anything else is rejected with [`VersionError::InvalidVersion`].
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::InvalidVersion {
            value: value.to_string(),
        };
        let caps = VERSION_RE.captures(value.trim()).ok_or_else(invalid)?;

        // A digit run too large for u32 is rejected, never truncated.
        let component = |i: usize| -> Result<u32, VersionError> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().map_err(|_| invalid()),
                None => Ok(0),
            }
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            bugfix: component(3)?,
            build: component(4)?,
        })
    }

    /// Returns the next major version, lower components reset to zero
    pub fn next_major(self) -> Self {
        Self::new(self.major + 1, 0)
    }

    /// Returns the next minor version, lower components reset to zero
    pub fn next_minor(self) -> Self {
        Self::new(self.major, self.minor + 1)
    }

    /// Returns the next bugfix version, the build component reset to zero
    pub fn next_bugfix(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor,
            bugfix: self.bugfix + 1,
            build: 0,
        }
    }

    /// Returns this version with the bugfix component replaced and the build
    /// component reset
    pub fn with_bugfix(self, bugfix: u32) -> Self {
        Self {
            major: self.major,
            minor: self.minor,
            bugfix,
            build: 0,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.bugfix)?;
        if self.build != 0 {
            write!(f, ".{}", self.build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_parse_two_components() {
        let v = Version::parse("1.2").unwrap();
        assert_eq!(v, Version::new(1, 2));
        assert_eq!(v.bugfix, 0);
        assert_eq!(v.build, 0);
    }

    #[test]
    fn test_parse_three_components() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.bugfix, 3);
    }

    #[test]
    fn test_parse_four_components() {
        let v = Version::parse("1.2.3.4").unwrap();
        assert_eq!(v.build, 4);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("1").is_err());
        assert!(Version::parse("1.x").is_err());
        assert!(Version::parse("1.2.3.4.5").is_err());
        assert!(Version::parse("1.2-SNAPSHOT").is_err());
        assert_eq!(
            Version::parse("abc"),
            Err(VersionError::InvalidVersion {
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_component_overflow() {
        // One past u32::MAX in each position; must fail, never wrap to 0.
        for value in [
            "4294967296.2.3",
            "1.4294967296.3",
            "1.2.4294967296",
            "1.2.3.4294967296",
        ] {
            assert!(
                matches!(
                    Version::parse(value),
                    Err(VersionError::InvalidVersion { .. })
                ),
                "'{}' should not parse",
                value
            );
        }
        assert_eq!(
            Version::parse("1.2.4294967295").unwrap().bugfix,
            u32::MAX
        );
    }

    #[test]
    fn test_next_minor_resets_lower_components() {
        assert_eq!(
            Version::parse("1.2.3").unwrap().next_minor(),
            Version::parse("1.3.0").unwrap()
        );
    }

    #[test]
    fn test_next_major_resets_lower_components() {
        assert_eq!(
            Version::parse("1.2.3").unwrap().next_major(),
            Version::parse("2.0.0").unwrap()
        );
    }

    #[test]
    fn test_next_bugfix() {
        assert_eq!(
            Version::parse("1.2.3").unwrap().next_bugfix(),
            Version::parse("1.2.4").unwrap()
        );
        assert_eq!(
            Version::parse("1.2.3.9").unwrap().next_bugfix(),
            Version::parse("1.2.4").unwrap()
        );
    }

    #[test]
    fn test_with_bugfix() {
        assert_eq!(
            Version::new(1, 2).with_bugfix(5),
            Version::parse("1.2.5").unwrap()
        );
    }

    #[test]
    fn test_ordering_matches_component_comparison() {
        let cases = [
            ("1.2.3", "1.2.4", Ordering::Less),
            ("1.9.0", "1.10.0", Ordering::Less),
            ("2.0.0", "1.99.99", Ordering::Greater),
            ("1.2.3", "1.2.3", Ordering::Equal),
            ("1.2.3.1", "1.2.3", Ordering::Greater),
        ];
        for (a, b, expected) in cases {
            let va = Version::parse(a).unwrap();
            let vb = Version::parse(b).unwrap();
            assert_eq!(va.cmp(&vb), expected, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_display_hides_zero_build() {
        assert_eq!(Version::parse("1.2.3").unwrap().to_string(), "1.2.3");
        assert_eq!(Version::new(1, 2).to_string(), "1.2.0");
        assert_eq!(Version::parse("1.2.3.4").unwrap().to_string(), "1.2.3.4");
    }

    #[test]
    fn test_from_str_round_trip() {
        let v: Version = "2.7.1".parse().unwrap();
        assert_eq!(v.to_string().parse::<Version>().unwrap(), v);
    }

    #[test]
    fn test_serde_version() {
        let v = Version::parse("1.2.3").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let parsed: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, v);
    }
}
