//! Calendar-based versions for calver release trains
//!
//! A calendar version is `year.minor.micro` with an optional pre-release
//! modifier: `2025.1.0`, `2025.1.0-M1`, `2025.1.2-SNAPSHOT`. The absent
//! modifier means general availability and orders above every modifier.

use crate::error::VersionError;
use chrono::{Datelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static CALVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})\.(\d+)\.(\d+)(?:-(M\d+|RC\d+|SNAPSHOT))?$").unwrap()
});

/// Pre-release modifier of a calendar version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalverModifier {
    /// Development snapshot
    Snapshot,
    /// Milestone with ordinal
    Milestone(u32),
    /// Release candidate with ordinal
    ReleaseCandidate(u32),
}

impl CalverModifier {
    /// Classification precedence: snapshot < milestone < release candidate
    fn rank(&self) -> u8 {
        match self {
            CalverModifier::Snapshot => 0,
            CalverModifier::Milestone(_) => 1,
            CalverModifier::ReleaseCandidate(_) => 2,
        }
    }

    fn ordinal(&self) -> u32 {
        match self {
            CalverModifier::Snapshot => 0,
            CalverModifier::Milestone(n) | CalverModifier::ReleaseCandidate(n) => *n,
        }
    }
}

impl Ord for CalverModifier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank()
            .cmp(&other.rank())
            .then(self.ordinal().cmp(&other.ordinal()))
    }
}

impl PartialOrd for CalverModifier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CalverModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalverModifier::Snapshot => write!(f, "SNAPSHOT"),
            CalverModifier::Milestone(n) => write!(f, "M{}", n),
            CalverModifier::ReleaseCandidate(n) => write!(f, "RC{}", n),
        }
    }
}

/// A calendar version (`year.minor.micro[-modifier]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Calver {
    /// Calendar year
    pub year: u32,
    /// Minor release within the year
    pub minor: u32,
    /// Micro (bugfix) release
    pub micro: u32,
    /// Pre-release modifier; None means GA
    pub modifier: Option<CalverModifier>,
}

impl Calver {
    /// Creates a GA calendar version
    pub fn new(year: u32, minor: u32, micro: u32) -> Self {
        Self {
            year,
            minor,
            micro,
            modifier: None,
        }
    }

    /// The first version of a calendar year (`year.0.0`)
    pub fn for_year(year: u32) -> Self {
        Self::new(year, 0, 0)
    }

    /// Seeds a version from the current calendar year
    pub fn current() -> Self {
        Self::for_year(Utc::now().year() as u32)
    }

    /// Parses a calendar version string
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::InvalidCalver {
            value: value.to_string(),
        };
        let caps = CALVER_RE.captures(value.trim()).ok_or_else(invalid)?;

        let modifier = match caps.get(4).map(|m| m.as_str()) {
            None => None,
            Some("SNAPSHOT") => Some(CalverModifier::Snapshot),
            Some(token) => {
                let parsed = if let Some(n) = token.strip_prefix("RC") {
                    n.parse().ok().map(CalverModifier::ReleaseCandidate)
                } else if let Some(n) = token.strip_prefix('M') {
                    n.parse().ok().map(CalverModifier::Milestone)
                } else {
                    None
                };
                Some(parsed.ok_or_else(invalid)?)
            }
        };

        Ok(Self {
            year: caps[1].parse().map_err(|_| invalid())?,
            minor: caps[2].parse().map_err(|_| invalid())?,
            micro: caps[3].parse().map_err(|_| invalid())?,
            modifier,
        })
    }

    /// The next minor version, micro reset and modifier cleared
    pub fn next_minor(self) -> Self {
        Self::new(self.year, self.minor + 1, 0)
    }

    /// The next micro (bugfix) version, modifier cleared
    pub fn next_bugfix(self) -> Self {
        Self::new(self.year, self.minor, self.micro + 1)
    }

    /// This version with the micro component replaced
    pub fn with_bugfix(self, micro: u32) -> Self {
        Self {
            micro,
            ..self
        }
    }

    /// This version with the given modifier
    pub fn with_modifier(self, modifier: CalverModifier) -> Self {
        Self {
            modifier: Some(modifier),
            ..self
        }
    }

    /// Returns true when no pre-release modifier is present
    pub fn is_ga(&self) -> bool {
        self.modifier.is_none()
    }

    /// Returns true for snapshot versions
    pub fn is_snapshot(&self) -> bool {
        self.modifier == Some(CalverModifier::Snapshot)
    }
}

impl Ord for Calver {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // GA (no modifier) orders above every pre-release modifier of the
        // same numeric version.
        let modifier_key = |m: &Option<CalverModifier>| match m {
            None => (1u8, None),
            Some(modifier) => (0u8, Some(*modifier)),
        };
        (self.year, self.minor, self.micro)
            .cmp(&(other.year, other.minor, other.micro))
            .then_with(|| modifier_key(&self.modifier).cmp(&modifier_key(&other.modifier)))
    }
}

impl PartialOrd for Calver {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Calver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.year, self.minor, self.micro)?;
        if let Some(modifier) = &self.modifier {
            write!(f, "-{}", modifier)?;
        }
        Ok(())
    }
}

impl FromStr for Calver {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Calver {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Calver> for String {
    fn from(value: Calver) -> Self {
        value.to_string()
    }
}
