//! Externally published artifact versions
//!
//! An artifact version combines a numeric [`Version`] with a suffix drawn
//! from a fixed set, rendered in one of two accepted grammars:
//! - dotted: `1.2.3.RELEASE`, `1.3.0.BUILD-SNAPSHOT`, `1.4.0.M1`, `1.0.0.SR2`
//! - modifier: `1.2.3`, `1.3.0-SNAPSHOT`, `1.4.0-M1`, `1.4.0-RC1`
//!
//! Rendering is format-preserving: a value parsed in modifier form never
//! renders in dotted form and vice versa, because the format signals which
//! downstream tool consumes the string.

use crate::error::VersionError;
use crate::version::{Iteration, Version};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static DOTTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.\d+(?:\.\d+)?)\.(SR\d+|RC\d+|M\d+|BUILD-SNAPSHOT|RELEASE)$").unwrap()
});

static MODIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\d+(?:\.\d+)?)(?:-(RC\d+|M\d+|SNAPSHOT))?$").unwrap());

/// Which of the two accepted string grammars a value renders in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixFormat {
    /// Dot-suffix grammar (`1.2.3.RELEASE`)
    Dotted,
    /// Short-modifier grammar (`1.2.3`, `1.3.0-SNAPSHOT`)
    Modifier,
}

/// The fixed set of artifact version suffixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionSuffix {
    /// Development snapshot (`BUILD-SNAPSHOT` / `-SNAPSHOT`)
    Snapshot,
    /// Milestone (`M<n>` / `-M<n>`)
    Milestone(u32),
    /// Release candidate (`RC<n>` / `-RC<n>`)
    ReleaseCandidate(u32),
    /// Final release (`RELEASE`, or a bare version in modifier form)
    Release,
    /// Service release suffix (`SR<n>`, dotted form only)
    ServiceRelease(u32),
}

impl VersionSuffix {
    /// Precedence used when comparing two artifact versions with an equal
    /// numeric part: a snapshot precedes the milestones and candidates that
    /// precede the release it works towards
    fn rank(&self) -> u8 {
        match self {
            VersionSuffix::Snapshot => 0,
            VersionSuffix::Milestone(_) => 1,
            VersionSuffix::ReleaseCandidate(_) => 2,
            VersionSuffix::Release => 3,
            VersionSuffix::ServiceRelease(_) => 4,
        }
    }

    fn ordinal(&self) -> u32 {
        match self {
            VersionSuffix::Milestone(n)
            | VersionSuffix::ReleaseCandidate(n)
            | VersionSuffix::ServiceRelease(n) => *n,
            _ => 0,
        }
    }
}

impl Ord for VersionSuffix {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank()
            .cmp(&other.rank())
            .then(self.ordinal().cmp(&other.ordinal()))
    }
}

impl PartialOrd for VersionSuffix {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The externally published version string for one module at one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactVersion {
    version: Version,
    suffix: VersionSuffix,
    format: SuffixFormat,
}

impl ArtifactVersion {
    /// Creates an artifact version from its parts
    pub fn new(version: Version, suffix: VersionSuffix, format: SuffixFormat) -> Self {
        Self {
            version,
            suffix,
            format,
        }
    }

    /// Parses an artifact version, detecting which grammar it uses
    ///
    /// A string matching neither grammar is rejected with
    /// [`VersionError::InvalidArtifactVersion`]; there are no partial results.
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let trimmed = value.trim();
        let invalid = || VersionError::InvalidArtifactVersion {
            value: value.to_string(),
        };

        if let Some(caps) = DOTTED_RE.captures(trimmed) {
            let version = Version::parse(&caps[1]).map_err(|_| invalid())?;
            let suffix = match &caps[2] {
                "RELEASE" => VersionSuffix::Release,
                "BUILD-SNAPSHOT" => VersionSuffix::Snapshot,
                token => Self::parse_counted_suffix(token).ok_or_else(invalid)?,
            };
            return Ok(Self::new(version, suffix, SuffixFormat::Dotted));
        }

        if let Some(caps) = MODIFIER_RE.captures(trimmed) {
            let version = Version::parse(&caps[1]).map_err(|_| invalid())?;
            let suffix = match caps.get(2).map(|m| m.as_str()) {
                None => VersionSuffix::Release,
                Some("SNAPSHOT") => VersionSuffix::Snapshot,
                Some(token) => Self::parse_counted_suffix(token).ok_or_else(invalid)?,
            };
            return Ok(Self::new(version, suffix, SuffixFormat::Modifier));
        }

        Err(invalid())
    }

    /// Parses `M<n>`, `RC<n>` or `SR<n>` tokens
    fn parse_counted_suffix(token: &str) -> Option<VersionSuffix> {
        if let Some(n) = token.strip_prefix("RC") {
            return n.parse().ok().map(VersionSuffix::ReleaseCandidate);
        }
        if let Some(n) = token.strip_prefix("SR") {
            return n.parse().ok().map(VersionSuffix::ServiceRelease);
        }
        if let Some(n) = token.strip_prefix('M') {
            return n.parse().ok().map(VersionSuffix::Milestone);
        }
        None
    }

    /// Derives the artifact version a module publishes at an iteration
    ///
    /// Milestones and release candidates keep their ordinal as the suffix;
    /// GA maps to a release; a service release maps to a release with the
    /// bugfix component set to the service release ordinal.
    pub fn from_iteration(version: Version, iteration: Iteration, format: SuffixFormat) -> Self {
        match iteration {
            Iteration::Milestone(n) => Self::new(version, VersionSuffix::Milestone(n), format),
            Iteration::ReleaseCandidate(n) => {
                Self::new(version, VersionSuffix::ReleaseCandidate(n), format)
            }
            Iteration::GeneralAvailability => Self::new(version, VersionSuffix::Release, format),
            Iteration::ServiceRelease(n) => {
                Self::new(version.with_bugfix(n), VersionSuffix::Release, format)
            }
        }
    }

    /// The numeric version part
    pub fn version(&self) -> Version {
        self.version
    }

    /// The suffix part
    pub fn suffix(&self) -> VersionSuffix {
        self.suffix
    }

    /// The grammar this value renders in
    pub fn format(&self) -> SuffixFormat {
        self.format
    }

    /// Returns true for released versions (release and service release)
    pub fn is_release(&self) -> bool {
        matches!(
            self.suffix,
            VersionSuffix::Release | VersionSuffix::ServiceRelease(_)
        )
    }

    /// Returns true for milestone versions
    pub fn is_milestone(&self) -> bool {
        matches!(self.suffix, VersionSuffix::Milestone(_))
    }

    /// Returns true for release candidate versions
    pub fn is_release_candidate(&self) -> bool {
        matches!(self.suffix, VersionSuffix::ReleaseCandidate(_))
    }

    /// Returns true for development snapshots
    pub fn is_snapshot(&self) -> bool {
        matches!(self.suffix, VersionSuffix::Snapshot)
    }

    /// Returns true for pre-release versions (milestones and candidates)
    pub fn is_preview(&self) -> bool {
        self.is_milestone() || self.is_release_candidate()
    }

    /// Returns true for bugfix releases: a release with a nonzero bugfix
    /// component, or an explicit service release suffix
    pub fn is_bugfix(&self) -> bool {
        match self.suffix {
            VersionSuffix::ServiceRelease(_) => true,
            VersionSuffix::Release => self.version.bugfix != 0,
            _ => false,
        }
    }

    /// The next development version after this one, tagged as a snapshot
    ///
    /// A fresh minor line opens after a `x.y.0` release; anything on a bugfix
    /// line continues that line. Applied to a snapshot this is a no-op.
    pub fn next_development(&self) -> Self {
        if self.is_snapshot() {
            return *self;
        }
        let version = if self.version.bugfix == 0 {
            self.version.next_minor()
        } else {
            self.version.next_bugfix()
        };
        Self::new(version, VersionSuffix::Snapshot, self.format)
    }

    /// The next bugfix development version, tagged as a snapshot
    ///
    /// Idempotent on snapshot input.
    pub fn next_bugfix(&self) -> Self {
        if self.is_snapshot() {
            return *self;
        }
        Self::new(
            self.version.next_bugfix(),
            VersionSuffix::Snapshot,
            self.format,
        )
    }
}

impl Ord for ArtifactVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Lexicographic over (version, suffix); the format only breaks ties
        // so that the ordering stays consistent with equality.
        self.version
            .cmp(&other.version)
            .then(self.suffix.cmp(&other.suffix))
            .then((self.format as u8).cmp(&(other.format as u8)))
    }
}

impl PartialOrd for ArtifactVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            SuffixFormat::Dotted => {
                write!(f, "{}.", self.version)?;
                match self.suffix {
                    VersionSuffix::Release => write!(f, "RELEASE"),
                    VersionSuffix::Snapshot => write!(f, "BUILD-SNAPSHOT"),
                    VersionSuffix::Milestone(n) => write!(f, "M{}", n),
                    VersionSuffix::ReleaseCandidate(n) => write!(f, "RC{}", n),
                    VersionSuffix::ServiceRelease(n) => write!(f, "SR{}", n),
                }
            }
            SuffixFormat::Modifier => {
                write!(f, "{}", self.version)?;
                match self.suffix {
                    // The modifier grammar has no release or service release
                    // token; the bugfix component carries that information.
                    VersionSuffix::Release | VersionSuffix::ServiceRelease(_) => Ok(()),
                    VersionSuffix::Snapshot => write!(f, "-SNAPSHOT"),
                    VersionSuffix::Milestone(n) => write!(f, "-M{}", n),
                    VersionSuffix::ReleaseCandidate(n) => write!(f, "-RC{}", n),
                }
            }
        }
    }
}

impl FromStr for ArtifactVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ArtifactVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ArtifactVersion> for String {
    fn from(value: ArtifactVersion) -> Self {
        value.to_string()
    }
}
