//! Dependency upgrade rule engine
//!
//! Given the version a module currently depends on and the catalog of
//! published versions, proposes an upgrade target under milestone and
//! minor-line restrictions. Computed fresh per check; only the proposal file
//! persists results between runs.

use crate::version::{ArtifactVersion, Iteration};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Constraints applied when selecting an upgrade target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePolicy {
    /// Consider milestone and release candidate versions
    pub allow_preview: bool,
    /// Propose only versions on the current minor line
    pub restrict_to_minor: bool,
}

impl UpgradePolicy {
    /// The default policy: stable versions only, any line
    pub fn new() -> Self {
        Self {
            allow_preview: false,
            restrict_to_minor: false,
        }
    }

    /// Derives the policy for a consuming iteration
    ///
    /// Pre-release candidates are considered only when the consuming
    /// iteration is itself pre-release.
    pub fn for_iteration(iteration: Iteration) -> Self {
        Self {
            allow_preview: iteration.is_preview(),
            restrict_to_minor: false,
        }
    }

    /// Restricts proposals to the current minor line (builder pattern)
    pub fn restricted_to_minor(mut self, restrict: bool) -> Self {
        self.restrict_to_minor = restrict;
        self
    }

    /// Returns true if a catalog version is an acceptable candidate
    fn admits(&self, version: &ArtifactVersion) -> bool {
        if version.is_snapshot() {
            return false;
        }
        self.allow_preview || !version.is_preview()
    }
}

impl Default for UpgradePolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// A computed upgrade proposal for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeProposal {
    /// The version currently depended on
    pub current: ArtifactVersion,
    /// Newest acceptable version overall; current if nothing is newer
    pub latest: ArtifactVersion,
    /// Newest acceptable version on current's minor line; current if nothing
    /// is newer there
    pub latest_minor: ArtifactVersion,
    /// The proposed upgrade target
    pub proposal: ArtifactVersion,
    /// All acceptable versions newer than current, ascending
    pub newer: Vec<ArtifactVersion>,
}

impl UpgradeProposal {
    /// Evaluates the catalog against the current version under a policy
    ///
    /// Catalog entries that fail to parse are skipped, not fatal: a catalog
    /// routinely carries version strings from other schemes.
    pub fn evaluate(current: ArtifactVersion, catalog: &[String], policy: &UpgradePolicy) -> Self {
        let mut candidates: Vec<ArtifactVersion> = catalog
            .iter()
            .filter_map(|value| match ArtifactVersion::parse(value) {
                Ok(version) => Some(version),
                Err(_) => {
                    debug!(%value, "skipping unparseable catalog version");
                    None
                }
            })
            .filter(|version| policy.admits(version))
            .collect();
        candidates.sort();
        candidates.dedup();

        let newer: Vec<ArtifactVersion> = candidates
            .iter()
            .filter(|version| **version > current)
            .copied()
            .collect();

        let latest = newer.last().copied().unwrap_or(current);
        let latest_minor = newer
            .iter()
            .filter(|version| {
                version.version().major == current.version().major
                    && version.version().minor == current.version().minor
            })
            .next_back()
            .copied()
            .unwrap_or(current);

        let proposal = if policy.restrict_to_minor {
            latest_minor
        } else {
            latest
        };

        Self {
            current,
            latest,
            latest_minor,
            proposal,
            newer,
        }
    }

    /// Returns true when the proposal actually moves the version
    pub fn is_upgrade_available(&self) -> bool {
        self.proposal > self.current
    }
}
