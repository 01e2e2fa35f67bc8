//! Phase-aware version resolution and dependency upgrades
//!
//! This module provides:
//! - The lifecycle phase selecting which version transform applies
//! - UpdateInformation, resolving the concrete version value to write for
//!   any dependency during a phase
//! - The upgrade policy/proposal rule engine
//! - The persisted proposal properties file

mod policy;
mod store;

pub use policy::{UpgradePolicy, UpgradeProposal};
pub use store::ProposalStore;

use crate::domain::{Project, TrainIteration};
use crate::error::ConfigError;
use crate::version::ArtifactVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle operation context selecting a version transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Pinning versions for the release build: values pass through unchanged
    Prepare,
    /// Moving back to development after the release: next development version
    Cleanup,
    /// Opening the maintenance line: next bugfix version
    Maintenance,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Prepare => write!(f, "PREPARE"),
            Phase::Cleanup => write!(f, "CLEANUP"),
            Phase::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

impl FromStr for Phase {
    type Err = ConfigError;

    /// An unrecognized phase name is a fatal configuration error
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PREPARE" => Ok(Phase::Prepare),
            "CLEANUP" => Ok(Phase::Cleanup),
            "MAINTENANCE" => Ok(Phase::Maintenance),
            _ => Err(ConfigError::UnknownPhase {
                value: s.to_string(),
            }),
        }
    }
}

/// Resolves the concrete version value to write for any dependency
///
/// The same transform applies uniformly to dependency versions and the
/// parent/tooling version: identity while preparing a release, next
/// development version while cleaning up, next bugfix version on the
/// maintenance line.
#[derive(Debug, Clone)]
pub struct UpdateInformation {
    train_iteration: TrainIteration,
    phase: Phase,
}

impl UpdateInformation {
    /// Creates update information for a train iteration and phase
    pub fn new(train_iteration: TrainIteration, phase: Phase) -> Self {
        Self {
            train_iteration,
            phase,
        }
    }

    /// The train iteration versions are resolved against
    pub fn train_iteration(&self) -> &TrainIteration {
        &self.train_iteration
    }

    /// The active phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Resolves the version value to write for a project
    pub fn resolve(&self, project: &Project) -> Result<ArtifactVersion, ConfigError> {
        let version = self.train_iteration.module(project)?.artifact_version();
        Ok(self.transform(version))
    }

    /// Applies the phase transform to an arbitrary version, for the parent
    /// and tooling versions that live outside the module set
    pub fn transform(&self, version: ArtifactVersion) -> ArtifactVersion {
        match self.phase {
            Phase::Prepare => version,
            Phase::Cleanup => version.next_development(),
            Phase::Maintenance => version.next_bugfix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Module, Train};
    use crate::version::{Iteration, Version};
    use std::sync::Arc;

    fn commons_at(version: Version) -> TrainIteration {
        let train = Arc::new(Train::new(
            "Kepler",
            vec![Module::new(Project::new("commons"), version)],
        ));
        TrainIteration::new(train, Iteration::GeneralAvailability).unwrap()
    }

    #[test]
    fn test_phase_from_str() {
        assert_eq!("PREPARE".parse::<Phase>().unwrap(), Phase::Prepare);
        assert_eq!("cleanup".parse::<Phase>().unwrap(), Phase::Cleanup);
        assert_eq!(
            " maintenance ".parse::<Phase>().unwrap(),
            Phase::Maintenance
        );
    }

    #[test]
    fn test_unknown_phase_is_fatal() {
        assert!(matches!(
            "DEPLOY".parse::<Phase>(),
            Err(ConfigError::UnknownPhase { .. })
        ));
        assert!("".parse::<Phase>().is_err());
    }

    #[test]
    fn test_phase_display_round_trip() {
        for phase in [Phase::Prepare, Phase::Cleanup, Phase::Maintenance] {
            assert_eq!(phase.to_string().parse::<Phase>().unwrap(), phase);
        }
    }

    #[test]
    fn test_prepare_is_identity() {
        let iteration = commons_at(Version::new(1, 2));
        let info = UpdateInformation::new(iteration, Phase::Prepare);
        let resolved = info.resolve(&Project::new("commons")).unwrap();
        assert_eq!(resolved.to_string(), "1.2.0.RELEASE");
    }

    #[test]
    fn test_cleanup_moves_to_next_development() {
        let iteration = commons_at(Version::new(1, 2));
        let info = UpdateInformation::new(iteration, Phase::Cleanup);
        let resolved = info.resolve(&Project::new("commons")).unwrap();
        assert_eq!(resolved.to_string(), "1.3.0.BUILD-SNAPSHOT");
    }

    #[test]
    fn test_cleanup_on_bugfix_line() {
        let iteration = commons_at(Version::parse("1.2.3").unwrap());
        let info = UpdateInformation::new(iteration, Phase::Cleanup);
        let resolved = info.resolve(&Project::new("commons")).unwrap();
        assert_eq!(resolved.to_string(), "1.2.4.BUILD-SNAPSHOT");
    }

    #[test]
    fn test_maintenance_moves_to_next_bugfix() {
        let iteration = commons_at(Version::parse("1.2.3").unwrap());
        let info = UpdateInformation::new(iteration, Phase::Maintenance);
        let resolved = info.resolve(&Project::new("commons")).unwrap();
        assert_eq!(resolved.to_string(), "1.2.4.BUILD-SNAPSHOT");
    }

    #[test]
    fn test_resolve_unknown_project_fails() {
        let iteration = commons_at(Version::new(1, 2));
        let info = UpdateInformation::new(iteration, Phase::Prepare);
        assert!(matches!(
            info.resolve(&Project::new("search")),
            Err(ConfigError::UnknownProject { .. })
        ));
    }

    #[test]
    fn test_transform_applies_to_external_versions() {
        let iteration = commons_at(Version::new(1, 2));
        let info = UpdateInformation::new(iteration, Phase::Cleanup);
        let parent = ArtifactVersion::parse("3.0.0.RELEASE").unwrap();
        assert_eq!(info.transform(parent).to_string(), "3.1.0.BUILD-SNAPSHOT");
    }

    #[test]
    fn test_serde_phase() {
        assert_eq!(serde_json::to_string(&Phase::Cleanup).unwrap(), "\"CLEANUP\"");
        assert_eq!(
            serde_json::from_str::<Phase>("\"MAINTENANCE\"").unwrap(),
            Phase::Maintenance
        );
    }
}
