//! Build system capability boundary
//!
//! Concrete build-tool integrations (descriptor rewriting, artifact
//! deployment, CI triggering) implement the `BuildSystem` trait. The engine
//! selects the implementation for a project through an explicit ordered
//! `BuildSystems` list with first-match lookup; the list is built once by the
//! caller and passed by reference wherever needed.

use crate::domain::{ModuleIteration, Project};
use crate::error::ConfigError;
use crate::update::{Phase, UpdateInformation};
use crate::version::ArtifactVersion;
use tracing::debug;

/// Result type for build system operations
///
/// Operation failures carry whatever error the concrete integration
/// produces; the executor captures them per module.
pub type BuildResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Where a deployed artifact ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentInfo {
    /// Deployed version
    pub version: ArtifactVersion,
    /// Target repository identifier (e.g. a staging repository id)
    pub repository: String,
}

impl DeploymentInfo {
    /// Creates deployment info
    pub fn new(version: ArtifactVersion, repository: impl Into<String>) -> Self {
        Self {
            version,
            repository: repository.into(),
        }
    }
}

/// A build tool integration for some subset of projects
///
/// Operations are synchronous; the executor runs them on its blocking pool.
pub trait BuildSystem: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    /// Returns true if this build system handles the project
    fn supports(&self, project: &Project) -> bool;

    /// Rewrites the module's build descriptors to the resolved versions
    fn update_descriptors(
        &self,
        module: &ModuleIteration,
        information: &UpdateInformation,
    ) -> BuildResult<()>;

    /// Computes and writes the module's own version for a phase
    fn prepare_version(&self, module: &ModuleIteration, phase: Phase)
        -> BuildResult<ArtifactVersion>;

    /// Builds and deploys the module's artifacts
    fn deploy(&self, module: &ModuleIteration) -> BuildResult<DeploymentInfo>;

    /// Triggers a remote verification build for the module
    fn trigger_build(&self, module: &ModuleIteration) -> BuildResult<()>;
}

/// An ordered set of build system implementations
///
/// Lookup walks the list in registration order and returns the first
/// implementation claiming the project, so more specific integrations are
/// registered before catch-all ones.
#[derive(Default)]
pub struct BuildSystems {
    systems: Vec<Box<dyn BuildSystem>>,
}

impl BuildSystems {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a build system (builder pattern)
    pub fn with(mut self, system: Box<dyn BuildSystem>) -> Self {
        self.systems.push(system);
        self
    }

    /// Selects the build system for a project, first match wins
    pub fn for_project(&self, project: &Project) -> Result<&dyn BuildSystem, ConfigError> {
        let system = self
            .systems
            .iter()
            .find(|system| system.supports(project))
            .map(Box::as_ref)
            .ok_or_else(|| ConfigError::UnsupportedProject {
                project: project.name.clone(),
            })?;
        debug!(project = %project, system = system.name(), "selected build system");
        Ok(system)
    }

    /// Number of registered build systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns true if no build system is registered
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
