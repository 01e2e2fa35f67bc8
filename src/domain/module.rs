//! Modules and their binding to a train iteration

use crate::domain::{Project, TrainIteration};
use crate::version::{ArtifactVersion, Iteration, SuffixFormat, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A project participating in a train at a specific version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// The project this module releases
    pub project: Project,
    /// The numeric version the module is on within its train
    pub version: Version,
    /// Iteration used instead of the train's initial iteration, for modules
    /// that joined the train mid-lifecycle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_first_iteration: Option<Iteration>,
    /// Grammar the module publishes its version strings in
    pub format: SuffixFormat,
}

impl Module {
    /// Creates a module publishing in the dotted grammar
    pub fn new(project: Project, version: Version) -> Self {
        Self {
            project,
            version,
            custom_first_iteration: None,
            format: SuffixFormat::Dotted,
        }
    }

    /// Sets a custom first iteration (builder pattern)
    pub fn with_first_iteration(mut self, iteration: Iteration) -> Self {
        self.custom_first_iteration = Some(iteration);
        self
    }

    /// Sets the published version grammar (builder pattern)
    pub fn with_format(mut self, format: SuffixFormat) -> Self {
        self.format = format;
        self
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.project, self.version)
    }
}

/// A module bound to a specific train iteration; the unit of scheduling
#[derive(Debug, Clone)]
pub struct ModuleIteration {
    module: Module,
    train_iteration: TrainIteration,
}

impl ModuleIteration {
    /// Binds a module to a train iteration
    pub fn new(module: Module, train_iteration: TrainIteration) -> Self {
        Self {
            module,
            train_iteration,
        }
    }

    /// The underlying module
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// The project this module releases
    pub fn project(&self) -> &Project {
        &self.module.project
    }

    /// The train iteration this module is scheduled in
    pub fn train_iteration(&self) -> &TrainIteration {
        &self.train_iteration
    }

    /// The effective iteration for this module
    ///
    /// The module's custom first iteration applies only at the train's
    /// initial iteration; everywhere else the train iteration wins.
    pub fn iteration(&self) -> Iteration {
        if self.train_iteration.is_initial() {
            self.module
                .custom_first_iteration
                .unwrap_or_else(|| self.train_iteration.iteration())
        } else {
            self.train_iteration.iteration()
        }
    }

    /// The artifact version this module publishes at this iteration
    pub fn artifact_version(&self) -> ArtifactVersion {
        ArtifactVersion::from_iteration(self.module.version, self.iteration(), self.module.format)
    }
}

impl fmt::Display for ModuleIteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.project(), self.artifact_version())
    }
}
