//! Release trains and train iterations
//!
//! A train is a named release line containing one module per participating
//! project, an optional calendar-version seed and the ordered iteration
//! sequence the train passes through.

use crate::domain::{Module, ModuleIteration, Project};
use crate::error::ConfigError;
use crate::version::{Calver, Iteration, IterationSequence};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A named release line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    /// Train name (e.g. `Kepler`)
    pub name: String,
    /// Participating modules, one per project, in train order
    modules: Vec<Module>,
    /// Calendar-version seed for calver-based trains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calver: Option<Calver>,
    /// The ordered iterations this train may pass through
    iterations: IterationSequence,
}

impl Train {
    /// Creates a train with the default iteration sequence
    pub fn new(name: impl Into<String>, modules: Vec<Module>) -> Self {
        Self {
            name: name.into(),
            modules,
            calver: None,
            iterations: IterationSequence::default(),
        }
    }

    /// Sets the calendar-version seed (builder pattern)
    pub fn with_calver(mut self, calver: Calver) -> Self {
        self.calver = Some(calver);
        self
    }

    /// Replaces the iteration sequence (builder pattern)
    pub fn with_iterations(mut self, iterations: IterationSequence) -> Self {
        self.iterations = iterations;
        self
    }

    /// Modules in train order
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Looks up the module for a project
    pub fn module(&self, project: &Project) -> Option<&Module> {
        self.modules.iter().find(|m| &m.project == project)
    }

    /// The train's iteration sequence
    pub fn iterations(&self) -> &IterationSequence {
        &self.iterations
    }

    /// Returns true if the train contains a module for the project
    pub fn contains(&self, project: &Project) -> bool {
        self.module(project).is_some()
    }
}

impl fmt::Display for Train {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A train at a specific iteration
#[derive(Debug, Clone)]
pub struct TrainIteration {
    train: Arc<Train>,
    iteration: Iteration,
}

impl TrainIteration {
    /// Binds a train to one of its iterations
    ///
    /// The iteration must be part of the train's iteration sequence;
    /// anything else is a configuration error.
    pub fn new(train: Arc<Train>, iteration: Iteration) -> Result<Self, ConfigError> {
        if !train.iterations().contains(iteration) {
            return Err(ConfigError::IterationNotInTrain {
                train: train.name.clone(),
                iteration: iteration.to_string(),
            });
        }
        Ok(Self { train, iteration })
    }

    /// The underlying train
    pub fn train(&self) -> &Arc<Train> {
        &self.train
    }

    /// The bound iteration
    pub fn iteration(&self) -> Iteration {
        self.iteration
    }

    /// Returns true when this is the train's initial iteration
    pub fn is_initial(&self) -> bool {
        self.iteration == self.train.iterations().first()
    }

    /// The train's next iteration, or None at the end of the lifecycle
    pub fn next(&self) -> Option<TrainIteration> {
        let next = self.train.iterations().next(self.iteration)?;
        Some(Self {
            train: Arc::clone(&self.train),
            iteration: next,
        })
    }

    /// All modules bound to this iteration, in train order
    pub fn modules(&self) -> Vec<ModuleIteration> {
        self.train
            .modules()
            .iter()
            .map(|module| ModuleIteration::new(module.clone(), self.clone()))
            .collect()
    }

    /// The bound module for a project
    pub fn module(&self, project: &Project) -> Result<ModuleIteration, ConfigError> {
        let module = self
            .train
            .module(project)
            .ok_or_else(|| ConfigError::UnknownProject {
                project: project.name.clone(),
            })?;
        Ok(ModuleIteration::new(module.clone(), self.clone()))
    }
}

impl fmt::Display for TrainIteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.train.name, self.iteration)
    }
}
