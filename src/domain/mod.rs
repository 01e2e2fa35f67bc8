//! Core domain models for reltrain
//!
//! This module contains the release train domain graph:
//! - Projects and dependency coordinates
//! - Modules binding a project to a version within a train
//! - Trains, train iterations and the project dependency graph
//! - Execution summaries aggregating per-module outcomes

mod graph;
mod module;
mod project;
mod summary;
mod train;

pub use graph::ProjectGraph;
pub use module::{Module, ModuleIteration};
pub use project::{Coordinate, Project};
pub use summary::{ExecutionSummary, ModuleOutcome, OutcomeKind};
pub use train::{Train, TrainIteration};
