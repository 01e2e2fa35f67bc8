//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: malformed version / iteration / calver strings
//! - ConfigError: invalid train, graph or phase configuration
//! - ExecutorError: build execution failures, including the aggregate report
//! - StoreError: proposal properties file I/O and verification
//! - CatalogError: version catalog lookup failures

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type
#[derive(Error, Debug)]
pub enum Error {
    /// Version string parsing errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Train / graph / phase configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Build execution errors
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    /// Proposal store errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Version catalog errors
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors raised while parsing version strings
///
/// Parsing is fail-fast: a string matching neither accepted grammar is
/// rejected outright, never coerced into a partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Not a valid numeric version (`1.2`, `1.2.3` or `1.2.3.4`)
    #[error("invalid version: '{value}'")]
    InvalidVersion { value: String },

    /// Not a valid iteration name (`M1`, `RC1`, `GA`, `SR1`, ...)
    #[error("invalid iteration: '{value}'")]
    InvalidIteration { value: String },

    /// Not a valid artifact version in either dotted or modifier form
    #[error("invalid artifact version: '{value}'")]
    InvalidArtifactVersion { value: String },

    /// Not a valid calendar version (`2025.1.0`, `2025.1.0-M1`, ...)
    #[error("invalid calendar version: '{value}'")]
    InvalidCalver { value: String },
}

/// Fatal configuration errors, surfaced as soon as detected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A module's dependency is not part of the current train iteration
    #[error("dependency '{dependency}' of '{project}' is not a module of iteration {iteration}")]
    MissingDependency {
        project: String,
        dependency: String,
        iteration: String,
    },

    /// The project graph contains a cycle
    #[error("project dependency graph contains a cycle through: {}", projects.join(" -> "))]
    DependencyCycle { projects: Vec<String> },

    /// A project is not registered in the graph or train
    #[error("unknown project: '{project}'")]
    UnknownProject { project: String },

    /// A phase name did not match any known phase
    #[error("unknown phase: '{value}'")]
    UnknownPhase { value: String },

    /// The requested iteration is not part of the train's iteration sequence
    #[error("iteration {iteration} is not part of train '{train}'")]
    IterationNotInTrain { train: String, iteration: String },

    /// The iteration sequence is empty or not strictly increasing
    #[error("invalid iteration sequence: {reason}")]
    InvalidIterationSequence { reason: String },

    /// A project appears more than once in the scheduled module set
    #[error("project '{project}' is scheduled more than once")]
    DuplicateModule { project: String },

    /// No build system capability claims the project
    #[error("no build system supports project '{project}'")]
    UnsupportedProject { project: String },
}

/// Errors produced by the build executor
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// Pre-flight configuration check failed; no operation was started
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// At least one module's operation failed; the report carries one line
    /// per module so a single failure never hides its siblings' status
    #[error("build failed for {failed} of {total} modules:\n{report}")]
    Aggregate {
        failed: usize,
        total: usize,
        report: String,
    },
}

/// Errors related to the persisted proposal file
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the proposal file
    #[error("failed to read proposal file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the proposal file
    #[error("failed to write proposal file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line did not match any accepted proposal file syntax
    #[error("malformed proposal line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },

    /// The train marker does not match the expected train
    #[error("proposal file was written for train '{found}', expected '{expected}'")]
    TrainMismatch { expected: String, found: String },

    /// The iteration marker does not match the expected iteration
    #[error("proposal file was written for iteration '{found}', expected '{expected}'")]
    IterationMismatch { expected: String, found: String },

    /// A required marker line is absent
    #[error("proposal file is missing the '{marker}' marker")]
    MissingMarker { marker: &'static str },

    /// A recorded version string failed to parse
    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Errors raised by version catalog implementations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog has no entry for the coordinate
    #[error("no catalog entry for '{coordinate}'")]
    NotFound { coordinate: String },

    /// The catalog backend failed
    #[error("catalog lookup for '{coordinate}' failed: {message}")]
    Lookup { coordinate: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_error_display() {
        let err = VersionError::InvalidVersion {
            value: "1.x".to_string(),
        };
        assert_eq!(err.to_string(), "invalid version: '1.x'");

        let err = VersionError::InvalidArtifactVersion {
            value: "1.2.3.FOO".to_string(),
        };
        assert!(err.to_string().contains("1.2.3.FOO"));
    }

    #[test]
    fn test_config_error_cycle_display() {
        let err = ConfigError::DependencyCycle {
            projects: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_config_error_missing_dependency_display() {
        let err = ConfigError::MissingDependency {
            project: "rest".to_string(),
            dependency: "commons".to_string(),
            iteration: "RC1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("commons"));
        assert!(msg.contains("rest"));
        assert!(msg.contains("RC1"));
    }

    #[test]
    fn test_executor_aggregate_display() {
        let err = ExecutorError::Aggregate {
            failed: 1,
            total: 3,
            report: "commons: ok\nrest: boom\nweb: ok".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("1 of 3"));
        assert!(msg.contains("rest: boom"));
    }

    #[test]
    fn test_store_error_mismatch_display() {
        let err = StoreError::TrainMismatch {
            expected: "Kepler".to_string(),
            found: "Galileo".to_string(),
        };
        assert!(err.to_string().contains("Galileo"));
        assert!(err.to_string().contains("Kepler"));
    }

    #[test]
    fn test_top_level_error_from_version() {
        let err: Error = VersionError::InvalidVersion {
            value: "x".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Version(_)));
    }

    #[test]
    fn test_top_level_error_from_config() {
        let err: Error = ConfigError::UnknownPhase {
            value: "DEPLOY".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "unknown phase: 'DEPLOY'");
    }
}
