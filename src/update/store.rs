//! Persisted upgrade proposal file
//!
//! The check flow records proposed dependency versions in a line-oriented
//! properties file; the apply flow re-reads it later, possibly in a separate
//! process. Format:
//!
//! ```text
//! dependency.train=Kepler
//! dependency.iteration=RC1
//! dependency[org.example:commons]=1.3.0.RELEASE
//! ```
//!
//! Writes are deterministic (coordinates sorted). On read the train and
//! iteration markers are verified against the expected train iteration;
//! a mismatch means the file belongs to a different release run and is fatal.

use crate::domain::{Coordinate, TrainIteration};
use crate::error::StoreError;
use crate::version::ArtifactVersion;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static TRAIN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^dependency\.train=(.+)$").unwrap());

static ITERATION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^dependency\.iteration=(.+)$").unwrap());

static DEPENDENCY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^dependency\[([^:\]]+):([^:\]]+)\]=(.+)$").unwrap());

/// Reads and writes the proposal properties file
#[derive(Debug, Clone)]
pub struct ProposalStore {
    path: PathBuf,
}

impl ProposalStore {
    /// Creates a store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the proposed versions for a train iteration
    ///
    /// Overwrites any previous content. Coordinates are written in sorted
    /// order so consecutive runs with the same input produce identical files.
    pub fn write(
        &self,
        iteration: &TrainIteration,
        proposals: &BTreeMap<Coordinate, ArtifactVersion>,
    ) -> Result<(), StoreError> {
        let mut content = String::new();
        content.push_str(&format!("dependency.train={}\n", iteration.train().name));
        content.push_str(&format!("dependency.iteration={}\n", iteration.iteration()));
        for (coordinate, version) in proposals {
            content.push_str(&format!("dependency[{}]={}\n", coordinate, version));
        }
        debug!(
            path = %self.path.display(),
            entries = proposals.len(),
            "writing proposal file"
        );
        fs::write(&self.path, content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Reads the proposed versions back, verifying the train iteration
    ///
    /// Blank lines and `#` comments are tolerated; any other line that
    /// matches no accepted syntax is fatal, as is a train or iteration
    /// marker that does not match `expected`.
    pub fn read(
        &self,
        expected: &TrainIteration,
    ) -> Result<BTreeMap<Coordinate, ArtifactVersion>, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let mut train: Option<String> = None;
        let mut iteration: Option<String> = None;
        let mut proposals = BTreeMap::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(captures) = TRAIN_LINE.captures(line) {
                train = Some(captures[1].to_string());
            } else if let Some(captures) = ITERATION_LINE.captures(line) {
                iteration = Some(captures[1].to_string());
            } else if let Some(captures) = DEPENDENCY_LINE.captures(line) {
                let coordinate = Coordinate::new(&captures[1], &captures[2]);
                let version = ArtifactVersion::parse(&captures[3])?;
                proposals.insert(coordinate, version);
            } else {
                return Err(StoreError::MalformedLine {
                    line: index + 1,
                    content: line.to_string(),
                });
            }
        }

        let train = train.ok_or(StoreError::MissingMarker {
            marker: "dependency.train",
        })?;
        if train != expected.train().name {
            return Err(StoreError::TrainMismatch {
                expected: expected.train().name.clone(),
                found: train,
            });
        }

        let iteration = iteration.ok_or(StoreError::MissingMarker {
            marker: "dependency.iteration",
        })?;
        if iteration != expected.iteration().to_string() {
            return Err(StoreError::IterationMismatch {
                expected: expected.iteration().to_string(),
                found: iteration,
            });
        }

        debug!(
            path = %self.path.display(),
            entries = proposals.len(),
            "read proposal file"
        );
        Ok(proposals)
    }
}
