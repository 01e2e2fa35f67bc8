//! Release train version model
//!
//! This module contains the cooperating version abstractions:
//! - Numeric versions with component arithmetic
//! - Named lifecycle iterations and train-owned iteration sequences
//! - Artifact versions rendering the externally published version string
//! - Calendar versions for calver-based trains

mod artifact;
mod calver;
mod iteration;
mod numeric;

pub use artifact::{ArtifactVersion, SuffixFormat, VersionSuffix};
pub use calver::{Calver, CalverModifier};
pub use iteration::{Iteration, IterationSequence};
pub use numeric::Version;
