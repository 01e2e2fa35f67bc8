//! Lifecycle iterations and train-owned iteration sequences
//!
//! An iteration is a named lifecycle stage: milestones (`M1`..), release
//! candidates (`RC1`..), general availability (`GA`) and service releases
//! (`SR1`..). Iterations order by class (milestone < release candidate <
//! GA < service release), then by numeric suffix within a class.
//!
//! Successor chains are not baked into the iterations themselves: a train
//! owns an [`IterationSequence`], and "next" is an index lookup into that
//! sequence.

use crate::error::{ConfigError, VersionError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static ITERATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:GA|(M|RC|SR)(\d+))$").unwrap());

/// A named lifecycle stage within a release train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Iteration {
    /// Preview milestone (`M1`, `M2`, ...)
    Milestone(u32),
    /// Release candidate (`RC1`, `RC2`, ...)
    ReleaseCandidate(u32),
    /// General availability release
    GeneralAvailability,
    /// Service release after GA (`SR1`, `SR2`, ...)
    ServiceRelease(u32),
}

impl Iteration {
    /// Parses an iteration name (`M1`, `RC2`, `GA`, `SR3`)
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let trimmed = value.trim();
        let caps = ITERATION_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::InvalidIteration {
                value: value.to_string(),
            })?;

        let Some(class) = caps.get(1) else {
            return Ok(Iteration::GeneralAvailability);
        };
        let number: u32 = caps[2].parse().map_err(|_| VersionError::InvalidIteration {
            value: value.to_string(),
        })?;

        Ok(match class.as_str() {
            "M" => Iteration::Milestone(number),
            "RC" => Iteration::ReleaseCandidate(number),
            "SR" => Iteration::ServiceRelease(number),
            _ => unreachable!("regex only admits M, RC and SR classes"),
        })
    }

    /// Returns true for milestones
    pub fn is_milestone(&self) -> bool {
        matches!(self, Iteration::Milestone(_))
    }

    /// Returns true for release candidates
    pub fn is_release_candidate(&self) -> bool {
        matches!(self, Iteration::ReleaseCandidate(_))
    }

    /// Returns true for the GA iteration
    pub fn is_ga(&self) -> bool {
        matches!(self, Iteration::GeneralAvailability)
    }

    /// Returns true for service releases
    pub fn is_service_release(&self) -> bool {
        matches!(self, Iteration::ServiceRelease(_))
    }

    /// Returns true for publicly consumable iterations (GA and service releases)
    pub fn is_public(&self) -> bool {
        self.is_ga() || self.is_service_release()
    }

    /// Returns true for pre-release iterations (milestones and release candidates)
    pub fn is_preview(&self) -> bool {
        self.is_milestone() || self.is_release_candidate()
    }

    /// Class precedence used for ordering and classification comparisons
    fn class_rank(&self) -> u8 {
        match self {
            Iteration::Milestone(_) => 0,
            Iteration::ReleaseCandidate(_) => 1,
            Iteration::GeneralAvailability => 2,
            Iteration::ServiceRelease(_) => 3,
        }
    }

    /// Numeric suffix within the class; GA has none
    fn ordinal(&self) -> u32 {
        match self {
            Iteration::Milestone(n)
            | Iteration::ReleaseCandidate(n)
            | Iteration::ServiceRelease(n) => *n,
            Iteration::GeneralAvailability => 0,
        }
    }
}

impl Ord for Iteration {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.class_rank()
            .cmp(&other.class_rank())
            .then(self.ordinal().cmp(&other.ordinal()))
    }
}

impl PartialOrd for Iteration {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Iteration::Milestone(n) => write!(f, "M{}", n),
            Iteration::ReleaseCandidate(n) => write!(f, "RC{}", n),
            Iteration::GeneralAvailability => write!(f, "GA"),
            Iteration::ServiceRelease(n) => write!(f, "SR{}", n),
        }
    }
}

impl FromStr for Iteration {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Iteration {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Iteration> for String {
    fn from(value: Iteration) -> Self {
        value.to_string()
    }
}

/// The ordered iterations a train may pass through
///
/// Replaces statically linked successor chains: "next" is computed by index
/// lookup, so the sequence carries no construction-order fragility and each
/// train can define its own lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationSequence {
    iterations: Vec<Iteration>,
}

impl IterationSequence {
    /// Creates a sequence from ordered iterations
    ///
    /// The sequence must be non-empty, duplicate-free and strictly increasing
    /// under iteration ordering.
    pub fn new(iterations: Vec<Iteration>) -> Result<Self, ConfigError> {
        if iterations.is_empty() {
            return Err(ConfigError::InvalidIterationSequence {
                reason: "sequence is empty".to_string(),
            });
        }
        for pair in iterations.windows(2) {
            if pair[0] >= pair[1] {
                return Err(ConfigError::InvalidIterationSequence {
                    reason: format!("{} must precede {}", pair[1], pair[0]),
                });
            }
        }
        Ok(Self { iterations })
    }

    /// The first iteration of the sequence (a train's initial iteration)
    pub fn first(&self) -> Iteration {
        self.iterations[0]
    }

    /// The iteration following `iteration`, or None at the end of the chain
    pub fn next(&self, iteration: Iteration) -> Option<Iteration> {
        let index = self.iterations.iter().position(|i| *i == iteration)?;
        self.iterations.get(index + 1).copied()
    }

    /// Returns true if the sequence contains `iteration`
    pub fn contains(&self, iteration: Iteration) -> bool {
        self.iterations.contains(&iteration)
    }

    /// All iterations in order
    pub fn iterations(&self) -> &[Iteration] {
        &self.iterations
    }
}

impl Default for IterationSequence {
    /// The standard lifecycle: two milestones, two release candidates, GA and
    /// six service releases
    fn default() -> Self {
        let mut iterations = vec![
            Iteration::Milestone(1),
            Iteration::Milestone(2),
            Iteration::ReleaseCandidate(1),
            Iteration::ReleaseCandidate(2),
            Iteration::GeneralAvailability,
        ];
        iterations.extend((1..=6).map(Iteration::ServiceRelease));
        Self { iterations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_iterations() {
        assert_eq!(Iteration::parse("M1").unwrap(), Iteration::Milestone(1));
        assert_eq!(
            Iteration::parse("RC2").unwrap(),
            Iteration::ReleaseCandidate(2)
        );
        assert_eq!(
            Iteration::parse("GA").unwrap(),
            Iteration::GeneralAvailability
        );
        assert_eq!(
            Iteration::parse("SR14").unwrap(),
            Iteration::ServiceRelease(14)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        for value in ["", "M", "ga", "RC", "BETA1", "SR-1", "GA1", "M1.1"] {
            assert!(
                Iteration::parse(value).is_err(),
                "'{}' should not parse",
                value
            );
        }
    }

    #[test]
    fn test_classification_predicates() {
        assert!(Iteration::Milestone(3).is_milestone());
        assert!(Iteration::Milestone(3).is_preview());
        assert!(Iteration::ReleaseCandidate(1).is_release_candidate());
        assert!(Iteration::ReleaseCandidate(1).is_preview());
        assert!(Iteration::GeneralAvailability.is_ga());
        assert!(Iteration::GeneralAvailability.is_public());
        assert!(Iteration::ServiceRelease(2).is_service_release());
        assert!(Iteration::ServiceRelease(2).is_public());
        assert!(!Iteration::ServiceRelease(2).is_preview());
    }

    #[test]
    fn test_ordering_by_class_then_ordinal() {
        let mut iterations = vec![
            Iteration::ServiceRelease(1),
            Iteration::GeneralAvailability,
            Iteration::Milestone(2),
            Iteration::ReleaseCandidate(1),
            Iteration::Milestone(1),
        ];
        iterations.sort();
        assert_eq!(
            iterations,
            vec![
                Iteration::Milestone(1),
                Iteration::Milestone(2),
                Iteration::ReleaseCandidate(1),
                Iteration::GeneralAvailability,
                Iteration::ServiceRelease(1),
            ]
        );
    }

    #[test]
    fn test_display_round_trip() {
        for name in ["M1", "RC2", "GA", "SR10"] {
            let iteration = Iteration::parse(name).unwrap();
            assert_eq!(iteration.to_string(), name);
            assert_eq!(Iteration::parse(&iteration.to_string()).unwrap(), iteration);
        }
    }

    #[test]
    fn test_sequence_next_by_index() {
        let sequence = IterationSequence::default();
        assert_eq!(sequence.first(), Iteration::Milestone(1));
        assert_eq!(
            sequence.next(Iteration::Milestone(1)),
            Some(Iteration::Milestone(2))
        );
        assert_eq!(
            sequence.next(Iteration::ReleaseCandidate(2)),
            Some(Iteration::GeneralAvailability)
        );
        assert_eq!(
            sequence.next(Iteration::GeneralAvailability),
            Some(Iteration::ServiceRelease(1))
        );
        assert_eq!(sequence.next(Iteration::ServiceRelease(6)), None);
    }

    #[test]
    fn test_sequence_next_of_unknown_iteration() {
        let sequence = IterationSequence::new(vec![
            Iteration::ReleaseCandidate(1),
            Iteration::GeneralAvailability,
        ])
        .unwrap();
        assert_eq!(sequence.next(Iteration::Milestone(1)), None);
        assert!(!sequence.contains(Iteration::Milestone(1)));
    }

    #[test]
    fn test_sequence_rejects_empty() {
        assert!(matches!(
            IterationSequence::new(vec![]),
            Err(ConfigError::InvalidIterationSequence { .. })
        ));
    }

    #[test]
    fn test_sequence_rejects_out_of_order() {
        let result = IterationSequence::new(vec![
            Iteration::GeneralAvailability,
            Iteration::Milestone(1),
        ]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidIterationSequence { .. })
        ));
    }

    #[test]
    fn test_sequence_rejects_duplicates() {
        let result =
            IterationSequence::new(vec![Iteration::Milestone(1), Iteration::Milestone(1)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_iteration_as_string() {
        let json = serde_json::to_string(&Iteration::ServiceRelease(3)).unwrap();
        assert_eq!(json, "\"SR3\"");
        let parsed: Iteration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Iteration::ServiceRelease(3));
    }
}
