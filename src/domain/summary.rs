//! Execution summaries
//!
//! Aggregates the per-module outcomes of one executor run. The summary always
//! carries one outcome per module, success or failure, so a single failing
//! module never hides the status of its siblings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The captured outcome of one module's operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOutcome {
    /// Project the operation ran for
    pub project: String,
    /// Success message or failure description
    #[serde(flatten)]
    pub result: OutcomeKind,
}

/// Success or failure of one module operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The operation completed
    Success { message: String },
    /// The operation failed; the failure was captured, not propagated
    Failure { message: String },
}

impl ModuleOutcome {
    /// Records a successful operation
    pub fn success(project: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            result: OutcomeKind::Success {
                message: message.into(),
            },
        }
    }

    /// Records a failed operation
    pub fn failure(project: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            result: OutcomeKind::Failure {
                message: message.into(),
            },
        }
    }

    /// Returns true for successful outcomes
    pub fn is_success(&self) -> bool {
        matches!(self.result, OutcomeKind::Success { .. })
    }
}

impl fmt::Display for ModuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            OutcomeKind::Success { message } => write!(f, "{}: {}", self.project, message),
            OutcomeKind::Failure { message } => write!(f, "{}: FAILED: {}", self.project, message),
        }
    }
}

/// Aggregate of all module outcomes from one executor run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// One outcome per module, in scheduling order
    pub outcomes: Vec<ModuleOutcome>,
}

impl ExecutionSummary {
    /// Creates a summary from collected outcomes
    pub fn new(outcomes: Vec<ModuleOutcome>) -> Self {
        Self { outcomes }
    }

    /// Number of modules that succeeded
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of modules that failed
    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    /// Total number of modules
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true when every module succeeded
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_success())
    }

    /// All failed outcomes
    pub fn failures(&self) -> impl Iterator<Item = &ModuleOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// The outcome for a project, if it was part of the run
    pub fn outcome_for(&self, project: &str) -> Option<&ModuleOutcome> {
        self.outcomes.iter().find(|o| o.project == project)
    }

    /// Renders exactly one line per module
    pub fn report(&self) -> String {
        self.outcomes
            .iter()
            .map(ModuleOutcome::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> ExecutionSummary {
        ExecutionSummary::new(vec![
            ModuleOutcome::success("commons", "deployed 1.2.0.RELEASE"),
            ModuleOutcome::failure("rest", "descriptor update failed"),
            ModuleOutcome::success("web", "deployed 2.0.0.RELEASE"),
        ])
    }

    #[test]
    fn test_counts() {
        let summary = sample_summary();
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.success_count(), 2);
        assert_eq!(summary.failure_count(), 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_all_success() {
        let summary = ExecutionSummary::new(vec![ModuleOutcome::success("commons", "ok")]);
        assert!(summary.is_success());
        assert_eq!(summary.failure_count(), 0);
    }

    #[test]
    fn test_failures_iterator() {
        let summary = sample_summary();
        let failed: Vec<&str> = summary.failures().map(|o| o.project.as_str()).collect();
        assert_eq!(failed, vec!["rest"]);
    }

    #[test]
    fn test_outcome_for() {
        let summary = sample_summary();
        assert!(summary.outcome_for("rest").is_some());
        assert!(!summary.outcome_for("rest").unwrap().is_success());
        assert!(summary.outcome_for("search").is_none());
    }

    #[test]
    fn test_report_one_line_per_module() {
        let summary = sample_summary();
        let report = summary.report();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "commons: deployed 1.2.0.RELEASE");
        assert_eq!(lines[1], "rest: FAILED: descriptor update failed");
    }

    #[test]
    fn test_serde_round_trip() {
        let summary = sample_summary();
        let json = serde_json::to_string(&summary).unwrap();
        let parsed: ExecutionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }
}
