//! Concurrent build executor
//!
//! Runs a caller-supplied operation once per module of a train iteration on a
//! bounded worker pool and aggregates every module's outcome into an
//! [`ExecutionSummary`]:
//! - Ordered mode waits for a module's in-iteration dependencies before its
//!   operation starts
//! - Any-order mode submits everything concurrently
//! - A failing operation is captured per module and never aborts siblings
//!   already in flight; any failure turns the final summary into an
//!   aggregate error listing one line per module

use crate::domain::{ExecutionSummary, ModuleIteration, ModuleOutcome, ProjectGraph};
use crate::error::{ConfigError, ExecutorError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default number of concurrently running operations
const DEFAULT_CONCURRENCY: usize = 4;

/// Error type operations may fail with
pub type OperationError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A build operation: runs synchronously for one module and reports a
/// per-module result message
pub type Operation = Arc<dyn Fn(&ModuleIteration) -> Result<String, OperationError> + Send + Sync>;

/// Executor for running operations across the modules of a train iteration
pub struct BuildExecutor {
    /// Bounds how many operation bodies run at once
    semaphore: Arc<Semaphore>,
}

impl Default for BuildExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl BuildExecutor {
    /// Creates an executor with the given worker-pool bound
    pub fn new(concurrency: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Runs `operation` for every module, honoring the dependency graph
    ///
    /// Before a module's operation starts, the outcomes of all its
    /// in-iteration dependencies are awaited (success or failure alike).
    /// A dependency that is not part of the scheduled module set is a fatal
    /// configuration error, raised before any operation runs.
    pub async fn run_ordered(
        &self,
        modules: Vec<ModuleIteration>,
        graph: &ProjectGraph,
        operation: Operation,
    ) -> Result<ExecutionSummary, ExecutorError> {
        self.run(modules, Some(graph), operation).await
    }

    /// Runs `operation` for every module with no ordering constraint
    ///
    /// Intended for operations defined to be side-effect independent across
    /// modules.
    pub async fn run_any_order(
        &self,
        modules: Vec<ModuleIteration>,
        operation: Operation,
    ) -> Result<ExecutionSummary, ExecutorError> {
        self.run(modules, None, operation).await
    }

    async fn run(
        &self,
        modules: Vec<ModuleIteration>,
        graph: Option<&ProjectGraph>,
        operation: Operation,
    ) -> Result<ExecutionSummary, ExecutorError> {
        let modules = match graph {
            Some(graph) => Self::schedule_order(modules, graph),
            None => modules,
        };
        let dependency_sets = Self::validate(&modules, graph)?;

        // Per-run outcome arena: the only shared mutable state, written at
        // most once per project since each module is scheduled exactly once.
        let mut outcomes: HashMap<String, ModuleOutcome> = HashMap::new();
        let mut handles: HashMap<String, JoinHandle<ModuleOutcome>> = HashMap::new();
        let mut submission_order: Vec<String> = Vec::with_capacity(modules.len());

        for (module, dependencies) in modules.into_iter().zip(dependency_sets) {
            // Dependency waits happen here, on the submitting task; workers
            // only ever run operation bodies.
            for dependency in dependencies {
                if outcomes.contains_key(&dependency) {
                    continue;
                }
                if let Some(handle) = handles.remove(&dependency) {
                    debug!(project = %module.project(), %dependency, "waiting for dependency");
                    let outcome = Self::collect(&dependency, handle).await;
                    outcomes.insert(dependency, outcome);
                }
            }

            let project = module.project().name.clone();
            submission_order.push(project.clone());
            handles.insert(project, self.submit(module, Arc::clone(&operation)));
        }

        // Final collection: every module yields a captured outcome before the
        // summary is built.
        for project in &submission_order {
            if let Some(handle) = handles.remove(project) {
                let outcome = Self::collect(project, handle).await;
                outcomes.insert(project.clone(), outcome);
            }
        }

        let summary = ExecutionSummary::new(
            submission_order
                .iter()
                .filter_map(|project| outcomes.remove(project))
                .collect(),
        );

        if summary.is_success() {
            Ok(summary)
        } else {
            warn!(
                failed = summary.failure_count(),
                total = summary.total(),
                "build run failed"
            );
            Err(ExecutorError::Aggregate {
                failed: summary.failure_count(),
                total: summary.total(),
                report: summary.report(),
            })
        }
    }

    /// Reorders modules into the graph's canonical topological order, so a
    /// module is always submitted after every module it depends on and the
    /// sequential dependency waits in [`run`] line up with submission.
    ///
    /// Projects unknown to the graph have no edges; the stable sort keeps
    /// their relative order and puts them first.
    fn schedule_order(
        mut modules: Vec<ModuleIteration>,
        graph: &ProjectGraph,
    ) -> Vec<ModuleIteration> {
        let rank: HashMap<&str, usize> = graph
            .topological_order()
            .iter()
            .enumerate()
            .map(|(index, project)| (project.name.as_str(), index + 1))
            .collect();
        modules.sort_by_key(|module| {
            rank.get(module.project().name.as_str())
                .copied()
                .unwrap_or(0)
        });
        modules
    }

    /// Pre-flight check: no duplicate modules, and in ordered mode every
    /// graph dependency of every module is part of the scheduled set.
    ///
    /// Returns the per-module dependency names to wait on (empty in
    /// any-order mode). Runs before anything is submitted, so configuration
    /// errors surface before any operation starts.
    fn validate(
        modules: &[ModuleIteration],
        graph: Option<&ProjectGraph>,
    ) -> Result<Vec<Vec<String>>, ConfigError> {
        let mut present: HashSet<&str> = HashSet::new();
        for module in modules {
            if !present.insert(module.project().name.as_str()) {
                return Err(ConfigError::DuplicateModule {
                    project: module.project().name.clone(),
                });
            }
        }

        let Some(graph) = graph else {
            return Ok(vec![Vec::new(); modules.len()]);
        };

        let mut dependency_sets = Vec::with_capacity(modules.len());
        for module in modules {
            // Projects unknown to the graph simply have no declared
            // dependencies.
            if !graph.contains(module.project()) {
                dependency_sets.push(Vec::new());
                continue;
            }
            let dependencies = graph.dependencies_of(module.project())?;
            let mut names = Vec::with_capacity(dependencies.len());
            for dependency in dependencies {
                if !present.contains(dependency.name.as_str()) {
                    return Err(ConfigError::MissingDependency {
                        project: module.project().name.clone(),
                        dependency: dependency.name,
                        iteration: module.train_iteration().iteration().to_string(),
                    });
                }
                names.push(dependency.name);
            }
            dependency_sets.push(names);
        }
        Ok(dependency_sets)
    }

    /// Submits one module's operation onto the bounded blocking pool
    ///
    /// The returned handle always completes with a captured outcome: an
    /// operation error (or panic) becomes a failure outcome instead of
    /// propagating.
    fn submit(&self, module: ModuleIteration, operation: Operation) -> JoinHandle<ModuleOutcome> {
        let semaphore = Arc::clone(&self.semaphore);
        tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.unwrap();
            let project = module.project().name.clone();
            debug!(%project, "starting operation");
            let result = tokio::task::spawn_blocking(move || operation(&module)).await;
            match result {
                Ok(Ok(message)) => ModuleOutcome::success(project, message),
                Ok(Err(error)) => {
                    warn!(%project, %error, "operation failed");
                    ModuleOutcome::failure(project, error.to_string())
                }
                Err(join_error) => {
                    warn!(%project, "operation panicked");
                    ModuleOutcome::failure(project, format!("operation panicked: {}", join_error))
                }
            }
        })
    }

    /// Awaits a handle, capturing wrapper-task failures as module failures
    async fn collect(project: &str, handle: JoinHandle<ModuleOutcome>) -> ModuleOutcome {
        match handle.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                ModuleOutcome::failure(project, format!("task failed: {}", join_error))
            }
        }
    }
}
