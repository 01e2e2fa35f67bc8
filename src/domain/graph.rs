//! Static project dependency graph
//!
//! Models the depends-on relation between participating projects and exposes
//! one canonical, deterministic topological order (dependencies before
//! dependents) used as the default dependency-respecting schedule.
//!
//! A cycle is a fatal configuration error raised when the graph is built,
//! never later.

use crate::domain::Project;
use crate::error::ConfigError;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Directed, acyclic depends-on graph over projects
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    /// `project -> direct dependencies`, name-keyed for determinism
    dependencies: BTreeMap<String, BTreeSet<String>>,
    /// Canonical topological order, computed once at construction
    order: Vec<Project>,
}

impl ProjectGraph {
    /// Builds a graph from per-project dependency declarations
    ///
    /// Every declared dependency must itself be a declared project.
    /// Returns [`ConfigError::DependencyCycle`] if the relation is cyclic and
    /// [`ConfigError::UnknownProject`] for dangling dependency references.
    pub fn build(
        declarations: impl IntoIterator<Item = (Project, Vec<Project>)>,
    ) -> Result<Self, ConfigError> {
        let mut dependencies: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (project, deps) in declarations {
            dependencies
                .entry(project.name)
                .or_default()
                .extend(deps.into_iter().map(|d| d.name));
        }

        for deps in dependencies.values() {
            for dep in deps {
                if !dependencies.contains_key(dep) {
                    return Err(ConfigError::UnknownProject {
                        project: dep.clone(),
                    });
                }
            }
        }

        let order = Self::topological_sort(&dependencies)?;
        debug!(projects = order.len(), "built project graph");
        Ok(Self {
            dependencies,
            order,
        })
    }

    /// Kahn's algorithm with a name-sorted ready set, so ties always break
    /// the same way and the canonical order is reproducible.
    fn topological_sort(
        dependencies: &BTreeMap<String, BTreeSet<String>>,
    ) -> Result<Vec<Project>, ConfigError> {
        let mut remaining: BTreeMap<&str, BTreeSet<&str>> = dependencies
            .iter()
            .map(|(name, deps)| {
                (
                    name.as_str(),
                    deps.iter().map(String::as_str).collect::<BTreeSet<_>>(),
                )
            })
            .collect();

        let mut order = Vec::with_capacity(dependencies.len());
        while !remaining.is_empty() {
            // BTreeMap iteration yields names in order, so the first ready
            // project is the lexicographically smallest one.
            let ready: Vec<&str> = remaining
                .iter()
                .filter(|(_, deps)| deps.is_empty())
                .map(|(name, _)| *name)
                .collect();

            if ready.is_empty() {
                let cycle = Self::find_cycle(&remaining);
                return Err(ConfigError::DependencyCycle { projects: cycle });
            }

            for name in ready {
                remaining.remove(name);
                for deps in remaining.values_mut() {
                    deps.remove(name);
                }
                order.push(Project::new(name));
            }
        }
        Ok(order)
    }

    /// DFS over the unresolved remainder to name one concrete cycle path
    fn find_cycle(remaining: &BTreeMap<&str, BTreeSet<&str>>) -> Vec<String> {
        fn dfs<'a>(
            node: &'a str,
            remaining: &BTreeMap<&'a str, BTreeSet<&'a str>>,
            visited: &mut HashSet<&'a str>,
            path: &mut Vec<&'a str>,
        ) -> bool {
            if path.contains(&node) {
                path.push(node);
                return true;
            }
            if !visited.insert(node) {
                return false;
            }
            path.push(node);
            if let Some(deps) = remaining.get(node) {
                for dep in deps {
                    if dfs(dep, remaining, visited, path) {
                        return true;
                    }
                }
            }
            path.pop();
            false
        }

        let mut visited = HashSet::new();
        for start in remaining.keys() {
            let mut path = Vec::new();
            if dfs(start, remaining, &mut visited, &mut path) {
                // Trim the lead-in so the path starts at the repeated node.
                if let Some(first) = path.last().cloned() {
                    if let Some(pos) = path.iter().position(|n| *n == first) {
                        return path[pos..].iter().map(|n| n.to_string()).collect();
                    }
                }
            }
        }
        remaining.keys().map(|n| n.to_string()).collect()
    }

    /// Direct dependencies of a project
    pub fn dependencies_of(&self, project: &Project) -> Result<Vec<Project>, ConfigError> {
        let deps = self
            .dependencies
            .get(&project.name)
            .ok_or_else(|| ConfigError::UnknownProject {
                project: project.name.clone(),
            })?;
        Ok(deps.iter().map(Project::new).collect())
    }

    /// All transitive dependencies of a project, name-sorted
    pub fn transitive_dependencies_of(
        &self,
        project: &Project,
    ) -> Result<Vec<Project>, ConfigError> {
        self.dependencies_of(project)?;

        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut stack = vec![project.name.clone()];
        while let Some(current) = stack.pop() {
            if let Some(deps) = self.dependencies.get(&current) {
                for dep in deps {
                    if seen.insert(dep.clone()) {
                        stack.push(dep.clone());
                    }
                }
            }
        }
        seen.remove(&project.name);
        Ok(seen.into_iter().map(Project::new).collect())
    }

    /// Returns true if the graph knows the project
    pub fn contains(&self, project: &Project) -> bool {
        self.dependencies.contains_key(&project.name)
    }

    /// The canonical order: every dependency precedes its dependents
    pub fn topological_order(&self) -> &[Project] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> Project {
        Project::new(name)
    }

    fn declarations(pairs: &[(&str, &[&str])]) -> Vec<(Project, Vec<Project>)> {
        pairs
            .iter()
            .map(|(name, deps)| (project(name), deps.iter().map(|d| project(d)).collect()))
            .collect()
    }

    fn chain() -> ProjectGraph {
        // rest depends on commons, web depends on rest
        ProjectGraph::build(declarations(&[
            ("commons", &[]),
            ("rest", &["commons"]),
            ("web", &["rest"]),
        ]))
        .unwrap()
    }

    #[test]
    fn test_topological_order_puts_dependencies_first() {
        let graph = chain();
        let order: Vec<&str> = graph
            .topological_order()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(order, vec!["commons", "rest", "web"]);
    }

    #[test]
    fn test_topological_order_is_deterministic_for_ties() {
        let graph = ProjectGraph::build(declarations(&[
            ("zeta", &[]),
            ("alpha", &[]),
            ("mid", &["alpha", "zeta"]),
        ]))
        .unwrap();
        let order: Vec<&str> = graph
            .topological_order()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(order, vec!["alpha", "zeta", "mid"]);
    }

    #[test]
    fn test_diamond_order() {
        let graph = ProjectGraph::build(declarations(&[
            ("base", &[]),
            ("left", &["base"]),
            ("right", &["base"]),
            ("top", &["left", "right"]),
        ]))
        .unwrap();
        let order: Vec<&str> = graph
            .topological_order()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(order[0], "base");
        assert_eq!(order[3], "top");
    }

    #[test]
    fn test_cycle_is_fatal_at_construction() {
        let result = ProjectGraph::build(declarations(&[
            ("a", &["b"]),
            ("b", &["c"]),
            ("c", &["a"]),
        ]));
        match result {
            Err(ConfigError::DependencyCycle { projects }) => {
                assert!(projects.len() >= 3);
                assert_eq!(projects.first(), projects.last());
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let result = ProjectGraph::build(declarations(&[("a", &["a"])]));
        assert!(matches!(
            result,
            Err(ConfigError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn test_dangling_dependency_is_rejected() {
        let result = ProjectGraph::build(declarations(&[("rest", &["commons"])]));
        assert!(matches!(result, Err(ConfigError::UnknownProject { .. })));
    }

    #[test]
    fn test_dependencies_of() {
        let graph = chain();
        let deps = graph.dependencies_of(&project("web")).unwrap();
        assert_eq!(deps, vec![project("rest")]);
        assert!(graph.dependencies_of(&project("commons")).unwrap().is_empty());
    }

    #[test]
    fn test_dependencies_of_unknown_project() {
        let graph = chain();
        assert!(matches!(
            graph.dependencies_of(&project("search")),
            Err(ConfigError::UnknownProject { .. })
        ));
    }

    #[test]
    fn test_transitive_dependencies() {
        let graph = chain();
        let deps = graph.transitive_dependencies_of(&project("web")).unwrap();
        assert_eq!(deps, vec![project("commons"), project("rest")]);
    }

    #[test]
    fn test_contains() {
        let graph = chain();
        assert!(graph.contains(&project("rest")));
        assert!(!graph.contains(&project("search")));
    }

    #[test]
    fn test_empty_graph() {
        let graph = ProjectGraph::build(Vec::new()).unwrap();
        assert!(graph.topological_order().is_empty());
    }
}
