//! reltrain - Release train orchestration core
//!
//! This library models release-train versioning and drives dependency-ordered,
//! concurrent execution of build-system operations across interdependent
//! modules:
//! - Version arithmetic (numeric, iteration, artifact and calendar versions)
//! - Train / module domain graph with a dependency-respecting schedule
//! - Concurrent build executor with per-module outcome aggregation
//! - Phase-aware version resolution and dependency upgrade proposals

pub mod buildsystem;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod executor;
pub mod update;
pub mod version;
