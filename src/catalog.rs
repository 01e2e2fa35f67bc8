//! Version catalog boundary
//!
//! The upgrade check needs the list of published versions for a dependency
//! coordinate. Where those come from (an artifact repository index, a
//! registry API, a cached mirror) is behind the `VersionCatalog` trait;
//! the engine only consumes the returned version strings.

use crate::domain::Coordinate;
use crate::error::CatalogError;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Source of published version strings per dependency coordinate
///
/// Returned strings are raw catalog entries; callers parse and filter them.
#[async_trait]
pub trait VersionCatalog: Send + Sync {
    /// Fetches all published versions for a coordinate
    async fn fetch_versions(&self, coordinate: &Coordinate) -> Result<Vec<String>, CatalogError>;
}

/// An in-memory catalog over a fixed coordinate-to-versions map
///
/// Used in tests and for offline runs against a pre-fetched index.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    versions: HashMap<Coordinate, Vec<String>>,
}

impl StaticCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the published versions for a coordinate (builder pattern)
    pub fn with_versions(
        mut self,
        coordinate: Coordinate,
        versions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.versions
            .insert(coordinate, versions.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl VersionCatalog for StaticCatalog {
    async fn fetch_versions(&self, coordinate: &Coordinate) -> Result<Vec<String>, CatalogError> {
        let versions = self
            .versions
            .get(coordinate)
            .ok_or_else(|| CatalogError::NotFound {
                coordinate: coordinate.to_string(),
            })?;
        debug!(%coordinate, count = versions.len(), "catalog lookup");
        Ok(versions.clone())
    }
}
