//! Read access to the source relations.
//!
//! The metrics never talk to a database directly. They consume a
//! [`RelationSource`], which hands out typed record sets for the six named
//! relations and may optionally push the transitive-reachability query down
//! into the store.
//!
//! ## Implementations
//!
//! - [`SqliteStore`] - a `SQLite` database in the package index dump layout
//! - [`MemoryStore`] - owned vectors, for embedding and tests
//!
//! A store handle is created by the caller and passed in explicitly; its
//! lifetime is the analysis run.

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::edges::VariantFilter;
use crate::error::Result;
use crate::types::{
    DependencyEdge, Maintainer, Package, PackageUrl, RelationCounts, ScorecardCheck, Wheel,
};

/// Typed read access to the six source relations.
///
/// Implementations must give read-your-writes consistency within a run. Store
/// failures are returned as-is; callers decide whether to retry.
pub trait RelationSource: Send + Sync {
    /// The `packages` relation.
    fn packages(&self) -> Result<Vec<Package>>;

    /// The `deps` relation.
    fn deps(&self) -> Result<Vec<DependencyEdge>>;

    /// The `maintainers` relation.
    fn maintainers(&self) -> Result<Vec<Maintainer>>;

    /// The `wheels` relation.
    fn wheels(&self) -> Result<Vec<Wheel>>;

    /// The `package_urls` relation.
    fn package_urls(&self) -> Result<Vec<PackageUrl>>;

    /// The `scorecard_checks` relation.
    fn scorecard_checks(&self) -> Result<Vec<ScorecardCheck>>;

    /// Row counts of every relation present in the store.
    fn relation_counts(&self) -> Result<RelationCounts>;

    /// Transitive closure of the `deps` rows selected by `filter`, computed by
    /// the store itself.
    ///
    /// Returns `Ok(None)` when the store cannot evaluate recursive queries; the
    /// caller then runs the in-process engine. When supported, the result is
    /// the same pair *set* the engine produces.
    fn transitive_closure(&self, filter: &VariantFilter) -> Result<Option<Vec<(String, String)>>> {
        let _ = filter;
        Ok(None)
    }
}
