//! # Pkgraph: Dependency Closure and Metrics for Package Indexes
//!
//! Pkgraph reads a package index dataset (packages, declared dependencies,
//! maintainers and metadata) and computes derived metrics over both the direct
//! dependency graph and its transitive closure.
//!
//! ## Pipeline
//!
//! ```text
//! RelationSource ──▶ EdgeSet ──▶ ClosureSet ──▶ metrics ──▶ ResultTable
//!  (store)          (extract)   (semi-naive)   (catalogue)  (projection)
//! ```
//!
//! - **Store agnostic** - any [`RelationSource`] works; `SQLite` and in-memory
//!   sources are provided
//! - **Set semantics** - the closure holds each `(package, dependency)` pair once
//! - **Deterministic** - every ranking breaks ties by its key
//! - **Read-only** - source relations are never modified
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use chrono::Utc;
//! use pkgraph::{Analysis, AnalysisConfig, MetricKind, SqliteStore};
//!
//! let store = SqliteStore::open(Path::new("pypi-data.sqlite"))?;
//! let analysis = Analysis::load(&store, AnalysisConfig::default())?;
//!
//! let closure = analysis.closure();
//! println!("{} transitive pairs in {} rounds", closure.len(), closure.rounds());
//!
//! let top = analysis.run(MetricKind::TransitiveDeps, Utc::now())?;
//! for row in top.rows.iter().take(10) {
//!     println!("{row:?}");
//! }
//! # Ok::<(), pkgraph::Error>(())
//! ```

mod closure;
mod config;
mod edges;
mod error;
pub mod metrics;
mod projection;
mod report;
mod store;
mod types;

pub use closure::{ClosureControl, ClosureSet, compute_closure, compute_closure_with};
pub use config::{
    AnalysisConfig, CONFIG_FILE_NAME, ClosureConfig, ClubConfig, DEFAULT_IGNORE_PREFIXES,
    DEFAULT_PREFIX_MAINTAINER_COUNT, DEFAULT_TOP_N, DEFAULT_WINDOW_DAYS, LookupConfig,
    MAX_WINDOW_DAYS, PrefixConfig,
};
pub use edges::{EdgeSet, NameTable, NodeId, VariantFilter, extract_edges};
pub use error::{Error, Result};
pub use metrics::{MetricKind, Ranked};
pub use projection::{Cell, ResultTable, TableRow, rank_desc};
pub use report::{Analysis, closure_from_store};
pub use store::{MemoryStore, RelationSource, SqliteStore};
pub use types::{
    DependencyEdge, Maintainer, Package, PackageUrl, Relation, RelationCounts, ScorecardCheck,
    Snapshot, Wheel,
};
