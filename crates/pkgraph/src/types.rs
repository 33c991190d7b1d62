//! Domain types for pkgraph.
//!
//! These types mirror the relations of a package index dataset:
//! - **Core relations**: `Package`, `DependencyEdge`, `Maintainer` (read by metrics)
//! - **Metadata relations**: `Wheel`, `PackageUrl`, `ScorecardCheck` (exposed, not aggregated)
//! - **Run state**: `Snapshot` (immutable copy of the core relations for one analysis run)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Package name | `String` as stored | Case is significant; no normalization |
//! | downloads | `Option<u64>` | Null is distinct from zero and is excluded from aggregates |
//! | Timestamps | `DateTime<Utc>` | Day-of-week and rolling windows need calendar math |
//! | Flags | Plain `bool` | Opaque to the metrics; carried for consumers |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::store::RelationSource;

// ============================================================================
// Relation names
// ============================================================================

/// The six named relations of the source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// One row per package
    Packages,
    /// Declared dependency edges
    Deps,
    /// Built distribution files
    Wheels,
    /// `(package, maintainer)` pairs
    Maintainers,
    /// Project URLs
    PackageUrls,
    /// `OpenSSF` scorecard check results
    ScorecardChecks,
}

impl Relation {
    /// All relations, in the order they are reported.
    pub const ALL: [Self; 6] = [
        Self::Packages,
        Self::Deps,
        Self::Wheels,
        Self::Maintainers,
        Self::PackageUrls,
        Self::ScorecardChecks,
    ];

    /// Table name in the store.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Packages => "packages",
            Self::Deps => "deps",
            Self::Wheels => "wheels",
            Self::Maintainers => "maintainers",
            Self::PackageUrls => "package_urls",
            Self::ScorecardChecks => "scorecard_checks",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Records
// ============================================================================

/// A package in the index.
///
/// Only `name`, `downloads` and `last_uploaded_at` are read by the metrics;
/// the remaining attributes are carried through for consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package name, unique within the index
    pub name: String,
    /// Latest version string
    pub version: Option<String>,
    /// `Requires-Python` specifier
    pub requires_python: Option<String>,
    /// Whether the latest release is yanked
    pub yanked: bool,
    /// Whether any binary wheel was published
    pub has_binary_wheel: bool,
    /// Whether known vulnerabilities are recorded
    pub has_vulnerabilities: bool,
    /// First upload time
    pub first_uploaded_at: Option<DateTime<Utc>>,
    /// Most recent upload time
    pub last_uploaded_at: Option<DateTime<Utc>>,
    /// When the row was recorded
    pub recorded_at: Option<DateTime<Utc>>,
    /// Download count; `None` when unknown
    pub downloads: Option<u64>,
    /// Overall scorecard score
    pub scorecard_overall: Option<f64>,
    /// Whether the package is part of Google Assured OSS
    pub in_google_assured_oss: bool,
}

impl Package {
    /// Create a package with only a name; every other attribute is empty.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            requires_python: None,
            yanked: false,
            has_binary_wheel: false,
            has_vulnerabilities: false,
            first_uploaded_at: None,
            last_uploaded_at: None,
            recorded_at: None,
            downloads: None,
            scorecard_overall: None,
            in_google_assured_oss: false,
        }
    }

    /// Set the download count.
    #[must_use]
    pub fn with_downloads(mut self, downloads: u64) -> Self {
        self.downloads = Some(downloads);
        self
    }

    /// Set the most recent upload time.
    #[must_use]
    pub fn with_last_uploaded_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_uploaded_at = Some(at);
        self
    }
}

/// A declared dependency: `package_name` depends on `dep_name`.
///
/// `extra` is `None` for an unconditional dependency and names the optional
/// variant (e.g. `"test"`) otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Depending package
    pub package_name: String,
    /// Extra/variant the dependency belongs to
    pub extra: Option<String>,
    /// Package depended upon
    pub dep_name: String,
    /// Version specifier as declared
    pub dep_specifier: Option<String>,
}

impl DependencyEdge {
    /// Create an unconditional dependency edge.
    #[must_use]
    pub fn new(package_name: impl Into<String>, dep_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            extra: None,
            dep_name: dep_name.into(),
            dep_specifier: None,
        }
    }

    /// Attach the edge to an extra.
    #[must_use]
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }
}

/// A `(package, maintainer)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Maintainer {
    /// Maintained package
    pub package_name: String,
    /// Maintainer account name
    pub name: String,
}

impl Maintainer {
    /// Create a maintainer pair.
    #[must_use]
    pub fn new(package_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            name: name.into(),
        }
    }
}

/// A built distribution file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wheel {
    /// Owning package
    pub package_name: String,
    /// File name
    pub filename: String,
    /// Build tag
    pub build: Option<String>,
    /// Python tag
    pub python: Option<String>,
    /// ABI tag
    pub abi: Option<String>,
    /// Platform tag
    pub platform: Option<String>,
}

/// A project URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUrl {
    /// Owning package
    pub package_name: String,
    /// Label (e.g. "Homepage")
    pub name: Option<String>,
    /// The URL
    pub url: String,
}

/// A scorecard check result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardCheck {
    /// Owning package
    pub package_name: String,
    /// Check name
    pub name: String,
    /// Score, if the check produced one
    pub score: Option<f64>,
}

/// Row counts for every relation in a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationCounts {
    /// `(relation, rows)` pairs in `Relation::ALL` order
    pub counts: Vec<(Relation, u64)>,
}

impl RelationCounts {
    /// Row count of one relation, if it was counted.
    #[must_use]
    pub fn get(&self, relation: Relation) -> Option<u64> {
        self.counts
            .iter()
            .find(|(r, _)| *r == relation)
            .map(|(_, n)| *n)
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Immutable copy of the core relations for one analysis run.
///
/// Loaded once; metrics only ever borrow it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    packages: Vec<Package>,
    deps: Vec<DependencyEdge>,
    maintainers: Vec<Maintainer>,
}

impl Snapshot {
    /// Build a snapshot from already-loaded relations.
    #[must_use]
    pub fn new(
        packages: Vec<Package>,
        deps: Vec<DependencyEdge>,
        maintainers: Vec<Maintainer>,
    ) -> Self {
        Self {
            packages,
            deps,
            maintainers,
        }
    }

    /// Read the core relations from a store.
    ///
    /// # Errors
    ///
    /// Propagates store failures and schema errors unchanged.
    pub fn load(source: &dyn RelationSource) -> Result<Self> {
        let packages = source.packages()?;
        let deps = source.deps()?;
        let maintainers = source.maintainers()?;

        debug!(
            packages = packages.len(),
            deps = deps.len(),
            maintainers = maintainers.len(),
            "Loaded snapshot"
        );

        Ok(Self::new(packages, deps, maintainers))
    }

    /// The `packages` relation.
    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// The `deps` relation.
    #[must_use]
    pub fn deps(&self) -> &[DependencyEdge] {
        &self.deps
    }

    /// The `maintainers` relation.
    #[must_use]
    pub fn maintainers(&self) -> &[Maintainer] {
        &self.maintainers
    }
}
