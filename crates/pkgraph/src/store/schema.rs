//! Relation layout for `SQLite` stores.
//!
//! The metrics reference fixed column names. Each relation lists the columns
//! that must exist (a store without them is rejected before any computation)
//! and the columns that are read when present and treated as `NULL` otherwise.

use crate::types::Relation;

/// Database schema used by [`SqliteStore::create`](super::SqliteStore::create).
///
/// Matches the layout of the public package index dump the metrics were
/// designed for. Stores opened read-only only need the required columns.
pub(crate) const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS packages (
    name TEXT NOT NULL,
    version TEXT,
    requires_python TEXT,
    yanked INTEGER NOT NULL DEFAULT 0,
    has_binary_wheel INTEGER NOT NULL DEFAULT 0,
    has_vulnerabilities INTEGER NOT NULL DEFAULT 0,
    first_uploaded_at TEXT,
    last_uploaded_at TEXT,
    recorded_at TEXT,
    downloads INTEGER,
    scorecard_overall REAL,
    in_google_assured_oss INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_packages_name ON packages(name);

-- extra IS NULL marks an unconditional dependency
CREATE TABLE IF NOT EXISTS deps (
    package_name TEXT NOT NULL,
    extra TEXT,
    dep_name TEXT NOT NULL,
    dep_specifier TEXT
);

CREATE INDEX IF NOT EXISTS idx_deps_package ON deps(package_name);
CREATE INDEX IF NOT EXISTS idx_deps_dep ON deps(dep_name);

CREATE TABLE IF NOT EXISTS wheels (
    package_name TEXT NOT NULL,
    filename TEXT NOT NULL,
    build TEXT,
    python TEXT,
    abi TEXT,
    platform TEXT
);

CREATE TABLE IF NOT EXISTS maintainers (
    package_name TEXT NOT NULL,
    name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_maintainers_package ON maintainers(package_name);

CREATE TABLE IF NOT EXISTS package_urls (
    package_name TEXT NOT NULL,
    name TEXT,
    url TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS scorecard_checks (
    package_name TEXT NOT NULL,
    name TEXT NOT NULL,
    score REAL
);
";

/// Column requirements for one relation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RelationLayout {
    pub relation: Relation,
    /// Must exist; checked before reading.
    pub required: &'static [&'static str],
    /// Read when present, `NULL` otherwise.
    pub optional: &'static [&'static str],
}

impl RelationLayout {
    /// All columns in select order: required first, then optional.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.required.iter().chain(self.optional.iter()).copied()
    }
}

/// Column requirements for `relation`.
pub(crate) fn layout(relation: Relation) -> RelationLayout {
    match relation {
        Relation::Packages => RelationLayout {
            relation,
            required: &["name", "downloads", "last_uploaded_at"],
            optional: &[
                "version",
                "requires_python",
                "yanked",
                "has_binary_wheel",
                "has_vulnerabilities",
                "first_uploaded_at",
                "recorded_at",
                "scorecard_overall",
                "in_google_assured_oss",
            ],
        },
        Relation::Deps => RelationLayout {
            relation,
            required: &["package_name", "extra", "dep_name"],
            optional: &["dep_specifier"],
        },
        Relation::Wheels => RelationLayout {
            relation,
            required: &["package_name", "filename"],
            optional: &["build", "python", "abi", "platform"],
        },
        Relation::Maintainers => RelationLayout {
            relation,
            required: &["package_name", "name"],
            optional: &[],
        },
        Relation::PackageUrls => RelationLayout {
            relation,
            required: &["package_name", "url"],
            optional: &["name"],
        },
        Relation::ScorecardChecks => RelationLayout {
            relation,
            required: &["package_name", "name"],
            optional: &["score"],
        },
    }
}
