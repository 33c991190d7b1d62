//! Metrics engine.
//!
//! A fixed catalogue of independent aggregations over the package relations
//! and the transitive closure. Every metric is a pure function of borrowed
//! inputs that follows the same composition: filter, group, aggregate, order,
//! limit.
//!
//! ## Conventions
//!
//! | Concern | Rule |
//! |---------|------|
//! | Ranking | Descending on the aggregate, ties broken by group key ascending |
//! | Cap | Every ranking takes an explicit `limit` (configured `top_n`) |
//! | Null downloads | Excluded from sums, minimums and the zero filter |
//! | Lookups | Distinct values, sorted ascending |
//! | Empty input | Empty output, never an error |

mod cycles;
mod dependencies;
mod lookups;
mod maintainers;
mod popularity;

pub use cycles::{Cycle, dependency_cycles};
pub use dependencies::{
    most_depended_on, pytest_plugins, test_extra_dependencies, transitive_dependencies_of,
    transitive_dependents,
};
pub use lookups::{dependents_of, packages_maintained_by};
pub use maintainers::{
    BusFactorRow, ClubRow, MaintainerCountBucket, PrefixRow, bus_factor_one, clubs,
    common_prefixes, maintainer_count_distribution, most_collaborators,
};
pub use popularity::{
    DayCount, Summary, release_days, summary, top_maintainers_by_downloads,
    top_packages_by_downloads,
};

use std::collections::HashMap;
use std::hash::Hash;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;
use crate::projection::{Cell, TableRow, rank_desc};

/// The metric catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Headline figures of the dataset
    Summary,
    /// Packages per weekday of their last upload
    ReleaseDays,
    /// Packages ranked by downloads
    TopPackages,
    /// Maintainers ranked by the downloads of their packages
    TopMaintainers,
    /// Packages directly depending on the lookup package
    Dependents,
    /// Packages maintained by the lookup maintainer
    MaintainedPackages,
    /// Dependencies declared under `test*` extras
    TestExtras,
    /// `pytest-` plugins by number of depending packages
    PytestPlugins,
    /// Packages by number of direct dependents
    MostDependedOn,
    /// Histogram of maintainers per package
    MaintainerCounts,
    /// Name prefixes of packages with a given maintainer count
    CommonPrefixes,
    /// Recent zero-download packages with many maintainers
    Clubs,
    /// Single-maintainer packages by number of dependents
    BusFactorOne,
    /// Maintainers by number of distinct co-maintainers
    Collaborators,
    /// Packages by number of transitive dependents
    TransitiveDeps,
    /// Transitive dependencies of the lookup package
    TransitiveDepsOf,
    /// Dependency cycles
    Cycles,
}

impl MetricKind {
    /// Every metric, in report order.
    pub const ALL: [Self; 17] = [
        Self::Summary,
        Self::ReleaseDays,
        Self::TopPackages,
        Self::TopMaintainers,
        Self::Dependents,
        Self::MaintainedPackages,
        Self::TestExtras,
        Self::PytestPlugins,
        Self::MostDependedOn,
        Self::MaintainerCounts,
        Self::CommonPrefixes,
        Self::Clubs,
        Self::BusFactorOne,
        Self::Collaborators,
        Self::TransitiveDeps,
        Self::TransitiveDepsOf,
        Self::Cycles,
    ];

    /// Stable name used on the command line and in exports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::ReleaseDays => "release-days",
            Self::TopPackages => "top-packages",
            Self::TopMaintainers => "top-maintainers",
            Self::Dependents => "dependents",
            Self::MaintainedPackages => "maintained-packages",
            Self::TestExtras => "test-extras",
            Self::PytestPlugins => "pytest-plugins",
            Self::MostDependedOn => "most-depended-on",
            Self::MaintainerCounts => "maintainer-counts",
            Self::CommonPrefixes => "common-prefixes",
            Self::Clubs => "clubs",
            Self::BusFactorOne => "bus-factor-1",
            Self::Collaborators => "collaborators",
            Self::TransitiveDeps => "transitive-deps",
            Self::TransitiveDepsOf => "transitive-deps-of",
            Self::Cycles => "cycles",
        }
    }

    /// Column names of the metric's result table.
    #[must_use]
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Summary => &[
                "latest_upload",
                "total_packages",
                "min_positive_downloads",
                "max_downloads",
            ],
            Self::ReleaseDays => &["day", "count"],
            Self::TopPackages | Self::TopMaintainers => &["name", "downloads"],
            Self::Dependents | Self::MaintainedPackages => &["package_name"],
            Self::TestExtras | Self::PytestPlugins => &["dep_name", "count"],
            Self::MostDependedOn => &["dep_name", "dep_count"],
            Self::MaintainerCounts => &["maintainers", "count"],
            Self::CommonPrefixes => &["package_name", "maintainers", "prefix"],
            Self::Clubs => &["package_name", "maintainers", "downloads"],
            Self::BusFactorOne => &["package_name", "maintainer", "dep_count"],
            Self::Collaborators => &["name", "n_collaborators"],
            Self::TransitiveDeps => &["dependency", "n_dependents"],
            Self::TransitiveDepsOf => &["dependency"],
            Self::Cycles => &["size", "members"],
        }
    }

    /// Whether the metric reads the transitive closure.
    #[must_use]
    pub fn uses_closure(&self) -> bool {
        matches!(self, Self::TransitiveDeps | Self::TransitiveDepsOf)
    }

    /// Whether the metric's output is capped by `top_n`.
    #[must_use]
    pub fn is_ranked(&self) -> bool {
        !matches!(
            self,
            Self::Summary
                | Self::ReleaseDays
                | Self::Dependents
                | Self::MaintainedPackages
                | Self::MaintainerCounts
                | Self::TransitiveDepsOf
        )
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownMetric(s.to_string()))
    }
}

/// A group key with its aggregate, the row shape of most rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    /// Group key (package, maintainer or dependency name)
    pub key: String,
    /// Aggregate value
    pub value: u64,
}

impl Ranked {
    /// Create a ranked row.
    #[must_use]
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl TableRow for Ranked {
    fn cells(&self) -> Vec<Cell> {
        vec![Cell::from(self.key.as_str()), Cell::Int(self.value)]
    }
}

/// Count occurrences of each key.
pub(crate) fn count_by<K, I>(keys: I) -> HashMap<K, u64>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Turn per-key aggregates into a capped descending ranking.
pub(crate) fn rank_counts<K: AsRef<str>>(counts: HashMap<K, u64>, limit: usize) -> Vec<Ranked> {
    let rows = counts
        .into_iter()
        .map(|(key, value)| Ranked::new(key.as_ref(), value))
        .collect();
    rank_desc(rows, |r: &Ranked| r.value, |r: &Ranked| r.key.as_str(), limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.name().parse::<MetricKind>().expect("known name"), kind);
        }
    }

    #[rstest]
    #[case::typo("top-package")]
    #[case::empty("")]
    #[case::case_sensitive("Clubs")]
    fn unknown_names_are_rejected(#[case] name: &str) {
        let err = name.parse::<MetricKind>().expect_err("unknown");
        assert!(matches!(err, Error::UnknownMetric(ref n) if n == name));
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = MetricKind::ALL.iter().map(MetricKind::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MetricKind::ALL.len());
    }

    #[rstest]
    #[case::closure(MetricKind::TransitiveDeps, true)]
    #[case::closure_lookup(MetricKind::TransitiveDepsOf, true)]
    #[case::direct(MetricKind::MostDependedOn, false)]
    fn closure_metrics_are_flagged(#[case] kind: MetricKind, #[case] expected: bool) {
        assert_eq!(kind.uses_closure(), expected);
    }

    #[test]
    fn rank_counts_breaks_ties_by_key() {
        let counts = count_by(["b", "a", "b", "c", "a"]);

        let ranked = rank_counts(counts, 10);

        assert_eq!(
            ranked,
            vec![Ranked::new("a", 2), Ranked::new("b", 2), Ranked::new("c", 1)]
        );
    }
}
