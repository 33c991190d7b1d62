//! Maintainer-centric metrics: team sizes, prefixes, clubs, bus factor and
//! collaboration.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::Serialize;

use super::dependencies::direct_dependent_counts;
use super::{Ranked, count_by, rank_counts};
use crate::config::ClubConfig;
use crate::error::{Error, Result};
use crate::projection::{Cell, TableRow, rank_desc};
use crate::types::{DependencyEdge, Maintainer, Package};

/// Leading word of a package name, up to the first non-word character.
/// ASCII word characters only, so `café-x` yields `caf`.
const PREFIX_PATTERN: &str = r"^((?-u:\w)*)-?";

/// Number of packages having a given number of maintainers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaintainerCountBucket {
    /// Maintainers per package
    pub maintainers: u64,
    /// Packages with that many maintainers
    pub count: u64,
}

impl TableRow for MaintainerCountBucket {
    fn cells(&self) -> Vec<Cell> {
        vec![Cell::Int(self.maintainers), Cell::Int(self.count)]
    }
}

/// A package selected by maintainer count, with its name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixRow {
    /// Package
    pub package_name: String,
    /// Maintainers of the package
    pub maintainers: u64,
    /// Leading word of the package name
    pub prefix: String,
}

impl TableRow for PrefixRow {
    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.package_name.as_str()),
            Cell::Int(self.maintainers),
            Cell::from(self.prefix.as_str()),
        ]
    }
}

/// A recent zero-download package and its team size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubRow {
    /// Package
    pub package_name: String,
    /// Maintainers of the package
    pub maintainers: u64,
    /// Downloads (always zero)
    pub downloads: u64,
}

impl TableRow for ClubRow {
    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.package_name.as_str()),
            Cell::Int(self.maintainers),
            Cell::Int(self.downloads),
        ]
    }
}

/// A single-maintainer package with its number of direct dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusFactorRow {
    /// Package
    pub package_name: String,
    /// Its only maintainer
    pub maintainer: String,
    /// Distinct packages depending on it
    pub dep_count: u64,
}

impl TableRow for BusFactorRow {
    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.package_name.as_str()),
            Cell::from(self.maintainer.as_str()),
            Cell::Int(self.dep_count),
        ]
    }
}

/// Maintainer rows per package.
fn maintainers_per_package(maintainers: &[Maintainer]) -> HashMap<&str, u64> {
    count_by(maintainers.iter().map(|m| m.package_name.as_str()))
}

/// Histogram of maintainers per package, ordered by maintainer count.
///
/// Packages without maintainer rows do not appear.
#[must_use]
pub fn maintainer_count_distribution(maintainers: &[Maintainer]) -> Vec<MaintainerCountBucket> {
    let buckets: BTreeMap<u64, u64> =
        count_by(maintainers_per_package(maintainers).into_values())
            .into_iter()
            .collect();

    buckets
        .into_iter()
        .map(|(maintainers, count)| MaintainerCountBucket { maintainers, count })
        .collect()
}

/// Packages with exactly `maintainer_count` maintainers, with their leading
/// name word, ordered by prefix descending.
///
/// # Errors
///
/// Returns [`Error::Internal`] if the prefix pattern fails to compile.
pub fn common_prefixes(
    maintainers: &[Maintainer],
    maintainer_count: usize,
    limit: usize,
) -> Result<Vec<PrefixRow>> {
    let pattern = Regex::new(PREFIX_PATTERN)
        .map_err(|e| Error::Internal(format!("invalid prefix pattern: {e}")))?;
    let wanted = maintainer_count as u64;

    let mut rows: Vec<PrefixRow> = maintainers_per_package(maintainers)
        .into_iter()
        .filter(|&(_, count)| count == wanted)
        .map(|(package, count)| PrefixRow {
            package_name: package.to_string(),
            maintainers: count,
            prefix: pattern
                .captures(package)
                .and_then(|caps| caps.get(1))
                .map_or_else(String::new, |m| m.as_str().to_string()),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.prefix
            .cmp(&a.prefix)
            .then_with(|| a.package_name.cmp(&b.package_name))
    });
    rows.truncate(limit);
    Ok(rows)
}

/// Zero-download packages uploaded within the window, ranked by maintainer
/// count.
///
/// Downloads must be exactly zero; unknown downloads do not qualify. Names
/// starting with an ignored prefix are skipped. Packages without maintainer
/// rows are not reported. A window reaching past the earliest representable
/// time admits every upload.
#[must_use]
pub fn clubs(
    maintainers: &[Maintainer],
    packages: &[Package],
    config: &ClubConfig,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<ClubRow> {
    let cutoff = now.checked_sub_signed(Duration::days(i64::from(config.window_days)));
    let team_sizes = maintainers_per_package(maintainers);

    let rows = packages
        .iter()
        .filter(|p| p.downloads == Some(0))
        .filter(|p| {
            p.last_uploaded_at
                .is_some_and(|at| cutoff.is_none_or(|cutoff| at > cutoff))
        })
        .filter(|p| {
            !config
                .ignore_prefixes
                .iter()
                .any(|prefix| p.name.starts_with(prefix.as_str()))
        })
        .filter_map(|p| {
            team_sizes.get(p.name.as_str()).map(|&count| ClubRow {
                package_name: p.name.clone(),
                maintainers: count,
                downloads: 0,
            })
        })
        .collect();

    rank_desc(
        rows,
        |r: &ClubRow| r.maintainers,
        |r: &ClubRow| r.package_name.as_str(),
        limit,
    )
}

/// Packages with exactly one maintainer row, ranked by distinct direct
/// dependents.
///
/// Packages nobody depends on are not reported.
#[must_use]
pub fn bus_factor_one(
    maintainers: &[Maintainer],
    deps: &[DependencyEdge],
    limit: usize,
) -> Vec<BusFactorRow> {
    let team_sizes = maintainers_per_package(maintainers);
    let dependents = direct_dependent_counts(deps);

    let rows = maintainers
        .iter()
        .filter(|m| team_sizes.get(m.package_name.as_str()) == Some(&1))
        .filter_map(|m| {
            dependents
                .get(m.package_name.as_str())
                .map(|&dep_count| BusFactorRow {
                    package_name: m.package_name.clone(),
                    maintainer: m.name.clone(),
                    dep_count,
                })
        })
        .collect();

    rank_desc(
        rows,
        |r: &BusFactorRow| r.dep_count,
        |r: &BusFactorRow| r.package_name.as_str(),
        limit,
    )
}

/// Maintainers ranked by number of distinct co-maintainers across all their
/// packages.
#[must_use]
pub fn most_collaborators(maintainers: &[Maintainer], limit: usize) -> Vec<Ranked> {
    let mut teams: HashMap<&str, Vec<&str>> = HashMap::new();
    for m in maintainers {
        teams
            .entry(m.package_name.as_str())
            .or_default()
            .push(m.name.as_str());
    }

    let mut pairs: HashSet<(&str, &str)> = HashSet::new();
    for team in teams.values() {
        for &a in team {
            for &b in team {
                if a != b {
                    pairs.insert((a, b));
                }
            }
        }
    }

    rank_counts(count_by(pairs.into_iter().map(|(a, _)| a)), limit)
}
