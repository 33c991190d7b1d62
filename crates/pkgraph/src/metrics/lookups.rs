//! Single-value lookups.

use std::collections::{BTreeSet, HashSet};

use crate::types::{DependencyEdge, Maintainer, Package};

/// Packages that directly depend on `package`, under any extra.
///
/// Distinct and sorted. An unknown package has no dependents.
#[must_use]
pub fn dependents_of(deps: &[DependencyEdge], package: &str) -> Vec<String> {
    deps.iter()
        .filter(|edge| edge.dep_name == package)
        .map(|edge| edge.package_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Packages maintained by `maintainer` that exist in `packages`.
///
/// Distinct and sorted.
#[must_use]
pub fn packages_maintained_by(
    maintainers: &[Maintainer],
    packages: &[Package],
    maintainer: &str,
) -> Vec<String> {
    let known: HashSet<&str> = packages.iter().map(|p| p.name.as_str()).collect();

    maintainers
        .iter()
        .filter(|m| m.name == maintainer && known.contains(m.package_name.as_str()))
        .map(|m| m.package_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
