//! Direct and transitive dependency rankings.

use std::collections::{HashMap, HashSet};

use super::{Ranked, count_by, rank_counts};
use crate::closure::ClosureSet;
use crate::types::DependencyEdge;

/// Dependencies declared under an extra starting with `test`, ranked by the
/// number of declaring rows.
#[must_use]
pub fn test_extra_dependencies(deps: &[DependencyEdge], limit: usize) -> Vec<Ranked> {
    let counts = count_by(
        deps.iter()
            .filter(|edge| edge.extra.as_deref().is_some_and(|e| e.starts_with("test")))
            .map(|edge| edge.dep_name.as_str()),
    );
    rank_counts(counts, limit)
}

/// `pytest-` plugins ranked by the number of distinct packages using them.
#[must_use]
pub fn pytest_plugins(deps: &[DependencyEdge], limit: usize) -> Vec<Ranked> {
    let pairs: HashSet<(&str, &str)> = deps
        .iter()
        .filter(|edge| edge.dep_name.starts_with("pytest-"))
        .map(|edge| (edge.package_name.as_str(), edge.dep_name.as_str()))
        .collect();
    rank_counts(count_by(pairs.into_iter().map(|(_, dep)| dep)), limit)
}

/// Number of distinct packages directly depending on each dependency.
///
/// Counts every extra.
pub(crate) fn direct_dependent_counts(deps: &[DependencyEdge]) -> HashMap<&str, u64> {
    let pairs: HashSet<(&str, &str)> = deps
        .iter()
        .map(|edge| (edge.package_name.as_str(), edge.dep_name.as_str()))
        .collect();
    count_by(pairs.into_iter().map(|(_, dep)| dep))
}

/// Packages ranked by number of distinct direct dependents.
#[must_use]
pub fn most_depended_on(deps: &[DependencyEdge], limit: usize) -> Vec<Ranked> {
    rank_counts(direct_dependent_counts(deps), limit)
}

/// Packages ranked by number of distinct transitive dependents.
#[must_use]
pub fn transitive_dependents(closure: &ClosureSet, limit: usize) -> Vec<Ranked> {
    let mut counts = vec![0u64; closure.names().len()];
    for targets in closure.id_reach() {
        for &to in targets {
            counts[to] += 1;
        }
    }

    let totals: HashMap<&str, u64> = counts
        .into_iter()
        .enumerate()
        .filter(|&(_, n)| n > 0)
        .map(|(id, n)| (closure.names().name(id), n))
        .collect();
    rank_counts(totals, limit)
}

/// Transitive dependencies of one package, sorted.
#[must_use]
pub fn transitive_dependencies_of(closure: &ClosureSet, package: &str) -> Vec<String> {
    closure
        .dependencies_of(package)
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::compute_closure;
    use crate::edges::{EdgeSet, VariantFilter};

    #[test]
    fn test_extras_count_rows_by_prefix() {
        let deps = vec![
            DependencyEdge::new("a", "pytest").with_extra("test"),
            DependencyEdge::new("b", "pytest").with_extra("testing"),
            DependencyEdge::new("b", "pytest").with_extra("tests"),
            DependencyEdge::new("c", "coverage").with_extra("test"),
            DependencyEdge::new("c", "sphinx").with_extra("docs"),
            DependencyEdge::new("d", "pytest"),
            DependencyEdge::new("e", "nose").with_extra("Test"),
        ];

        assert_eq!(
            test_extra_dependencies(&deps, 10),
            vec![Ranked::new("pytest", 3), Ranked::new("coverage", 1)]
        );
    }

    #[test]
    fn pytest_plugins_count_distinct_packages() {
        let deps = vec![
            DependencyEdge::new("a", "pytest-cov").with_extra("test"),
            DependencyEdge::new("a", "pytest-cov").with_extra("dev"),
            DependencyEdge::new("b", "pytest-cov"),
            DependencyEdge::new("b", "pytest-xdist"),
            DependencyEdge::new("c", "pytest"),
        ];

        assert_eq!(
            pytest_plugins(&deps, 10),
            vec![Ranked::new("pytest-cov", 2), Ranked::new("pytest-xdist", 1)]
        );
    }

    #[test]
    fn most_depended_on_dedups_pairs() {
        let deps = vec![
            DependencyEdge::new("a", "six"),
            DependencyEdge::new("a", "six").with_extra("py2"),
            DependencyEdge::new("b", "six"),
            DependencyEdge::new("b", "attrs"),
        ];

        assert_eq!(
            most_depended_on(&deps, 10),
            vec![Ranked::new("six", 2), Ranked::new("attrs", 1)]
        );
    }

    #[test]
    fn transitive_dependents_count_every_ancestor() {
        let raw = vec![
            DependencyEdge::new("app", "requests"),
            DependencyEdge::new("cli", "requests"),
            DependencyEdge::new("requests", "urllib3"),
            DependencyEdge::new("app", "pytest").with_extra("test"),
        ];
        let closure = compute_closure(&EdgeSet::extract(&raw, &VariantFilter::Default));

        assert_eq!(
            transitive_dependents(&closure, 10),
            vec![Ranked::new("urllib3", 3), Ranked::new("requests", 2)]
        );
        assert_eq!(
            transitive_dependencies_of(&closure, "app"),
            vec!["requests", "urllib3"]
        );
    }

    #[test]
    fn rankings_respect_limit() {
        let deps: Vec<_> = (0..50)
            .map(|i| DependencyEdge::new(format!("p{i}"), format!("d{i}")))
            .collect();

        assert_eq!(most_depended_on(&deps, 7).len(), 7);
    }
}
