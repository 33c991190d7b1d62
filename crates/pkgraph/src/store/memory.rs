//! In-memory relation source.

use super::RelationSource;
use crate::error::Result;
use crate::types::{
    DependencyEdge, Maintainer, Package, PackageUrl, Relation, RelationCounts, ScorecardCheck,
    Wheel,
};

/// Relation source backed by owned vectors.
///
/// Has no recursive-query support, so closures over it always run in-process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    packages: Vec<Package>,
    deps: Vec<DependencyEdge>,
    maintainers: Vec<Maintainer>,
    wheels: Vec<Wheel>,
    package_urls: Vec<PackageUrl>,
    scorecard_checks: Vec<ScorecardCheck>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the `packages` relation.
    #[must_use]
    pub fn with_packages(mut self, packages: Vec<Package>) -> Self {
        self.packages = packages;
        self
    }

    /// Replace the `deps` relation.
    #[must_use]
    pub fn with_deps(mut self, deps: Vec<DependencyEdge>) -> Self {
        self.deps = deps;
        self
    }

    /// Replace the `maintainers` relation.
    #[must_use]
    pub fn with_maintainers(mut self, maintainers: Vec<Maintainer>) -> Self {
        self.maintainers = maintainers;
        self
    }

    /// Replace the `wheels` relation.
    #[must_use]
    pub fn with_wheels(mut self, wheels: Vec<Wheel>) -> Self {
        self.wheels = wheels;
        self
    }

    /// Replace the `package_urls` relation.
    #[must_use]
    pub fn with_package_urls(mut self, package_urls: Vec<PackageUrl>) -> Self {
        self.package_urls = package_urls;
        self
    }

    /// Replace the `scorecard_checks` relation.
    #[must_use]
    pub fn with_scorecard_checks(mut self, scorecard_checks: Vec<ScorecardCheck>) -> Self {
        self.scorecard_checks = scorecard_checks;
        self
    }
}

impl RelationSource for MemoryStore {
    fn packages(&self) -> Result<Vec<Package>> {
        Ok(self.packages.clone())
    }

    fn deps(&self) -> Result<Vec<DependencyEdge>> {
        Ok(self.deps.clone())
    }

    fn maintainers(&self) -> Result<Vec<Maintainer>> {
        Ok(self.maintainers.clone())
    }

    fn wheels(&self) -> Result<Vec<Wheel>> {
        Ok(self.wheels.clone())
    }

    fn package_urls(&self) -> Result<Vec<PackageUrl>> {
        Ok(self.package_urls.clone())
    }

    fn scorecard_checks(&self) -> Result<Vec<ScorecardCheck>> {
        Ok(self.scorecard_checks.clone())
    }

    fn relation_counts(&self) -> Result<RelationCounts> {
        let lens = [
            self.packages.len(),
            self.deps.len(),
            self.wheels.len(),
            self.maintainers.len(),
            self.package_urls.len(),
            self.scorecard_checks.len(),
        ];
        let counts = Relation::ALL
            .into_iter()
            .zip(lens)
            .map(|(relation, len)| (relation, len as u64))
            .collect();
        Ok(RelationCounts { counts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::VariantFilter;

    #[test]
    fn counts_follow_relation_order() {
        let store = MemoryStore::new()
            .with_packages(vec![Package::new("a"), Package::new("b")])
            .with_deps(vec![DependencyEdge::new("a", "b")]);

        let counts = store.relation_counts().expect("counts");

        assert_eq!(counts.get(Relation::Packages), Some(2));
        assert_eq!(counts.get(Relation::Deps), Some(1));
        assert_eq!(counts.get(Relation::ScorecardChecks), Some(0));
        assert_eq!(counts.counts.len(), 6);
    }

    #[test]
    fn memory_store_has_no_pushdown() {
        let store = MemoryStore::new().with_deps(vec![DependencyEdge::new("a", "b")]);

        let pushed = store
            .transitive_closure(&VariantFilter::Default)
            .expect("pushdown query");

        assert!(pushed.is_none());
    }
}
