//! Analysis orchestration.
//!
//! [`Analysis`] owns one immutable [`Snapshot`] and the configuration of a
//! run. The transitive closure is computed at most once, to a fixed point,
//! before any metric that reads it. Metrics are independent of each other, so
//! a full report computes them in parallel.

use std::sync::OnceLock;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::closure::{ClosureControl, ClosureSet, compute_closure, compute_closure_with};
use crate::config::AnalysisConfig;
use crate::edges::{EdgeSet, VariantFilter};
use crate::error::Result;
use crate::metrics::{self, MetricKind};
use crate::projection::ResultTable;
use crate::store::RelationSource;
use crate::types::Snapshot;

/// One analysis run over a snapshot.
pub struct Analysis {
    snapshot: Snapshot,
    config: AnalysisConfig,
    edges: OnceLock<EdgeSet>,
    closure: OnceLock<ClosureSet>,
}

impl Analysis {
    /// Start a run over an already-loaded snapshot.
    #[must_use]
    pub fn new(snapshot: Snapshot, config: AnalysisConfig) -> Self {
        Self {
            snapshot,
            config,
            edges: OnceLock::new(),
            closure: OnceLock::new(),
        }
    }

    /// Load a snapshot from `source` and start a run over it.
    ///
    /// # Errors
    ///
    /// Propagates store and schema errors.
    pub fn load(source: &dyn RelationSource, config: AnalysisConfig) -> Result<Self> {
        Ok(Self::new(Snapshot::load(source)?, config))
    }

    /// Use a closure computed elsewhere, e.g. by the store.
    ///
    /// It must have been computed over the same `deps` with the configured
    /// extra filter.
    #[must_use]
    pub fn with_closure(self, closure: ClosureSet) -> Self {
        Self {
            closure: OnceLock::from(closure),
            ..self
        }
    }

    /// The snapshot being analysed.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Direct edges selected by the configured extra filter.
    pub fn edges(&self) -> &EdgeSet {
        self.edges
            .get_or_init(|| EdgeSet::extract(self.snapshot.deps(), &self.config.closure.extra))
    }

    /// The transitive closure, computed on first use.
    pub fn closure(&self) -> &ClosureSet {
        self.closure.get_or_init(|| compute_closure(self.edges()))
    }

    /// The transitive closure, computed on first use under host control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`](crate::Error::Cancelled) if the control
    /// stops the computation. Nothing is cached in that case.
    pub fn closure_with(&self, control: &ClosureControl<'_>) -> Result<&ClosureSet> {
        if let Some(closure) = self.closure.get() {
            return Ok(closure);
        }
        let computed = compute_closure_with(self.edges(), control)?;
        Ok(self.closure.get_or_init(|| computed))
    }

    /// Compute one metric.
    ///
    /// # Errors
    ///
    /// Only metrics with fallible setup (the prefix pattern) can fail.
    #[allow(clippy::cast_possible_truncation)]
    pub fn run(&self, kind: MetricKind, now: DateTime<Utc>) -> Result<ResultTable> {
        let start = Instant::now();
        let packages = self.snapshot.packages();
        let deps = self.snapshot.deps();
        let maintainers = self.snapshot.maintainers();
        let limit = self.config.top_n;
        let lookup = &self.config.lookup;

        let table = match kind {
            MetricKind::Summary => ResultTable::from_rows(kind, &[metrics::summary(packages)]),
            MetricKind::ReleaseDays => ResultTable::from_rows(kind, &metrics::release_days(packages)),
            MetricKind::TopPackages => ResultTable::from_rows(
                kind,
                &metrics::top_packages_by_downloads(packages, limit),
            ),
            MetricKind::TopMaintainers => ResultTable::from_rows(
                kind,
                &metrics::top_maintainers_by_downloads(maintainers, packages, limit),
            ),
            MetricKind::Dependents => {
                ResultTable::from_rows(kind, &metrics::dependents_of(deps, &lookup.package))
            }
            MetricKind::MaintainedPackages => ResultTable::from_rows(
                kind,
                &metrics::packages_maintained_by(maintainers, packages, &lookup.maintainer),
            ),
            MetricKind::TestExtras => {
                ResultTable::from_rows(kind, &metrics::test_extra_dependencies(deps, limit))
            }
            MetricKind::PytestPlugins => {
                ResultTable::from_rows(kind, &metrics::pytest_plugins(deps, limit))
            }
            MetricKind::MostDependedOn => {
                ResultTable::from_rows(kind, &metrics::most_depended_on(deps, limit))
            }
            MetricKind::MaintainerCounts => ResultTable::from_rows(
                kind,
                &metrics::maintainer_count_distribution(maintainers),
            ),
            MetricKind::CommonPrefixes => ResultTable::from_rows(
                kind,
                &metrics::common_prefixes(
                    maintainers,
                    self.config.prefixes.maintainer_count,
                    limit,
                )?,
            ),
            MetricKind::Clubs => ResultTable::from_rows(
                kind,
                &metrics::clubs(maintainers, packages, &self.config.clubs, now, limit),
            ),
            MetricKind::BusFactorOne => {
                ResultTable::from_rows(kind, &metrics::bus_factor_one(maintainers, deps, limit))
            }
            MetricKind::Collaborators => {
                ResultTable::from_rows(kind, &metrics::most_collaborators(maintainers, limit))
            }
            MetricKind::TransitiveDeps => ResultTable::from_rows(
                kind,
                &metrics::transitive_dependents(self.closure(), limit),
            ),
            MetricKind::TransitiveDepsOf => ResultTable::from_rows(
                kind,
                &metrics::transitive_dependencies_of(self.closure(), &lookup.package),
            ),
            MetricKind::Cycles => {
                ResultTable::from_rows(kind, &metrics::dependency_cycles(self.edges(), limit))
            }
        };

        debug!(
            metric = %kind,
            rows = table.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Computed metric"
        );
        Ok(table)
    }

    /// Compute every metric, in catalogue order.
    ///
    /// # Errors
    ///
    /// Returns the first metric failure.
    pub fn report(&self, now: DateTime<Utc>) -> Result<Vec<ResultTable>> {
        self.report_on(&MetricKind::ALL, now)
    }

    /// Compute the given metrics in parallel, preserving their order.
    ///
    /// The closure is brought to its fixed point before any metric starts.
    ///
    /// # Errors
    ///
    /// Returns the first metric failure.
    #[allow(clippy::cast_possible_truncation)]
    pub fn report_on(&self, kinds: &[MetricKind], now: DateTime<Utc>) -> Result<Vec<ResultTable>> {
        let start = Instant::now();
        if kinds.iter().any(MetricKind::uses_closure) {
            let closure = self.closure();
            debug!(pairs = closure.len(), rounds = closure.rounds(), "Closure ready");
        }

        let tables = kinds
            .par_iter()
            .map(|&kind| self.run(kind, now))
            .collect::<Result<Vec<_>>>()?;

        info!(
            metrics = tables.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Report complete"
        );
        Ok(tables)
    }
}

/// Ask the store to compute the closure itself.
///
/// Returns `Ok(None)` when the store has no recursive-query support.
///
/// # Errors
///
/// Propagates store and schema errors.
pub fn closure_from_store(
    source: &dyn RelationSource,
    filter: &VariantFilter,
) -> Result<Option<ClosureSet>> {
    let Some(pairs) = source.transitive_closure(filter)? else {
        debug!("Store has no closure pushdown");
        return Ok(None);
    };
    Ok(Some(ClosureSet::from_pairs(pairs)))
}
