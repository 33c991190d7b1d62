//! Edge extraction: raw dependency rows to a canonical edge set.
//!
//! The closure engine works on dense integer ids rather than package names.
//! Extraction interns every package name it keeps into a [`NameTable`], filters
//! rows by their extra with a [`VariantFilter`], and collapses duplicate
//! `(package, dependency)` pairs.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::DependencyEdge;

/// Dense id of an interned package name.
pub type NodeId = usize;

/// Selects which dependency rows take part in the graph.
///
/// The canonical transitive graph uses [`VariantFilter::Default`]: only
/// unconditional dependencies (`extra IS NULL`). Optional extras such as
/// `test` or `docs` are left out of reachability.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantFilter {
    /// Unconditional dependencies only
    #[default]
    Default,
    /// Every row regardless of extra
    All,
    /// Rows whose extra equals the given name
    Exact(String),
    /// Rows whose extra starts with the given prefix
    Prefix(String),
}

impl VariantFilter {
    /// Whether a row with this `extra` passes the filter.
    #[must_use]
    pub fn matches(&self, extra: Option<&str>) -> bool {
        match (self, extra) {
            (Self::Default, extra) => extra.is_none(),
            (Self::All, _) => true,
            (Self::Exact(name), Some(extra)) => extra == name,
            (Self::Prefix(prefix), Some(extra)) => extra.starts_with(prefix.as_str()),
            (Self::Exact(_) | Self::Prefix(_), None) => false,
        }
    }
}

impl std::fmt::Display for VariantFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => f.write_str("extra IS NULL"),
            Self::All => f.write_str("any extra"),
            Self::Exact(name) => write!(f, "extra = {name:?}"),
            Self::Prefix(prefix) => write!(f, "extra starts with {prefix:?}"),
        }
    }
}

/// Bidirectional mapping between package names and [`NodeId`]s.
///
/// Ids are assigned in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: Vec<String>,
    ids: HashMap<String, NodeId>,
}

impl NameTable {
    /// Return the id for `name`, assigning a new one if needed.
    pub fn intern(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Look up the id of an already interned name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    /// Name for an id handed out by this table.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this table.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        &self.names[id]
    }

    /// Number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Deduplicated set of `(package, dependency)` pairs.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    names: Arc<NameTable>,
    /// Sorted, no duplicates.
    pairs: Vec<(NodeId, NodeId)>,
}

impl EdgeSet {
    /// Filter raw dependency rows and collapse duplicates.
    ///
    /// Never fails; empty input gives an empty set.
    #[must_use]
    pub fn extract(raw: &[DependencyEdge], filter: &VariantFilter) -> Self {
        let kept = raw
            .iter()
            .filter(|edge| filter.matches(edge.extra.as_deref()))
            .map(|edge| (edge.package_name.as_str(), edge.dep_name.as_str()));
        let set = Self::from_pairs(kept);

        debug!(
            raw = raw.len(),
            unique = set.len(),
            nodes = set.node_count(),
            filter = %filter,
            "Extracted dependency edges"
        );

        set
    }

    /// Build an edge set from name pairs, interning names and removing duplicates.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut names = NameTable::default();
        let mut ids: Vec<(NodeId, NodeId)> = pairs
            .into_iter()
            .map(|(from, to)| (names.intern(from.as_ref()), names.intern(to.as_ref())))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        Self {
            names: Arc::new(names),
            pairs: ids,
        }
    }

    /// Number of distinct pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the set has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of distinct packages appearing on either side of a pair.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Whether `package` directly depends on `dependency`.
    #[must_use]
    pub fn contains(&self, package: &str, dependency: &str) -> bool {
        match (self.names.get(package), self.names.get(dependency)) {
            (Some(from), Some(to)) => self.pairs.binary_search(&(from, to)).is_ok(),
            _ => false,
        }
    }

    /// Iterate pairs as names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pairs
            .iter()
            .map(|&(from, to)| (self.names.name(from), self.names.name(to)))
    }

    /// The name table shared with closures derived from this set.
    #[must_use]
    pub fn names(&self) -> &Arc<NameTable> {
        &self.names
    }

    /// Pairs as ids, sorted.
    #[must_use]
    pub fn id_pairs(&self) -> &[(NodeId, NodeId)] {
        &self.pairs
    }

    /// Direct successors of every node, indexed by [`NodeId`].
    pub(crate) fn adjacency(&self) -> Vec<Vec<NodeId>> {
        let mut successors = vec![Vec::new(); self.names.len()];
        for &(from, to) in &self.pairs {
            successors[from].push(to);
        }
        successors
    }
}

/// Filter raw dependency rows into a canonical edge set.
///
/// Shorthand for [`EdgeSet::extract`].
#[must_use]
pub fn extract_edges(raw: &[DependencyEdge], filter: &VariantFilter) -> EdgeSet {
    EdgeSet::extract(raw, filter)
}
