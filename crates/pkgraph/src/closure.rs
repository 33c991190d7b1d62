//! Transitive closure engine.
//!
//! Computes, for every package, the set of packages reachable through one or
//! more direct dependency edges. Evaluation is semi-naive: each round joins
//! only the pairs discovered in the previous round (the frontier) with the
//! direct edges, so a pair is derived once no matter how many paths realize
//! it. The loop stops at the first round that adds nothing.
//!
//! ```text
//! round 0   known = direct edges           frontier = direct edges
//! round k   new   = frontier ⋈ direct − known
//!           known = known ∪ new            frontier = new
//! stop      new = ∅
//! ```
//!
//! Cycles converge because `known` only grows and is bounded by `n²`. A
//! package is reported as depending on itself only when a real cycle (or a
//! self-edge) routes back to it.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use crate::edges::{EdgeSet, NameTable, NodeId};
use crate::error::{Error, Result};

/// Host-side control over a closure computation.
///
/// Both checks happen only between rounds, so the state is always a completed
/// round when the computation stops early. No partial closure is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosureControl<'a> {
    /// When set to `true`, the computation stops before the next round.
    pub cancel: Option<&'a AtomicBool>,
    /// Maximum number of productive rounds; exceeding it counts as cancellation.
    pub max_rounds: Option<u32>,
}

impl<'a> ClosureControl<'a> {
    /// Control that stops when `flag` becomes `true`.
    #[must_use]
    pub fn with_cancel(flag: &'a AtomicBool) -> Self {
        Self {
            cancel: Some(flag),
            max_rounds: None,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn exceeds_budget(&self, rounds: u32) -> bool {
        self.max_rounds.is_some_and(|max| rounds > max)
    }
}

/// Every transitively reachable `(package, dependency)` pair.
///
/// A set: each pair appears once however many paths realize it.
#[derive(Debug, Clone, Default)]
pub struct ClosureSet {
    names: Arc<NameTable>,
    /// Reachable ids per source id, sorted.
    reach: Vec<Vec<NodeId>>,
    len: usize,
    rounds: u32,
}

impl ClosureSet {
    /// Wrap an already-closed pair set, e.g. one computed by the store.
    ///
    /// The pairs are taken as given; no closure is computed.
    #[must_use]
    pub fn from_edge_set(edges: &EdgeSet) -> Self {
        let mut reach = vec![Vec::new(); edges.node_count()];
        for &(from, to) in edges.id_pairs() {
            reach[from].push(to);
        }
        Self {
            names: Arc::clone(edges.names()),
            reach,
            len: edges.len(),
            rounds: 0,
        }
    }

    /// Wrap already-closed name pairs, e.g. rows returned by a store pushdown.
    ///
    /// Duplicate pairs collapse.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        Self::from_edge_set(&EdgeSet::from_pairs(pairs))
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the closure has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Productive rounds taken to reach the fixed point.
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Whether `package` transitively depends on `dependency`.
    #[must_use]
    pub fn contains(&self, package: &str, dependency: &str) -> bool {
        match (self.names.get(package), self.names.get(dependency)) {
            (Some(from), Some(to)) => self.reach[from].binary_search(&to).is_ok(),
            _ => false,
        }
    }

    /// Iterate pairs as names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.reach.iter().enumerate().flat_map(move |(from, targets)| {
            let package = self.names.name(from);
            targets
                .iter()
                .map(move |&to| (package, self.names.name(to)))
        })
    }

    /// Transitive dependencies of one package, sorted by name.
    ///
    /// Unknown packages have none.
    #[must_use]
    pub fn dependencies_of(&self, package: &str) -> Vec<&str> {
        let Some(from) = self.names.get(package) else {
            return Vec::new();
        };
        let mut deps: Vec<&str> = self.reach[from]
            .iter()
            .map(|&to| self.names.name(to))
            .collect();
        deps.sort_unstable();
        deps
    }

    /// The closure's pairs as a direct edge set.
    #[must_use]
    pub fn to_edge_set(&self) -> EdgeSet {
        EdgeSet::from_pairs(self.iter())
    }

    /// The name table ids refer to.
    #[must_use]
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Reachable ids per source id.
    #[must_use]
    pub fn id_reach(&self) -> &[Vec<NodeId>] {
        &self.reach
    }
}

/// Compute the transitive closure of `edges` to a fixed point.
#[must_use]
pub fn compute_closure(edges: &EdgeSet) -> ClosureSet {
    let mut state = Expansion::seed(edges);
    while state.step() {}
    state.finish(edges)
}

/// Compute the transitive closure of `edges` under host control.
///
/// # Errors
///
/// Returns [`Error::Cancelled`] if the cancel flag is raised or the round
/// budget is exceeded before the fixed point is reached.
pub fn compute_closure_with(edges: &EdgeSet, control: &ClosureControl<'_>) -> Result<ClosureSet> {
    let mut state = Expansion::seed(edges);

    loop {
        if control.is_cancelled() {
            debug!(rounds = state.rounds, total = state.total, "Closure computation cancelled");
            return Err(Error::Cancelled {
                rounds: state.rounds,
            });
        }
        if !state.step() {
            break;
        }
        if control.exceeds_budget(state.rounds) {
            debug!(rounds = state.rounds, total = state.total, "Closure round budget exceeded");
            return Err(Error::Cancelled {
                rounds: state.rounds - 1,
            });
        }
    }

    Ok(state.finish(edges))
}

/// Semi-naive expansion state between rounds.
struct Expansion {
    successors: Vec<Vec<NodeId>>,
    known: Vec<HashSet<NodeId>>,
    frontier: Vec<Vec<NodeId>>,
    total: usize,
    rounds: u32,
}

impl Expansion {
    /// Round 0: every direct edge is known and on the frontier.
    fn seed(edges: &EdgeSet) -> Self {
        let successors = edges.adjacency();
        let known = successors
            .iter()
            .map(|direct| direct.iter().copied().collect())
            .collect();
        let frontier = successors.clone();

        Self {
            successors,
            known,
            frontier,
            total: edges.len(),
            rounds: 0,
        }
    }

    /// Join the frontier with the direct edges once.
    ///
    /// Returns `false` when the round discovered nothing new (fixed point).
    fn step(&mut self) -> bool {
        let mut added = 0usize;
        let mut next = Vec::with_capacity(self.frontier.len());

        for (seen, current) in self.known.iter_mut().zip(&self.frontier) {
            let mut discovered = Vec::new();
            for &via in current {
                for &target in &self.successors[via] {
                    if seen.insert(target) {
                        discovered.push(target);
                    }
                }
            }
            added += discovered.len();
            next.push(discovered);
        }

        if added == 0 {
            return false;
        }

        self.rounds += 1;
        self.total += added;
        self.frontier = next;
        trace!(
            round = self.rounds,
            frontier = added,
            total = self.total,
            "Closure round complete"
        );
        true
    }

    fn finish(self, edges: &EdgeSet) -> ClosureSet {
        let reach: Vec<Vec<NodeId>> = self
            .known
            .into_iter()
            .map(|set| {
                let mut targets: Vec<NodeId> = set.into_iter().collect();
                targets.sort_unstable();
                targets
            })
            .collect();

        debug!(
            direct = edges.len(),
            pairs = self.total,
            rounds = self.rounds,
            "Transitive closure reached fixed point"
        );

        ClosureSet {
            names: Arc::clone(edges.names()),
            reach,
            len: self.total,
            rounds: self.rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn pairs(closure: &ClosureSet) -> BTreeSet<(String, String)> {
        closure
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    fn expected(list: &[(&str, &str)]) -> BTreeSet<(String, String)> {
        list.iter()
            .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
            .collect()
    }

    #[test]
    fn single_edge_closure_is_the_edge() {
        let closure = compute_closure(&EdgeSet::from_pairs([("A", "B")]));

        assert_eq!(pairs(&closure), expected(&[("A", "B")]));
        assert_eq!(closure.rounds(), 0);
    }

    #[test]
    fn chain_reaches_every_descendant() {
        let closure = compute_closure(&EdgeSet::from_pairs([("a", "b"), ("b", "c"), ("c", "d")]));

        assert_eq!(
            pairs(&closure),
            expected(&[
                ("a", "b"),
                ("a", "c"),
                ("a", "d"),
                ("b", "c"),
                ("b", "d"),
                ("c", "d"),
            ])
        );
        assert!(!closure.contains("d", "a"));
        assert_eq!(closure.rounds(), 2);
    }

    #[test]
    fn three_cycle_yields_nine_pairs() {
        let closure = compute_closure(&EdgeSet::from_pairs([("A", "B"), ("B", "C"), ("C", "A")]));

        assert_eq!(closure.len(), 9);
        for a in ["A", "B", "C"] {
            for b in ["A", "B", "C"] {
                assert!(closure.contains(a, b), "{a} should reach {b}");
            }
        }
        assert!(closure.rounds() <= 3);
    }

    #[test]
    fn no_spurious_self_dependency_without_cycle() {
        let closure = compute_closure(&EdgeSet::from_pairs([("a", "b"), ("a", "c"), ("b", "c")]));

        assert!(!closure.contains("a", "a"));
        assert!(!closure.contains("b", "b"));
        assert_eq!(closure.len(), 3);
    }

    #[test]
    fn self_edge_is_a_cycle_of_one() {
        let closure = compute_closure(&EdgeSet::from_pairs([("a", "a"), ("a", "b")]));

        assert_eq!(pairs(&closure), expected(&[("a", "a"), ("a", "b")]));
    }

    #[test]
    fn diamond_pairs_are_not_duplicated() {
        let closure = compute_closure(&EdgeSet::from_pairs([
            ("top", "left"),
            ("top", "right"),
            ("left", "bottom"),
            ("right", "bottom"),
        ]));

        let top_bottom = closure
            .iter()
            .filter(|pair| *pair == ("top", "bottom"))
            .count();
        assert_eq!(top_bottom, 1);
        assert_eq!(closure.len(), 5);
    }

    #[test]
    fn empty_edges_give_empty_closure() {
        let closure = compute_closure(&EdgeSet::default());

        assert!(closure.is_empty());
        assert_eq!(closure.iter().count(), 0);
        assert!(closure.dependencies_of("anything").is_empty());
    }

    #[test]
    fn dependencies_of_is_sorted() {
        let closure = compute_closure(&EdgeSet::from_pairs([("app", "zlib"), ("app", "attrs"), ("attrs", "six")]));

        assert_eq!(closure.dependencies_of("app"), vec!["attrs", "six", "zlib"]);
    }

    #[test]
    fn raised_cancel_flag_stops_before_first_round() {
        let flag = AtomicBool::new(true);
        let edges = EdgeSet::from_pairs([("a", "b"), ("b", "c")]);

        let result = compute_closure_with(&edges, &ClosureControl::with_cancel(&flag));

        assert!(matches!(result, Err(Error::Cancelled { rounds: 0 })));
    }

    #[test]
    fn round_budget_exceeded_is_cancellation() {
        let edges = EdgeSet::from_pairs([("a", "b"), ("b", "c"), ("c", "d"), ("d", "e")]);
        let control = ClosureControl {
            cancel: None,
            max_rounds: Some(1),
        };

        let result = compute_closure_with(&edges, &control);

        assert!(matches!(result, Err(Error::Cancelled { rounds: 1 })));
    }

    #[test]
    fn round_budget_equal_to_needed_rounds_succeeds() {
        let edges = EdgeSet::from_pairs([("a", "b"), ("b", "c"), ("c", "d")]);
        let control = ClosureControl {
            cancel: None,
            max_rounds: Some(2),
        };

        let closure = compute_closure_with(&edges, &control).expect("budget is sufficient");

        assert_eq!(closure.len(), 6);
    }

    #[test]
    fn from_edge_set_keeps_pairs_verbatim() {
        let edges = EdgeSet::from_pairs([("a", "b"), ("b", "c")]);
        let wrapped = ClosureSet::from_edge_set(&edges);

        assert_eq!(wrapped.len(), 2);
        assert!(!wrapped.contains("a", "c"));
    }
}
