//! Dependency cycle detection using petgraph.
//!
//! A cycle is a strongly connected component with more than one package, or a
//! single package with a self-edge. These are exactly the packages the closure
//! reports as depending on themselves.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::debug;

use crate::edges::EdgeSet;
use crate::projection::{Cell, TableRow};

/// Packages that all reach one another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Member names, sorted
    pub members: Vec<String>,
}

impl Cycle {
    /// Number of packages in the cycle.
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

impl TableRow for Cycle {
    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(self.size() as u64),
            Cell::from(self.members.join(", ")),
        ]
    }
}

/// Every dependency cycle in `edges`, largest first.
///
/// Ties are broken by first member name ascending.
#[must_use]
pub fn dependency_cycles(edges: &EdgeSet, limit: usize) -> Vec<Cycle> {
    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(edges.node_count(), edges.len());
    for _ in 0..edges.node_count() {
        graph.add_node(());
    }
    for &(from, to) in edges.id_pairs() {
        graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
    }

    let names = edges.names();
    let mut cycles: Vec<Cycle> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => graph.contains_edge(*single, *single),
            _ => true,
        })
        .map(|component| {
            let mut members: Vec<String> = component
                .into_iter()
                .map(|node| names.name(node.index()).to_string())
                .collect();
            members.sort_unstable();
            Cycle { members }
        })
        .collect();

    cycles.sort_by(|a, b| {
        b.size()
            .cmp(&a.size())
            .then_with(|| a.members.cmp(&b.members))
    });
    debug!(cycles = cycles.len(), "Detected dependency cycles");
    cycles.truncate(limit);
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(cycles: &[Cycle]) -> Vec<Vec<&str>> {
        cycles
            .iter()
            .map(|c| c.members.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn finds_cycles_and_self_edges() {
        let edges = EdgeSet::from_pairs([
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("c", "d"),
            ("x", "y"),
            ("y", "x"),
            ("me", "me"),
            ("leaf", "d"),
        ]);

        let cycles = dependency_cycles(&edges, 100);

        assert_eq!(
            members(&cycles),
            vec![vec!["a", "b", "c"], vec!["x", "y"], vec!["me"]]
        );
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let edges = EdgeSet::from_pairs([("a", "b"), ("b", "c"), ("a", "c")]);
        assert!(dependency_cycles(&edges, 100).is_empty());
    }

    #[test]
    fn limit_caps_output() {
        let edges = EdgeSet::from_pairs([("a", "a"), ("b", "b"), ("c", "c")]);

        let cycles = dependency_cycles(&edges, 2);

        assert_eq!(members(&cycles), vec![vec!["a"], vec!["b"]]);
    }
}
