//! Property tests for the transitive closure engine.
//!
//! Random graphs over a small name space make cycles, self-edges and duplicate
//! rows common. Every closure is checked against the algebraic properties a
//! transitive closure must have and against a brute-force reachability search.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use pkgraph::metrics::{dependency_cycles, most_depended_on};
use pkgraph::{DependencyEdge, EdgeSet, compute_closure};
use proptest::prelude::*;

mod common;
use common::arb_edges;

type Pairs = BTreeSet<(String, String)>;

fn closure_pairs(edges: &EdgeSet) -> Pairs {
    compute_closure(edges)
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

/// Breadth-first search from every node, one or more steps.
fn brute_force(raw: &[(String, String)]) -> Pairs {
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for (a, b) in raw {
        successors.entry(a.as_str()).or_default().push(b.as_str());
    }

    let mut pairs = Pairs::new();
    for &start in successors.keys() {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = successors[start].iter().copied().collect();
        while let Some(node) = queue.pop_front() {
            if seen.insert(node) {
                pairs.insert((start.to_string(), node.to_string()));
                if let Some(next) = successors.get(node) {
                    queue.extend(next.iter().copied());
                }
            }
        }
    }
    pairs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn closure_matches_brute_force(raw in arb_edges(12, 40)) {
        let edges = EdgeSet::from_pairs(raw.iter().map(|(a, b)| (a.as_str(), b.as_str())));
        prop_assert_eq!(closure_pairs(&edges), brute_force(&raw));
    }

    #[test]
    fn closure_contains_every_direct_edge(raw in arb_edges(12, 40)) {
        let edges = EdgeSet::from_pairs(raw.iter().map(|(a, b)| (a.as_str(), b.as_str())));
        let closure = compute_closure(&edges);

        for (a, b) in &raw {
            prop_assert!(closure.contains(a, b), "missing direct edge {} -> {}", a, b);
        }
    }

    #[test]
    fn closure_is_transitive(raw in arb_edges(10, 30)) {
        let pairs = closure_pairs(&EdgeSet::from_pairs(raw.iter().map(|(a, b)| (a.as_str(), b.as_str()))));

        for (a, b) in &pairs {
            for (b2, c) in pairs.range((b.clone(), String::new())..) {
                if b2 != b {
                    break;
                }
                prop_assert!(pairs.contains(&(a.clone(), c.clone())), "{} -> {} -> {} not closed", a, b, c);
            }
        }
    }

    #[test]
    fn reclosing_adds_nothing(raw in arb_edges(12, 40)) {
        let edges = EdgeSet::from_pairs(raw.iter().map(|(a, b)| (a.as_str(), b.as_str())));
        let once = compute_closure(&edges);
        let twice = compute_closure(&once.to_edge_set());

        prop_assert_eq!(once.len(), twice.len());
        prop_assert_eq!(closure_pairs(&once.to_edge_set()), closure_pairs(&twice.to_edge_set()));
    }

    #[test]
    fn duplicate_rows_never_duplicate_pairs(raw in arb_edges(10, 30)) {
        let doubled: Vec<DependencyEdge> = raw
            .iter()
            .chain(raw.iter())
            .map(|(a, b)| DependencyEdge::new(a.as_str(), b.as_str()))
            .collect();
        let closure = compute_closure(&EdgeSet::extract(&doubled, &pkgraph::VariantFilter::Default));

        let listed: Vec<_> = closure.iter().collect();
        let distinct: HashSet<_> = listed.iter().copied().collect();
        prop_assert_eq!(listed.len(), distinct.len());
        prop_assert_eq!(closure.len(), listed.len());
    }

    #[test]
    fn self_reachability_matches_cycles(raw in arb_edges(10, 25)) {
        let edges = EdgeSet::from_pairs(raw.iter().map(|(a, b)| (a.as_str(), b.as_str())));
        let closure = compute_closure(&edges);
        let in_cycle: HashSet<String> = dependency_cycles(&edges, usize::MAX)
            .into_iter()
            .flat_map(|cycle| cycle.members)
            .collect();

        for id in 0..edges.node_count() {
            let name = edges.names().name(id);
            prop_assert_eq!(closure.contains(name, name), in_cycle.contains(name), "package {}", name);
        }
    }

    #[test]
    fn rankings_are_capped_and_deterministic(raw in arb_edges(20, 60), limit in 0usize..15) {
        let mut deps: Vec<DependencyEdge> = raw
            .iter()
            .map(|(a, b)| DependencyEdge::new(a.as_str(), b.as_str()))
            .collect();

        let first = most_depended_on(&deps, limit);
        deps.reverse();
        let second = most_depended_on(&deps, limit);

        prop_assert!(first.len() <= limit);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn three_cycle_closure_is_complete() {
    let edges = EdgeSet::from_pairs([("A", "B"), ("B", "C"), ("C", "A")]);

    let pairs = closure_pairs(&edges);

    let expected: Pairs = ["A", "B", "C"]
        .iter()
        .flat_map(|a| ["A", "B", "C"].iter().map(move |b| ((*a).to_string(), (*b).to_string())))
        .collect();
    assert_eq!(pairs, expected);
}

#[test]
fn long_chain_converges() {
    let names: Vec<String> = (0..500).map(|i| format!("n{i}")).collect();
    let edges = EdgeSet::from_pairs(names.windows(2).map(|w| (w[0].as_str(), w[1].as_str())));

    let closure = compute_closure(&edges);

    assert_eq!(closure.len(), 500 * 499 / 2);
    assert!(closure.contains("n0", "n499"));
    assert!(!closure.contains("n499", "n0"));
}
