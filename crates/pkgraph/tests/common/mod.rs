//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use pkgraph::{DependencyEdge, Maintainer, MemoryStore, Package, SqliteStore};
use proptest::prelude::*;

/// Fixed "now" so window-based metrics are reproducible.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .single()
        .expect("valid date")
}

/// A small index exercising every metric.
///
/// Dependency graph (unconditional edges):
/// ```text
///   app ──▶ requests ──▶ urllib3
///    │          ▲
///    ▼          │
///   cli ────────┘        ring-a ──▶ ring-b ──▶ ring-c ──▶ ring-a
/// ```
/// plus `app` depending on `pytest`/`pytest-cov` under the `test` extra.
pub fn packages() -> Vec<Package> {
    let recent = now() - Duration::days(30);
    vec![
        Package::new("app")
            .with_downloads(100)
            .with_last_uploaded_at(Utc.with_ymd_and_hms(2024, 5, 5, 10, 0, 0).unwrap()),
        Package::new("cli").with_downloads(40),
        Package::new("requests")
            .with_downloads(900)
            .with_last_uploaded_at(Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap()),
        Package::new("urllib3").with_downloads(800),
        Package::new("ring-a").with_downloads(0).with_last_uploaded_at(recent),
        Package::new("ring-b").with_downloads(0).with_last_uploaded_at(recent),
        Package::new("ring-c"),
        Package::new("pytest").with_downloads(500),
        Package::new("pytest-cov").with_downloads(200),
    ]
}

pub fn deps() -> Vec<DependencyEdge> {
    vec![
        DependencyEdge::new("app", "requests"),
        DependencyEdge::new("app", "cli"),
        DependencyEdge::new("cli", "requests"),
        DependencyEdge::new("requests", "urllib3"),
        DependencyEdge::new("requests", "urllib3"),
        DependencyEdge::new("ring-a", "ring-b"),
        DependencyEdge::new("ring-b", "ring-c"),
        DependencyEdge::new("ring-c", "ring-a"),
        DependencyEdge::new("app", "pytest").with_extra("test"),
        DependencyEdge::new("app", "pytest-cov").with_extra("test"),
        DependencyEdge::new("cli", "pytest-cov").with_extra("testing"),
    ]
}

pub fn maintainers() -> Vec<Maintainer> {
    vec![
        Maintainer::new("app", "alice"),
        Maintainer::new("cli", "alice"),
        Maintainer::new("cli", "bob"),
        Maintainer::new("requests", "carol"),
        Maintainer::new("urllib3", "carol"),
        Maintainer::new("urllib3", "dave"),
        Maintainer::new("ring-a", "erin"),
        Maintainer::new("ring-a", "frank"),
        Maintainer::new("ring-b", "erin"),
    ]
}

pub fn memory_store() -> MemoryStore {
    MemoryStore::new()
        .with_packages(packages())
        .with_deps(deps())
        .with_maintainers(maintainers())
}

/// The same fixture written to a fresh `SQLite` store.
pub fn sqlite_store() -> SqliteStore {
    let store = SqliteStore::in_memory().expect("in-memory store");
    store.insert_packages(&packages()).expect("insert packages");
    store.insert_deps(&deps()).expect("insert deps");
    store
        .insert_maintainers(&maintainers())
        .expect("insert maintainers");
    store
}

/// Random edge lists over a small name space, so cycles and duplicates are
/// common.
pub fn arb_edges(max_nodes: u8, max_edges: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((0..max_nodes, 0..max_nodes), 0..max_edges).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(a, b)| (format!("p{a}"), format!("p{b}")))
            .collect()
    })
}
