//! Result projection: ordered, capped, named record sets.
//!
//! Metrics produce typed rows. This module ranks them deterministically and
//! turns them into a [`ResultTable`] of plain cells that any renderer (terminal
//! table, JSON export) can consume without knowing the metric.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::metrics::MetricKind;

/// Sort rows descending on `value`, break ties on `key` ascending, keep at
/// most `limit` rows.
///
/// The key must identify a row within the metric (its group key) so the
/// resulting order is total.
pub fn rank_desc<T, V, K>(
    mut rows: Vec<T>,
    value: impl Fn(&T) -> V,
    key: impl Fn(&T) -> &K,
    limit: usize,
) -> Vec<T>
where
    V: Ord,
    K: Ord + ?Sized,
{
    rows.sort_by(|a, b| value(b).cmp(&value(a)).then_with(|| key(a).cmp(key(b))));
    rows.truncate(limit);
    rows
}

/// One value in a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Text value
    Text(String),
    /// Non-negative integer value
    Int(u64),
    /// Point in time
    Timestamp(DateTime<Utc>),
    /// Absent value
    Null,
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(n) => write!(f, "{n}"),
            Self::Timestamp(at) => write!(f, "{}", at.format("%Y-%m-%d %H:%M:%S")),
            Self::Null => f.write_str("-"),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<u64> for Cell {
    fn from(n: u64) -> Self {
        Self::Int(n)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Timestamp(at)
    }
}

/// A metric row that can be flattened into cells.
///
/// Cells must line up with [`MetricKind::columns`] of the metric producing
/// the row.
pub trait TableRow {
    /// The row's values in column order.
    fn cells(&self) -> Vec<Cell>;
}

impl TableRow for String {
    fn cells(&self) -> Vec<Cell> {
        vec![Cell::from(self.as_str())]
    }
}

/// A named, ordered, capped record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    /// Stable metric name
    pub metric: &'static str,
    /// Column names
    pub columns: Vec<&'static str>,
    /// Rows, already ordered and capped
    pub rows: Vec<Vec<Cell>>,
}

impl ResultTable {
    /// Project typed rows of `kind` into a table, preserving their order.
    pub fn from_rows<R: TableRow>(kind: MetricKind, rows: &[R]) -> Self {
        Self {
            metric: kind.name(),
            columns: kind.columns().to_vec(),
            rows: rows.iter().map(TableRow::cells).collect(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `row` in the column named `column`.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.columns.iter().position(|c| *c == column)?;
        self.rows.get(row)?.get(index)
    }
}
