//! `SQLite`-backed relation source.
//!
//! Reads the package index dump layout. Every read first checks the relation's
//! columns with `PRAGMA table_info` so a store of the wrong shape fails before
//! anything is computed. The transitive closure can be pushed down as a
//! recursive CTE.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row, params, params_from_iter};
use tracing::debug;

use super::RelationSource;
use super::schema::{RelationLayout, SCHEMA, layout};
use crate::edges::VariantFilter;
use crate::error::{Error, Result};
use crate::types::{
    DependencyEdge, Maintainer, Package, PackageUrl, Relation, RelationCounts, ScorecardCheck,
    Wheel,
};

/// `SQLite` database holding the six source relations.
///
/// The connection is wrapped in a `Mutex` so the store satisfies the
/// `Send + Sync` bounds of [`RelationSource`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open an existing database read-only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file does not exist and
    /// [`Error::Database`] if `SQLite` cannot open it.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("database not found: {}", path.display()),
            )));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), "Opened store read-only");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Create (or open) a writable database and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// schema cannot be applied.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = %path.display(), "Created store");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Create a private in-memory database with the schema applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Path of the database file; `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Acquire the connection lock.
    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            Error::Internal(format!(
                "store connection mutex poisoned (a thread panicked while holding the lock): {e}"
            ))
        })
    }

    // === Reads ===

    /// Build the `SELECT` for a relation after checking its columns.
    ///
    /// Missing optional columns are selected as `NULL`.
    fn select_sql(conn: &Connection, layout: &RelationLayout) -> Result<String> {
        let present = table_columns(conn, layout.relation)?;

        if let Some(missing) = layout.required.iter().find(|c| !present.contains(**c)) {
            return Err(Error::MissingColumn {
                relation: layout.relation.to_string(),
                column: (*missing).to_string(),
            });
        }

        let list = layout
            .columns()
            .map(|column| {
                if present.contains(column) {
                    column.to_string()
                } else {
                    format!("NULL AS {column}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("SELECT {list} FROM {}", layout.relation))
    }

    /// Read every row of a relation through `decode`.
    fn read_relation<T>(
        &self,
        relation: Relation,
        decode: impl Fn(&Cells<'_, '_>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let layout = layout(relation);
        let columns: Vec<&'static str> = layout.columns().collect();
        let conn = self.connection()?;
        let sql = Self::select_sql(&conn, &layout)?;

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let cells = Cells {
                row,
                relation,
                columns: &columns,
            };
            records.push(decode(&cells)?);
        }

        debug!(relation = %relation, rows = records.len(), "Read relation");
        Ok(records)
    }

    // === Writes ===

    /// Insert packages in one transaction, returning the number written.
    ///
    /// # Errors
    ///
    /// Fails on read-only stores and on download counts above `i64::MAX`.
    pub fn insert_packages(&self, packages: &[Package]) -> Result<usize> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO packages (name, version, requires_python, yanked, has_binary_wheel,
                 has_vulnerabilities, first_uploaded_at, last_uploaded_at, recorded_at, downloads,
                 scorecard_overall, in_google_assured_oss)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for package in packages {
                let downloads = package
                    .downloads
                    .map(|d| {
                        i64::try_from(d).map_err(|_| {
                            Error::invalid_value(
                                "packages",
                                "downloads",
                                d.to_string(),
                                "exceeds the storable range",
                            )
                        })
                    })
                    .transpose()?;
                stmt.execute(params![
                    package.name,
                    package.version,
                    package.requires_python,
                    package.yanked,
                    package.has_binary_wheel,
                    package.has_vulnerabilities,
                    package.first_uploaded_at.map(|t| t.to_rfc3339()),
                    package.last_uploaded_at.map(|t| t.to_rfc3339()),
                    package.recorded_at.map(|t| t.to_rfc3339()),
                    downloads,
                    package.scorecard_overall,
                    package.in_google_assured_oss,
                ])?;
            }
        }
        tx.commit()?;
        Ok(packages.len())
    }

    /// Insert dependency edges in one transaction, returning the number written.
    ///
    /// # Errors
    ///
    /// Fails on read-only stores.
    pub fn insert_deps(&self, deps: &[DependencyEdge]) -> Result<usize> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO deps (package_name, extra, dep_name, dep_specifier)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for dep in deps {
                stmt.execute(params![dep.package_name, dep.extra, dep.dep_name, dep.dep_specifier])?;
            }
        }
        tx.commit()?;
        Ok(deps.len())
    }

    /// Insert maintainer pairs in one transaction, returning the number written.
    ///
    /// # Errors
    ///
    /// Fails on read-only stores.
    pub fn insert_maintainers(&self, maintainers: &[Maintainer]) -> Result<usize> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO maintainers (package_name, name) VALUES (?1, ?2)")?;
            for maintainer in maintainers {
                stmt.execute(params![maintainer.package_name, maintainer.name])?;
            }
        }
        tx.commit()?;
        Ok(maintainers.len())
    }

    /// Insert wheels in one transaction, returning the number written.
    ///
    /// # Errors
    ///
    /// Fails on read-only stores.
    pub fn insert_wheels(&self, wheels: &[Wheel]) -> Result<usize> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO wheels (package_name, filename, build, python, abi, platform)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for wheel in wheels {
                stmt.execute(params![
                    wheel.package_name,
                    wheel.filename,
                    wheel.build,
                    wheel.python,
                    wheel.abi,
                    wheel.platform,
                ])?;
            }
        }
        tx.commit()?;
        Ok(wheels.len())
    }

    /// Insert package URLs in one transaction, returning the number written.
    ///
    /// # Errors
    ///
    /// Fails on read-only stores.
    pub fn insert_package_urls(&self, urls: &[PackageUrl]) -> Result<usize> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO package_urls (package_name, name, url) VALUES (?1, ?2, ?3)")?;
            for url in urls {
                stmt.execute(params![url.package_name, url.name, url.url])?;
            }
        }
        tx.commit()?;
        Ok(urls.len())
    }

    /// Insert scorecard checks in one transaction, returning the number written.
    ///
    /// # Errors
    ///
    /// Fails on read-only stores.
    pub fn insert_scorecard_checks(&self, checks: &[ScorecardCheck]) -> Result<usize> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO scorecard_checks (package_name, name, score) VALUES (?1, ?2, ?3)",
            )?;
            for check in checks {
                stmt.execute(params![check.package_name, check.name, check.score])?;
            }
        }
        tx.commit()?;
        Ok(checks.len())
    }
}

impl RelationSource for SqliteStore {
    fn packages(&self) -> Result<Vec<Package>> {
        self.read_relation(Relation::Packages, |cells| {
            Ok(Package {
                name: cells.text("name")?,
                version: cells.opt_text("version")?,
                requires_python: cells.opt_text("requires_python")?,
                yanked: cells.flag("yanked")?,
                has_binary_wheel: cells.flag("has_binary_wheel")?,
                has_vulnerabilities: cells.flag("has_vulnerabilities")?,
                first_uploaded_at: cells.timestamp("first_uploaded_at")?,
                last_uploaded_at: cells.timestamp("last_uploaded_at")?,
                recorded_at: cells.timestamp("recorded_at")?,
                downloads: cells.count("downloads")?,
                scorecard_overall: cells.real("scorecard_overall")?,
                in_google_assured_oss: cells.flag("in_google_assured_oss")?,
            })
        })
    }

    fn deps(&self) -> Result<Vec<DependencyEdge>> {
        self.read_relation(Relation::Deps, |cells| {
            Ok(DependencyEdge {
                package_name: cells.text("package_name")?,
                extra: cells.opt_text("extra")?,
                dep_name: cells.text("dep_name")?,
                dep_specifier: cells.opt_text("dep_specifier")?,
            })
        })
    }

    fn maintainers(&self) -> Result<Vec<Maintainer>> {
        self.read_relation(Relation::Maintainers, |cells| {
            Ok(Maintainer {
                package_name: cells.text("package_name")?,
                name: cells.text("name")?,
            })
        })
    }

    fn wheels(&self) -> Result<Vec<Wheel>> {
        self.read_relation(Relation::Wheels, |cells| {
            Ok(Wheel {
                package_name: cells.text("package_name")?,
                filename: cells.text("filename")?,
                build: cells.opt_text("build")?,
                python: cells.opt_text("python")?,
                abi: cells.opt_text("abi")?,
                platform: cells.opt_text("platform")?,
            })
        })
    }

    fn package_urls(&self) -> Result<Vec<PackageUrl>> {
        self.read_relation(Relation::PackageUrls, |cells| {
            Ok(PackageUrl {
                package_name: cells.text("package_name")?,
                name: cells.opt_text("name")?,
                url: cells.text("url")?,
            })
        })
    }

    fn scorecard_checks(&self) -> Result<Vec<ScorecardCheck>> {
        self.read_relation(Relation::ScorecardChecks, |cells| {
            Ok(ScorecardCheck {
                package_name: cells.text("package_name")?,
                name: cells.text("name")?,
                score: cells.real("score")?,
            })
        })
    }

    fn relation_counts(&self) -> Result<RelationCounts> {
        let conn = self.connection()?;
        let mut counts = Vec::new();

        for relation in Relation::ALL {
            let exists: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
                [relation.as_str()],
                |row| row.get(0),
            )?;
            if exists == 0 {
                debug!(relation = %relation, "Relation absent, not counted");
                continue;
            }
            let rows: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {relation}"), [], |row| row.get(0))?;
            counts.push((relation, u64::try_from(rows).unwrap_or_default()));
        }

        Ok(RelationCounts { counts })
    }

    fn transitive_closure(&self, filter: &VariantFilter) -> Result<Option<Vec<(String, String)>>> {
        let conn = self.connection()?;
        // Validates the deps columns; the CTE itself only needs the required ones.
        Self::select_sql(&conn, &layout(Relation::Deps))?;

        let (condition, bind): (&str, Vec<&str>) = match filter {
            VariantFilter::Default => ("extra IS NULL", vec![]),
            VariantFilter::All => ("1 = 1", vec![]),
            VariantFilter::Exact(name) => ("extra = ?1", vec![name.as_str()]),
            VariantFilter::Prefix(prefix) => {
                ("substr(extra, 1, length(?1)) = ?1", vec![prefix.as_str()])
            }
        };

        // UNION (not UNION ALL) keeps the working set a set, so cycles terminate.
        let sql = format!(
            "WITH RECURSIVE
             direct_deps(package, dependency) AS (
                 SELECT DISTINCT package_name, dep_name FROM deps WHERE {condition}
             ),
             transitive_deps(package, dependency) AS (
                 SELECT package, dependency FROM direct_deps
                 UNION
                 SELECT t.package, d.dependency
                 FROM transitive_deps t
                 JOIN direct_deps d ON d.package = t.dependency
             )
             SELECT package, dependency FROM transitive_deps
             ORDER BY package, dependency"
        );

        let mut stmt = conn.prepare(&sql)?;
        let pairs = stmt
            .query_map(params_from_iter(bind), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(pairs = pairs.len(), filter = %filter, "Closure computed by store");
        Ok(Some(pairs))
    }
}

/// Column names of a relation; errors if the relation does not exist.
fn table_columns(conn: &Connection, relation: Relation) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({relation})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;

    if columns.is_empty() {
        return Err(Error::MissingRelation {
            relation: relation.to_string(),
        });
    }
    Ok(columns)
}

/// Parse the timestamp spellings found in dumps.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff][+HH:MM]` (space or `T`
/// separated, naive values taken as UTC) and bare dates.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// One row of a relation, addressed by column name.
struct Cells<'a, 'r> {
    row: &'a Row<'r>,
    relation: Relation,
    columns: &'a [&'static str],
}

impl Cells<'_, '_> {
    fn value(&self, column: &str) -> Result<ValueRef<'_>> {
        let index = self
            .columns
            .iter()
            .position(|c| *c == column)
            .ok_or_else(|| Error::Internal(format!("column `{column}` not selected")))?;
        Ok(self.row.get_ref(index)?)
    }

    fn invalid(&self, column: &str, value: impl Into<String>, reason: &str) -> Error {
        Error::invalid_value(self.relation.as_str(), column, value, reason)
    }

    fn utf8<'v>(&self, column: &str, bytes: &'v [u8]) -> Result<&'v str> {
        std::str::from_utf8(bytes)
            .map_err(|_| self.invalid(column, String::from_utf8_lossy(bytes), "not valid UTF-8"))
    }

    fn text(&self, column: &str) -> Result<String> {
        self.opt_text(column)?
            .ok_or_else(|| self.invalid(column, "NULL", "required value is NULL"))
    }

    fn opt_text(&self, column: &str) -> Result<Option<String>> {
        match self.value(column)? {
            ValueRef::Null => Ok(None),
            ValueRef::Text(bytes) => Ok(Some(self.utf8(column, bytes)?.to_string())),
            ValueRef::Integer(i) => Ok(Some(i.to_string())),
            ValueRef::Real(f) => Ok(Some(f.to_string())),
            ValueRef::Blob(_) => Err(self.invalid(column, "<blob>", "expected text")),
        }
    }

    fn flag(&self, column: &str) -> Result<bool> {
        match self.value(column)? {
            ValueRef::Null => Ok(false),
            ValueRef::Integer(i) => Ok(i != 0),
            ValueRef::Text(bytes) => match self.utf8(column, bytes)? {
                "true" | "True" | "1" => Ok(true),
                "false" | "False" | "0" | "" => Ok(false),
                other => Err(self.invalid(column, other, "expected a boolean")),
            },
            other => Err(self.invalid(column, format!("{other:?}"), "expected a boolean")),
        }
    }

    fn count(&self, column: &str) -> Result<Option<u64>> {
        match self.value(column)? {
            ValueRef::Null => Ok(None),
            ValueRef::Integer(i) => u64::try_from(i)
                .map(Some)
                .map_err(|_| self.invalid(column, i.to_string(), "negative count")),
            other => Err(self.invalid(column, format!("{other:?}"), "expected an integer")),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn real(&self, column: &str) -> Result<Option<f64>> {
        match self.value(column)? {
            ValueRef::Null => Ok(None),
            ValueRef::Real(f) => Ok(Some(f)),
            ValueRef::Integer(i) => Ok(Some(i as f64)),
            other => Err(self.invalid(column, format!("{other:?}"), "expected a number")),
        }
    }

    fn timestamp(&self, column: &str) -> Result<Option<DateTime<Utc>>> {
        match self.value(column)? {
            ValueRef::Null => Ok(None),
            ValueRef::Text(bytes) => {
                let raw = self.utf8(column, bytes)?;
                parse_timestamp(raw)
                    .map(Some)
                    .ok_or_else(|| self.invalid(column, raw, "not a recognized timestamp"))
            }
            ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0)
                .map(Some)
                .ok_or_else(|| self.invalid(column, secs.to_string(), "epoch seconds out of range")),
            other => Err(self.invalid(column, format!("{other:?}"), "expected a timestamp")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s)
            .single()
            .expect("valid test timestamp")
    }

    #[rstest]
    #[case::rfc3339("2023-06-01T12:30:00Z", utc(2023, 6, 1, 12, 30, 0))]
    #[case::rfc3339_offset("2023-06-01T14:30:00+02:00", utc(2023, 6, 1, 12, 30, 0))]
    #[case::space_separated("2023-06-01 12:30:00", utc(2023, 6, 1, 12, 30, 0))]
    #[case::fractional("2023-06-01 12:30:00.123456", utc(2023, 6, 1, 12, 30, 0) + chrono::Duration::microseconds(123_456))]
    #[case::space_with_offset("2023-06-01 12:30:00+00:00", utc(2023, 6, 1, 12, 30, 0))]
    #[case::bare_date("2023-06-01", utc(2023, 6, 1, 0, 0, 0))]
    fn parses_dump_timestamps(#[case] raw: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_timestamp(raw), Some(expected));
    }

    #[rstest]
    #[case::words("last tuesday")]
    #[case::empty("")]
    #[case::bad_month("2023-13-01")]
    fn rejects_garbage_timestamps(#[case] raw: &str) {
        assert_eq!(parse_timestamp(raw), None);
    }

    #[test]
    fn round_trips_core_relations() {
        let store = SqliteStore::in_memory().expect("store");
        let uploaded = utc(2024, 1, 7, 9, 0, 0);
        store
            .insert_packages(&[
                Package::new("a")
                    .with_downloads(10)
                    .with_last_uploaded_at(uploaded),
                Package::new("b"),
            ])
            .expect("insert packages");
        store
            .insert_deps(&[
                DependencyEdge::new("a", "b"),
                DependencyEdge::new("a", "pytest").with_extra("test"),
            ])
            .expect("insert deps");
        store
            .insert_maintainers(&[Maintainer::new("a", "alice")])
            .expect("insert maintainers");

        let packages = store.packages().expect("packages");
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].downloads, Some(10));
        assert_eq!(packages[0].last_uploaded_at, Some(uploaded));
        assert_eq!(packages[1].downloads, None);

        let deps = store.deps().expect("deps");
        assert_eq!(deps[1].extra.as_deref(), Some("test"));

        let maintainers = store.maintainers().expect("maintainers");
        assert_eq!(maintainers, vec![Maintainer::new("a", "alice")]);
    }

    #[test]
    fn missing_required_column_fails_fast() {
        let conn = Connection::open_in_memory().expect("connection");
        conn.execute_batch("CREATE TABLE deps (package_name TEXT, dep_name TEXT);")
            .expect("create");
        let store = SqliteStore {
            conn: Mutex::new(conn),
            path: None,
        };

        let err = store.deps().expect_err("extra column is required");

        assert!(matches!(
            err,
            Error::MissingColumn { ref relation, ref column } if relation == "deps" && column == "extra"
        ));
    }

    #[test]
    fn missing_relation_is_reported() {
        let store = SqliteStore {
            conn: Mutex::new(Connection::open_in_memory().expect("connection")),
            path: None,
        };

        let err = store.maintainers().expect_err("no maintainers table");

        assert!(matches!(err, Error::MissingRelation { ref relation } if relation == "maintainers"));
    }

    #[test]
    fn missing_optional_columns_read_as_null() {
        let conn = Connection::open_in_memory().expect("connection");
        conn.execute_batch(
            "CREATE TABLE packages (name TEXT, downloads INTEGER, last_uploaded_at TEXT);
             INSERT INTO packages VALUES ('solo', 3, NULL);",
        )
        .expect("create");
        let store = SqliteStore {
            conn: Mutex::new(conn),
            path: None,
        };

        let packages = store.packages().expect("optional columns may be absent");

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].version, None);
        assert!(!packages[0].yanked);
    }

    #[test]
    fn negative_downloads_are_invalid() {
        let conn = Connection::open_in_memory().expect("connection");
        conn.execute_batch(SCHEMA).expect("schema");
        conn.execute(
            "INSERT INTO packages (name, downloads) VALUES ('bad', -1)",
            [],
        )
        .expect("insert");
        let store = SqliteStore {
            conn: Mutex::new(conn),
            path: None,
        };

        let err = store.packages().expect_err("negative downloads");

        assert!(err.is_schema_error());
    }

    #[test]
    fn counts_skip_absent_relations() {
        let conn = Connection::open_in_memory().expect("connection");
        conn.execute_batch(
            "CREATE TABLE packages (name TEXT, downloads INTEGER, last_uploaded_at TEXT);
             INSERT INTO packages VALUES ('a', 1, NULL), ('b', 2, NULL);",
        )
        .expect("create");
        let store = SqliteStore {
            conn: Mutex::new(conn),
            path: None,
        };

        let counts = store.relation_counts().expect("counts");

        assert_eq!(counts.get(Relation::Packages), Some(2));
        assert_eq!(counts.get(Relation::Deps), None);
    }

    #[test]
    fn pushdown_handles_cycles() {
        let store = SqliteStore::in_memory().expect("store");
        store
            .insert_deps(&[
                DependencyEdge::new("A", "B"),
                DependencyEdge::new("B", "C"),
                DependencyEdge::new("C", "A"),
                DependencyEdge::new("A", "B"),
                DependencyEdge::new("A", "docs-theme").with_extra("docs"),
            ])
            .expect("insert deps");

        let pairs = store
            .transitive_closure(&VariantFilter::Default)
            .expect("pushdown")
            .expect("sqlite supports recursive queries");

        assert_eq!(pairs.len(), 9);
        assert!(!pairs.iter().any(|(_, dep)| dep == "docs-theme"));
    }

    #[test]
    fn pushdown_prefix_filter_binds_parameter() {
        let store = SqliteStore::in_memory().expect("store");
        store
            .insert_deps(&[
                DependencyEdge::new("app", "pytest").with_extra("testing"),
                DependencyEdge::new("pytest", "pluggy"),
                DependencyEdge::new("pytest", "iniconfig").with_extra("test"),
            ])
            .expect("insert deps");

        let pairs = store
            .transitive_closure(&VariantFilter::Prefix("test".into()))
            .expect("pushdown")
            .expect("supported");

        assert_eq!(
            pairs,
            vec![
                ("app".to_string(), "iniconfig".to_string()),
                ("app".to_string(), "pytest".to_string()),
                ("pytest".to_string(), "iniconfig".to_string()),
            ]
        );
    }
}
