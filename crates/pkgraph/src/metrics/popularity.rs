//! Download and release-time metrics.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use super::{Ranked, rank_counts};
use crate::projection::{Cell, TableRow};
use crate::types::{Maintainer, Package};

/// Headline figures of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Most recent `last_uploaded_at`
    pub latest_upload: Option<DateTime<Utc>>,
    /// Distinct package names
    pub total_packages: u64,
    /// Smallest download count above zero
    pub min_positive_downloads: Option<u64>,
    /// Largest download count
    pub max_downloads: Option<u64>,
}

impl TableRow for Summary {
    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.latest_upload),
            Cell::Int(self.total_packages),
            Cell::from(self.min_positive_downloads),
            Cell::from(self.max_downloads),
        ]
    }
}

/// Number of packages last uploaded on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// Weekday, 0 = Sunday through 6 = Saturday
    pub day: u32,
    /// Packages
    pub count: u64,
}

impl TableRow for DayCount {
    fn cells(&self) -> Vec<Cell> {
        vec![Cell::Int(u64::from(self.day)), Cell::Int(self.count)]
    }
}

/// Headline figures: latest upload, distinct packages, download range.
#[must_use]
pub fn summary(packages: &[Package]) -> Summary {
    let names: HashSet<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    let downloads = packages.iter().filter_map(|p| p.downloads);

    Summary {
        latest_upload: packages.iter().filter_map(|p| p.last_uploaded_at).max(),
        total_packages: names.len() as u64,
        min_positive_downloads: downloads.clone().filter(|&d| d > 0).min(),
        max_downloads: downloads.max(),
    }
}

/// Histogram of last-upload weekdays, ordered by day.
///
/// Packages without an upload time are skipped. Days with no uploads are
/// absent.
#[must_use]
pub fn release_days(packages: &[Package]) -> Vec<DayCount> {
    let mut days: BTreeMap<u32, u64> = BTreeMap::new();
    for at in packages.iter().filter_map(|p| p.last_uploaded_at) {
        *days.entry(at.weekday().num_days_from_sunday()).or_insert(0) += 1;
    }

    days.into_iter()
        .map(|(day, count)| DayCount { day, count })
        .collect()
}

/// Packages ranked by total downloads.
///
/// Rows sharing a name are summed. Names whose downloads are all unknown are
/// left out.
#[must_use]
pub fn top_packages_by_downloads(packages: &[Package], limit: usize) -> Vec<Ranked> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for package in packages {
        if let Some(downloads) = package.downloads {
            let total = totals.entry(package.name.as_str()).or_insert(0);
            *total = total.saturating_add(downloads);
        }
    }
    rank_counts(totals, limit)
}

/// Maintainers ranked by the summed downloads of the packages they maintain.
///
/// A maintainer row joins every package row with the same name. Maintainers
/// with no joined downloads are left out.
#[must_use]
pub fn top_maintainers_by_downloads(
    maintainers: &[Maintainer],
    packages: &[Package],
    limit: usize,
) -> Vec<Ranked> {
    let mut downloads_by_package: HashMap<&str, Vec<u64>> = HashMap::new();
    for package in packages {
        if let Some(downloads) = package.downloads {
            downloads_by_package
                .entry(package.name.as_str())
                .or_default()
                .push(downloads);
        }
    }

    let mut totals: HashMap<&str, u64> = HashMap::new();
    for maintainer in maintainers {
        let Some(joined) = downloads_by_package.get(maintainer.package_name.as_str()) else {
            continue;
        };
        let total = totals.entry(maintainer.name.as_str()).or_insert(0);
        for &downloads in joined {
            *total = total.saturating_add(downloads);
        }
    }
    rank_counts(totals, limit)
}
