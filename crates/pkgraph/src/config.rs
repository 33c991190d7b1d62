//! Analysis configuration.
//!
//! Everything the metrics take as a parameter rather than as data: the extra
//! filter for the transitive graph, the top-N cap, the club ignore-list and
//! window, the prefix maintainer count, and the single-value lookup targets.
//! Loaded from YAML; any subset of keys may be given.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::edges::VariantFilter;
use crate::error::{Error, Result};

/// Default name of the configuration file
pub const CONFIG_FILE_NAME: &str = "pkgraph.yaml";

/// Default cap for every top-N metric
pub const DEFAULT_TOP_N: usize = 1000;

/// Default rolling window for club detection, in days
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// Largest accepted club window, in days.
///
/// Keeps `now - window` inside the range `chrono` can represent.
pub const MAX_WINDOW_DAYS: u32 = 365 * 200_000;

/// Maintainer count selecting packages for the common-prefix metric.
///
/// Kept as found in the dataset analysis it came from; likely specific to that
/// dataset rather than a general rule.
pub const DEFAULT_PREFIX_MAINTAINER_COUNT: usize = 12;

/// Name prefixes excluded from club detection by default.
///
/// Their package volume would otherwise dominate the result.
pub const DEFAULT_IGNORE_PREFIXES: [&str; 6] =
    ["zope", "zc", "z3c", "collective", "plone", "products"];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Source database path (used by the command line only)
    pub database: Option<PathBuf>,

    /// Cap for every top-N metric
    pub top_n: usize,

    /// Transitive closure settings
    pub closure: ClosureConfig,

    /// Club detection settings
    pub clubs: ClubConfig,

    /// Common-prefix settings
    pub prefixes: PrefixConfig,

    /// Single-value lookup targets
    pub lookup: LookupConfig,
}

/// Transitive closure section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosureConfig {
    /// Which dependency rows form the transitive graph
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub extra: VariantFilter,
}

/// Club detection section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubConfig {
    /// Package name prefixes to leave out
    pub ignore_prefixes: Vec<String>,

    /// Only packages uploaded within this many days count
    pub window_days: u32,
}

/// Common-prefix section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixConfig {
    /// Exact maintainer count a package must have
    pub maintainer_count: usize,
}

/// Lookup targets for the single-value metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Package whose dependents and transitive dependencies are listed
    pub package: String,

    /// Maintainer whose packages are listed
    pub maintainer: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            database: None,
            top_n: DEFAULT_TOP_N,
            closure: ClosureConfig::default(),
            clubs: ClubConfig::default(),
            prefixes: PrefixConfig::default(),
            lookup: LookupConfig::default(),
        }
    }
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            ignore_prefixes: DEFAULT_IGNORE_PREFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            maintainer_count: DEFAULT_PREFIX_MAINTAINER_COUNT,
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            package: "ibis-framework".to_string(),
            maintainer: "jcrist".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the YAML is malformed or a value is out of
    /// range.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if its contents are invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Render the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::Config("top_n must be at least 1".to_string()));
        }
        if self.clubs.window_days == 0 {
            return Err(Error::Config(
                "clubs.window_days must be at least 1".to_string(),
            ));
        }
        if self.clubs.window_days > MAX_WINDOW_DAYS {
            return Err(Error::Config(format!(
                "clubs.window_days must be at most {MAX_WINDOW_DAYS}"
            )));
        }
        if self.clubs.ignore_prefixes.iter().any(|p| p.is_empty()) {
            return Err(Error::Config(
                "clubs.ignore_prefixes must not contain empty strings".to_string(),
            ));
        }
        if self.prefixes.maintainer_count == 0 {
            return Err(Error::Config(
                "prefixes.maintainer_count must be at least 1".to_string(),
            ));
        }
        match &self.closure.extra {
            VariantFilter::Exact(name) | VariantFilter::Prefix(name) if name.is_empty() => Err(
                Error::Config("closure.extra must name a non-empty extra".to_string()),
            ),
            _ => Ok(()),
        }
    }
}
