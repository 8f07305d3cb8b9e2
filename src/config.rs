//! Store configuration.
//!
//! By default deleted columns leave their values behind in rows, and rows may
//! carry keys that no column defines. Both are switchable.

use std::{path::PathBuf, str::FromStr};

use strum::{Display, EnumString};
use tracing::warn;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "SHEET_DATA_DIR";

/// Environment variable selecting the [`OrphanPolicy`].
pub const ORPHANS_ENV: &str = "SHEET_ORPHANS";

/// Environment variable selecting the [`UnknownColumnPolicy`].
pub const UNKNOWN_COLUMNS_ENV: &str = "SHEET_UNKNOWN_COLUMNS";

const DEFAULT_DATA_DIR: &str = "./sheet-data";

/// What happens to row values when their column is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OrphanPolicy {
    /// Rows keep the value under the deleted column's name.
    #[default]
    Retain,

    /// The key is stripped from every row.
    Prune,
}

/// Whether rows may hold keys that no schema column defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UnknownColumnPolicy {
    #[default]
    Allow,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub orphans: OrphanPolicy,
    pub unknown_columns: UnknownColumnPolicy,

    /// Where [`crate::storage::FileStorage`] keeps its files. Unused by
    /// in-memory stores.
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            orphans: OrphanPolicy::default(),
            unknown_columns: UnknownColumnPolicy::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl StoreConfig {
    /// Builds a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults. Unparsable policy names are
    /// logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(policy) = parse_var(&lookup, ORPHANS_ENV) {
            config.orphans = policy;
        }
        if let Some(policy) = parse_var(&lookup, UNKNOWN_COLUMNS_ENV) {
            config.unknown_columns = policy;
        }

        config
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_orphans(mut self, orphans: OrphanPolicy) -> Self {
        self.orphans = orphans;
        self
    }

    pub fn with_unknown_columns(mut self, unknown_columns: UnknownColumnPolicy) -> Self {
        self.unknown_columns = unknown_columns;
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unrecognised setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.orphans, OrphanPolicy::Retain);
        assert_eq!(config.unknown_columns, UnknownColumnPolicy::Allow);
        assert_eq!(config.data_dir, PathBuf::from("./sheet-data"));
    }

    #[test]
    fn test_reads_variables() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (DATA_DIR_ENV, "/tmp/sheets"),
            (ORPHANS_ENV, "Prune"),
            (UNKNOWN_COLUMNS_ENV, "reject"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/sheets"));
        assert_eq!(config.orphans, OrphanPolicy::Prune);
        assert_eq!(config.unknown_columns, UnknownColumnPolicy::Reject);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (ORPHANS_ENV, "shred"),
            (DATA_DIR_ENV, ""),
        ]));
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = StoreConfig::default()
            .with_orphans(OrphanPolicy::Prune)
            .with_unknown_columns(UnknownColumnPolicy::Reject)
            .with_data_dir("data");
        assert_eq!(config.orphans, OrphanPolicy::Prune);
        assert_eq!(config.unknown_columns, UnknownColumnPolicy::Reject);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }
}
