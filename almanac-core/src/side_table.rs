//! Read-only lookup tables loaded once per run.
//!
//! A table that cannot be read or parsed comes back empty with its failure
//! recorded. Missing enrichment is never fatal.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{
    SCHEDULE_DATE_FIELD, SCHEDULE_KEY, SCHEDULE_TERM_FIELD, SCHEDULE_TEXT_FIELD,
};
use crate::error::{AlmanacError, AlmanacResult};

/// Separator used when one schedule file lists the same key twice.
const DUPLICATE_SEPARATOR: &str = "；";

/// A string-to-string mapping, iterated in key order.
#[derive(Debug, Default)]
pub struct SideTable {
    entries: BTreeMap<String, String>,
    failure: Option<AlmanacError>,
}

impl SideTable {
    /// Build a table directly from entries. Later duplicates are appended to
    /// earlier ones.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = SideTable::default();
        for (key, value) in entries {
            table.insert(key.into(), value.into());
        }
        table
    }

    /// Load a `{"祭祀日程": [{<key_field>: .., "节庆": ..}, ..]}` file.
    pub fn load_schedule(path: &Path, key_field: &str) -> Self {
        Self::load_with(path, |doc| parse_schedule(path, doc, key_field))
    }

    /// Load a flat `{"key": "value"}` file.
    pub fn load_flat(path: &Path) -> Self {
        Self::load_with(path, |doc| parse_flat(path, doc))
    }

    fn load_with(
        path: &Path,
        parse: impl FnOnce(Value) -> AlmanacResult<SideTable>,
    ) -> Self {
        let result = read_json(path).and_then(parse);

        match result {
            Ok(table) => {
                debug!(path = %path.display(), entries = table.len(), "loaded side table");
                table
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "side table unavailable, skipping its enrichment");
                SideTable {
                    entries: BTreeMap::new(),
                    failure: Some(e),
                }
            }
        }
    }

    fn insert(&mut self, key: String, value: String) {
        self.entries
            .entry(key)
            .and_modify(|existing| {
                existing.push_str(DUPLICATE_SEPARATOR);
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// False when the backing file was missing or malformed.
    pub fn is_available(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failure(&self) -> Option<&AlmanacError> {
        self.failure.as_ref()
    }
}

/// The four side tables used for enrichment.
#[derive(Debug, Default)]
pub struct SideTables {
    /// Lunar date key (`腊月初八`) to festival text
    pub festivals: SideTable,
    /// Solar term name to ritual text
    pub solar_terms: SideTable,
    /// Deity date to deity text
    pub deities: SideTable,
    /// `YYYY-MM-DD` to stems-and-branches label
    pub ganzhi: SideTable,
}

/// Where each side table lives on disk.
#[derive(Debug, Clone)]
pub struct SideTablePaths {
    pub festivals: PathBuf,
    pub solar_terms: PathBuf,
    pub deities: PathBuf,
    pub ganzhi: PathBuf,
}

impl SideTables {
    pub fn load(paths: &SideTablePaths) -> Self {
        SideTables {
            festivals: SideTable::load_schedule(&paths.festivals, SCHEDULE_DATE_FIELD),
            solar_terms: SideTable::load_schedule(&paths.solar_terms, SCHEDULE_TERM_FIELD),
            deities: SideTable::load_schedule(&paths.deities, SCHEDULE_DATE_FIELD),
            ganzhi: SideTable::load_flat(&paths.ganzhi),
        }
    }

    /// Number of tables that failed to load.
    pub fn failure_count(&self) -> usize {
        [&self.festivals, &self.solar_terms, &self.deities, &self.ganzhi]
            .iter()
            .filter(|t| !t.is_available())
            .count()
    }
}

fn read_json(path: &Path) -> AlmanacResult<Value> {
    let bytes = std::fs::read(path).map_err(|e| AlmanacError::missing(path, Some(e)))?;
    serde_json::from_slice(&bytes).map_err(|e| AlmanacError::malformed(path, e))
}

fn parse_schedule(path: &Path, doc: Value, key_field: &str) -> AlmanacResult<SideTable> {
    let Some(Value::Array(rows)) = doc.get(SCHEDULE_KEY) else {
        return Err(AlmanacError::malformed(
            path,
            format!("missing array `{}`", SCHEDULE_KEY),
        ));
    };

    let mut table = SideTable::default();
    for (i, row) in rows.iter().enumerate() {
        let key = row.get(key_field).and_then(Value::as_str);
        let text = row.get(SCHEDULE_TEXT_FIELD).and_then(Value::as_str);

        match (key, text) {
            (Some(key), Some(text)) => table.insert(key.to_string(), text.to_string()),
            _ => warn!(path = %path.display(), row = i, "skipping side table row without `{}`/`{}`", key_field, SCHEDULE_TEXT_FIELD),
        }
    }

    Ok(table)
}

fn parse_flat(path: &Path, doc: Value) -> AlmanacResult<SideTable> {
    let Value::Object(map) = doc else {
        return Err(AlmanacError::malformed(path, "expected a JSON object"));
    };

    let mut table = SideTable::default();
    for (key, value) in map {
        match value {
            Value::String(text) => table.insert(key, text),
            _ => warn!(path = %path.display(), key = %key, "skipping non-string side table value"),
        }
    }

    Ok(table)
}
