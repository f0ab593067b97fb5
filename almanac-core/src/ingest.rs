//! Discovery of per-year almanac shards under `base/<year>/*.json`.

use std::path::{Path, PathBuf};

use crate::error::{AlmanacError, AlmanacResult};

/// JSON files of one year, sorted by file name.
///
/// With `exclude_aggregate`, `<year>.json` is left out because it repeats
/// the days of the other files.
pub fn year_files(base: &Path, year: i32, exclude_aggregate: bool) -> AlmanacResult<Vec<PathBuf>> {
    let year_dir = base.join(year.to_string());

    let entries = std::fs::read_dir(&year_dir).map_err(|e| AlmanacError::missing(&year_dir, Some(e)))?;

    let aggregate_stem = year.to_string();
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter(|path| {
            !exclude_aggregate
                || path.file_stem().and_then(|s| s.to_str()) != Some(aggregate_stem.as_str())
        })
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Read one shard, reporting an unreadable file as missing.
pub fn read_shard(path: &Path) -> AlmanacResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| AlmanacError::missing(path, Some(e)))
}
