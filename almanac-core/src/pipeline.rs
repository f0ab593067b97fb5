//! One full run: side tables, shards, events, output file.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::almanac::records_from_document;
use crate::builder::{BuildStats, DayEventBuilder};
use crate::error::AlmanacResult;
use crate::ics::{CalendarDocument, CalendarMetadata};
use crate::ingest::{read_shard, year_files};
use crate::settings::Settings;
use crate::side_table::SideTables;

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output: PathBuf,
    pub events: usize,
    pub skipped_records: usize,
    pub skipped_files: usize,
    pub skipped_years: usize,
    pub missing_side_tables: usize,
}

/// Build the calendar document without writing it.
///
/// Only configuration errors are returned; everything below the document
/// level is logged and skipped.
pub fn build_document(
    settings: &Settings,
    now: DateTime<Utc>,
) -> AlmanacResult<(CalendarDocument, RunReport)> {
    settings.validate()?;
    let shape = settings.event_shape()?;

    let tables = SideTables::load(&settings.side_table_paths());
    let builder = DayEventBuilder::new(&tables, settings.enrichment, shape, now);

    let mut document = CalendarDocument::new(CalendarMetadata::new(&settings.calendar_name, now));
    let mut stats = BuildStats::default();
    let mut skipped_files = 0;
    let mut skipped_years = 0;

    let base = settings.base_dir();
    for year in settings.years() {
        let files = match year_files(&base, year, settings.exclude_aggregate) {
            Ok(files) => files,
            Err(e) => {
                warn!(year, error = %e, "skipping year");
                skipped_years += 1;
                continue;
            }
        };

        for path in files {
            debug!(path = %path.display(), "processing file");

            let records = match read_shard(&path).and_then(|bytes| records_from_document(&path, &bytes)) {
                Ok(records) => records,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    skipped_files += 1;
                    continue;
                }
            };

            stats += builder.build_records(&path, &records, |event| document.push(event));
        }
    }

    let report = RunReport {
        output: settings.output_path(),
        events: stats.built,
        skipped_records: stats.skipped,
        skipped_files,
        skipped_years,
        missing_side_tables: tables.failure_count(),
    };

    Ok((document, report))
}

/// Build the document and write it to the configured output path.
pub fn run(settings: &Settings, now: DateTime<Utc>) -> AlmanacResult<RunReport> {
    let (document, report) = build_document(settings, now)?;

    document.write_to(&report.output)?;

    info!(
        path = %report.output.display(),
        events = report.events,
        skipped_records = report.skipped_records,
        skipped_files = report.skipped_files,
        "calendar written"
    );

    Ok(report)
}
