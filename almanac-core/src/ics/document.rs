//! The one calendar document built per run.

use chrono::{DateTime, Utc};
use std::path::Path;

use crate::almanac::local_offset;
use crate::constants::{
    CALENDAR_DESCRIPTION_PREFIX, DEFAULT_CALENDAR_NAME, PRODID, TZ_OFFSET_SECONDS, TZID, TZNAME,
};
use crate::error::{AlmanacError, AlmanacResult};
use crate::event::CalendarEvent;

/// Calendar-level properties (X-WR-* and PRODID)
#[derive(Debug, Clone)]
pub struct CalendarMetadata {
    pub name: String,
    pub description: String,
    pub prodid: String,
}

impl CalendarMetadata {
    /// Metadata stamped with the run's clock, shown in Shanghai time.
    pub fn new(name: &str, now: DateTime<Utc>) -> Self {
        let updated = now.with_timezone(&local_offset()).format("%Y-%m-%d %H:%M:%S");
        CalendarMetadata {
            name: name.to_string(),
            description: format!("{}{}", CALENDAR_DESCRIPTION_PREFIX, updated),
            prodid: PRODID.to_string(),
        }
    }
}

impl Default for CalendarMetadata {
    fn default() -> Self {
        CalendarMetadata::new(DEFAULT_CALENDAR_NAME, DateTime::<Utc>::default())
    }
}

/// A fixed-offset VTIMEZONE with a single STANDARD rule and no daylight time.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimezone {
    pub tzid: String,
    pub name: String,
    pub offset_seconds: i32,
}

impl Default for FixedTimezone {
    fn default() -> Self {
        FixedTimezone {
            tzid: TZID.to_string(),
            name: TZNAME.to_string(),
            offset_seconds: TZ_OFFSET_SECONDS,
        }
    }
}

impl FixedTimezone {
    /// Content lines of the VTIMEZONE component, without line endings.
    pub fn lines(&self) -> Vec<String> {
        let offset = format_utc_offset(self.offset_seconds);
        vec![
            "BEGIN:VTIMEZONE".to_string(),
            format!("TZID:{}", self.tzid),
            "BEGIN:STANDARD".to_string(),
            format!("TZOFFSETFROM:{}", offset),
            format!("TZOFFSETTO:{}", offset),
            format!("TZNAME:{}", self.name),
            "DTSTART:19700101T000000".to_string(),
            "END:STANDARD".to_string(),
            "END:VTIMEZONE".to_string(),
        ]
    }
}

/// `+0800` style UTC offset.
fn format_utc_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60)
}

/// Timezone definition plus events in delivery order.
#[derive(Debug, Clone, Default)]
pub struct CalendarDocument {
    pub metadata: CalendarMetadata,
    pub timezone: FixedTimezone,
    events: Vec<CalendarEvent>,
}

impl CalendarDocument {
    pub fn new(metadata: CalendarMetadata) -> Self {
        CalendarDocument {
            metadata,
            timezone: FixedTimezone::default(),
            events: Vec::new(),
        }
    }

    /// Append an event. Events are never re-sorted.
    pub fn push(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn to_ics(&self) -> String {
        super::generate_ics(self)
    }

    /// Serialize and write the whole document in one go.
    pub fn write_to(&self, path: &Path) -> AlmanacResult<()> {
        let output_error = |source| AlmanacError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(output_error)?;
        }
        std::fs::write(path, self.to_ics()).map_err(output_error)?;

        Ok(())
    }
}
