//! Calendar event types produced for each almanac day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A synthesized calendar event (one per almanac day)
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    /// Derived from the local date only, so re-runs keep the same key
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    /// DTSTAMP: the day's own instant
    pub timestamp: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub sequence: i64,
    pub status: EventStatus,
    pub transparency: Transparency,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    /// All-day value (VALUE=DATE)
    Date(NaiveDate),
    /// Local wall-clock time with a TZID parameter
    DateTimeZoned {
        datetime: NaiveDateTime,
        tzid: String,
    },
}

/// Almanac days are always published as confirmed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventStatus {
    Confirmed,
}

impl EventStatus {
    pub fn as_ics_str(&self) -> &'static str {
        match self {
            EventStatus::Confirmed => "CONFIRMED",
        }
    }
}

/// Event transparency (busy/free status)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transparency {
    /// Event blocks time on calendar
    Opaque,
    /// Event does not block time (shows as free)
    Transparent,
}

impl Transparency {
    pub fn as_ics_str(&self) -> &'static str {
        match self {
            Transparency::Opaque => "OPAQUE",
            Transparency::Transparent => "TRANSPARENT",
        }
    }
}
