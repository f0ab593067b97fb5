//! Turn almanac day records into calendar events.

use chrono::{DateTime, Days, NaiveTime, TimeDelta, Utc};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::almanac::AlmanacDay;
use crate::constants::{SUMMARY_PREFIX, TZID, UID_SUFFIX};
use crate::description::compose;
use crate::enrich::{EnrichmentLevel, EnrichmentResolver};
use crate::error::{AlmanacError, AlmanacResult};
use crate::event::{CalendarEvent, EventStatus, EventTime, Transparency};
use crate::side_table::SideTables;

/// Shape of each generated event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventShape {
    /// Whole local day, end date exclusive
    AllDay,
    /// Fixed local time of day with an explicit duration
    Timed { start: NaiveTime, duration: Duration },
}

/// Counts for one batch of records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub built: usize,
    pub skipped: usize,
}

impl std::ops::AddAssign for BuildStats {
    fn add_assign(&mut self, other: Self) {
        self.built += other.built;
        self.skipped += other.skipped;
    }
}

pub struct DayEventBuilder<'a> {
    resolver: EnrichmentResolver<'a>,
    shape: EventShape,
    /// Injected clock for CREATED and LAST-MODIFIED
    now: DateTime<Utc>,
}

impl<'a> DayEventBuilder<'a> {
    pub fn new(
        tables: &'a SideTables,
        level: EnrichmentLevel,
        shape: EventShape,
        now: DateTime<Utc>,
    ) -> Self {
        DayEventBuilder {
            resolver: EnrichmentResolver::new(tables, level),
            shape,
            now,
        }
    }

    pub fn build(&self, day: &AlmanacDay) -> AlmanacResult<CalendarEvent> {
        let enrichment = self.resolver.resolve(day);
        let description = compose(day, &enrichment);
        let date = day.local_date();

        let (start, end) = match &self.shape {
            EventShape::AllDay => {
                let next = date.checked_add_days(Days::new(1)).ok_or_else(|| {
                    AlmanacError::RecordInvalid(format!("no day after {}", date))
                })?;
                (EventTime::Date(date), EventTime::Date(next))
            }
            EventShape::Timed { start, duration } => {
                let start = date.and_time(*start);
                let end = TimeDelta::from_std(*duration)
                    .ok()
                    .and_then(|d| start.checked_add_signed(d))
                    .ok_or_else(|| {
                        AlmanacError::RecordInvalid(format!("event on {} ends out of range", date))
                    })?;
                (zoned(start), zoned(end))
            }
        };

        Ok(CalendarEvent {
            uid: format!("{}{}", date.format("%Y%m%d"), UID_SUFFIX),
            summary: format!("{}{}", SUMMARY_PREFIX, day.lunar_date()),
            description,
            start,
            end,
            timestamp: day.instant(),
            created: self.now,
            last_modified: self.now,
            sequence: 0,
            status: EventStatus::Confirmed,
            transparency: Transparency::Transparent,
        })
    }

    /// Decode and build one raw record.
    pub fn build_record(&self, record: &Value) -> AlmanacResult<CalendarEvent> {
        let day = AlmanacDay::from_value(record)?;
        self.build(&day)
    }

    /// Build every record of one file, skipping (and logging) the bad ones.
    pub fn build_records(
        &self,
        source: &Path,
        records: &[Value],
        mut emit: impl FnMut(CalendarEvent),
    ) -> BuildStats {
        let mut stats = BuildStats::default();

        for (index, record) in records.iter().enumerate() {
            match self.build_record(record) {
                Ok(event) => {
                    emit(event);
                    stats.built += 1;
                }
                Err(e) => {
                    warn!(path = %source.display(), index, error = %e, "skipping almanac record");
                    stats.skipped += 1;
                }
            }
        }

        stats
    }
}

fn zoned(datetime: chrono::NaiveDateTime) -> EventTime {
    EventTime::DateTimeZoned {
        datetime,
        tzid: TZID.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::side_table::SideTable;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    fn make_test_record() -> Value {
        json!({
            "timestamp": 1735689600,
            "lMonth": "腊",
            "lDate": "初一",
            "suit": "祭祀",
            "avoid": "安床"
        })
    }

    #[test]
    fn test_build_all_day_event() {
        let tables = SideTables::default();
        let builder =
            DayEventBuilder::new(&tables, EnrichmentLevel::Full, EventShape::AllDay, fixed_now());

        let event = builder.build_record(&make_test_record()).unwrap();

        assert_eq!(event.uid, "20250101_jr@zqzess");
        assert_eq!(event.summary, "★黄历★:腊月初一");
        assert_eq!(
            event.start,
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        );
        assert_eq!(
            event.end,
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap())
        );
        assert_eq!(event.timestamp, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(event.created, fixed_now());
        assert_eq!(event.last_modified, fixed_now());
        assert_eq!(event.status, EventStatus::Confirmed);
        assert_eq!(event.transparency, Transparency::Transparent);
    }

    #[test]
    fn test_end_to_end_description_without_side_tables() {
        // Unavailable tables, not just empty ones
        let dir = tempfile::TempDir::new().unwrap();
        let tables = SideTables {
            festivals: SideTable::load_schedule(&dir.path().join("a.json"), "日期"),
            solar_terms: SideTable::load_schedule(&dir.path().join("b.json"), "节气"),
            deities: SideTable::load_schedule(&dir.path().join("c.json"), "日期"),
            ganzhi: SideTable::load_flat(&dir.path().join("d.json")),
        };
        let builder =
            DayEventBuilder::new(&tables, EnrichmentLevel::Full, EventShape::AllDay, fixed_now());

        let event = builder.build_record(&make_test_record()).unwrap();
        let lines: Vec<&str> = event.description.lines().collect();

        assert_eq!(event.summary, "★黄历★:腊月初一");
        assert_eq!(
            lines,
            vec!["📅 **农历**: 腊月初一", "✅ **宜**: 祭祀", "❌ **忌**: 安床"]
        );
    }

    #[test]
    fn test_build_timed_event() {
        let tables = SideTables::default();
        let shape = EventShape::Timed {
            start: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            duration: Duration::from_secs(30 * 60),
        };
        let builder = DayEventBuilder::new(&tables, EnrichmentLevel::Full, shape, fixed_now());

        let event = builder.build_record(&make_test_record()).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        assert_eq!(
            event.start,
            EventTime::DateTimeZoned {
                datetime: day.and_hms_opt(8, 30, 0).unwrap(),
                tzid: "Asia/Shanghai".to_string(),
            }
        );
        assert_eq!(
            event.end,
            EventTime::DateTimeZoned {
                datetime: day.and_hms_opt(9, 0, 0).unwrap(),
                tzid: "Asia/Shanghai".to_string(),
            }
        );
    }

    #[test]
    fn test_uid_depends_only_on_date() {
        let tables = SideTables::default();
        let builder =
            DayEventBuilder::new(&tables, EnrichmentLevel::Full, EventShape::AllDay, fixed_now());

        // Same Shanghai date, different instants and lunar text
        let morning = json!({ "timestamp": 1735660800, "lMonth": "腊", "suit": "", "avoid": "" });
        let evening = json!({ "timestamp": "1735732800", "lMonth": "冬", "suit": "x", "avoid": "y" });

        let a = builder.build_record(&morning).unwrap();
        let b = builder.build_record(&evening).unwrap();
        assert_eq!(a.uid, b.uid);
        assert_eq!(a.uid, "20250101_jr@zqzess");
    }

    #[test]
    fn test_build_records_skips_invalid_and_keeps_the_rest() {
        let tables = SideTables::default();
        let builder =
            DayEventBuilder::new(&tables, EnrichmentLevel::Full, EventShape::AllDay, fixed_now());

        let records = vec![
            json!({ "timestamp": "1735689600", "suit": "祭祀", "avoid": "安床" }),
            json!({ "suit": "祭祀", "avoid": "安床" }),
            json!({ "timestamp": "not-a-number", "suit": "祭祀", "avoid": "安床" }),
            json!({ "timestamp": "1735776000", "suit": "祭祀", "avoid": "安床" }),
            json!({ "timestamp": "1735862400", "avoid": "安床" }),
        ];

        let mut events = Vec::new();
        let stats = builder.build_records(Path::new("2025/1.json"), &records, |e| events.push(e));

        assert_eq!(stats, BuildStats { built: 2, skipped: 3 });
        let uids: Vec<_> = events.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(uids, vec!["20250101_jr@zqzess", "20250102_jr@zqzess"]);
    }
}
