//! ICS generation for the whole calendar document.

use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use super::document::{CalendarDocument, FixedTimezone};
use crate::event::{CalendarEvent, EventTime};

/// Generate the .ics content for a calendar document.
///
/// The icalendar crate writes the header and every VEVENT (escaping and
/// folding included); a post-processing pass then fixes PRODID and splices
/// in the VTIMEZONE block, which the crate has no component for.
pub fn generate_ics(document: &CalendarDocument) -> String {
    let mut cal = Calendar::new();

    let metadata = &document.metadata;
    cal.append_property(Property::new("METHOD", "PUBLISH"));
    cal.append_property(Property::new("X-WR-CALNAME", &metadata.name));
    cal.append_property(Property::new("X-WR-TIMEZONE", &document.timezone.tzid));
    cal.append_property(Property::new("X-WR-CALDESC", &metadata.description));

    for event in document.events() {
        cal.push(ics_event(event));
    }
    let cal = cal.done();

    post_process(&cal.to_string(), &metadata.prodid, &document.timezone)
}

fn ics_event(event: &CalendarEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);

    add_datetime_property(&mut ics_event, "DTSTART", &event.start);
    add_datetime_property(&mut ics_event, "DTEND", &event.end);

    // DTSTAMP - set explicitly so the crate never falls back to the wall clock
    ics_event.add_property("DTSTAMP", utc_stamp(&event.timestamp));
    ics_event.add_property("CREATED", utc_stamp(&event.created));
    ics_event.add_property("LAST-MODIFIED", utc_stamp(&event.last_modified));
    ics_event.add_property("SEQUENCE", event.sequence.to_string());

    if !event.description.is_empty() {
        ics_event.description(&event.description);
    }

    ics_event.add_property("STATUS", event.status.as_ics_str());
    ics_event.add_property("TRANSP", event.transparency.as_ics_str());

    ics_event.done()
}

fn utc_stamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Add a datetime property with proper formatting based on EventTime variant
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventTime::DateTimeZoned { datetime, tzid } => {
            let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
            prop.add_parameter("TZID", tzid);
            ics_event.append_property(prop);
        }
    }
}

/// Clean up the icalendar crate's output
/// - Replace PRODID with ours
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Insert the VTIMEZONE block before the first VEVENT (or before the end
///   of an empty calendar)
fn post_process(ics: &str, prodid: &str, timezone: &FixedTimezone) -> String {
    let mut result = String::with_capacity(ics.len() + 256);
    let mut timezone_written = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            push_line(&mut result, &format!("PRODID:{}", prodid));
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if !timezone_written && (line == "BEGIN:VEVENT" || line == "END:VCALENDAR") {
            for tz_line in timezone.lines() {
                push_line(&mut result, &tz_line);
            }
            timezone_written = true;
        }

        push_line(&mut result, line);
    }

    result
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str("\r\n");
}
