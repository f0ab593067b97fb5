//! Calendar document assembly and .ics serialization (RFC 5545).

mod document;
mod generate;

pub use document::{CalendarDocument, CalendarMetadata, FixedTimezone};
pub use generate::generate_ics;
