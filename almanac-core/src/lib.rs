//! Core of the almanac calendar.
//!
//! Turns daily almanac records and four side tables into one .ics document:
//! - `side_table`, `sanitize`, `enrich` and `description` decide what each
//!   day's description says
//! - `builder` maps a day onto a calendar event
//! - `ics` assembles and serializes the document
//! - `ingest`, `settings` and `pipeline` drive a complete run

pub mod almanac;
pub mod builder;
pub mod constants;
pub mod description;
pub mod enrich;
pub mod error;
pub mod event;
pub mod ics;
pub mod ingest;
pub mod pipeline;
pub mod sanitize;
pub mod settings;
pub mod side_table;

pub use error::{AlmanacError, AlmanacResult};
