//! Decide which side-table entries apply to one almanac day.

use serde::Deserialize;

use crate::almanac::{AlmanacDay, Festivals};
use crate::sanitize::sanitize;
use crate::side_table::{SideTable, SideTables};

/// Label used when the stems-and-branches table has no entry for a date.
pub const UNKNOWN_GANZHI: &str = "未知";

/// How much of the side-table data goes into each description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrichmentLevel {
    /// Festival names and the lunar festival table only
    FestivalOnly,
    /// Festivals plus solar terms, deities and stems-and-branches
    #[default]
    Full,
}

/// A note matched by substring against the day's festival text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    SolarTerm { term: String, text: String },
    Deity { date: String, text: String },
}

/// Everything resolved for one day, before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub festival_name: String,
    pub festival_detail: String,
    pub ganzhi: Option<String>,
    pub notes: Vec<Note>,
}

pub struct EnrichmentResolver<'a> {
    tables: &'a SideTables,
    level: EnrichmentLevel,
}

impl<'a> EnrichmentResolver<'a> {
    pub fn new(tables: &'a SideTables, level: EnrichmentLevel) -> Self {
        EnrichmentResolver { tables, level }
    }

    pub fn resolve(&self, day: &AlmanacDay) -> Enrichment {
        let festival_name = festival_name(&day.festivals);
        let festival_detail = self
            .tables
            .festivals
            .get(&day.lunar_date())
            .map(sanitize)
            .unwrap_or_default();

        if self.level == EnrichmentLevel::FestivalOnly {
            return Enrichment {
                festival_name,
                festival_detail,
                ganzhi: None,
                notes: Vec::new(),
            };
        }

        let ganzhi = self.ganzhi_label(day);

        let mut notes = Vec::new();
        // Both fields empty: nothing to match against
        if !festival_name.is_empty() || !festival_detail.is_empty() {
            for (term, text) in matching(&self.tables.solar_terms, &festival_name, &festival_detail) {
                notes.push(Note::SolarTerm { term, text });
            }
            for (date, text) in matching(&self.tables.deities, &festival_name, &festival_detail) {
                notes.push(Note::Deity { date, text });
            }
        }

        Enrichment {
            festival_name,
            festival_detail,
            ganzhi,
            notes,
        }
    }

    fn ganzhi_label(&self, day: &AlmanacDay) -> Option<String> {
        let table = &self.tables.ganzhi;
        if !table.is_available() {
            return None;
        }

        let key = day.local_date().format("%Y-%m-%d").to_string();
        let label = table.get(&key).map(str::trim).unwrap_or_default();

        if label.is_empty() {
            Some(UNKNOWN_GANZHI.to_string())
        } else {
            Some(label.to_string())
        }
    }
}

/// Comma-joined structured names, else the flat field, sanitized.
fn festival_name(festivals: &Festivals) -> String {
    let joined = match festivals {
        Festivals::Structured(names) => names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(","),
        Festivals::Flat(text) => text.clone(),
        Festivals::None => String::new(),
    };
    sanitize(&joined)
}

/// Entries whose key occurs in either field, in key order.
fn matching(table: &SideTable, name: &str, detail: &str) -> Vec<(String, String)> {
    table
        .iter()
        .filter(|(key, _)| !key.is_empty() && (name.contains(*key) || detail.contains(*key)))
        .map(|(key, text)| (key.to_string(), sanitize(text)))
        .filter(|(_, text)| !text.is_empty())
        .collect()
}
