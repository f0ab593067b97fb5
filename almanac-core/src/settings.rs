//! Run configuration.
//!
//! Built-in defaults, then an optional TOML file, then whatever the caller
//! overrides (the CLI flags).

use chrono::NaiveTime;
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::builder::EventShape;
use crate::constants::{
    DEFAULT_BASE_PATH, DEFAULT_CALENDAR_NAME, DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR,
};
use crate::enrich::EnrichmentLevel;
use crate::error::{AlmanacError, AlmanacResult};
use crate::side_table::SideTablePaths;

const DEFAULT_TIMED_START: &str = "08:30";
const DEFAULT_TIMED_DURATION: &str = "30m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    AllDay,
    Timed,
}

/// Configuration as written in config.toml. Paths left out are derived
/// from `base_path`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_path: PathBuf,
    pub first_year: i32,
    pub last_year: i32,
    pub output: Option<PathBuf>,

    pub festival_table: Option<PathBuf>,
    pub solar_term_table: Option<PathBuf>,
    pub deity_table: Option<PathBuf>,
    pub ganzhi_table: Option<PathBuf>,

    pub event_shape: ShapeKind,
    pub timed_start: String,
    pub timed_duration: String,
    pub enrichment: EnrichmentLevel,

    /// Skip `<year>/<year>.json`, which aggregates the other files of that year
    pub exclude_aggregate: bool,
    pub calendar_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
            output: None,
            festival_table: None,
            solar_term_table: None,
            deity_table: None,
            ganzhi_table: None,
            event_shape: ShapeKind::AllDay,
            timed_start: DEFAULT_TIMED_START.to_string(),
            timed_duration: DEFAULT_TIMED_DURATION.to_string(),
            enrichment: EnrichmentLevel::Full,
            exclude_aggregate: true,
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Default config file location (~/.config/almanac-cal/config.toml)
    pub fn config_path() -> AlmanacResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AlmanacError::Config("Could not determine config directory".into()))?
            .join("almanac-cal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> AlmanacResult<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| AlmanacError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AlmanacError::Config(e.to_string()))?;

        Ok(settings)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> AlmanacResult<()> {
        if self.first_year > self.last_year {
            return Err(AlmanacError::Config(format!(
                "first_year {} is after last_year {}",
                self.first_year, self.last_year
            )));
        }
        self.event_shape()?;
        Ok(())
    }

    /// `base_path` with `~` expanded.
    pub fn base_dir(&self) -> PathBuf {
        expand(&self.base_path)
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.first_year..=self.last_year
    }

    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => expand(path),
            None => self.base_dir().join(format!(
                "holidays_calendar_{}-{}.ics",
                self.first_year, self.last_year
            )),
        }
    }

    pub fn side_table_paths(&self) -> SideTablePaths {
        let base = self.base_dir();
        let resolve = |configured: &Option<PathBuf>, default: &str| match configured {
            Some(path) => expand(path),
            None => base.join(default),
        };

        SideTablePaths {
            festivals: resolve(&self.festival_table, "festivals.json"),
            solar_terms: resolve(&self.solar_term_table, "solar_terms.json"),
            deities: resolve(&self.deity_table, "deities.json"),
            ganzhi: resolve(&self.ganzhi_table, "ganzhi.json"),
        }
    }

    pub fn event_shape(&self) -> AlmanacResult<EventShape> {
        match self.event_shape {
            ShapeKind::AllDay => Ok(EventShape::AllDay),
            ShapeKind::Timed => {
                let start = NaiveTime::parse_from_str(self.timed_start.trim(), "%H:%M").map_err(
                    |_| {
                        AlmanacError::Config(format!(
                            "Invalid timed_start '{}'. Expected HH:MM",
                            self.timed_start
                        ))
                    },
                )?;
                let duration = humantime::parse_duration(self.timed_duration.trim()).map_err(
                    |e| {
                        AlmanacError::Config(format!(
                            "Invalid timed_duration '{}': {}",
                            self.timed_duration, e
                        ))
                    },
                )?;
                Ok(EventShape::Timed { start, duration })
            }
        }
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
