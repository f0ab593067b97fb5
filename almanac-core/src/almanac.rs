//! Almanac day records as delivered by the per-year JSON shards.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::constants::{ALMANAC_POINTER, TZ_OFFSET_SECONDS};
use crate::error::{AlmanacError, AlmanacResult};

/// One date's traditional-calendar record.
#[derive(Debug, Clone, PartialEq)]
pub struct AlmanacDay {
    pub epoch_seconds: i64,
    pub lunar_month: String,
    pub lunar_day: String,
    pub festivals: Festivals,
    pub suitable: String,
    pub avoid: String,
}

/// Festival information in whichever shape the source used.
#[derive(Debug, Clone, PartialEq)]
pub enum Festivals {
    /// Names taken from `festivalInfoList`
    Structured(Vec<String>),
    /// The flat `festivalList` field
    Flat(String),
    None,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAlmanacDay {
    timestamp: Option<RawTimestamp>,
    #[serde(rename = "lMonth", default)]
    l_month: String,
    #[serde(rename = "lDate", default)]
    l_date: String,
    festival_info_list: Option<Vec<RawFestivalInfo>>,
    festival_list: Option<RawFestivalList>,
    suit: Option<String>,
    avoid: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
struct RawFestivalInfo {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFestivalList {
    Text(String),
    Names(Vec<String>),
}

impl AlmanacDay {
    /// Decode one raw record. Any missing required field or wrong type is
    /// reported as `RecordInvalid`.
    pub fn from_value(record: &Value) -> AlmanacResult<Self> {
        let raw = RawAlmanacDay::deserialize(record)
            .map_err(|e| AlmanacError::RecordInvalid(e.to_string()))?;

        let epoch_seconds = match raw.timestamp {
            Some(RawTimestamp::Number(n)) => n,
            Some(RawTimestamp::Text(s)) => s.trim().parse::<i64>().map_err(|_| {
                AlmanacError::RecordInvalid(format!("non-numeric timestamp '{}'", s))
            })?,
            None => return Err(AlmanacError::RecordInvalid("missing field `timestamp`".into())),
        };

        // Reject values chrono cannot place on a calendar
        if DateTime::<Utc>::from_timestamp(epoch_seconds, 0).is_none() {
            return Err(AlmanacError::RecordInvalid(format!(
                "timestamp {} out of range",
                epoch_seconds
            )));
        }

        let suitable = raw
            .suit
            .ok_or_else(|| AlmanacError::RecordInvalid("missing field `suit`".into()))?;
        let avoid = raw
            .avoid
            .ok_or_else(|| AlmanacError::RecordInvalid("missing field `avoid`".into()))?;

        let festivals = match (raw.festival_info_list, raw.festival_list) {
            (Some(list), _) => Festivals::Structured(list.into_iter().map(|f| f.name).collect()),
            (None, Some(RawFestivalList::Text(s))) => Festivals::Flat(s),
            (None, Some(RawFestivalList::Names(names))) => Festivals::Flat(names.join(",")),
            (None, None) => Festivals::None,
        };

        Ok(AlmanacDay {
            epoch_seconds,
            lunar_month: raw.l_month,
            lunar_day: raw.l_date,
            festivals,
            suitable,
            avoid,
        })
    }

    /// The day's instant in UTC.
    pub fn instant(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.epoch_seconds, 0).unwrap_or_default()
    }

    /// The calendar date in the fixed UTC+8 zone.
    pub fn local_date(&self) -> NaiveDate {
        self.instant().with_timezone(&local_offset()).date_naive()
    }

    /// Lunar date as written in the summary and used as festival key, e.g. `腊月初一`.
    pub fn lunar_date(&self) -> String {
        format!("{}月{}", self.lunar_month, self.lunar_day)
    }
}

/// UTC+8.
pub fn local_offset() -> FixedOffset {
    FixedOffset::east_opt(TZ_OFFSET_SECONDS).expect("UTC+8 is a valid offset")
}

/// Extract the raw day records from one shard.
///
/// Invalid JSON or a missing almanac path makes the whole file malformed.
pub fn records_from_document(path: &Path, bytes: &[u8]) -> AlmanacResult<Vec<Value>> {
    let doc: Value = serde_json::from_slice(bytes).map_err(|e| AlmanacError::malformed(path, e))?;

    match doc.pointer(ALMANAC_POINTER) {
        Some(Value::Array(records)) => Ok(records.clone()),
        Some(_) => Err(AlmanacError::malformed(path, "almanac is not an array")),
        None => Err(AlmanacError::malformed(
            path,
            format!("missing {}", ALMANAC_POINTER),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_accepts_string_timestamp() {
        let record = json!({
            "timestamp": "1735689600",
            "lMonth": "腊",
            "lDate": "初一",
            "suit": "祭祀",
            "avoid": "安床"
        });

        let day = AlmanacDay::from_value(&record).unwrap();
        assert_eq!(day.epoch_seconds, 1735689600);
        assert_eq!(day.lunar_date(), "腊月初一");
        assert_eq!(day.festivals, Festivals::None);
        assert_eq!(day.local_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_local_date_uses_utc_plus_eight() {
        // 2024-12-31T16:00:00Z is already Jan 1st in Shanghai
        let record = json!({ "timestamp": 1735660800, "suit": "", "avoid": "" });
        let day = AlmanacDay::from_value(&record).unwrap();
        assert_eq!(day.local_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_structured_festivals_take_precedence() {
        let record = json!({
            "timestamp": 1735689600,
            "festivalInfoList": [{ "name": "元旦" }, { "name": "腊八节" }],
            "festivalList": "ignored",
            "suit": "祭祀",
            "avoid": "安床"
        });

        let day = AlmanacDay::from_value(&record).unwrap();
        assert_eq!(
            day.festivals,
            Festivals::Structured(vec!["元旦".to_string(), "腊八节".to_string()])
        );
    }

    #[test]
    fn test_flat_festival_list_as_array() {
        let record = json!({
            "timestamp": 1735689600,
            "festivalList": ["元旦", "腊八节"],
            "suit": "祭祀",
            "avoid": "安床"
        });

        let day = AlmanacDay::from_value(&record).unwrap();
        assert_eq!(day.festivals, Festivals::Flat("元旦,腊八节".to_string()));
    }

    #[test]
    fn test_invalid_records_are_rejected() {
        let cases = [
            json!({ "lMonth": "腊", "suit": "祭祀", "avoid": "安床" }),
            json!({ "timestamp": "soon", "suit": "祭祀", "avoid": "安床" }),
            json!({ "timestamp": 1735689600, "avoid": "安床" }),
            json!({ "timestamp": 1735689600, "suit": "祭祀" }),
            json!({ "timestamp": 1735689600, "suit": 3, "avoid": "安床" }),
            json!({ "timestamp": i64::MAX, "suit": "祭祀", "avoid": "安床" }),
            json!("not an object"),
        ];

        for record in cases {
            let result = AlmanacDay::from_value(&record);
            assert!(
                matches!(result, Err(AlmanacError::RecordInvalid(_))),
                "expected RecordInvalid for {}",
                record
            );
        }
    }

    #[test]
    fn test_records_from_document() {
        let doc = json!({
            "Result": [{
                "DisplayData": { "resultData": { "tplData": { "data": { "almanac": [
                    { "timestamp": "1735689600" },
                    { "timestamp": "1735776000" }
                ]}}}}
            }]
        });
        let bytes = serde_json::to_vec(&doc).unwrap();

        let records = records_from_document(Path::new("2025/1.json"), &bytes).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_records_from_document_malformed() {
        let path = Path::new("2025/1.json");

        let result = records_from_document(path, b"{ not json");
        assert!(matches!(result, Err(AlmanacError::SourceMalformed { .. })));

        let result = records_from_document(path, br#"{"Result": []}"#);
        assert!(matches!(result, Err(AlmanacError::SourceMalformed { .. })));
    }
}
