//! Fixed values shared across the crate.

/// The only timezone the calendar knows about.
pub const TZID: &str = "Asia/Shanghai";
pub const TZNAME: &str = "CST";
/// UTC+8, no daylight saving.
pub const TZ_OFFSET_SECONDS: i32 = 8 * 3600;

pub const PRODID: &str = "-//almanac-cal//zh-CN//";
pub const DEFAULT_CALENDAR_NAME: &str = "节假日和黄历";
pub const CALENDAR_DESCRIPTION_PREFIX: &str = "中国以及国际节假日，备注有黄历，更新日期:";

/// Appended to the `YYYYMMDD` date to form every event UID.
pub const UID_SUFFIX: &str = "_jr@zqzess";
pub const SUMMARY_PREFIX: &str = "★黄历★:";

/// Pointer to the day records inside one almanac shard.
pub const ALMANAC_POINTER: &str = "/Result/0/DisplayData/resultData/tplData/data/almanac";

/// Top-level key of the schedule-style side tables.
pub const SCHEDULE_KEY: &str = "祭祀日程";
pub const SCHEDULE_DATE_FIELD: &str = "日期";
pub const SCHEDULE_TERM_FIELD: &str = "节气";
pub const SCHEDULE_TEXT_FIELD: &str = "节庆";

pub const DEFAULT_BASE_PATH: &str = "./openApiData/calendar_new";
pub const DEFAULT_FIRST_YEAR: i32 = 2022;
pub const DEFAULT_LAST_YEAR: i32 = 2030;
