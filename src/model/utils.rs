use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// A validated `HH:MM` clock time (0-23 hours, 0-59 minutes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeHm {
    hour: u32,
    minute: u32,
}

impl TryFrom<&str> for TimeHm {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        TimeHm::new(value).ok_or("Invalid time: expected HH:MM with hours 0-23 and minutes 0-59")
    }
}

impl std::fmt::Display for TimeHm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TimeHm {
    /// # Panics
    ///
    /// Will panic if the regex is invalid
    #[must_use]
    pub fn new(input: &str) -> Option<Self> {
        use std::sync::OnceLock;
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| {
            Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$")
                .expect("Invalid regex pattern - this is a programming error")
        });

        let caps = re.captures(input.trim())?;
        let hour = caps.get(1)?.as_str().parse().ok()?;
        let minute = caps.get(2)?.as_str().parse().ok()?;
        Some(TimeHm { hour, minute })
    }

    /// # Errors
    ///
    /// Will return `Err` if the input is not a valid `HH:MM` time
    pub fn parse(input: &str) -> Result<Self, String> {
        Self::try_from(input).map_err(|e| format!("{e}: '{input}'"))
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.hour
    }

    #[must_use]
    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Place this clock time on the given date.
    ///
    /// # Panics
    ///
    /// Will panic if midnight on the given date is not representable
    #[must_use]
    pub fn on_date(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_hms_opt(self.hour, self.minute, 0)
            .expect("validated HH:MM is always a valid clock time")
    }
}

/// Timestamp format used for the TEXT datetime columns.
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// # Errors
///
/// Will return `Err` if the text is not `YYYY-MM-DDTHH:MM:SS`
pub fn parse_sql_datetime(text: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(text.trim(), SQL_DATETIME_FORMAT)
        .map_err(|e| format!("bad datetime '{text}': {e}"))
}

#[must_use]
pub fn format_sql_datetime(ts: NaiveDateTime) -> String {
    ts.format(SQL_DATETIME_FORMAT).to_string()
}
