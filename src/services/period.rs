use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    Unknown(String),
    /// Local midnight of this date does not exist in the time zone.
    Unrepresentable(NaiveDate),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::Unknown(period) => write!(
                f,
                "Invalid period '{}'. Use daily, weekly, or monthly.",
                period
            ),
            PeriodError::Unrepresentable(date) => {
                write!(f, "Cannot resolve the start of {} in the local time zone", date)
            }
        }
    }
}

impl std::error::Error for PeriodError {}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }

    /// First calendar day of the period containing `today`.
    pub fn first_day(self, today: NaiveDate) -> Result<NaiveDate, PeriodError> {
        match self {
            Period::Daily => Ok(today),
            Period::Weekly => {
                let since_sunday = today.weekday().num_days_from_sunday();
                Ok(today - Duration::days(i64::from(since_sunday)))
            }
            Period::Monthly => NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
                .ok_or(PeriodError::Unrepresentable(today)),
        }
    }

    /// Start of the period containing `now`, at local midnight in `now`'s zone.
    pub fn start_at<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Result<DateTime<Tz>, PeriodError> {
        let day = self.first_day(now.date_naive())?;
        start_of_day(&now.timezone(), day)
    }
}

/// Earliest instant of `day` in `tz`; falls back one hour later when a
/// daylight-saving gap swallows midnight.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Result<DateTime<Tz>, PeriodError> {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .ok_or(PeriodError::Unrepresentable(day))
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(PeriodError::Unknown(other.to_string())),
        }
    }
}
