//! Statistics keys and projections

use crate::error::{CoreError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coordinates of a resolved artifact
///
/// The string form is `<repository>/<gav>`, which is what phrase searches
/// match against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    pub repository: String,
    pub gav: String,
}

impl Identifier {
    pub fn new(repository: impl Into<String>, gav: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            gav: gav.into(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repository, self.gav)
    }
}

/// Resolution count of one artifact, as returned by queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntry {
    pub gav: String,
    pub count: u64,
}

impl ResolvedEntry {
    pub fn new(gav: impl Into<String>, count: u64) -> Self {
        Self {
            gav: gav.into(),
            count,
        }
    }
}

/// Granularity at which persistent statistics backends group records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedRequestsInterval {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl ResolvedRequestsInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedRequestsInterval::Daily => "daily",
            ResolvedRequestsInterval::Weekly => "weekly",
            ResolvedRequestsInterval::Monthly => "monthly",
            ResolvedRequestsInterval::Yearly => "yearly",
        }
    }

    /// First day of the bucket that contains `date`
    ///
    /// Weeks start on Monday.
    pub fn bucket(&self, date: NaiveDate) -> NaiveDate {
        match self {
            ResolvedRequestsInterval::Daily => date,
            ResolvedRequestsInterval::Weekly => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            ResolvedRequestsInterval::Monthly => date.with_day(1).unwrap_or(date),
            ResolvedRequestsInterval::Yearly => {
                NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
            }
        }
    }
}

impl fmt::Display for ResolvedRequestsInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolvedRequestsInterval {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ResolvedRequestsInterval::Daily),
            "weekly" => Ok(ResolvedRequestsInterval::Weekly),
            "monthly" => Ok(ResolvedRequestsInterval::Monthly),
            "yearly" => Ok(ResolvedRequestsInterval::Yearly),
            _ => Err(CoreError::UnknownVariant {
                kind: "interval",
                value: s.to_string(),
                expected: "daily, weekly, monthly, yearly",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_identifier_display() {
        let id = Identifier::new("releases", "com/example/app/1.0.0/app-1.0.0.jar");
        assert_eq!(id.to_string(), "releases/com/example/app/1.0.0/app-1.0.0.jar");
    }

    #[test]
    fn test_interval_buckets() {
        // 2024-05-16 is a Thursday
        let day = date(2024, 5, 16);

        assert_eq!(ResolvedRequestsInterval::Daily.bucket(day), day);
        assert_eq!(ResolvedRequestsInterval::Weekly.bucket(day), date(2024, 5, 13));
        assert_eq!(ResolvedRequestsInterval::Monthly.bucket(day), date(2024, 5, 1));
        assert_eq!(ResolvedRequestsInterval::Yearly.bucket(day), date(2024, 1, 1));
    }

    #[test]
    fn test_weekly_bucket_of_monday_is_itself() {
        let monday = date(2024, 5, 13);
        assert_eq!(ResolvedRequestsInterval::Weekly.bucket(monday), monday);
    }

    #[test]
    fn test_interval_default_and_parse() {
        assert_eq!(ResolvedRequestsInterval::default(), ResolvedRequestsInterval::Monthly);
        assert_eq!(
            "Weekly".parse::<ResolvedRequestsInterval>().unwrap(),
            ResolvedRequestsInterval::Weekly
        );
        assert!("hourly".parse::<ResolvedRequestsInterval>().is_err());
    }
}
