//! UTC instants as stored on transaction records.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Accepts any offset; the result is normalized to UTC.
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Millisecond precision with a `Z` suffix, so stored values sort
    /// lexically in time order.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// True if both fall in the same UTC calendar month.
    pub fn same_month_as(&self, other: &Timestamp) -> bool {
        self.0.year() == other.0.year() && self.0.month() == other.0.month()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
