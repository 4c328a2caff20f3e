//! Recurrence rules and the schedule predicate.
//!
//! A [`Frequency`] decides on which calendar dates a habit is due. The
//! predicate is pure: given the same rule, creation date, and target date
//! it always returns the same answer, and a malformed or incomplete rule
//! means "not due" rather than an error.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Recurrence rule for a habit.
///
/// Serialized as a tagged object (`{"type": "weekly", "days": [1, 3, 5]}`),
/// which is also the wire representation inside a habit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Frequency {
    /// Due every day.
    Daily,
    /// Due on the listed weekdays (0 = Sunday .. 6 = Saturday).
    Weekly {
        #[serde(default)]
        days: Vec<u8>,
    },
    /// Due on the listed days of the month (1-31).
    Monthly {
        #[serde(default)]
        days: Vec<u8>,
    },
    /// Due every `interval` days, counted from the habit's creation date.
    Custom {
        #[serde(default)]
        interval: Option<u32>,
    },
    /// Unrecognized rule kind; never due.
    #[serde(other)]
    Unknown,
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Daily
    }
}

impl Frequency {
    /// Whether a habit with this rule, created on `created`, is due on `date`.
    ///
    /// The custom-interval arithmetic works on calendar dates, so a
    /// daylight-saving transition between creation and target cannot
    /// shift the cadence.
    pub fn scheduled_on(&self, created: NaiveDate, date: NaiveDate) -> bool {
        match self {
            Frequency::Daily => true,
            Frequency::Weekly { days } => {
                days.contains(&(date.weekday().num_days_from_sunday() as u8))
            }
            Frequency::Monthly { days } => days.contains(&(date.day() as u8)),
            Frequency::Custom {
                interval: Some(interval),
            } if *interval > 0 => {
                let elapsed = (date - created).num_days();
                elapsed >= 0 && elapsed % i64::from(*interval) == 0
            }
            Frequency::Custom { .. } | Frequency::Unknown => false,
        }
    }

    /// Validate the rule's parameters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Frequency::Daily | Frequency::Unknown => Ok(()),
            Frequency::Weekly { days } => {
                for &day in days {
                    if day > 6 {
                        return Err(ValidationError::DayOutOfRange {
                            frequency: "weekly",
                            day,
                        });
                    }
                }
                Ok(())
            }
            Frequency::Monthly { days } => {
                for &day in days {
                    if day == 0 || day > 31 {
                        return Err(ValidationError::DayOutOfRange {
                            frequency: "monthly",
                            day,
                        });
                    }
                }
                Ok(())
            }
            Frequency::Custom { interval } => match interval {
                Some(n) if *n == 0 || *n > 365 => Err(ValidationError::IntervalOutOfRange(*n)),
                _ => Ok(()),
            },
        }
    }
}
