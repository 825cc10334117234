//! # Group Meeting Calendars
//!
//! A group meets on a recurring schedule. Group loans must fall due on meeting days, so the
//! engine asks the [`CalendarService`] which dates a calendar produces.
//!
//! Calendars are owned by the group-management system. This workspace only reads them.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{CalendarId, GroupId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl MeetingFrequency {
    /// Maps the external frequency code (1 daily, 2 weekly, 3 monthly, 4 yearly).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(MeetingFrequency::Daily),
            2 => Some(MeetingFrequency::Weekly),
            3 => Some(MeetingFrequency::Monthly),
            4 => Some(MeetingFrequency::Yearly),
            _ => None,
        }
    }
}

/// Maps the external `repeatsOnDay` code (1 Monday through 7 Sunday).
pub fn weekday_from_code(code: u8) -> Option<Weekday> {
    match code {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Recurring meeting definition of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: CalendarId,
    pub group_id: GroupId,
    pub start_date: NaiveDate,
    pub frequency: MeetingFrequency,
    /// Meet every `interval` units of `frequency`.
    pub interval: u32,
    /// Weekday of weekly meetings. `None` means the weekday of `start_date`.
    #[serde(default)]
    pub repeats_on_day: Option<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("calendar {0} has an invalid recurrence: {1}")]
    InvalidRecurrence(CalendarId, String),
    #[error("calendar service unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to group meeting calendars.
///
/// Implementations may perform blocking or remote I/O; callers must not hold locks while
/// awaiting them.
#[async_trait::async_trait]
pub trait CalendarService: Send + Sync {
    /// Calendar attached to `group`, if any.
    async fn calendar_for_group(&self, group: GroupId) -> Result<Option<Calendar>, CalendarError>;

    /// Up to `count` meeting dates of `calendar` falling on or after `from`, in order.
    async fn resolve_meeting_dates(
        &self,
        calendar: &Calendar,
        from: NaiveDate,
        count: usize,
    ) -> Result<Vec<NaiveDate>, CalendarError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_external_codes() {
        assert_eq!(MeetingFrequency::from_code(2), Some(MeetingFrequency::Weekly));
        assert_eq!(MeetingFrequency::from_code(0), None);
        assert_eq!(weekday_from_code(1), Some(Weekday::Mon));
        assert_eq!(weekday_from_code(7), Some(Weekday::Sun));
        assert_eq!(weekday_from_code(8), None);
    }
}
