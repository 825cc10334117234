//! # Meeting Calendars
//!
//! Resolution of recurring group meetings and the alignment check group loans are
//! subject to.
//!
//! The engine only talks to calendars through the
//! [`CalendarService`](lendr_common::calendar::CalendarService) port. This module ships
//! the pure recurrence rules and an in-memory adapter built on them.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use lendr_common::calendar::{Calendar, CalendarError, CalendarService};
use lendr_common::loan::schedule::{Installment, RepaymentSchedule};

mod memory;
mod recurrence;

pub use memory::InMemoryCalendarService;
pub use recurrence::meeting_dates;

/// Installments of `schedule` whose due date is not a meeting day of `calendar`.
///
/// Meeting dates are requested from the first due date onward, doubling the batch until
/// the last due date is covered or the calendar runs out.
pub async fn misaligned_installments<'a>(
    service: &dyn CalendarService,
    calendar: &Calendar,
    schedule: &'a RepaymentSchedule,
) -> Result<Vec<&'a Installment>, CalendarError> {
    let (Some(first), Some(last)) = (schedule.first_due_date(), schedule.last_due_date()) else {
        return Ok(Vec::new());
    };

    let mut count: usize = schedule.len();
    let meetings: BTreeSet<NaiveDate> = loop {
        let dates: Vec<NaiveDate> = service.resolve_meeting_dates(calendar, first, count).await?;
        let exhausted: bool = dates.len() < count;
        let covered: bool = dates.last().is_some_and(|date| *date >= last);
        if exhausted || covered {
            break dates.into_iter().collect();
        }
        count *= 2;
    };

    Ok(schedule
        .installments
        .iter()
        .filter(|installment| !meetings.contains(&installment.due_date))
        .collect())
}
