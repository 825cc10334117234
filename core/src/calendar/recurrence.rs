use chrono::{Datelike, Days, Months, NaiveDate};

use lendr_common::calendar::{Calendar, CalendarError, MeetingFrequency};

/// Up to `count` meeting dates of `calendar` on or after `from`, in order.
///
/// Weekly calendars with a `repeats_on_day` start on the first such weekday on or after
/// the calendar start. Monthly and yearly meetings keep the start day of month, clamped
/// to shorter months.
pub fn meeting_dates(
    calendar: &Calendar,
    from: NaiveDate,
    count: usize,
) -> Result<Vec<NaiveDate>, CalendarError> {
    if calendar.interval == 0 {
        return Err(CalendarError::InvalidRecurrence(
            calendar.id,
            "interval must be at least 1".into(),
        ));
    }

    let anchor: NaiveDate = anchor(calendar);
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(count);
    let mut index: u64 = first_candidate(calendar, anchor, from);

    while dates.len() < count {
        let Some(date) = occurrence(calendar, anchor, index) else {
            break;
        };
        if date >= from {
            dates.push(date);
        }
        index += 1;
    }

    Ok(dates)
}

fn anchor(calendar: &Calendar) -> NaiveDate {
    match (calendar.frequency, calendar.repeats_on_day) {
        (MeetingFrequency::Weekly, Some(weekday)) => {
            let start: u32 = calendar.start_date.weekday().num_days_from_monday();
            let target: u32 = weekday.num_days_from_monday();
            let offset: u32 = (target + 7 - start) % 7;
            calendar
                .start_date
                .checked_add_days(Days::new(u64::from(offset)))
                .unwrap_or(calendar.start_date)
        }
        _ => calendar.start_date,
    }
}

/// `index`-th meeting counted from `anchor`, or `None` past the representable range.
fn occurrence(calendar: &Calendar, anchor: NaiveDate, index: u64) -> Option<NaiveDate> {
    let steps: u64 = index.checked_mul(u64::from(calendar.interval))?;
    match calendar.frequency {
        MeetingFrequency::Daily => anchor.checked_add_days(Days::new(steps)),
        MeetingFrequency::Weekly => anchor.checked_add_days(Days::new(steps.checked_mul(7)?)),
        MeetingFrequency::Monthly => {
            anchor.checked_add_months(Months::new(u32::try_from(steps).ok()?))
        }
        MeetingFrequency::Yearly => {
            let months: u32 = u32::try_from(steps.checked_mul(12)?).ok()?;
            anchor.checked_add_months(Months::new(months))
        }
    }
}

/// An index whose occurrence is not after `from`, so scanning from it misses nothing.
fn first_candidate(calendar: &Calendar, anchor: NaiveDate, from: NaiveDate) -> u64 {
    if from <= anchor {
        return 0;
    }

    let interval: u64 = u64::from(calendar.interval);
    let days: u64 = (from - anchor).num_days().unsigned_abs();
    let months: u64 = {
        let years: i64 = i64::from(from.year() - anchor.year());
        let months: i64 = years * 12 + i64::from(from.month()) - i64::from(anchor.month());
        months.max(0).unsigned_abs()
    };

    match calendar.frequency {
        MeetingFrequency::Daily => days / interval,
        MeetingFrequency::Weekly => days / (7 * interval),
        MeetingFrequency::Monthly => (months / interval).saturating_sub(1),
        MeetingFrequency::Yearly => (months / (12 * interval)).saturating_sub(1),
    }
}
