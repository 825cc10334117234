use colored::*;

use lendr_core::calendar;

use crate::commands::MeetingArgs;
use crate::scenario::CalendarRecord;
use crate::terminal::{colors, print};

pub fn meetings(args: MeetingArgs) -> anyhow::Result<()> {
    let from = args.from.unwrap_or(args.start);
    let record = CalendarRecord {
        id: 0,
        group_id: 0,
        start_date: args.start,
        frequency: args.frequency,
        interval: args.interval,
        repeats_on_day: args.day,
    };
    let group_calendar = record.into_calendar()?;
    let dates = calendar::meeting_dates(&group_calendar, from, args.count)?;

    print::header("meeting dates");
    for (idx, date) in dates.iter().enumerate() {
        let weekday: ColoredString = date.format("%A").to_string().color(colors::SEPARATOR);
        print::print_status(format!(
            "{:>3}  {} {}",
            idx + 1,
            date.to_string().color(colors::DATE),
            weekday
        ));
    }
    Ok(())
}
