//! JSON scenario files driving the `schedule` and `simulate` commands.
//!
//! ```json
//! {
//!   "product": { "name": "weekly", "number_of_repayments": 12, ... },
//!   "application": { "client_id": 1, "product_id": 0, "principal": "100000.00", ... },
//!   "calendar": { "id": 1, "group_id": 1, "start_date": "2014-08-01",
//!                 "frequency": 2, "interval": 1, "repeats_on_day": 1 },
//!   "approve_on": "2014-09-02",
//!   "disburse_on": "2014-09-04"
//! }
//! ```
//!
//! The application's `product_id` is replaced by the id the product is registered under.

use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use serde::Deserialize;

use lendr_common::calendar::{Calendar, MeetingFrequency, weekday_from_code};
use lendr_common::ids::{CalendarId, GroupId};
use lendr_common::loan::application::LoanSubmission;
use lendr_common::loan::product::LoanProductConfig;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub product: LoanProductConfig,
    pub application: LoanSubmission,
    #[serde(default)]
    pub calendar: Option<CalendarRecord>,
    #[serde(default)]
    pub approve_on: Option<NaiveDate>,
    #[serde(default)]
    pub disburse_on: Option<NaiveDate>,
}

/// A group calendar as the group-management system exports it, with integer codes.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarRecord {
    pub id: u64,
    pub group_id: u64,
    pub start_date: NaiveDate,
    pub frequency: u8,
    pub interval: u32,
    #[serde(default)]
    pub repeats_on_day: Option<u8>,
}

impl CalendarRecord {
    pub fn into_calendar(self) -> anyhow::Result<Calendar> {
        let frequency: MeetingFrequency = MeetingFrequency::from_code(self.frequency)
            .ok_or_else(|| anyhow!("unknown meeting frequency code {}", self.frequency))?;
        let repeats_on_day = self
            .repeats_on_day
            .map(|code| weekday_from_code(code).ok_or_else(|| anyhow!("unknown weekday code {code}")))
            .transpose()?;

        Ok(Calendar {
            id: CalendarId(self.id),
            group_id: GroupId(self.group_id),
            start_date: self.start_date,
            frequency,
            interval: self.interval,
            repeats_on_day,
        })
    }
}

pub fn load(path: &Path) -> anyhow::Result<Scenario> {
    let raw: String = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    parse(&raw).with_context(|| format!("invalid scenario {}", path.display()))
}

fn parse(raw: &str) -> anyhow::Result<Scenario> {
    Ok(serde_json::from_str(raw)?)
}
