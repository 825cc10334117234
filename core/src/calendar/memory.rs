use std::collections::HashMap;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;

use lendr_common::calendar::{Calendar, CalendarError, CalendarService};
use lendr_common::ids::GroupId;

use super::recurrence;

/// Calendar adapter backed by a map of group calendars.
///
/// Stands in for the group-management system in tests and in the CLI.
#[derive(Debug, Default)]
pub struct InMemoryCalendarService {
    calendars: RwLock<HashMap<GroupId, Calendar>>,
}

impl InMemoryCalendarService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `calendar` for its group, replacing any previous one.
    pub async fn attach(&self, calendar: Calendar) {
        self.calendars.write().await.insert(calendar.group_id, calendar);
    }
}

#[async_trait::async_trait]
impl CalendarService for InMemoryCalendarService {
    async fn calendar_for_group(&self, group: GroupId) -> Result<Option<Calendar>, CalendarError> {
        Ok(self.calendars.read().await.get(&group).cloned())
    }

    async fn resolve_meeting_dates(
        &self,
        calendar: &Calendar,
        from: NaiveDate,
        count: usize,
    ) -> Result<Vec<NaiveDate>, CalendarError> {
        debug!(calendar = %calendar.id, %from, count, "resolving meeting dates");
        recurrence::meeting_dates(calendar, from, count)
    }
}
