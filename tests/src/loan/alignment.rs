#![cfg(test)]
use std::sync::Arc;

use chrono::NaiveDate;

use lendr_common::calendar::{Calendar, CalendarError, CalendarService};
use lendr_common::error::{Entity, ErrorCode, LoanError, Outcome};
use lendr_common::ids::{GroupId, LoanId};
use lendr_common::loan::product::LoanProductConfig;
use lendr_core::calendar::InMemoryCalendarService;

use crate::fixtures::{application, date, group_lending_product, monday_calendar, service_with};

const GROUP: GroupId = GroupId(10);

async fn calendars() -> Arc<InMemoryCalendarService> {
    let calendars = Arc::new(InMemoryCalendarService::new());
    calendars.attach(monday_calendar(GROUP)).await;
    calendars
}

#[tokio::test]
async fn group_loan_on_meeting_days_is_accepted() {
    let service = service_with(calendars().await);
    let product = service.create_loan_product(group_lending_product()).await.unwrap();

    // 2014-09-08 is a Monday.
    let mut submission = application(product, date(2014, 9, 1), date(2014, 9, 8));
    submission.group_id = Some(GROUP);

    let id = service.create_loan_application(submission).await.unwrap();
    let loan = service.get_loan(id).await.unwrap();
    assert_eq!(loan.group_id, Some(GROUP));
    assert_eq!(loan.schedule.last_due_date(), Some(date(2014, 11, 24)));
}

#[tokio::test]
async fn group_loan_off_meeting_days_is_rejected() {
    let service = service_with(calendars().await);
    let product = service.create_loan_product(group_lending_product()).await.unwrap();

    // 2014-09-11 is a Thursday.
    let mut submission = application(product, date(2014, 9, 4), date(2014, 9, 11));
    submission.group_id = Some(GROUP);

    let err = service.create_loan_application(submission).await.unwrap_err();
    assert_eq!(err.validation_errors().len(), 12);
    assert!(err
        .validation_errors()
        .iter()
        .all(|e| e.code == ErrorCode::RepaymentNotAlignedWithMeeting));
}

#[tokio::test]
async fn unaligned_product_skips_the_calendar() {
    let service = service_with(calendars().await);
    let product = service
        .create_loan_product(LoanProductConfig {
            permit_unaligned_group_repayments: true,
            ..group_lending_product()
        })
        .await
        .unwrap();

    let mut submission = application(product, date(2014, 9, 4), date(2014, 9, 11));
    submission.group_id = Some(GROUP);
    assert!(service.create_loan_application(submission).await.is_ok());
}

#[tokio::test]
async fn group_without_calendar_is_not_found() {
    let service = service_with(calendars().await);
    let product = service.create_loan_product(group_lending_product()).await.unwrap();

    let mut submission = application(product, date(2014, 9, 1), date(2014, 9, 8));
    submission.group_id = Some(GroupId(99));

    let err = service.create_loan_application(submission).await.unwrap_err();
    assert_eq!(
        err,
        LoanError::NotFound {
            entity: Entity::Calendar,
            id: 99
        }
    );
    assert_eq!(err.outcome().status_code(), 404);
}

/// A calendar service whose backend stops answering at a chosen call.
enum Outage {
    Lookup,
    Resolution,
}

#[async_trait::async_trait]
impl CalendarService for Outage {
    async fn calendar_for_group(&self, group: GroupId) -> Result<Option<Calendar>, CalendarError> {
        match self {
            Outage::Lookup => Err(CalendarError::Unavailable(String::from("connection refused"))),
            Outage::Resolution => Ok(Some(monday_calendar(group))),
        }
    }

    async fn resolve_meeting_dates(
        &self,
        _calendar: &Calendar,
        _from: NaiveDate,
        _count: usize,
    ) -> Result<Vec<NaiveDate>, CalendarError> {
        Err(CalendarError::Unavailable(String::from("timed out")))
    }
}

#[tokio::test]
async fn calendar_outage_is_retryable_and_stores_nothing() {
    for outage in [Outage::Lookup, Outage::Resolution] {
        let service = service_with(Arc::new(outage));
        let product = service.create_loan_product(group_lending_product()).await.unwrap();

        let mut submission = application(product, date(2014, 9, 1), date(2014, 9, 8));
        submission.group_id = Some(GROUP);

        let err = service.create_loan_application(submission).await.unwrap_err();
        assert!(matches!(err, LoanError::Unavailable(_)));
        assert_eq!(err.outcome(), Outcome::Unavailable);
        assert_eq!(err.outcome().status_code(), 503);
        assert_eq!(err.payload()[0].code, "error.msg.calendar.service.unavailable");
        assert_eq!(
            service.get_loan(LoanId(1)).await.unwrap_err(),
            LoanError::NotFound {
                entity: Entity::Loan,
                id: 1
            }
        );
    }
}
