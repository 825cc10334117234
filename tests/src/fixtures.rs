//! Products, applications and calendars shared by the integration tests.
//!
//! They mirror a weekly group-lending setup: a 100 000.00 loan repaid over 12 weeks at
//! 18% a year, with two weeks of principal and interest grace and a seven day minimum
//! between disbursal and the first repayment.

use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use lendr_common::calendar::{Calendar, CalendarService, MeetingFrequency};
use lendr_common::config::Config;
use lendr_common::ids::{CalendarId, ClientId, CollateralId, GroupId, ProductId};
use lendr_common::loan::application::{CollateralRef, LoanSubmission};
use lendr_common::loan::product::{
    AmortizationType, InterestCalculationPeriod, InterestRateFrequency, LoanProductConfig,
    LoanTerms, PrincipalRange, RepaymentFrequency, TermOverrides,
};
use lendr_core::LoanService;
use lendr_core::calendar::InMemoryCalendarService;

pub const MINIMUM_GAP_CODE: &str =
    "error.msg.loan.days.between.first.repayment.and.disbursal.are.less.than.minimum.allowed";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn group_lending_product() -> LoanProductConfig {
    LoanProductConfig {
        name: String::from("group lending"),
        principal: PrincipalRange::new(dec!(1000.00), dec!(1000000.00)),
        terms: LoanTerms {
            number_of_repayments: 12,
            repayment_every: 1,
            repayment_frequency: RepaymentFrequency::Months,
            interest_rate_per_period: dec!(18),
            interest_rate_frequency: InterestRateFrequency::Yearly,
            amortization: AmortizationType::EqualInstallments,
            interest_calculation_period: InterestCalculationPeriod::SameAsRepaymentPeriod,
            principal_grace_periods: 0,
            interest_grace_periods: 0,
        },
        minimum_days_between_disbursal_and_first_repayment: 7,
        permit_unaligned_group_repayments: false,
    }
}

/// Weekly application with two periods of grace, overriding the monthly product terms.
pub fn application(
    product_id: ProductId,
    expected_disbursement: NaiveDate,
    first_repayment: NaiveDate,
) -> LoanSubmission {
    LoanSubmission {
        client_id: ClientId(1),
        group_id: None,
        product_id,
        principal: dec!(100000.00),
        submitted_on: date(2014, 9, 1),
        expected_disbursement_date: expected_disbursement,
        first_repayment_date: first_repayment,
        loan_term: None,
        terms: TermOverrides {
            repayment_every: Some(1),
            repayment_frequency: Some(RepaymentFrequency::Weeks),
            amortization: Some(AmortizationType::EqualInstallments),
            interest_calculation_period: Some(InterestCalculationPeriod::Daily),
            principal_grace_periods: Some(2),
            interest_grace_periods: Some(2),
            ..TermOverrides::default()
        },
        collaterals: vec![CollateralRef {
            collateral: CollateralId(1),
            quantity: Decimal::ONE,
        }],
    }
}

/// Weekly meetings on Mondays from 2014-08-01.
pub fn monday_calendar(group: GroupId) -> Calendar {
    Calendar {
        id: CalendarId(1),
        group_id: group,
        start_date: date(2014, 8, 1),
        frequency: MeetingFrequency::Weekly,
        interval: 1,
        repeats_on_day: Some(Weekday::Mon),
    }
}

pub fn service() -> LoanService {
    service_with(Arc::new(InMemoryCalendarService::new()))
}

pub fn service_with(calendars: Arc<dyn CalendarService>) -> LoanService {
    LoanService::new(&Config::default(), calendars)
}

pub async fn service_with_product() -> (LoanService, ProductId) {
    let service: LoanService = service();
    let product: ProductId = service
        .create_loan_product(group_lending_product())
        .await
        .unwrap();
    (service, product)
}
