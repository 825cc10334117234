//! # Validation Engine
//!
//! Decides whether a [`LoanSubmission`] may become a loan, and with which schedule.
//!
//! ## Order of checks
//! 1. Well-formedness: principal, date ordering, collaterals, declared loan term. All
//!    violations are collected.
//! 2. Minimum gap between expected disbursal and first repayment. A violation is appended
//!    and validation stops, since no schedule can honour it.
//! 3. Schedule generation, whose own violations are merged in.
//! 4. Calendar alignment of group loans, unless the product waives it. It is only
//!    consulted once every earlier check has passed.
//!
//! The engine holds no state of its own and never touches the loan store, so it runs
//! without any aggregate lock.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use lendr_common::calendar::{Calendar, CalendarError, CalendarService};
use lendr_common::error::{Entity, ErrorCode, LoanError, ValidationError};
use lendr_common::ids::GroupId;
use lendr_common::loan::application::LoanSubmission;
use lendr_common::loan::product::{LoanProductConfig, LoanTerms};
use lendr_common::loan::schedule::{Installment, RepaymentSchedule};

use crate::calendar;
use crate::schedule::ScheduleGenerator;

/// Outcome of a successful validation: the effective terms and the fixed schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedApplication {
    pub terms: LoanTerms,
    pub schedule: RepaymentSchedule,
}

pub struct ValidationEngine {
    generator: ScheduleGenerator,
    calendars: Arc<dyn CalendarService>,
}

impl ValidationEngine {
    pub fn new(generator: ScheduleGenerator, calendars: Arc<dyn CalendarService>) -> Self {
        Self {
            generator,
            calendars,
        }
    }

    /// Validates `submission` against `product`.
    ///
    /// Business-rule violations come back as [`LoanError::Validation`] in the order they
    /// were found. A group without a calendar is [`LoanError::NotFound`], and a calendar
    /// lookup failure is [`LoanError::Unavailable`].
    pub async fn validate(
        &self,
        submission: &LoanSubmission,
        product: &LoanProductConfig,
    ) -> Result<ValidatedApplication, LoanError> {
        let terms: LoanTerms = product.terms.with_overrides(&submission.terms);
        let mut errors: Vec<ValidationError> = Vec::new();

        let blocking: bool = check_principal(submission.principal, product, &mut errors)
            | check_dates(submission, &mut errors);
        check_collaterals(submission, &mut errors);
        check_loan_term(submission, &terms, &mut errors);

        if let Err(err) = minimum_gap(
            submission.expected_disbursement_date,
            submission.first_repayment_date,
            product.minimum_days_between_disbursal_and_first_repayment,
        ) {
            errors.push(err);
            return Err(LoanError::Validation(errors));
        }

        if blocking {
            return Err(LoanError::Validation(errors));
        }

        let schedule: Option<RepaymentSchedule> = match self.generator.generate(
            &terms,
            submission.principal,
            submission.expected_disbursement_date,
            submission.first_repayment_date,
        ) {
            Ok(schedule) => Some(schedule),
            Err(mut generation) => {
                errors.append(&mut generation);
                None
            }
        };

        let Some(schedule) = schedule else {
            return Err(LoanError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(LoanError::Validation(errors));
        }

        if let Some(group) = submission.group_id {
            if !product.permit_unaligned_group_repayments {
                self.check_alignment(group, &schedule, &mut errors).await?;
            }
        }
        if !errors.is_empty() {
            return Err(LoanError::Validation(errors));
        }

        debug!(
            principal = %submission.principal,
            installments = schedule.len(),
            "application passed validation"
        );
        Ok(ValidatedApplication { terms, schedule })
    }

    async fn check_alignment(
        &self,
        group: GroupId,
        schedule: &RepaymentSchedule,
        errors: &mut Vec<ValidationError>,
    ) -> Result<(), LoanError> {
        let calendar: Calendar = self
            .calendars
            .calendar_for_group(group)
            .await
            .map_err(unavailable)?
            .ok_or(LoanError::NotFound {
                entity: Entity::Calendar,
                id: group.get(),
            })?;

        let misses: Vec<&Installment> =
            calendar::misaligned_installments(self.calendars.as_ref(), &calendar, schedule)
                .await
                .map_err(unavailable)?;

        errors.extend(misses.into_iter().map(|installment| {
            ValidationError::new(
                ErrorCode::RepaymentNotAlignedWithMeeting,
                format!(
                    "installment {} due on {} is not a meeting day of calendar {}",
                    installment.number, installment.due_date, calendar.id
                ),
            )
        }));
        Ok(())
    }
}

/// Checks that `first_repayment` lies at least `minimum` days after `disbursement`.
///
/// The bound is inclusive: a gap of exactly `minimum` days passes.
pub fn minimum_gap(
    disbursement: NaiveDate,
    first_repayment: NaiveDate,
    minimum: u32,
) -> Result<(), ValidationError> {
    let gap: i64 = (first_repayment - disbursement).num_days();
    if gap >= i64::from(minimum) {
        return Ok(());
    }

    Err(ValidationError::new(
        ErrorCode::MinimumDaysBetweenDisbursalAndFirstRepayment,
        format!(
            "first repayment on {first_repayment} is {gap} days after disbursal on {disbursement}, \
             the product requires at least {minimum}"
        ),
    ))
}

fn unavailable(err: CalendarError) -> LoanError {
    LoanError::Unavailable(err.to_string())
}

/// Returns `true` when the principal is unusable for schedule generation.
fn check_principal(
    principal: Decimal,
    product: &LoanProductConfig,
    errors: &mut Vec<ValidationError>,
) -> bool {
    if principal <= Decimal::ZERO {
        errors.push(ValidationError::new(
            ErrorCode::PrincipalNotPositive,
            format!("principal {principal} must be greater than zero"),
        ));
        return true;
    }
    if !product.principal.contains(principal) {
        errors.push(ValidationError::new(
            ErrorCode::PrincipalOutOfRange,
            format!(
                "principal {principal} is outside the product range [{}, {}]",
                product.principal.min, product.principal.max
            ),
        ));
    }
    false
}

/// Returns `true` when the dates cannot bound a first repayment period.
fn check_dates(submission: &LoanSubmission, errors: &mut Vec<ValidationError>) -> bool {
    let mut blocking: bool = false;

    if submission.expected_disbursement_date < submission.submitted_on {
        errors.push(ValidationError::new(
            ErrorCode::DisbursementBeforeSubmission,
            format!(
                "expected disbursement on {} precedes submission on {}",
                submission.expected_disbursement_date, submission.submitted_on
            ),
        ));
    }
    if submission.first_repayment_date <= submission.expected_disbursement_date {
        errors.push(ValidationError::new(
            ErrorCode::FirstRepaymentNotAfterDisbursement,
            format!(
                "first repayment on {} must be after expected disbursement on {}",
                submission.first_repayment_date, submission.expected_disbursement_date
            ),
        ));
        blocking = true;
    }

    blocking
}

fn check_collaterals(submission: &LoanSubmission, errors: &mut Vec<ValidationError>) {
    for pledge in &submission.collaterals {
        if pledge.quantity <= Decimal::ZERO {
            errors.push(ValidationError::new(
                ErrorCode::CollateralQuantity,
                format!(
                    "collateral {} has quantity {}, expected more than zero",
                    pledge.collateral, pledge.quantity
                ),
            ));
        }
    }
}

fn check_loan_term(submission: &LoanSubmission, terms: &LoanTerms, errors: &mut Vec<ValidationError>) {
    let Some(declared) = submission.loan_term else {
        return;
    };

    let repayment_term: u64 =
        u64::from(terms.number_of_repayments) * u64::from(terms.repayment_every);
    if declared.unit != terms.repayment_frequency || u64::from(declared.frequency) != repayment_term {
        errors.push(ValidationError::new(
            ErrorCode::LoanTermMismatch,
            format!(
                "loan term of {} {:?} differs from {} repayments every {} {:?}",
                declared.frequency,
                declared.unit,
                terms.number_of_repayments,
                terms.repayment_every,
                terms.repayment_frequency
            ),
        ));
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
