//! # Schedule Generation
//!
//! Pure computation of a repayment schedule from effective [`LoanTerms`], a principal and
//! the application's dates.
//!
//! Due dates step `number_of_repayments` times from the first repayment date by
//! `repayment_every` units of `repayment_frequency`. Amounts are split by the
//! [`amortization`] rules and interest follows the configured calculation period.
//!
//! ## Rounding
//! Every component is rounded half away from zero to the currency precision. The final
//! installment absorbs the whole principal residual and the remainder of any deferred
//! interest, so the principal components always sum to the loan principal.
//!
//! Generation has no side effects; identical inputs yield identical schedules.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use lendr_common::config::Config;
use lendr_common::error::{ErrorCode, ValidationError};
use lendr_common::loan::product::{LoanTerms, RepaymentFrequency};
use lendr_common::loan::schedule::{Installment, RepaymentSchedule};
use lendr_common::money::MoneyPrecision;

mod amortization;
mod interest;

use amortization::{Allocation, Overflow, Period};
use interest::InterestCalculator;

/// Upper bound on `number_of_repayments`, ten years of daily installments.
pub const MAX_REPAYMENTS: u32 = 3_650;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleGenerator {
    precision: MoneyPrecision,
    days_in_year: u32,
}

impl ScheduleGenerator {
    pub fn new(precision: MoneyPrecision, days_in_year: u32) -> Self {
        Self {
            precision,
            days_in_year,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.precision(), config.days_in_year)
    }

    /// Builds the schedule of a loan disbursed on `disbursement_date` whose first
    /// installment falls due on `first_repayment_date`.
    ///
    /// Fails when the grace periods leave nothing to amortize, when the principal does not
    /// fit the currency precision, or when a due date or an amount cannot be represented.
    pub fn generate(
        &self,
        terms: &LoanTerms,
        principal: Decimal,
        disbursement_date: NaiveDate,
        first_repayment_date: NaiveDate,
    ) -> Result<RepaymentSchedule, Vec<ValidationError>> {
        check_feasibility(terms, principal, &self.precision)?;

        let due_dates: Vec<NaiveDate> =
            due_dates(terms, first_repayment_date).map_err(|err| vec![err])?;

        let periods: Vec<Period> = due_dates
            .iter()
            .scan(disbursement_date, |from, &due| {
                let period = Period { from: *from, due };
                *from = due;
                Some(period)
            })
            .collect();

        let principal: Decimal = self.precision.round(principal);
        let allocations: Vec<Allocation> = InterestCalculator::new(terms, self.days_in_year)
            .ok_or(Overflow)
            .and_then(|calculator| {
                amortization::allocate(terms, principal, &periods, &calculator, &self.precision)
            })
            .map_err(|_| {
                vec![ValidationError::new(
                    ErrorCode::ScheduleAmountOutOfRange,
                    format!(
                        "interest of {}% over {} repayments exceeds the representable amount",
                        terms.interest_rate_per_period, terms.number_of_repayments
                    ),
                )]
            })?;

        let installments: Vec<Installment> = periods
            .iter()
            .zip(allocations)
            .enumerate()
            .map(|(index, (period, allocation))| Installment {
                number: index as u32 + 1,
                from_date: period.from,
                due_date: period.due,
                principal_due: allocation.principal,
                interest_due: allocation.interest,
                outstanding_balance: allocation.balance,
            })
            .collect();

        let schedule = RepaymentSchedule {
            principal,
            installments,
        };

        let residual: Decimal = (schedule.total_principal() - principal).abs();
        if residual > self.precision.epsilon {
            return Err(vec![ValidationError::new(
                ErrorCode::ScheduleResidual,
                format!("schedule principal differs from {principal} by {residual}"),
            )]);
        }

        debug!(
            installments = schedule.len(),
            total_interest = %schedule.total_interest(),
            "generated repayment schedule"
        );
        Ok(schedule)
    }
}

fn check_feasibility(
    terms: &LoanTerms,
    principal: Decimal,
    precision: &MoneyPrecision,
) -> Result<(), Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = Vec::new();
    let count: u32 = terms.number_of_repayments;

    if count == 0 {
        errors.push(ValidationError::new(
            ErrorCode::RepaymentCount,
            "number of repayments must be at least 1",
        ));
    } else if count > MAX_REPAYMENTS {
        errors.push(ValidationError::new(
            ErrorCode::RepaymentCountOutOfRange,
            format!("number of repayments {count} exceeds the maximum of {MAX_REPAYMENTS}"),
        ));
    } else {
        if count <= terms.principal_grace_periods {
            errors.push(ValidationError::new(
                ErrorCode::PrincipalGraceExceedsRepayments,
                format!(
                    "principal grace of {} periods leaves none of {count} repayments to amortize",
                    terms.principal_grace_periods
                ),
            ));
        }
        if count <= terms.interest_grace_periods {
            errors.push(ValidationError::new(
                ErrorCode::InterestGraceExceedsRepayments,
                format!(
                    "interest grace of {} periods leaves none of {count} repayments to charge",
                    terms.interest_grace_periods
                ),
            ));
        }
    }
    if terms.repayment_every == 0 {
        errors.push(ValidationError::new(
            ErrorCode::RepaymentEvery,
            "repayment every must be at least 1",
        ));
    }
    if !precision.is_representable(principal) {
        errors.push(ValidationError::new(
            ErrorCode::PrincipalPrecision,
            format!(
                "principal {principal} cannot be represented with {} decimal places",
                precision.digits
            ),
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Due dates of every installment, stepping from `first` without accumulating drift.
fn due_dates(terms: &LoanTerms, first: NaiveDate) -> Result<Vec<NaiveDate>, ValidationError> {
    (0..terms.number_of_repayments)
        .map(|index| {
            index
                .checked_mul(terms.repayment_every)
                .and_then(|units| advance(first, terms.repayment_frequency, units))
                .ok_or_else(|| {
                    ValidationError::new(
                        ErrorCode::RepaymentDateOutOfRange,
                        format!("installment {} falls outside the supported calendar", index + 1),
                    )
                })
        })
        .collect()
}

/// `date` moved forward by `units` of `frequency`. Month steps clamp to the month end.
fn advance(date: NaiveDate, frequency: RepaymentFrequency, units: u32) -> Option<NaiveDate> {
    match frequency {
        RepaymentFrequency::Days => date.checked_add_days(Days::new(u64::from(units))),
        RepaymentFrequency::Weeks => date.checked_add_days(Days::new(u64::from(units) * 7)),
        RepaymentFrequency::Months => date.checked_add_months(Months::new(units)),
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
