//! # Error Taxonomy
//!
//! Every failure the engine reports to a caller is one of the [`LoanError`] variants.
//! Business-rule violations carry one or more [`ValidationError`]s, each with a stable
//! machine-readable [`ErrorCode`].
//!
//! None of these are process faults: a caller receives them as values, renders them with
//! [`LoanError::payload`] and decides what to do from [`LoanError::outcome`].

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::ids::LoanId;
use crate::loan::status::{LoanStatus, Transition};

/// Stable codes of business-rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    PrincipalNotPositive,
    PrincipalOutOfRange,
    PrincipalPrecision,
    DisbursementBeforeSubmission,
    FirstRepaymentNotAfterDisbursement,
    MinimumDaysBetweenDisbursalAndFirstRepayment,
    RepaymentCount,
    RepaymentCountOutOfRange,
    RepaymentEvery,
    PrincipalGraceExceedsRepayments,
    InterestGraceExceedsRepayments,
    LoanTermMismatch,
    CollateralQuantity,
    RepaymentDateOutOfRange,
    RepaymentNotAlignedWithMeeting,
    ScheduleResidual,
    ScheduleAmountOutOfRange,
    ApprovalBeforeSubmission,
    DisbursementBeforeApproval,
    ProductPrincipalRange,
    ProductRepaymentCount,
    ProductRepaymentEvery,
    ProductInterestRate,
    ProductGracePeriods,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::PrincipalNotPositive => "error.msg.loan.principal.must.be.positive",
            ErrorCode::PrincipalOutOfRange => "error.msg.loan.principal.out.of.range",
            ErrorCode::PrincipalPrecision => "error.msg.loan.principal.exceeds.currency.precision",
            ErrorCode::DisbursementBeforeSubmission => {
                "error.msg.loan.expected.disbursement.date.before.submitted.on.date"
            }
            ErrorCode::FirstRepaymentNotAfterDisbursement => {
                "error.msg.loan.first.repayment.date.must.be.after.disbursement.date"
            }
            ErrorCode::MinimumDaysBetweenDisbursalAndFirstRepayment => {
                "error.msg.loan.days.between.first.repayment.and.disbursal.are.less.than.minimum.allowed"
            }
            ErrorCode::RepaymentCount => "error.msg.loan.number.of.repayments.must.be.positive",
            ErrorCode::RepaymentCountOutOfRange => {
                "error.msg.loan.number.of.repayments.out.of.range"
            }
            ErrorCode::RepaymentEvery => "error.msg.loan.repayment.every.must.be.positive",
            ErrorCode::PrincipalGraceExceedsRepayments => {
                "error.msg.loan.principal.grace.must.be.less.than.number.of.repayments"
            }
            ErrorCode::InterestGraceExceedsRepayments => {
                "error.msg.loan.interest.grace.must.be.less.than.number.of.repayments"
            }
            ErrorCode::LoanTermMismatch => "error.msg.loan.term.not.equal.to.repayment.term",
            ErrorCode::CollateralQuantity => "error.msg.loan.collateral.quantity.must.be.positive",
            ErrorCode::RepaymentDateOutOfRange => "error.msg.loan.repayment.date.out.of.range",
            ErrorCode::RepaymentNotAlignedWithMeeting => {
                "error.msg.loan.repayment.date.not.aligned.with.meeting.date"
            }
            ErrorCode::ScheduleResidual => "error.msg.loan.schedule.rounding.residual.exceeded",
            ErrorCode::ScheduleAmountOutOfRange => "error.msg.loan.schedule.amount.out.of.range",
            ErrorCode::ApprovalBeforeSubmission => {
                "error.msg.loan.approval.date.before.submitted.on.date"
            }
            ErrorCode::DisbursementBeforeApproval => {
                "error.msg.loan.disbursement.date.before.approval.date"
            }
            ErrorCode::ProductPrincipalRange => "error.msg.product.principal.range.invalid",
            ErrorCode::ProductRepaymentCount => "error.msg.product.number.of.repayments.must.be.positive",
            ErrorCode::ProductRepaymentEvery => "error.msg.product.repayment.every.must.be.positive",
            ErrorCode::ProductInterestRate => "error.msg.product.interest.rate.must.not.be.negative",
            ErrorCode::ProductGracePeriods => {
                "error.msg.product.grace.periods.must.be.less.than.number.of.repayments"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single business-rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub code: ErrorCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.code.as_str()
    }
}

/// Entities that can be looked up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Loan,
    Product,
    Calendar,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Loan => "loan",
            Entity::Product => "product",
            Entity::Calendar => "calendar",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoanError {
    /// One or more business rules were violated. Nothing was created or changed.
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// The requested transition is not legal from the current status.
    #[error("cannot {action} loan {loan_id} while it is {from}")]
    InvalidTransition {
        loan_id: LoanId,
        action: Transition,
        from: LoanStatus,
    },

    /// The aggregate changed between read and write; re-read and retry.
    #[error("loan {loan_id} was modified concurrently (expected version {expected}, found {found})")]
    ConcurrencyConflict {
        loan_id: LoanId,
        expected: u64,
        found: u64,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: u64 },

    /// An external collaborator could not answer. Safe to retry.
    #[error("external service unavailable: {0}")]
    Unavailable(String),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|err| err.code())
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Coarse result class of a failed operation, in the spirit of an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request broke a business rule (client-caused).
    Rejected,
    NotFound,
    Conflict,
    /// Infrastructure failure; the caller may retry.
    Unavailable,
}

impl Outcome {
    pub fn status_code(&self) -> u16 {
        match self {
            Outcome::Rejected => 403,
            Outcome::NotFound => 404,
            Outcome::Conflict => 409,
            Outcome::Unavailable => 503,
        }
    }
}

/// Wire shape of a single error entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl LoanError {
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        LoanError::Validation(vec![ValidationError::new(code, message)])
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            LoanError::Validation(_) | LoanError::InvalidTransition { .. } => Outcome::Rejected,
            LoanError::NotFound { .. } => Outcome::NotFound,
            LoanError::ConcurrencyConflict { .. } => Outcome::Conflict,
            LoanError::Unavailable(_) => Outcome::Unavailable,
        }
    }

    /// Validation errors carried by this error, empty for every other variant.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            LoanError::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Ordered `{code, message}` list as reported to callers.
    pub fn payload(&self) -> Vec<ErrorPayload> {
        match self {
            LoanError::Validation(errors) => errors
                .iter()
                .map(|err| ErrorPayload {
                    code: err.code().to_string(),
                    message: err.message.clone(),
                })
                .collect(),
            LoanError::InvalidTransition { .. } => {
                vec![self.single_payload("error.msg.loan.invalid.transition")]
            }
            LoanError::ConcurrencyConflict { .. } => {
                vec![self.single_payload("error.msg.loan.concurrent.modification")]
            }
            LoanError::NotFound { entity, .. } => {
                vec![self.single_payload(&format!("error.msg.{entity}.not.found"))]
            }
            LoanError::Unavailable(_) => {
                vec![self.single_payload("error.msg.calendar.service.unavailable")]
            }
        }
    }

    fn single_payload(&self, code: &str) -> ErrorPayload {
        ErrorPayload {
            code: code.to_string(),
            message: self.to_string(),
        }
    }
}
