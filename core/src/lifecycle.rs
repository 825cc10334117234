//! # Loan Lifecycle
//!
//! The state machine of a single loan, as pure functions from one aggregate snapshot to
//! the next.
//!
//! ```text
//!            approve            disburse
//! Pending ──────────► Approved ──────────► Active
//!    │
//!    ├── reject ───► Rejected
//!    └── withdraw ─► Withdrawn
//! ```
//!
//! Nothing here touches storage. Each function checks legality against
//! [`LoanStatus::after`] first, then the date rules of the transition, and returns the
//! next snapshot with its `version` bumped. Committing it is the store's job.

use chrono::{NaiveDate, Utc};

use lendr_common::error::{ErrorCode, LoanError};
use lendr_common::ids::LoanId;
use lendr_common::loan::application::{LoanApplication, LoanSubmission};
use lendr_common::loan::product::LoanProductConfig;
use lendr_common::loan::status::{LoanStatus, Transition};

use crate::validation::{self, ValidatedApplication};

/// A freshly created loan in `Pending`, carrying its validated schedule.
pub fn open(id: LoanId, submission: &LoanSubmission, validated: ValidatedApplication) -> LoanApplication {
    LoanApplication {
        id,
        product_id: submission.product_id,
        client_id: submission.client_id,
        group_id: submission.group_id,
        principal: validated.schedule.principal,
        submitted_on: submission.submitted_on,
        expected_disbursement_date: submission.expected_disbursement_date,
        first_repayment_date: submission.first_repayment_date,
        terms: validated.terms,
        collaterals: submission.collaterals.clone(),
        status: LoanStatus::Pending,
        schedule: validated.schedule,
        approved_on: None,
        disbursed_on: None,
        status_changed_at: Utc::now(),
        version: 1,
    }
}

/// Approves a pending loan on `date`. The schedule is left as it is.
pub fn approve(loan: &LoanApplication, date: NaiveDate) -> Result<LoanApplication, LoanError> {
    let mut next: LoanApplication = advance(loan, Transition::Approve)?;

    if date < loan.submitted_on {
        return Err(LoanError::validation(
            ErrorCode::ApprovalBeforeSubmission,
            format!(
                "approval on {date} precedes submission on {}",
                loan.submitted_on
            ),
        ));
    }

    next.approved_on = Some(date);
    Ok(next)
}

/// Activates an approved loan disbursed on `date`.
///
/// The gap from `date` to the fixed first due date must still meet the product minimum;
/// otherwise the loan stays `Approved`.
pub fn disburse(
    loan: &LoanApplication,
    product: &LoanProductConfig,
    date: NaiveDate,
) -> Result<LoanApplication, LoanError> {
    let mut next: LoanApplication = advance(loan, Transition::Disburse)?;

    if let Some(approved_on) = loan.approved_on {
        if date < approved_on {
            return Err(LoanError::validation(
                ErrorCode::DisbursementBeforeApproval,
                format!("disbursement on {date} precedes approval on {approved_on}"),
            ));
        }
    }

    let first_due: NaiveDate = loan
        .schedule
        .first_due_date()
        .unwrap_or(loan.first_repayment_date);
    validation::minimum_gap(
        date,
        first_due,
        product.minimum_days_between_disbursal_and_first_repayment,
    )
    .map_err(|err| LoanError::Validation(vec![err]))?;

    next.disbursed_on = Some(date);
    Ok(next)
}

pub fn reject(loan: &LoanApplication) -> Result<LoanApplication, LoanError> {
    advance(loan, Transition::Reject)
}

pub fn withdraw(loan: &LoanApplication) -> Result<LoanApplication, LoanError> {
    advance(loan, Transition::Withdraw)
}

/// Next snapshot of `loan` after `transition`, or why the transition is illegal.
fn advance(loan: &LoanApplication, transition: Transition) -> Result<LoanApplication, LoanError> {
    let status: LoanStatus = loan
        .status
        .after(transition)
        .ok_or(LoanError::InvalidTransition {
            loan_id: loan.id,
            action: transition,
            from: loan.status,
        })?;

    let mut next: LoanApplication = loan.clone();
    next.status = status;
    next.status_changed_at = Utc::now();
    next.version = loan.version + 1;
    Ok(next)
}
