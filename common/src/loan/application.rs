//! # Loan Application
//!
//! [`LoanSubmission`] is the request to open a loan; [`LoanApplication`] is the stored
//! aggregate that exists only once a submission has passed validation.
//!
//! The application references its client, group and collaterals by id. Their lifecycles
//! belong to other systems.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{ClientId, CollateralId, GroupId, LoanId, ProductId};
use crate::loan::product::{LoanTerms, RepaymentFrequency, TermOverrides};
use crate::loan::schedule::RepaymentSchedule;
use crate::loan::status::LoanStatus;

/// A collateral pledged against the loan, by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralRef {
    pub collateral: CollateralId,
    pub quantity: Decimal,
}

/// Declared length of the loan, e.g. 12 weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTermSpan {
    pub frequency: u32,
    pub unit: RepaymentFrequency,
}

/// Everything a caller submits to open a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSubmission {
    pub client_id: ClientId,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    pub product_id: ProductId,
    pub principal: Decimal,
    pub submitted_on: NaiveDate,
    pub expected_disbursement_date: NaiveDate,
    pub first_repayment_date: NaiveDate,
    #[serde(default)]
    pub loan_term: Option<LoanTermSpan>,
    #[serde(default)]
    pub terms: TermOverrides,
    #[serde(default)]
    pub collaterals: Vec<CollateralRef>,
}

/// The lifecycle aggregate of one loan.
///
/// Mutated only through lifecycle transitions; `version` increases by one with every
/// committed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub id: LoanId,
    pub product_id: ProductId,
    pub client_id: ClientId,
    pub group_id: Option<GroupId>,
    pub principal: Decimal,
    pub submitted_on: NaiveDate,
    pub expected_disbursement_date: NaiveDate,
    pub first_repayment_date: NaiveDate,
    pub terms: LoanTerms,
    pub collaterals: Vec<CollateralRef>,
    pub status: LoanStatus,
    pub schedule: RepaymentSchedule,
    pub approved_on: Option<NaiveDate>,
    pub disbursed_on: Option<NaiveDate>,
    pub status_changed_at: DateTime<Utc>,
    pub version: u64,
}
