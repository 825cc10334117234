//! # Loan Product Configuration
//!
//! A product is configured once and never edited. Every application submitted against it
//! is validated with the constraints below, and its repayment terms seed the effective
//! [`LoanTerms`] of the application.
//!
//! Products are plain records: build them with struct literals over
//! [`LoanProductConfig::default`] and check them with [`LoanProductConfig::validate`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterestRateFrequency {
    Daily,
    Monthly,
    Yearly,
}

/// Unit in which repayments (and loan terms) are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepaymentFrequency {
    Days,
    Weeks,
    Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmortizationType {
    /// Level total payment per amortizing installment.
    EqualInstallments,
    /// Level principal per amortizing installment, interest on the declining balance.
    EqualPrincipalPayments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterestCalculationPeriod {
    /// Interest accrues on the actual number of days in each period.
    Daily,
    /// Every period is one uniform unit regardless of its length in days.
    SameAsRepaymentPeriod,
}

/// Inclusive principal bounds of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PrincipalRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, principal: Decimal) -> bool {
        self.min <= principal && principal <= self.max
    }
}

/// Repayment terms that drive schedule generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanTerms {
    pub number_of_repayments: u32,
    pub repayment_every: u32,
    pub repayment_frequency: RepaymentFrequency,
    /// Nominal rate in percent per `interest_rate_frequency`.
    pub interest_rate_per_period: Decimal,
    pub interest_rate_frequency: InterestRateFrequency,
    pub amortization: AmortizationType,
    pub interest_calculation_period: InterestCalculationPeriod,
    pub principal_grace_periods: u32,
    pub interest_grace_periods: u32,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            number_of_repayments: 12,
            repayment_every: 1,
            repayment_frequency: RepaymentFrequency::Months,
            interest_rate_per_period: Decimal::ZERO,
            interest_rate_frequency: InterestRateFrequency::Yearly,
            amortization: AmortizationType::EqualInstallments,
            interest_calculation_period: InterestCalculationPeriod::SameAsRepaymentPeriod,
            principal_grace_periods: 0,
            interest_grace_periods: 0,
        }
    }
}

/// Per-application overrides of the product's repayment terms.
///
/// The interest rate frequency, the principal bounds and the minimum gap are
/// product-level constraints and cannot be overridden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermOverrides {
    pub number_of_repayments: Option<u32>,
    pub repayment_every: Option<u32>,
    pub repayment_frequency: Option<RepaymentFrequency>,
    pub interest_rate_per_period: Option<Decimal>,
    pub amortization: Option<AmortizationType>,
    pub interest_calculation_period: Option<InterestCalculationPeriod>,
    pub principal_grace_periods: Option<u32>,
    pub interest_grace_periods: Option<u32>,
}

impl LoanTerms {
    /// Effective terms of an application: these terms with `overrides` applied.
    pub fn with_overrides(&self, overrides: &TermOverrides) -> LoanTerms {
        LoanTerms {
            number_of_repayments: overrides
                .number_of_repayments
                .unwrap_or(self.number_of_repayments),
            repayment_every: overrides.repayment_every.unwrap_or(self.repayment_every),
            repayment_frequency: overrides
                .repayment_frequency
                .unwrap_or(self.repayment_frequency),
            interest_rate_per_period: overrides
                .interest_rate_per_period
                .unwrap_or(self.interest_rate_per_period),
            interest_rate_frequency: self.interest_rate_frequency,
            amortization: overrides.amortization.unwrap_or(self.amortization),
            interest_calculation_period: overrides
                .interest_calculation_period
                .unwrap_or(self.interest_calculation_period),
            principal_grace_periods: overrides
                .principal_grace_periods
                .unwrap_or(self.principal_grace_periods),
            interest_grace_periods: overrides
                .interest_grace_periods
                .unwrap_or(self.interest_grace_periods),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanProductConfig {
    pub name: String,
    pub principal: PrincipalRange,
    #[serde(flatten)]
    pub terms: LoanTerms,
    pub minimum_days_between_disbursal_and_first_repayment: u32,
    /// Group loans of this product may fall due on days the group does not meet.
    pub permit_unaligned_group_repayments: bool,
}

impl Default for LoanProductConfig {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            principal: PrincipalRange::new(Decimal::ONE, Decimal::from(1_000_000)),
            terms: LoanTerms::default(),
            minimum_days_between_disbursal_and_first_repayment: 0,
            permit_unaligned_group_repayments: false,
        }
    }
}

impl LoanProductConfig {
    /// Checks the product invariants, reporting every violation found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors: Vec<ValidationError> = Vec::new();
        let terms: &LoanTerms = &self.terms;

        if self.principal.min <= Decimal::ZERO || self.principal.min > self.principal.max {
            errors.push(ValidationError::new(
                ErrorCode::ProductPrincipalRange,
                format!(
                    "principal range [{}, {}] must be positive and ordered",
                    self.principal.min, self.principal.max
                ),
            ));
        }
        if terms.number_of_repayments == 0 {
            errors.push(ValidationError::new(
                ErrorCode::ProductRepaymentCount,
                "number of repayments must be at least 1",
            ));
        }
        if terms.repayment_every == 0 {
            errors.push(ValidationError::new(
                ErrorCode::ProductRepaymentEvery,
                "repayment every must be at least 1",
            ));
        }
        if terms.interest_rate_per_period.is_sign_negative() {
            errors.push(ValidationError::new(
                ErrorCode::ProductInterestRate,
                format!(
                    "interest rate {} must not be negative",
                    terms.interest_rate_per_period
                ),
            ));
        }
        if terms.number_of_repayments > 0
            && (terms.principal_grace_periods >= terms.number_of_repayments
                || terms.interest_grace_periods >= terms.number_of_repayments)
        {
            errors.push(ValidationError::new(
                ErrorCode::ProductGracePeriods,
                format!(
                    "grace periods (principal {}, interest {}) leave no installment of {} to amortize",
                    terms.principal_grace_periods,
                    terms.interest_grace_periods,
                    terms.number_of_repayments
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
