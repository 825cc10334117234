use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One installment of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based position in the schedule.
    pub number: u32,
    /// Start of the period this installment covers (the disbursement date for the first).
    pub from_date: NaiveDate,
    pub due_date: NaiveDate,
    pub principal_due: Decimal,
    pub interest_due: Decimal,
    /// Principal still owed once this installment is paid.
    pub outstanding_balance: Decimal,
}

impl Installment {
    pub fn total_due(&self) -> Decimal {
        self.principal_due + self.interest_due
    }
}

/// Ordered installments of a validated application.
///
/// Principal components sum to the loan principal and due dates are strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentSchedule {
    pub principal: Decimal,
    pub installments: Vec<Installment>,
}

impl RepaymentSchedule {
    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    pub fn first_due_date(&self) -> Option<NaiveDate> {
        self.installments.first().map(|installment| installment.due_date)
    }

    pub fn last_due_date(&self) -> Option<NaiveDate> {
        self.installments.last().map(|installment| installment.due_date)
    }

    pub fn due_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.installments.iter().map(|installment| installment.due_date)
    }

    pub fn total_principal(&self) -> Decimal {
        self.installments.iter().map(|i| i.principal_due).sum()
    }

    pub fn total_interest(&self) -> Decimal {
        self.installments.iter().map(|i| i.interest_due).sum()
    }

    pub fn total_due(&self) -> Decimal {
        self.total_principal() + self.total_interest()
    }
}
