use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a loan application.
///
/// There is no state for an application rejected at creation: such an application is
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Pending,
    Approved,
    Active,
    Rejected,
    Withdrawn,
}

/// Requested lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    Approve,
    Disburse,
    Reject,
    Withdraw,
}

impl LoanStatus {
    /// Status reached by applying `transition`, or `None` when it is not legal from `self`.
    pub fn after(self, transition: Transition) -> Option<LoanStatus> {
        match (self, transition) {
            (LoanStatus::Pending, Transition::Approve) => Some(LoanStatus::Approved),
            (LoanStatus::Pending, Transition::Reject) => Some(LoanStatus::Rejected),
            (LoanStatus::Pending, Transition::Withdraw) => Some(LoanStatus::Withdrawn),
            (LoanStatus::Approved, Transition::Disburse) => Some(LoanStatus::Active),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LoanStatus::Active | LoanStatus::Rejected | LoanStatus::Withdrawn
        )
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Active => "active",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Withdrawn => "withdrawn",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transition::Approve => "approve",
            Transition::Disburse => "disburse",
            Transition::Reject => "reject",
            Transition::Withdraw => "withdraw",
        };
        f.write_str(name)
    }
}
