//! # Loan Models
//!
//! Entities and value objects of the loan domain.
//!
//! ## Entities
//! * [`product::LoanProductConfig`]: immutable product configuration.
//! * [`application::LoanApplication`]: the lifecycle aggregate of a single loan.
//!
//! ## Value Objects
//! * [`product::LoanTerms`]: effective repayment terms of one application.
//! * [`schedule::RepaymentSchedule`]: ordered installments of a validated application.
//! * [`status::LoanStatus`]: lifecycle states and their legal transitions.

pub mod application;
pub mod product;
pub mod schedule;
pub mod status;
