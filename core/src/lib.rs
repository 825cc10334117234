//! # Lendr Core
//!
//! The validation-and-scheduling engine of the loan workspace.
//!
//! ## Modules
//! * **[`schedule`]**: pure repayment schedule generation.
//! * **[`validation`]**: checks a submission against its product and the group calendar.
//! * **[`lifecycle`]**: the loan state machine.
//! * **[`calendar`]**: recurring meeting resolution and an in-memory [`CalendarService`] adapter.
//! * **[`service`]**: the [`service::LoanService`] entry point, backed by the
//!   [`products`] registry and the versioned [`store`].
//!
//! [`CalendarService`]: lendr_common::calendar::CalendarService

pub mod calendar;
pub mod lifecycle;
pub mod products;
pub mod schedule;
pub mod service;
pub mod store;
pub mod validation;

pub use service::LoanService;
