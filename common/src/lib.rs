//! # Lendr Common
//!
//! Shared vocabulary of the loan workspace: the domain models, the outbound
//! calendar port and the error taxonomy.
//!
//! Nothing in this crate performs I/O. The engine in `lendr-core` consumes these
//! types and the CLI renders them.
//!
//! ## Contents
//! * **[`loan`]**: products, applications, schedules and lifecycle status.
//! * **[`calendar`]**: group meeting calendars and the [`calendar::CalendarService`] port.
//! * **[`error`]**: validation codes and the [`error::LoanError`] taxonomy.
//! * **[`config`]**: engine settings.

pub mod calendar;
pub mod config;
pub mod error;
pub mod ids;
pub mod loan;
pub mod money;
