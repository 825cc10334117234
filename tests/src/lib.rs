//! Cross-crate tests of the loan engine, driven through `LoanService`.

pub mod fixtures;
mod loan;
