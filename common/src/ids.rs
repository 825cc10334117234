//! Typed identifiers.
//!
//! Every aggregate and external entity is referenced through its own newtype so a
//! `GroupId` can never be passed where a `LoanId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

identifier!(
    /// Key of an immutable loan product.
    ProductId
);
identifier!(
    /// Key of a loan application aggregate.
    LoanId
);
identifier!(
    /// Client owning an application. Managed outside this workspace.
    ClientId
);
identifier!(
    /// Group an application is linked to. Managed outside this workspace.
    GroupId
);
identifier!(
    /// Meeting calendar of a group.
    CalendarId
);
identifier!(
    /// Client collateral attached to an application by reference.
    CollateralId
);
