//! Typed IDs for type-safe entity references.
//!
//! Entity rows are keyed by server-assigned integers. Wrapping each one in its
//! own type prevents accidentally passing a `CategoryId` where a `BudgetId` is
//! expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed integer ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw row id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the inner row id.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(BudgetId, "Unique identifier for a budget.");
typed_id!(CategoryId, "Unique identifier for a category.");
typed_id!(TransactorId, "Unique identifier for a transactor.");
typed_id!(TransactionId, "Unique identifier for a transaction.");

/// Identifier handed back when a CSV import is started.
///
/// Uses UUID v7 so job ids sort by start time in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportJobId(pub Uuid);

impl ImportJobId {
    /// Creates a new time-ordered job ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ImportJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ImportJobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
