//! Authorization policy.
//!
//! [`rules`] maps every protected route to an [`AccessRule`]; [`ownership`]
//! answers the pharmacy-scoped questions those rules ask.

pub mod ownership;
pub mod rules;

pub use ownership::{OwnershipPredicates, PharmacyAccess};
pub use rules::{evaluate, rule_for, AccessRule, Scope};

#[cfg(any(test, feature = "test-utils"))]
pub use ownership::MockOwnershipPredicates;
