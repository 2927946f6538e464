//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod bill;
pub mod donation;
pub mod medication;
pub mod pharmacy;
pub mod pharmacy_staff;
pub mod reminder;
pub mod user;
pub mod user_role;
