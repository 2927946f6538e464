//! PharmaCare - medication tracking and multi-tenant pharmacy backend
//!
//! Patients keep medications, reminders and donations; pharmacies are
//! tenants with staff rosters and bills. Every protected route is checked
//! against a single route access table before its handler runs.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and rules
//! - **policy**: Route access table and pharmacy ownership predicates
//! - **services**: Application use cases
//! - **infra**: PostgreSQL, Redis, repositories and the unit of work
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod policy;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Principal, Role, User};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
