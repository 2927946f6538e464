//! HTTP request handlers.

pub mod analytics_handler;
pub mod auth_handler;
pub mod donation_handler;
pub mod medication_handler;
pub mod pharmacy_handler;
pub mod reminder_handler;
pub mod rewards_handler;
pub mod user_handler;

pub use analytics_handler::analytics_routes;
pub use auth_handler::{auth_routes, session_routes};
pub use donation_handler::donation_routes;
pub use medication_handler::medication_routes;
pub use pharmacy_handler::pharmacy_routes;
pub use reminder_handler::reminder_routes;
pub use rewards_handler::rewards_routes;
pub use user_handler::user_routes;
