//! API middleware.
//!
//! Protected routes run, outermost first: rate limit, authentication,
//! authorization.

mod auth;
mod authorize;
mod rate_limit;

pub use auth::auth_middleware;
pub use authorize::authorize_middleware;
pub use rate_limit::{rate_limit_auth_middleware, rate_limit_middleware, RateLimitError};
