//! Custom request extractors.
//!
//! Every rejection is an `AppError`, so malformed input always answers with
//! the `{status, message}` body.

mod params;
mod validated_json;

pub use params::{ApiPath, ApiQuery};
pub use validated_json::ValidatedJson;
