//! REST API module for Cadence.
//!
//! Exposes the scheduler over HTTP as JSON endpoints, nested under
//! `/api/v1`, for web clients and service integrations.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
