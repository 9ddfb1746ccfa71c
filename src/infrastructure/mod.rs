//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP binding of the backend API and the
//! logging setup.

pub mod http;
pub mod logging;

#[cfg(test)]
pub mod fake;

pub use http::*;
pub use logging::*;
