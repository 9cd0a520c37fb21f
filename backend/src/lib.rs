//! Timesheet backend library.
//!
//! Domain entities and services live in [`domain`]; [`inbound`] exposes them
//! over HTTP and [`outbound`] implements the driven ports with PostgreSQL and
//! SMTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
