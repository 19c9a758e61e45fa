//! Backend library modules.
//!
//! A session-authenticated HTTP API over PostgreSQL: account signup and login,
//! an identity endpoint and a city reference-data lookup.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
