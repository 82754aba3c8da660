//! Placement experience repository backend.
//!
//! Students publish interview experiences (interviews with nested rounds and
//! questions); verifiers accept or reject them before they become public.
//! The crate follows a hexagonal layout: [`domain`] holds the aggregate,
//! services and ports, [`inbound`] the HTTP adapter, and [`outbound`] the
//! store, mail, password and poster adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
