#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! API gateway.
//!
//! Serves the task and audit APIs over HTTP. Every registered operation is
//! admitted by the guard chain (authenticate, authorize, tenancy) before
//! its handler runs; refusals are rendered as RFC 9457 problem details.

pub mod auth;
pub mod config;
pub mod gateway;
pub mod problem;
pub mod routes;

pub use config::ApiGatewayConfig;
pub use gateway::ApiGateway;
pub use problem::Problem;
