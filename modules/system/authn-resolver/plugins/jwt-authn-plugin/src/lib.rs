#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! JWT `AuthN` Plugin
//!
//! Validates HS256-signed bearer tokens issued by the login service and maps
//! their claims onto an [`IdentityContext`](taskhub_security::IdentityContext).
//!
//! Token payload:
//!
//! ```json
//! {
//!   "sub": "<user uuid>",
//!   "email": "alice@example.com",
//!   "organizationId": "<organization uuid>",
//!   "role": "admin",
//!   "iat": 1700000000,
//!   "exp": 1700003600
//! }
//! ```
//!
//! Expiry is carried into the identity but not rejected here; the guard
//! chain's authenticate stage is the single place that enforces it.
//! An optional `nbf` claim is enforced here, with `leeway_secs` of clock
//! skew.

pub mod config;
pub mod domain;

pub use config::JwtAuthNPluginConfig;
pub use domain::{ConfigError, Service, TokenClaims};
