//! `AuthN` Resolver SDK
//!
//! The boundary between raw credentials and the authorization core:
//!
//! - [`AuthNResolverClient`] - Validates a bearer token
//! - [`AuthenticationResult`] - The resulting [`IdentityContext`](taskhub_security::IdentityContext)
//! - [`AuthNResolverError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authn_resolver_sdk::AuthNResolverClient;
//!
//! let authn: Arc<dyn AuthNResolverClient> = Arc::new(static_authn_plugin::Service::from_config(&cfg));
//!
//! let result = authn.authenticate("xyz...").await?;
//! let identity = result.identity;
//! ```

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::AuthNResolverClient;
pub use error::AuthNResolverError;
pub use models::AuthenticationResult;
