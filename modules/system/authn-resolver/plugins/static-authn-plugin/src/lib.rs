#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static `AuthN` Plugin
//!
//! Static token-to-identity mapping for development and testing.
//!
//! ## Modes
//!
//! - **`accept_all`** (default): Accepts any non-empty token, returns the configured default identity.
//! - **`static_tokens`**: Maps specific tokens to specific identities. Useful for E2E tests
//!   with distinct users, roles and organizations.
//!
//! ## Configuration
//!
//! ```yaml
//! authn:
//!   mode: static
//!   static:
//!     mode: static_tokens
//!     tokens:
//!       - token: "owner-token"
//!         identity:
//!           subject_id: "11111111-6a88-4768-9dfc-6bcd5187d9ed"
//!           organization_id: "00000000-df51-5b42-9538-d2b56b7ee953"
//!           role: owner
//!           ttl_secs: 3600
//! ```

pub mod config;
pub mod domain;

pub use config::StaticAuthNPluginConfig;
pub use domain::Service;
