mod client;
pub mod service;

pub use service::{ConfigError, Service, TokenClaims};
