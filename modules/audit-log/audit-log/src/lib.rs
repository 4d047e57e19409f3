#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Audit log module.
//!
//! Wires the [`AuditRecorder`](audit_log_sdk::AuditRecorder) API onto a
//! repository port. The bundled [`InMemoryAuditRepository`] keeps records
//! for the lifetime of the process.

pub mod config;
pub mod domain;
pub mod infra;

pub use config::AuditLogConfig;
pub use domain::local_client::AuditLogLocalClient;
pub use domain::repo::AuditRepository;
pub use domain::service::Service;
pub use infra::storage::memory_repo::InMemoryAuditRepository;
