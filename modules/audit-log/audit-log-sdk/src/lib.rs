#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Audit Log SDK
//!
//! - [`AuditRecorder`] - Append and read audit records
//! - [`AuditRecord`], [`NewAuditRecord`], [`AuditOutcome`] - Record models
//! - [`AuditLogError`] - Error types
//!
//! Every attempted mutating operation appends exactly one record once its
//! outcome is known:
//!
//! ```ignore
//! let outcome = self.do_create(ctx, input).await;
//! let entry = match &outcome {
//!     Ok(task) => NewAuditRecord::success(Action::Create, Resource::Task, Some(task.id.to_string())),
//!     Err(e) => NewAuditRecord::failure(Action::Create, Resource::Task, None).with_details(e.to_string()),
//! };
//! audit.record(ctx, entry).await?;
//! ```

pub mod api;
pub mod error;
pub mod models;

pub use api::AuditRecorder;
pub use error::AuditLogError;
pub use models::{AuditOutcome, AuditRecord, NewAuditRecord};
