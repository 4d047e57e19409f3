#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Tasks module.
//!
//! Every read and write is confined to the caller's organization. Each
//! create, update, delete or reorder attempt appends exactly one audit
//! record, whether it succeeds or fails.

pub mod config;
pub mod domain;
pub mod infra;

pub use config::TasksConfig;
pub use domain::error::DomainError;
pub use domain::fields::{MAX_ORDER, TaskFields};
pub use domain::models::{NewTask, ReorderEntry, Task, TaskPatch, TaskStatus};
pub use domain::repo::TaskRepository;
pub use domain::resolver::TaskOrganizationResolver;
pub use domain::service::Service;
pub use infra::storage::memory_repo::InMemoryTaskRepository;
