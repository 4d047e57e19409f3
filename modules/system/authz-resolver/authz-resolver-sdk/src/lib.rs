#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthZ` core SDK
//!
//! This crate provides the authorization core shared by every protected
//! operation:
//!
//! - [`PermissionMatrix`] - Static role → permission table
//! - [`Authorizer`], [`is_authorized`] - Pure allow/deny evaluation
//! - [`pep::check_tenancy`] - Organization isolation check
//! - [`GuardChain`] - Authenticate → Authorize → Tenancy pipeline
//! - [`OperationRegistry`], [`OperationDescriptor`] - Per-operation requirements
//! - [`GuardError`] - Denial taxonomy
//!
//! ## Usage
//!
//! ```ignore
//! use authz_resolver_sdk::{
//!     Action, GuardChain, OperationDescriptor, PermissionRequirement, Resource,
//! };
//!
//! const CREATE_TASK: OperationDescriptor = OperationDescriptor::new(
//!     "tasks.create",
//!     PermissionRequirement::new(Resource::Task, Action::Create),
//! );
//!
//! // Build once at start-up, share across requests.
//! let chain = GuardChain::default();
//!
//! // Per request: identity from the authenticator, optional organization id
//! // extracted from the request path.
//! let identity = chain.admit(identity.as_ref(), &CREATE_TASK, None)?;
//! ```

pub mod error;
pub mod evaluator;
pub mod matrix;
pub mod models;
pub mod pep;

// Re-export main types at crate root
pub use error::{DenyReason, GuardError, GuardStage, RegistryError, ResolveError};
pub use evaluator::{Authorizer, is_authorized};
pub use matrix::PermissionMatrix;
pub use models::{Action, Permission, PermissionRequirement, PermissionScope, Resource, Role};
pub use pep::{
    GuardChain, OperationDescriptor, OperationRegistry, OrganizationResolver, TenancyBinding,
    TenancyDecision, check_tenancy,
};
