//! PEP (Policy Enforcement Point) helpers.
//!
//! - [`GuardChain`] - Authenticate → Authorize → Tenancy pipeline
//! - [`check_tenancy`] - Organization isolation check
//! - [`OperationRegistry`] - Declared requirements for every protected operation
//! - [`OrganizationResolver`] - Maps a resource id to its owning organization

pub mod chain;
pub mod registry;
pub mod tenancy;

pub use chain::GuardChain;
pub use registry::{OperationDescriptor, OperationRegistry, OrganizationResolver, TenancyBinding};
pub use tenancy::{TenancyDecision, check_tenancy};
