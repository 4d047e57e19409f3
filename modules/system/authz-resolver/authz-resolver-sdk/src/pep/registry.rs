//! Operation registry.
//!
//! Every protected operation declares its permission requirement and how
//! its target organization is derived. The declaration is data, so the
//! guard chain can be applied uniformly and checked for completeness.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{RegistryError, ResolveError};
use crate::models::{PermissionRequirement, Resource};

/// Where an operation's target organization comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenancyBinding {
    /// The operation does not target a specific organization.
    Unscoped,
    /// The organization id is a request path parameter.
    OrganizationParam(&'static str),
    /// The path carries a resource id; the organization is the resource's owner.
    ResourceParam {
        param: &'static str,
        resource: Resource,
    },
}

/// Static description of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub operation_id: &'static str,
    /// `None` skips the authorize stage. The chain still requires an
    /// identity; public routes bypass it in the gateway middleware.
    pub requirement: Option<PermissionRequirement>,
    pub tenancy: TenancyBinding,
}

impl OperationDescriptor {
    #[must_use]
    pub const fn new(operation_id: &'static str, requirement: PermissionRequirement) -> Self {
        Self {
            operation_id,
            requirement: Some(requirement),
            tenancy: TenancyBinding::Unscoped,
        }
    }

    #[must_use]
    pub const fn public(operation_id: &'static str) -> Self {
        Self {
            operation_id,
            requirement: None,
            tenancy: TenancyBinding::Unscoped,
        }
    }

    #[must_use]
    pub const fn with_tenancy(mut self, tenancy: TenancyBinding) -> Self {
        self.tenancy = tenancy;
        self
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.requirement.is_none()
    }

    /// Whether a successful call changes state and must be audited.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        self.requirement.is_some_and(|r| r.action.is_mutating())
    }
}

/// Lookup table of operation descriptors keyed by operation id.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    operations: HashMap<&'static str, OperationDescriptor>,
}

impl OperationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateOperation`] if the id is taken.
    pub fn register(&mut self, descriptor: OperationDescriptor) -> Result<(), RegistryError> {
        if self.operations.contains_key(descriptor.operation_id) {
            return Err(RegistryError::DuplicateOperation(
                descriptor.operation_id.to_owned(),
            ));
        }
        self.operations.insert(descriptor.operation_id, descriptor);
        Ok(())
    }

    /// Build a registry from a list of descriptors.
    ///
    /// # Errors
    ///
    /// Fails on the first duplicate operation id.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = OperationDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for d in descriptors {
            registry.register(d)?;
        }
        Ok(registry)
    }

    #[must_use]
    pub fn get(&self, operation_id: &str) -> Option<&OperationDescriptor> {
        self.operations.get(operation_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Resolves the owning organization of a resource.
///
/// Implemented by modules that own resources addressed by id in request
/// paths. `Ok(None)` means the resource does not exist.
#[async_trait]
pub trait OrganizationResolver: Send + Sync {
    async fn organization_of(&self, resource_id: Uuid) -> Result<Option<Uuid>, ResolveError>;
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::models::Action;

    const CREATE: OperationDescriptor = OperationDescriptor::new(
        "tasks.create",
        PermissionRequirement::new(Resource::Task, Action::Create),
    );
    const LIST: OperationDescriptor = OperationDescriptor::new(
        "tasks.list",
        PermissionRequirement::new(Resource::Task, Action::Read),
    );
    const HEALTH: OperationDescriptor = OperationDescriptor::public("health");

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = OperationRegistry::new();
        registry.register(CREATE).unwrap();
        let err = registry.register(CREATE).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateOperation(id) if id == "tasks.create"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_by_id() {
        let registry = OperationRegistry::from_descriptors([CREATE, LIST, HEALTH]).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("tasks.list"), Some(&LIST));
        assert!(registry.get("tasks.purge").is_none());
        assert!(registry.get("health").unwrap().is_public());
    }

    #[test]
    fn mutating_follows_the_required_action() {
        assert!(CREATE.is_mutating());
        assert!(!LIST.is_mutating());
        assert!(!HEALTH.is_mutating());
    }

    #[test]
    fn tenancy_binding_defaults_to_unscoped() {
        let scoped = LIST.with_tenancy(TenancyBinding::OrganizationParam("organization_id"));
        assert_eq!(LIST.tenancy, TenancyBinding::Unscoped);
        assert_eq!(
            scoped.tenancy,
            TenancyBinding::OrganizationParam("organization_id")
        );
    }
}
