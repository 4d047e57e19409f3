//! Authorization evaluator.
//!
//! A pure decision over the permission matrix: no I/O, no hidden state,
//! identical inputs always give identical answers.

use std::sync::Arc;

use crate::matrix::PermissionMatrix;
use crate::models::{Action, PermissionRequirement, PermissionScope, Resource};

/// Evaluates `(role, resource, action[, scope])` against a shared matrix.
///
/// Cheap to clone (`Arc` inside).
#[derive(Debug, Clone)]
pub struct Authorizer {
    matrix: Arc<PermissionMatrix>,
}

impl Authorizer {
    #[must_use]
    pub fn new(matrix: Arc<PermissionMatrix>) -> Self {
        Self { matrix }
    }

    #[must_use]
    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    /// Returns `true` iff the role holds a permission for `resource` and
    /// `action` whose scope satisfies `scope`.
    ///
    /// Empty or unrecognized roles are always denied.
    #[must_use]
    pub fn is_authorized(
        &self,
        role: &str,
        resource: Resource,
        action: Action,
        scope: Option<PermissionScope>,
    ) -> bool {
        self.matrix
            .permissions_for(role)
            .iter()
            .any(|p| p.grants(resource, action, scope))
    }

    #[must_use]
    pub fn satisfies(&self, role: &str, requirement: &PermissionRequirement) -> bool {
        self.is_authorized(
            role,
            requirement.resource,
            requirement.action,
            requirement.scope,
        )
    }
}

impl Default for Authorizer {
    fn default() -> Self {
        Self::new(PermissionMatrix::shared())
    }
}

/// Standalone predicate over the built-in matrix.
///
/// Usable outside the guard chain, e.g. to decide what to show a caller.
#[must_use]
pub fn is_authorized(
    role: &str,
    resource: Resource,
    action: Action,
    scope: Option<PermissionScope>,
) -> bool {
    Authorizer::default().is_authorized(role, resource, action, scope)
}
