//! Static role → permission matrix.
//!
//! The matrix is built once per process and never mutated, so it is shared
//! by reference (or `Arc`) without any locking.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use crate::models::{Action, Permission, PermissionScope, Resource, Role};

const ORG: PermissionScope = PermissionScope::Organization;

const OWNER_GRANTS: &[Permission] = &[
    Permission::new(Resource::Task, Action::Create, ORG),
    Permission::new(Resource::Task, Action::Read, ORG),
    Permission::new(Resource::Task, Action::Update, ORG),
    Permission::new(Resource::Task, Action::Delete, ORG),
    Permission::new(Resource::User, Action::Read, ORG),
    Permission::new(Resource::User, Action::Update, ORG),
    Permission::new(Resource::User, Action::Create, ORG),
    Permission::new(Resource::Organization, Action::Update, PermissionScope::Own),
    Permission::new(Resource::Task, Action::ViewAudit, ORG),
];

const ADMIN_GRANTS: &[Permission] = &[
    Permission::new(Resource::Task, Action::Create, ORG),
    Permission::new(Resource::Task, Action::Read, ORG),
    Permission::new(Resource::Task, Action::Update, ORG),
    Permission::new(Resource::Task, Action::Delete, ORG),
    Permission::new(Resource::User, Action::Read, ORG),
    Permission::new(Resource::Task, Action::ViewAudit, ORG),
];

const VIEWER_GRANTS: &[Permission] = &[Permission::new(Resource::Task, Action::Read, ORG)];

static BUILTIN: LazyLock<Arc<PermissionMatrix>> =
    LazyLock::new(|| Arc::new(PermissionMatrix::builtin()));

/// Mapping from role to the ordered set of permissions it is granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMatrix {
    grants: BTreeMap<Role, Vec<Permission>>,
}

impl PermissionMatrix {
    /// Build the fixed matrix used by the system.
    #[must_use]
    pub fn builtin() -> Self {
        let grants = Role::ALL
            .into_iter()
            .map(|role| {
                let permissions = match role {
                    Role::Owner => OWNER_GRANTS,
                    Role::Admin => ADMIN_GRANTS,
                    Role::Viewer => VIEWER_GRANTS,
                };
                (role, permissions.to_vec())
            })
            .collect();
        Self { grants }
    }

    /// Process-wide shared instance of [`PermissionMatrix::builtin`].
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Permissions granted to a role token.
    ///
    /// The token is matched case-insensitively. Unknown or empty tokens yield
    /// an empty slice.
    #[must_use]
    pub fn permissions_for(&self, role: &str) -> &[Permission] {
        match Role::parse(role) {
            Some(role) => self.permissions_for_role(role),
            None => &[],
        }
    }

    #[must_use]
    pub fn permissions_for_role(&self, role: Role) -> &[Permission] {
        self.grants
            .get(&role)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Roles present in the matrix, broadest first.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.grants.keys().copied()
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        Self::builtin()
    }
}
