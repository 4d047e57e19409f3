//! Domain models for the authorization core.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role assigned to a principal.
///
/// Ordered by privilege breadth: `Owner` ⊇ `Admin` ⊇ `Viewer`. The ordering
/// holds by construction of the permission matrix, it is not used for
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Viewer,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Owner, Self::Admin, Self::Viewer];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }

    /// Parse a role token, ignoring ASCII case.
    ///
    /// Returns `None` for anything that is not a known role, including the
    /// empty string.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

/// Resource kinds subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Task,
    User,
    Organization,
}

impl Resource {
    pub const ALL: [Self; 3] = [Self::Task, Self::User, Self::Organization];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::User => "user",
            Self::Organization => "organization",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions a permission can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    ViewAudit,
}

impl Action {
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Delete,
        Self::ViewAudit,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ViewAudit => "view_audit",
        }
    }

    /// Create, update and delete change state and must be audited.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Breadth of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionScope {
    /// The caller's own resources only.
    Own,
    /// Anything within the caller's organization.
    Organization,
    /// Unrestricted.
    All,
}

impl PermissionScope {
    /// Whether a permission with this scope satisfies `requested`.
    ///
    /// `All` satisfies every request; other scopes match by equality. An
    /// absent request is satisfied by any scope.
    #[must_use]
    pub fn satisfies(self, requested: Option<Self>) -> bool {
        match requested {
            None => true,
            Some(requested) => self == Self::All || self == requested,
        }
    }
}

/// A single grant: `(resource, action, scope)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
    pub scope: PermissionScope,
}

impl Permission {
    #[must_use]
    pub const fn new(resource: Resource, action: Action, scope: PermissionScope) -> Self {
        Self {
            resource,
            action,
            scope,
        }
    }

    /// Whether this grant covers the requested resource, action and scope.
    #[must_use]
    pub fn grants(
        &self,
        resource: Resource,
        action: Action,
        scope: Option<PermissionScope>,
    ) -> bool {
        self.resource == resource && self.action == action && self.scope.satisfies(scope)
    }
}

/// Permission an operation requires from its caller.
///
/// Declared once with the operation and evaluated on every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRequirement {
    pub resource: Resource,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<PermissionScope>,
}

impl PermissionRequirement {
    #[must_use]
    pub const fn new(resource: Resource, action: Action) -> Self {
        Self {
            resource,
            action,
            scope: None,
        }
    }

    #[must_use]
    pub const fn with_scope(mut self, scope: PermissionScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

impl fmt::Display for PermissionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.action, self.resource)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn role_parse_ignores_case() {
        assert_eq!(Role::parse("owner"), Some(Role::Owner));
        assert_eq!(Role::parse("OWNER"), Some(Role::Owner));
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse("vIeWeR"), Some(Role::Viewer));
    }

    #[test]
    fn role_parse_rejects_unknown_and_empty() {
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(" owner"), None);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn scope_all_satisfies_everything() {
        for requested in [
            None,
            Some(PermissionScope::Own),
            Some(PermissionScope::Organization),
            Some(PermissionScope::All),
        ] {
            assert!(PermissionScope::All.satisfies(requested));
        }
    }

    #[test]
    fn narrower_scopes_match_by_equality() {
        assert!(PermissionScope::Organization.satisfies(None));
        assert!(PermissionScope::Organization.satisfies(Some(PermissionScope::Organization)));
        assert!(!PermissionScope::Organization.satisfies(Some(PermissionScope::Own)));
        assert!(!PermissionScope::Organization.satisfies(Some(PermissionScope::All)));
        assert!(!PermissionScope::Own.satisfies(Some(PermissionScope::Organization)));
    }

    #[test]
    fn only_create_update_delete_are_mutating() {
        let mutating: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|a| a.is_mutating())
            .collect();
        assert_eq!(mutating, vec![Action::Create, Action::Update, Action::Delete]);
    }

    #[test]
    fn requirement_display_names_action_and_resource() {
        let req = PermissionRequirement::new(Resource::Task, Action::ViewAudit);
        assert_eq!(req.to_string(), "view_audit on task");
    }

    #[test]
    fn wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_value(Action::ViewAudit).ok(),
            Some(serde_json::Value::String("view_audit".to_owned()))
        );
    }
}
