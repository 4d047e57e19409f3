#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Properties of the fixed matrix and the guard chain as a whole.

use authz_resolver_sdk::{
    Action, DenyReason, GuardChain, GuardError, GuardStage, OperationDescriptor,
    PermissionMatrix, PermissionRequirement, PermissionScope, Resource, Role, TenancyDecision,
    check_tenancy, is_authorized,
};
use chrono::{Duration, Utc};
use taskhub_security::IdentityContext;
use uuid::Uuid;

const ROLES: [&str; 3] = ["owner", "admin", "viewer"];

fn live_identity(org: Uuid, role: &str) -> IdentityContext {
    let now = Utc::now();
    IdentityContext::builder()
        .subject_id(Uuid::new_v4())
        .organization_id(org)
        .role(role)
        .issued_at(now)
        .expires_at(now + Duration::hours(1))
        .build()
}

#[test]
fn pairs_outside_the_matrix_are_denied() {
    let matrix = PermissionMatrix::builtin();
    for role in ROLES {
        let granted = matrix.permissions_for(role);
        for resource in Resource::ALL {
            for action in Action::ALL {
                let listed = granted
                    .iter()
                    .any(|p| p.resource == resource && p.action == action);
                assert_eq!(
                    is_authorized(role, resource, action, None),
                    listed,
                    "{role}: {action} on {resource}"
                );
            }
        }
    }
}

#[test]
fn grants_are_monotonic_up_the_hierarchy() {
    let matrix = PermissionMatrix::builtin();
    let pairs = [(Role::Viewer, Role::Admin), (Role::Admin, Role::Owner)];
    for (narrow, broad) in pairs {
        for p in matrix.permissions_for_role(narrow) {
            assert!(
                is_authorized(broad.as_str(), p.resource, p.action, Some(p.scope)),
                "{broad} lacks {p:?} held by {narrow}"
            );
        }
    }
}

#[test]
fn no_role_can_delete_users() {
    for role in ROLES {
        assert!(!is_authorized(role, Resource::User, Action::Delete, None));
    }
}

#[test]
fn tenancy_isolation_holds_for_every_role() {
    let chain = GuardChain::default();
    let read = PermissionRequirement::new(Resource::Task, Action::Read);
    for role in ROLES {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let ctx = live_identity(a, role);
        assert_eq!(check_tenancy(&ctx, Some(b)), TenancyDecision::Deny);
        assert_eq!(
            chain.run(Some(&ctx), Some(&read), Some(b)).unwrap_err(),
            GuardError::Forbidden(DenyReason::OrganizationMismatch)
        );
    }
}

#[test]
fn authentication_is_checked_first() {
    let chain = GuardChain::default();
    let create = PermissionRequirement::new(Resource::Task, Action::Create);
    let expired = IdentityContext::builder()
        .subject_id(Uuid::new_v4())
        .organization_id(Uuid::new_v4())
        .role("viewer")
        .issued_at(Utc::now() - Duration::hours(2))
        .expires_at(Utc::now() - Duration::hours(1))
        .build();

    let err = chain
        .run(Some(&expired), Some(&create), Some(Uuid::new_v4()))
        .unwrap_err();
    assert_eq!(err, GuardError::Unauthenticated);
    assert_eq!(err.stage(), GuardStage::Authenticate);
}

#[test]
fn evaluation_is_idempotent() {
    for role in ["owner", "ADMIN", "viewer", "", "ghost"] {
        for resource in Resource::ALL {
            for action in Action::ALL {
                let first = is_authorized(role, resource, action, None);
                let second = is_authorized(role, resource, action, None);
                assert_eq!(first, second);
            }
        }
    }
}

#[test]
fn scenario_viewer_reads_tasks() {
    assert!(is_authorized("viewer", Resource::Task, Action::Read, None));
}

#[test]
fn scenario_viewer_cannot_create_tasks() {
    assert!(!is_authorized("viewer", Resource::Task, Action::Create, None));
}

#[test]
fn scenario_admin_cannot_delete_users() {
    assert!(!is_authorized("admin", Resource::User, Action::Delete, None));
}

#[test]
fn scenario_owner_is_confined_to_own_organization() {
    let (org_1, org_2) = (Uuid::new_v4(), Uuid::new_v4());
    let owner = live_identity(org_1, "owner");
    let update = OperationDescriptor::new(
        "tasks.update",
        PermissionRequirement::new(Resource::Task, Action::Update),
    );

    assert!(is_authorized("owner", Resource::Task, Action::Update, None));
    assert!(GuardChain::default().admit(Some(&owner), &update, Some(org_1)).is_ok());
    assert_eq!(
        GuardChain::default()
            .admit(Some(&owner), &update, Some(org_2))
            .unwrap_err()
            .stage(),
        GuardStage::Tenancy
    );
}

#[test]
fn scenario_role_token_case_is_ignored() {
    let matrix = PermissionMatrix::builtin();
    assert_eq!(matrix.permissions_for("OWNER"), matrix.permissions_for("owner"));
    for resource in Resource::ALL {
        for action in Action::ALL {
            for scope in [None, Some(PermissionScope::Own), Some(PermissionScope::All)] {
                assert_eq!(
                    is_authorized("OWNER", resource, action, scope),
                    is_authorized("owner", resource, action, scope)
                );
            }
        }
    }
}

#[test]
fn denial_messages_do_not_carry_identifiers() {
    let chain = GuardChain::default();
    let foreign = Uuid::new_v4();
    let ctx = live_identity(Uuid::new_v4(), "owner");
    let err = chain.run(Some(&ctx), None, Some(foreign)).unwrap_err();

    let message = err.to_string();
    assert_eq!(message, "Cannot access resources from other organizations");
    assert!(!message.contains(&foreign.to_string()));
    assert!(!message.contains(&ctx.organization_id().to_string()));
}
