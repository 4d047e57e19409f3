//! Audit record models.

use authz_resolver_sdk::{Action, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of the audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Failure,
}

/// An immutable audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub actor_subject_id: Uuid,
    pub action: Action,
    pub resource_type: Resource,
    /// Absent when the operation failed before the resource had an id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub outcome: AuditOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// What the caller supplies; actor, organization, id and timestamp are
/// filled in by the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditRecord {
    pub action: Action,
    pub resource_type: Resource,
    pub resource_id: Option<String>,
    pub outcome: AuditOutcome,
    pub details: Option<String>,
}

impl NewAuditRecord {
    #[must_use]
    pub fn success(action: Action, resource_type: Resource, resource_id: Option<String>) -> Self {
        Self {
            action,
            resource_type,
            resource_id,
            outcome: AuditOutcome::Success,
            details: None,
        }
    }

    #[must_use]
    pub fn failure(action: Action, resource_type: Resource, resource_id: Option<String>) -> Self {
        Self {
            outcome: AuditOutcome::Failure,
            ..Self::success(action, resource_type, resource_id)
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
