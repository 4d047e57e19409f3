//! RFC 9457 problem details.
//!
//! Refusals from the guard middleware and errors from registered operations,
//! including undecodable request input, are rendered as
//! `application/problem+json`.
//! Details describe the failed check, never the tenant or resource ids the
//! caller supplied.

use audit_log_sdk::AuditLogError;
use authz_resolver_sdk::{GuardError, GuardStage};
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use serde::Serialize;
use tasks::DomainError;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    /// Guard chain stage that refused the request, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<GuardStage>,
}

impl Problem {
    #[must_use]
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            check: None,
        }
    }

    #[must_use]
    pub fn with_check(mut self, stage: GuardStage) -> Self {
        self.check = Some(stage);
        self
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub(crate) fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable", detail)
    }

    pub(crate) fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            detail,
        )
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

impl From<&GuardError> for Problem {
    fn from(err: &GuardError) -> Self {
        let (status, title) = match err {
            GuardError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            GuardError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
        };
        Self::new(status, title, err.to_string()).with_check(err.stage())
    }
}

impl From<GuardError> for Problem {
    fn from(err: GuardError) -> Self {
        Self::from(&err)
    }
}

impl From<AuditLogError> for Problem {
    fn from(err: AuditLogError) -> Self {
        match err {
            AuditLogError::Denied(guard) => Self::from(&guard),
            AuditLogError::Unavailable(msg) => {
                tracing::error!(error = %msg, "audit store unavailable");
                Self::service_unavailable("Audit trail unavailable")
            }
            AuditLogError::Internal(msg) => {
                tracing::error!(error = %msg, "audit store internal error");
                Self::internal("Internal audit error")
            }
        }
    }
}

impl From<DomainError> for Problem {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not Found", err.to_string()),
            DomainError::Validation { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "Bad Request", err.to_string())
            }
            DomainError::Audit(audit) => Self::from(audit),
            DomainError::Unavailable(msg) => {
                tracing::error!(error = %msg, "task storage unavailable");
                Self::service_unavailable("Task storage unavailable")
            }
            DomainError::Internal(msg) => {
                tracing::error!(error = %msg, "task module internal error");
                Self::internal("Internal error")
            }
        }
    }
}
