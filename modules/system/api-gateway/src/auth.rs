use std::collections::HashMap;
use std::sync::Arc;

use audit_log_sdk::{AuditRecorder, NewAuditRecord};
use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError};
use authz_resolver_sdk::{
    DenyReason, GuardChain, GuardError, OperationDescriptor, OperationRegistry,
    OrganizationResolver, Resource, ResolveError, TenancyBinding,
};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, Method, header};
use taskhub_security::IdentityContext;
use uuid::Uuid;

use crate::problem::Problem;

/// Route matcher for one HTTP method, yielding operation ids.
#[derive(Clone)]
struct RouteMatcher {
    matcher: matchit::Router<&'static str>,
}

impl RouteMatcher {
    fn new() -> Self {
        Self {
            matcher: matchit::Router::new(),
        }
    }

    fn insert(&mut self, path: &str, operation_id: &'static str) -> Result<(), matchit::InsertError> {
        self.matcher.insert(path, operation_id)
    }
}

/// An operation matched against a concrete request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedOperation {
    pub descriptor: OperationDescriptor,
    /// Raw value of the path parameter named by the tenancy binding.
    pub tenancy_param: Option<String>,
}

/// `(method, path)` → registered operation.
#[derive(Clone)]
pub struct OperationTable {
    matchers: Arc<HashMap<Method, RouteMatcher>>,
    registry: Arc<OperationRegistry>,
}

impl OperationTable {
    /// Build the table from `(method, path template, operation id)` triples.
    ///
    /// # Errors
    ///
    /// Fails if a path template is rejected by the matcher or an operation id
    /// has no descriptor in `registry`.
    pub fn build<'a>(
        registry: OperationRegistry,
        routes: impl IntoIterator<Item = (Method, &'a str, &'static str)>,
    ) -> anyhow::Result<Self> {
        let mut matchers: HashMap<Method, RouteMatcher> = HashMap::new();
        for (method, path, operation_id) in routes {
            if registry.get(operation_id).is_none() {
                anyhow::bail!("route {method} {path} names unregistered operation '{operation_id}'");
            }
            matchers
                .entry(method)
                .or_insert_with(RouteMatcher::new)
                .insert(path, operation_id)
                .map_err(|e| anyhow::anyhow!("Failed to insert route pattern '{path}': {e}"))?;
        }
        Ok(Self {
            matchers: Arc::new(matchers),
            registry: Arc::new(registry),
        })
    }

    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<MatchedOperation> {
        let matched = self.matchers.get(method)?.matcher.at(path).ok()?;
        let descriptor = *self.registry.get(matched.value)?;
        let tenancy_param = match descriptor.tenancy {
            TenancyBinding::Unscoped => None,
            TenancyBinding::OrganizationParam(param)
            | TenancyBinding::ResourceParam { param, .. } => {
                matched.params.get(param).map(str::to_owned)
            }
        };
        Some(MatchedOperation {
            descriptor,
            tenancy_param,
        })
    }
}

/// Shared state for the guard middleware.
#[derive(Clone)]
pub struct GuardState {
    pub authn_client: Arc<dyn AuthNResolverClient>,
    pub chain: GuardChain,
    pub operations: OperationTable,
    pub resolvers: Arc<HashMap<Resource, Arc<dyn OrganizationResolver>>>,
    pub audit: Arc<dyn AuditRecorder>,
    /// Append a failure record when a mutating operation is refused.
    pub record_denials: bool,
}

/// Guard middleware: authenticates the bearer token and runs the guard
/// chain for the matched operation.
///
/// For each request:
/// 1. Skips CORS preflight and routes without a registered operation
/// 2. Lets public operations through without touching the token
/// 3. Resolves the token to an identity; a missing or rejected token
///    leaves the identity absent
/// 4. Runs authentication and authorization, then looks up the target
///    organization and runs the full chain
/// 5. Inserts the admitted `IdentityContext` for the handler
pub async fn guard_middleware(
    State(state): State<GuardState>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    let Some(matched) = state.operations.resolve(req.method(), req.uri().path()) else {
        return next.run(req).await;
    };
    let operation = matched.descriptor;
    if operation.is_public() {
        return next.run(req).await;
    }

    let identity = match state.authenticate(req.headers()).await {
        Ok(identity) => identity,
        Err(problem) => return problem.into_response(),
    };

    // No ownership lookup until the caller is authenticated and authorized.
    if let Err(err) = state.chain.admit(identity.as_ref(), &operation, None) {
        return state.deny(identity.as_ref(), &matched, &err).await;
    }

    let organization_id = match state.target_organization(&matched).await {
        Ok(org) => org,
        Err(TargetError::Denied(err)) => {
            return state.deny(identity.as_ref(), &matched, &err).await;
        }
        Err(TargetError::Lookup(err)) => return resolve_error_to_problem(&err).into_response(),
    };

    match state.chain.admit(identity.as_ref(), &operation, organization_id) {
        Ok(admitted) => {
            let admitted = admitted.clone();
            req.extensions_mut().insert(admitted);
            next.run(req).await
        }
        Err(err) => state.deny(identity.as_ref(), &matched, &err).await,
    }
}

enum TargetError {
    Denied(GuardError),
    Lookup(ResolveError),
}

impl GuardState {
    /// Resolve the bearer token, if any.
    ///
    /// A missing or rejected token yields `Ok(None)`; the guard chain turns
    /// that into `Unauthenticated`. Resolver outages short-circuit with an
    /// error response.
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<IdentityContext>, Problem> {
        let Some(token) = extract_bearer_token(headers) else {
            return Ok(None);
        };
        match self.authn_client.authenticate(token).await {
            Ok(result) => Ok(Some(result.identity)),
            Err(AuthNResolverError::Unauthorized(msg)) => {
                tracing::debug!("AuthN rejected: {msg}");
                Ok(None)
            }
            Err(err) => Err(authn_error_to_problem(&err)),
        }
    }

    async fn target_organization(
        &self,
        matched: &MatchedOperation,
    ) -> Result<Option<Uuid>, TargetError> {
        let raw = matched.tenancy_param.as_deref();
        match matched.descriptor.tenancy {
            TenancyBinding::Unscoped => Ok(None),
            TenancyBinding::OrganizationParam(_) => match raw.map(Uuid::parse_str) {
                None => Ok(None),
                Some(Ok(org)) => Ok(Some(org)),
                Some(Err(_)) => Err(TargetError::Denied(GuardError::Forbidden(
                    DenyReason::OrganizationMismatch,
                ))),
            },
            TenancyBinding::ResourceParam { resource, .. } => {
                // A malformed id cannot name an existing resource; the
                // handler reports it.
                let Some(id) = raw.and_then(|r| Uuid::parse_str(r).ok()) else {
                    return Ok(None);
                };
                let Some(resolver) = self.resolvers.get(&resource) else {
                    return Err(TargetError::Lookup(ResolveError::Internal(format!(
                        "no organization resolver for {resource}"
                    ))));
                };
                resolver
                    .organization_of(id)
                    .await
                    .map_err(TargetError::Lookup)
            }
        }
    }

    /// Render a denial, recording it first when configured to.
    async fn deny(
        &self,
        identity: Option<&IdentityContext>,
        matched: &MatchedOperation,
        err: &GuardError,
    ) -> Response {
        if self.record_denials
            && matched.descriptor.is_mutating()
            && let GuardError::Forbidden(_) = err
            && let Some(actor) = identity
            && let Some(req) = matched.descriptor.requirement
        {
            let resource_id = match matched.descriptor.tenancy {
                TenancyBinding::ResourceParam { .. } => matched.tenancy_param.clone(),
                _ => None,
            };
            let entry = NewAuditRecord::failure(req.action, req.resource, resource_id)
                .with_details(err.to_string());
            if let Err(audit_err) = self.audit.record(actor, entry).await {
                tracing::error!(
                    operation = matched.descriptor.operation_id,
                    error = %audit_err,
                    "failed to record denial"
                );
            }
        }
        Problem::from(err).into_response()
    }
}

/// Convert `AuthNResolverError` to RFC-9457 Problem Details.
fn authn_error_to_problem(err: &AuthNResolverError) -> Problem {
    log_authn_error(err);
    match err {
        AuthNResolverError::Unauthorized(_) => Problem::from(GuardError::Unauthenticated),
        AuthNResolverError::ServiceUnavailable(_) => {
            Problem::service_unavailable("Authentication service unavailable")
        }
        AuthNResolverError::Internal(_) => Problem::internal("Internal authentication error"),
    }
}

/// Log authentication errors at appropriate levels.
///
/// Cognitive complexity is inflated by tracing macro expansion.
#[allow(clippy::cognitive_complexity)]
fn log_authn_error(err: &AuthNResolverError) {
    match err {
        AuthNResolverError::Unauthorized(msg) => tracing::debug!("AuthN rejected: {msg}"),
        AuthNResolverError::ServiceUnavailable(msg) => {
            tracing::error!("AuthN service unavailable: {msg}");
        }
        AuthNResolverError::Internal(msg) => tracing::error!("AuthN internal error: {msg}"),
    }
}

fn resolve_error_to_problem(err: &ResolveError) -> Problem {
    tracing::error!(error = %err, "organization lookup failed");
    match err {
        ResolveError::Unavailable(_) => Problem::service_unavailable("Resource lookup unavailable"),
        ResolveError::Internal(_) => Problem::internal("Internal error"),
    }
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
        .filter(|t| !t.is_empty())
}

/// Check if this is a CORS preflight request
///
/// Preflight requests are OPTIONS requests with:
/// - Origin header present
/// - Access-Control-Request-Method header present
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use authz_resolver_sdk::{Action, PermissionRequirement};
    use http::HeaderValue;

    use super::*;

    const READ: PermissionRequirement = PermissionRequirement::new(Resource::Task, Action::Read);

    fn table() -> OperationTable {
        let registry = OperationRegistry::from_descriptors([
            OperationDescriptor::public("health"),
            OperationDescriptor::new("tasks.get", READ).with_tenancy(
                TenancyBinding::ResourceParam {
                    param: "id",
                    resource: Resource::Task,
                },
            ),
            OperationDescriptor::new("tasks.org", READ)
                .with_tenancy(TenancyBinding::OrganizationParam("organization_id")),
        ])
        .unwrap();
        OperationTable::build(
            registry,
            [
                (Method::GET, "/health", "health"),
                (Method::GET, "/tasks/{id}", "tasks.get"),
                (Method::GET, "/organizations/{organization_id}/tasks", "tasks.org"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn resolves_operation_and_tenancy_param() {
        let matched = table().resolve(&Method::GET, "/tasks/abc").unwrap();
        assert_eq!(matched.descriptor.operation_id, "tasks.get");
        assert_eq!(matched.tenancy_param.as_deref(), Some("abc"));

        let matched = table()
            .resolve(&Method::GET, "/organizations/o-1/tasks")
            .unwrap();
        assert_eq!(matched.tenancy_param.as_deref(), Some("o-1"));
    }

    #[test]
    fn methods_resolve_independently() {
        assert!(table().resolve(&Method::GET, "/tasks/abc").is_some());
        assert!(table().resolve(&Method::DELETE, "/tasks/abc").is_none());
        assert!(table().resolve(&Method::GET, "/unknown").is_none());
    }

    #[test]
    fn unscoped_operation_has_no_tenancy_param() {
        let matched = table().resolve(&Method::GET, "/health").unwrap();
        assert!(matched.descriptor.is_public());
        assert_eq!(matched.tenancy_param, None);
    }

    #[test]
    fn route_naming_unknown_operation_is_rejected() {
        let res = OperationTable::build(
            OperationRegistry::new(),
            [(Method::GET, "/tasks", "tasks.list")],
        );
        assert!(res.is_err());
    }

    #[test]
    fn bearer_token_is_extracted_and_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer  owner-token "),
        );
        assert_eq!(extract_bearer_token(&headers), Some("owner-token"));
    }

    #[test]
    fn non_bearer_or_empty_tokens_are_ignored() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn preflight_requires_origin_and_request_method() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://app.example"));
        assert!(!is_preflight_request(&Method::OPTIONS, &headers));

        headers.insert(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        );
        assert!(is_preflight_request(&Method::OPTIONS, &headers));
        assert!(!is_preflight_request(&Method::GET, &headers));
    }
}
