//! Gateway assembly and HTTP server.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use audit_log_sdk::AuditRecorder;
use authn_resolver_sdk::AuthNResolverClient;
use authz_resolver_sdk::{GuardChain, OperationRegistry, OrganizationResolver, Resource};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use tasks::TaskRepository;

use crate::auth::{self, GuardState, OperationTable};
use crate::config::ApiGatewayConfig;
use crate::routes::{self, AppState};

/// HTTP front door: routes requests to the task and audit APIs behind the
/// guard chain.
pub struct ApiGateway<R: TaskRepository + 'static> {
    config: ApiGatewayConfig,
    authn_client: Arc<dyn AuthNResolverClient>,
    tasks: Arc<tasks::Service<R>>,
    audit: Arc<dyn AuditRecorder>,
    chain: GuardChain,
    resolvers: HashMap<Resource, Arc<dyn OrganizationResolver>>,
    record_denials: bool,
}

impl<R: TaskRepository + 'static> ApiGateway<R> {
    #[must_use]
    pub fn new(
        config: ApiGatewayConfig,
        authn_client: Arc<dyn AuthNResolverClient>,
        tasks: Arc<tasks::Service<R>>,
        audit: Arc<dyn AuditRecorder>,
    ) -> Self {
        Self {
            config,
            authn_client,
            tasks,
            audit,
            chain: GuardChain::default(),
            resolvers: HashMap::new(),
            record_denials: false,
        }
    }

    /// Resolver used for operations addressing a `resource` by id.
    #[must_use]
    pub fn with_organization_resolver(
        mut self,
        resource: Resource,
        resolver: Arc<dyn OrganizationResolver>,
    ) -> Self {
        self.resolvers.insert(resource, resolver);
        self
    }

    #[must_use]
    pub fn with_guard_chain(mut self, chain: GuardChain) -> Self {
        self.chain = chain;
        self
    }

    #[must_use]
    pub fn with_denial_recording(mut self, enabled: bool) -> Self {
        self.record_denials = enabled;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ApiGatewayConfig {
        &self.config
    }

    /// Build the HTTP router with the guard middleware applied.
    ///
    /// # Errors
    /// Returns an error if the operation table cannot be built.
    pub fn build_router(&self) -> Result<Router> {
        let registry = OperationRegistry::from_descriptors(routes::operations())?;
        let operations = OperationTable::build(registry, routes::route_table())?;

        let guard = GuardState {
            authn_client: Arc::clone(&self.authn_client),
            chain: self.chain.clone(),
            operations,
            resolvers: Arc::new(self.resolvers.clone()),
            audit: Arc::clone(&self.audit),
            record_denials: self.record_denials,
        };
        if self.record_denials {
            tracing::info!("Denied mutating operations will be recorded in the audit log");
        }

        let state = AppState {
            tasks: Arc::clone(&self.tasks),
            audit: Arc::clone(&self.audit),
        };

        // The last added layer runs first: body limit, then the guard.
        Ok(routes::router::<R>()
            .layer(from_fn_with_state(guard, auth::guard_middleware))
            .layer(DefaultBodyLimit::max(self.config.body_limit_bytes))
            .with_state(state))
    }

    /// Bind and serve until `shutdown` resolves.
    ///
    /// # Errors
    /// Returns an error if the bind address is invalid, binding fails or the
    /// server terminates abnormally.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = parse_bind_address(&self.config.bind_addr)?;
        let router = self.build_router()?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

/// Parse bind address from configuration string.
fn parse_bind_address(bind_addr: &str) -> Result<SocketAddr> {
    bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind_addr}': {e}"))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn bind_address_must_be_a_socket_address() {
        assert!(parse_bind_address("127.0.0.1:8080").is_ok());
        assert!(parse_bind_address("localhost").is_err());
    }
}
