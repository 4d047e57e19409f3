//! Builds the module graph from configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use api_gateway::ApiGateway;
use audit_log::{AuditLogLocalClient, InMemoryAuditRepository};
use audit_log_sdk::AuditRecorder;
use authn_resolver_sdk::AuthNResolverClient;
use authz_resolver_sdk::{GuardChain, Resource};
use tasks::{InMemoryTaskRepository, TaskOrganizationResolver};

use crate::config::{AppConfig, AuthNBackend, AuthNConfig};

/// Wire authenticator, audit log, tasks and gateway.
///
/// # Errors
/// Returns an error if the selected authenticator is misconfigured.
pub fn build_gateway(cfg: &AppConfig) -> Result<ApiGateway<InMemoryTaskRepository>> {
    let authn = build_authn(&cfg.authn)?;
    let chain = GuardChain::default();

    let audit_repo = Arc::new(InMemoryAuditRepository::new());
    let audit_svc = Arc::new(audit_log::Service::new(
        audit_repo,
        chain.clone(),
        cfg.audit.clone(),
    ));
    let audit: Arc<dyn AuditRecorder> = Arc::new(AuditLogLocalClient::new(audit_svc));

    let task_repo = Arc::new(InMemoryTaskRepository::new());
    let tasks = Arc::new(tasks::Service::new(
        Arc::clone(&task_repo),
        Arc::clone(&audit),
        cfg.tasks.clone(),
    ));

    Ok(ApiGateway::new(cfg.server.clone(), authn, tasks, audit)
        .with_guard_chain(chain)
        .with_organization_resolver(
            Resource::Task,
            Arc::new(TaskOrganizationResolver::new(task_repo)),
        )
        .with_denial_recording(cfg.audit.record_denials))
}

fn build_authn(cfg: &AuthNConfig) -> Result<Arc<dyn AuthNResolverClient>> {
    match cfg.mode {
        AuthNBackend::Static => Ok(Arc::new(static_authn_plugin::Service::from_config(
            &cfg.static_tokens,
        ))),
        AuthNBackend::Jwt => {
            let svc = jwt_authn_plugin::Service::from_config(&cfg.jwt)
                .context("invalid JWT authenticator configuration")?;
            Ok(Arc::new(svc))
        }
    }
}
