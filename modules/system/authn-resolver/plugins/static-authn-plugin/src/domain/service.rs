//! Service implementation for the static `AuthN` plugin.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use taskhub_security::IdentityContext;

use crate::config::{AuthNMode, IdentityConfig, StaticAuthNPluginConfig};
use authn_resolver_sdk::AuthenticationResult;

/// Static `AuthN` service.
///
/// Provides token-to-identity mapping based on configuration mode:
/// - `accept_all`: Any non-empty token maps to the default identity
/// - `static_tokens`: Specific tokens map to specific identities
#[derive(Debug)]
pub struct Service {
    mode: AuthNMode,
    default_identity: IdentityConfig,
    token_map: HashMap<String, IdentityConfig>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticAuthNPluginConfig) -> Self {
        if cfg.mode == AuthNMode::AcceptAll {
            tracing::warn!(
                role = %cfg.default_identity.role,
                "Static AuthN is running in `accept_all` mode: every non-empty bearer token \
                 is accepted with the default identity. Do NOT use this mode in production."
            );
        }

        let token_map: HashMap<String, IdentityConfig> = cfg
            .tokens
            .iter()
            .map(|m| (m.token.clone(), m.identity.clone()))
            .collect();

        tracing::info!(
            mode = ?cfg.mode,
            token_count = token_map.len(),
            "Static AuthN configured"
        );

        Self {
            mode: cfg.mode,
            default_identity: cfg.default_identity.clone(),
            token_map,
        }
    }

    /// Authenticate a bearer token at the current time.
    ///
    /// Returns `None` if the token is not recognized (in `static_tokens` mode)
    /// or empty.
    #[must_use]
    pub fn authenticate(&self, bearer_token: &str) -> Option<AuthenticationResult> {
        self.authenticate_at(bearer_token, Utc::now())
    }

    /// Same as [`Service::authenticate`] with an explicit issue time.
    #[must_use]
    pub fn authenticate_at(
        &self,
        bearer_token: &str,
        now: DateTime<Utc>,
    ) -> Option<AuthenticationResult> {
        if bearer_token.is_empty() {
            return None;
        }

        let identity = match self.mode {
            AuthNMode::AcceptAll => &self.default_identity,
            AuthNMode::StaticTokens => self.token_map.get(bearer_token)?,
        };

        Some(build_result(identity, bearer_token, now))
    }
}

fn build_result(
    identity: &IdentityConfig,
    bearer_token: &str,
    now: DateTime<Utc>,
) -> AuthenticationResult {
    let mut builder = IdentityContext::builder()
        .subject_id(identity.subject_id)
        .organization_id(identity.organization_id)
        .role(&identity.role)
        .issued_at(now)
        .expires_at(now + Duration::seconds(i64::from(identity.ttl_secs)))
        .bearer_token(bearer_token.to_owned());
    if let Some(email) = &identity.email {
        builder = builder.subject_email(email);
    }

    AuthenticationResult {
        identity: builder.build(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::config::{DEFAULT_ORGANIZATION_ID, DEFAULT_SUBJECT_ID, TokenMapping};
    use uuid::Uuid;

    fn default_config() -> StaticAuthNPluginConfig {
        StaticAuthNPluginConfig::default()
    }

    #[test]
    fn accept_all_mode_returns_default_identity() {
        let now = Utc::now();
        let service = Service::from_config(&default_config());

        let result = service.authenticate_at("any-token-value", now);
        assert!(result.is_some());

        let auth = result.unwrap();
        let ctx = &auth.identity;
        assert_eq!(ctx.subject_id(), DEFAULT_SUBJECT_ID);
        assert_eq!(ctx.organization_id(), DEFAULT_ORGANIZATION_ID);
        assert_eq!(ctx.role(), "viewer");
        assert_eq!(ctx.issued_at(), now);
        assert_eq!(ctx.expires_at(), now + Duration::hours(1));
        assert_eq!(
            ctx.bearer_token().map(ExposeSecret::expose_secret),
            Some("any-token-value"),
        );
    }

    #[test]
    fn accept_all_mode_rejects_empty_token() {
        let service = Service::from_config(&default_config());

        let result = service.authenticate("");
        assert!(result.is_none());
    }

    #[test]
    fn static_tokens_mode_returns_mapped_identity() {
        let user_a_id = Uuid::parse_str("aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa").unwrap();
        let org_a = Uuid::parse_str("bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb").unwrap();

        let cfg = StaticAuthNPluginConfig {
            mode: AuthNMode::StaticTokens,
            tokens: vec![TokenMapping {
                token: "token-user-a".to_owned(),
                identity: IdentityConfig {
                    subject_id: user_a_id,
                    email: Some("a@example.com".to_owned()),
                    organization_id: org_a,
                    role: "Admin".to_owned(),
                    ttl_secs: 60,
                },
            }],
            ..default_config()
        };

        let service = Service::from_config(&cfg);

        let result = service.authenticate("token-user-a");
        assert!(result.is_some());

        let auth = result.unwrap();
        let ctx = &auth.identity;
        assert_eq!(ctx.subject_id(), user_a_id);
        assert_eq!(ctx.organization_id(), org_a);
        assert_eq!(ctx.role(), "Admin");
        assert_eq!(ctx.subject_email(), Some("a@example.com"));
        assert_eq!(
            ctx.bearer_token().map(ExposeSecret::expose_secret),
            Some("token-user-a"),
        );
    }

    #[test]
    fn zero_ttl_issues_an_expired_identity() {
        let now = Utc::now();
        let cfg = StaticAuthNPluginConfig {
            default_identity: IdentityConfig {
                ttl_secs: 0,
                ..IdentityConfig::default()
            },
            ..default_config()
        };

        let auth = Service::from_config(&cfg)
            .authenticate_at("stale", now)
            .unwrap();
        assert!(auth.identity.is_expired_at(now));
    }

    #[test]
    fn static_tokens_mode_rejects_unknown_token() {
        let cfg = StaticAuthNPluginConfig {
            mode: AuthNMode::StaticTokens,
            tokens: vec![TokenMapping {
                token: "known-token".to_owned(),
                identity: IdentityConfig::default(),
            }],
            ..default_config()
        };

        let service = Service::from_config(&cfg);

        let result = service.authenticate("unknown-token");
        assert!(result.is_none());
    }

    #[test]
    fn static_tokens_mode_rejects_empty_token() {
        let cfg = StaticAuthNPluginConfig {
            mode: AuthNMode::StaticTokens,
            tokens: vec![],
            ..default_config()
        };

        let service = Service::from_config(&cfg);

        let result = service.authenticate("");
        assert!(result.is_none());
    }
}
