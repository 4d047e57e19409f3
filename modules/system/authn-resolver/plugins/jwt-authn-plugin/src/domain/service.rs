//! Service implementation for the JWT `AuthN` plugin.

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use taskhub_security::IdentityContext;
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtAuthNPluginConfig;
use authn_resolver_sdk::{AuthNResolverError, AuthenticationResult};

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub organization_id: Uuid,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    /// Not valid before; checked with the configured leeway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Invalid plugin configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT secret must not be empty")]
    EmptySecret,
}

/// JWT `AuthN` service.
pub struct Service {
    key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl Service {
    /// Create a service from plugin configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySecret`] when no secret is configured.
    pub fn from_config(cfg: &JwtAuthNPluginConfig) -> Result<Self, ConfigError> {
        let secret = cfg.secret.expose_secret();
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is enforced by the guard chain, not here.
        validation.validate_exp = false;
        validation.validate_nbf = true;
        validation.leeway = cfg.leeway_secs;
        validation.set_required_spec_claims(&["sub", "exp"]);
        if let Some(issuer) = &cfg.issuer {
            validation.set_issuer(&[issuer]);
        }

        tracing::info!(issuer = ?cfg.issuer, leeway_secs = cfg.leeway_secs, "JWT AuthN configured");

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Verify the token signature and structure and build the identity.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` for bad signatures, malformed tokens, wrong claim
    ///   types or out-of-range timestamps
    /// - `Internal` if the configured key cannot be used
    pub fn validate(&self, bearer_token: &str) -> Result<AuthenticationResult, AuthNResolverError> {
        let data = decode::<TokenClaims>(bearer_token, &self.key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidKeyFormat => {
                    AuthNResolverError::Internal("unusable JWT key".to_owned())
                }
                _ => {
                    tracing::debug!(error = %e, "JWT rejected");
                    AuthNResolverError::Unauthorized("invalid token".to_owned())
                }
            },
        )?;

        let identity = into_identity(&data.claims, bearer_token)?;
        Ok(AuthenticationResult { identity })
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, AuthNResolverError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AuthNResolverError::Unauthorized("invalid token timestamps".to_owned()))
}

fn into_identity(
    claims: &TokenClaims,
    bearer_token: &str,
) -> Result<IdentityContext, AuthNResolverError> {
    let mut builder = IdentityContext::builder()
        .subject_id(claims.sub)
        .organization_id(claims.organization_id)
        .role(&claims.role)
        .issued_at(timestamp(claims.iat)?)
        .expires_at(timestamp(claims.exp)?)
        .bearer_token(bearer_token.to_owned());
    if let Some(email) = &claims.email {
        builder = builder.subject_email(email);
    }
    Ok(builder.build())
}
