//! Configuration for the static `AuthN` plugin.

use serde::{Deserialize, Serialize};
use uuid::{Uuid, uuid};

/// Subject used by the default identity.
pub const DEFAULT_SUBJECT_ID: Uuid = uuid!("11111111-6a88-4768-9dfc-6bcd5187d9ed");

/// Organization used by the default identity.
pub const DEFAULT_ORGANIZATION_ID: Uuid = uuid!("00000000-df51-5b42-9538-d2b56b7ee953");

/// Plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthNPluginConfig {
    /// Authentication mode.
    pub mode: AuthNMode,

    /// Default identity returned in `accept_all` mode.
    pub default_identity: IdentityConfig,

    /// Static token-to-identity mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,
}

impl Default for StaticAuthNPluginConfig {
    fn default() -> Self {
        Self {
            mode: AuthNMode::AcceptAll,
            default_identity: IdentityConfig::default(),
            tokens: Vec::new(),
        }
    }
}

/// Authentication mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthNMode {
    /// Accept any non-empty token and return the default identity.
    #[default]
    AcceptAll,
    /// Map specific tokens to specific identities.
    StaticTokens,
}

/// Identity issued for a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    pub subject_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub organization_id: Uuid,

    /// Role token, matched case-insensitively by the permission matrix.
    pub role: String,

    /// Lifetime of the identity from the moment the token is presented.
    /// `0` yields an identity that is already expired.
    pub ttl_secs: u32,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            subject_id: DEFAULT_SUBJECT_ID,
            email: None,
            organization_id: DEFAULT_ORGANIZATION_ID,
            role: "viewer".to_owned(),
            ttl_secs: 3600,
        }
    }
}

/// Maps a static token to a specific identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The bearer token value to match.
    pub token: String,
    /// The identity to return when this token is presented.
    pub identity: IdentityConfig,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: StaticAuthNPluginConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.mode, AuthNMode::AcceptAll);
        assert_eq!(cfg.default_identity.role, "viewer");
        assert!(cfg.tokens.is_empty());
    }

    #[test]
    fn token_identity_fills_missing_fields() {
        let cfg: StaticAuthNPluginConfig = serde_json::from_str(
            r#"{
                "mode": "static_tokens",
                "tokens": [{ "token": "t1", "identity": { "role": "owner" } }]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.mode, AuthNMode::StaticTokens);
        assert_eq!(cfg.tokens[0].identity.role, "owner");
        assert_eq!(cfg.tokens[0].identity.organization_id, DEFAULT_ORGANIZATION_ID);
        assert_eq!(cfg.tokens[0].identity.ttl_secs, 3600);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<StaticAuthNPluginConfig, _> =
            serde_json::from_str(r#"{ "vendor": "x" }"#);
        assert!(res.is_err());
    }
}
