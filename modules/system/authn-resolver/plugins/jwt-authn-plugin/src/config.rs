//! Configuration for the JWT `AuthN` plugin.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Plugin configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JwtAuthNPluginConfig {
    /// Shared HMAC secret. Never printed.
    #[serde(
        serialize_with = "serialize_redacted",
        deserialize_with = "deserialize_secret"
    )]
    pub secret: SecretString,

    /// Expected `iss` claim. Not checked when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Clock skew tolerated on `nbf`.
    pub leeway_secs: u64,
}

impl Default for JwtAuthNPluginConfig {
    fn default() -> Self {
        Self {
            secret: SecretString::from(String::new()),
            issuer: None,
            leeway_secs: 30,
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn serialize_redacted<S>(_: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str("[REDACTED]")
}
