//! Server configuration.
//!
//! Layers, lowest precedence first: built-in defaults, the optional YAML
//! file, then `TASKHUB__`-prefixed environment variables with `__` between
//! nesting levels (`TASKHUB__SERVER__BIND_ADDR=0.0.0.0:8080`).

use std::path::Path;

use anyhow::{Context, Result};
use api_gateway::ApiGatewayConfig;
use audit_log::AuditLogConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use jwt_authn_plugin::JwtAuthNPluginConfig;
use serde::{Deserialize, Serialize};
use static_authn_plugin::StaticAuthNPluginConfig;
use tasks::TasksConfig;

pub const ENV_PREFIX: &str = "TASKHUB__";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ApiGatewayConfig,
    pub logging: LoggingConfig,
    pub authn: AuthNConfig,
    pub tasks: TasksConfig,
    pub audit: AuditLogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

/// Which authenticator backs bearer tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthNBackend {
    #[default]
    Static,
    Jwt,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthNConfig {
    pub mode: AuthNBackend,
    #[serde(rename = "static")]
    pub static_tokens: StaticAuthNPluginConfig,
    pub jwt: JwtAuthNPluginConfig,
}

impl AppConfig {
    /// Load the layered configuration.
    ///
    /// # Errors
    /// Returns an error if `path` does not exist or any layer fails to
    /// deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Write;

    use figment::Jail;

    use super::*;

    fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let cfg = AppConfig::load(None).unwrap();
            assert_eq!(cfg.server.bind_addr, "127.0.0.1:8080");
            assert_eq!(cfg.logging.level, "info");
            assert_eq!(cfg.authn.mode, AuthNBackend::Static);
            assert!(!cfg.audit.record_denials);
            assert_eq!(cfg.tasks.max_title_length, 200);
            Ok(())
        });
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        Jail::expect_with(|_jail| {
            let file = yaml_file(
                r#"
server:
  bind_addr: "0.0.0.0:9000"
audit:
  record_denials: true
authn:
  mode: static
  static:
    mode: static_tokens
    tokens:
      - token: owner-token
        identity:
          role: owner
"#,
            );
            let cfg = AppConfig::load(Some(file.path())).unwrap();
            assert_eq!(cfg.server.bind_addr, "0.0.0.0:9000");
            assert!(cfg.audit.record_denials);
            assert_eq!(cfg.authn.static_tokens.tokens.len(), 1);
            assert_eq!(cfg.authn.static_tokens.tokens[0].identity.role, "owner");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            let file = yaml_file("server:\n  bind_addr: \"0.0.0.0:9000\"\nlogging:\n  level: debug\n");
            jail.set_env("TASKHUB__SERVER__BIND_ADDR", "127.0.0.1:7000");
            jail.set_env("TASKHUB__AUTHN__MODE", "jwt");
            jail.set_env("TASKHUB__AUTHN__JWT__LEEWAY_SECS", "5");

            let cfg = AppConfig::load(Some(file.path())).unwrap();
            assert_eq!(cfg.server.bind_addr, "127.0.0.1:7000");
            assert_eq!(cfg.logging.level, "debug");
            assert_eq!(cfg.authn.mode, AuthNBackend::Jwt);
            assert_eq!(cfg.authn.jwt.leeway_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        Jail::expect_with(|_jail| {
            let file = yaml_file("server:\n  bind_addr: \"0.0.0.0:9000\"\n  cors_enabled: true\n");
            assert!(AppConfig::load(Some(file.path())).is_err());
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let err = AppConfig::load(Some(Path::new("/nonexistent/taskhub.yaml"))).unwrap_err();
            assert!(err.to_string().contains("config file not found"));
            Ok(())
        });
    }

    #[test]
    fn printed_config_redacts_jwt_secret() {
        Jail::expect_with(|jail| {
            jail.set_env("TASKHUB__AUTHN__JWT__SECRET", "top-secret");
            let cfg = AppConfig::load(None).unwrap();
            let printed = serde_json::to_value(&cfg).unwrap();
            assert_eq!(printed["authn"]["jwt"]["secret"], "[REDACTED]");
            assert!(!printed.to_string().contains("top-secret"));
            Ok(())
        });
    }
}
