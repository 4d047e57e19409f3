//! Audit log configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditLogConfig {
    /// Also append a failure record when the guard chain refuses a mutating
    /// operation before it runs.
    pub record_denials: bool,

    /// Failure details longer than this are truncated.
    pub max_details_length: usize,
}

impl Default for AuditLogConfig {
    fn default() -> Self {
        Self {
            record_denials: false,
            max_details_length: 1024,
        }
    }
}
