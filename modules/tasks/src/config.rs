//! Tasks module configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TasksConfig {
    pub max_title_length: usize,
    pub max_category_length: usize,
    pub max_description_length: usize,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            max_title_length: 200,
            max_category_length: 100,
            max_description_length: 10_000,
        }
    }
}
