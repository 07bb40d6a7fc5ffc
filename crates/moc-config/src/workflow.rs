//! Workflow policy configuration.

use moc_core::WorkflowPolicy;
use moc_core::enums::Role;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_approver_roles() -> Vec<String> {
    vec!["manager".to_string(), "admin".to_string()]
}

const fn default_require_pre_tasks() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Roles allowed to approve (`viewer`, `engineer`, `manager`, `admin`).
    #[serde(default = "default_approver_roles")]
    pub approver_roles: Vec<String>,

    /// Whether close-out waits for every pre-implementation task.
    #[serde(default = "default_require_pre_tasks")]
    pub require_pre_tasks_for_close: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            approver_roles: default_approver_roles(),
            require_pre_tasks_for_close: default_require_pre_tasks(),
        }
    }
}

impl WorkflowConfig {
    /// Build the lifecycle policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unknown role name or an
    /// empty approver list.
    pub fn policy(&self) -> Result<WorkflowPolicy, ConfigError> {
        let approver_roles = self
            .approver_roles
            .iter()
            .map(|name| {
                Role::parse(name.trim()).ok_or_else(|| ConfigError::InvalidValue {
                    field: "workflow.approver_roles".into(),
                    reason: format!("unknown role '{name}'"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if approver_roles.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "workflow.approver_roles".into(),
                reason: "at least one approver role is required".into(),
            });
        }

        Ok(WorkflowPolicy {
            approver_roles,
            require_pre_tasks_for_close: self.require_pre_tasks_for_close,
        })
    }
}
