//! Acting user configuration.

use moc_core::enums::Role;
use moc_core::identity::Actor;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActorConfig {
    /// Stable user ID recorded in audit entries.
    #[serde(default)]
    pub id: String,

    /// Display name recorded in audit entries.
    #[serde(default)]
    pub name: String,

    /// One of `viewer`, `engineer`, `manager`, `admin`.
    #[serde(default)]
    pub role: String,
}

impl ActorConfig {
    /// Check if the actor has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.id.is_empty() && !self.role.is_empty()
    }

    /// Build the acting user. The name defaults to the ID.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when `id` or `role` is missing and
    /// `ConfigError::InvalidValue` for an unknown role.
    pub fn actor(&self) -> Result<Actor, ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "actor".into(),
            });
        }
        let role = Role::parse(self.role.trim()).ok_or_else(|| ConfigError::InvalidValue {
            field: "actor.role".into(),
            reason: format!("unknown role '{}'", self.role),
        })?;
        let name = if self.name.is_empty() {
            self.id.clone()
        } else {
            self.name.clone()
        };
        Ok(Actor::new(self.id.clone(), name, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_by_default() {
        let config = ActorConfig::default();
        assert!(!config.is_configured());
        assert!(matches!(
            config.actor(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn name_falls_back_to_id() {
        let config = ActorConfig {
            id: "usr-7".into(),
            name: String::new(),
            role: "engineer".into(),
        };
        let actor = config.actor().unwrap();
        assert_eq!(actor.name, "usr-7");
        assert_eq!(actor.role, Role::Engineer);
    }

    #[test]
    fn bad_role_is_invalid() {
        let config = ActorConfig {
            id: "usr-7".into(),
            name: "Lee".into(),
            role: "boss".into(),
        };
        assert!(matches!(
            config.actor(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
