use std::path::PathBuf;

use anyhow::Context;
use moc_config::{ActorConfig, ConfigError, MocConfig};
use moc_core::Lifecycle;
use moc_core::identity::Actor;
use moc_db::service::MocService;

use crate::cli::{ActorOverride, GlobalFlags};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: MocService,
    pub config: MocConfig,
    pub project_root: PathBuf,
    pub actor: Option<Actor>,
}

impl AppContext {
    /// Open the project database and resolve the acting user.
    pub async fn init(
        project_root: PathBuf,
        config: MocConfig,
        flags: &GlobalFlags,
    ) -> anyhow::Result<Self> {
        let policy = config
            .workflow
            .policy()
            .context("invalid [workflow] configuration")?;
        let actor = resolve_actor(&config.actor, &flags.actor)
            .context("invalid acting user (check [actor] or --as/--as-role)")?;

        let db_path = config.db_path(&project_root);
        let service = MocService::new_local(&db_path.to_string_lossy(), Lifecycle::new(policy))
            .await
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;

        tracing::debug!(
            root = %project_root.display(),
            actor = actor.as_ref().map_or("-", |a| a.id.as_str()),
            "context ready"
        );
        Ok(Self {
            service,
            config,
            project_root,
            actor,
        })
    }

    /// The acting user, required by every mutating command.
    pub fn require_actor(&self) -> anyhow::Result<&Actor> {
        self.actor.as_ref().context(
            "no acting user: set [actor] id and role in .moc/config.toml, MOC_ACTOR__ID and MOC_ACTOR__ROLE, or pass --as and --as-role",
        )
    }
}

/// Layer the command-line identity over the `[actor]` config section.
///
/// Returns `None` when neither source names anyone.
pub fn resolve_actor(
    config: &ActorConfig,
    overrides: &ActorOverride,
) -> Result<Option<Actor>, ConfigError> {
    if overrides.is_empty() && !config.is_configured() {
        return Ok(None);
    }
    let mut merged = config.clone();
    if let Some(id) = &overrides.id {
        merged.id.clone_from(id);
        // A different user must not inherit the configured display name.
        if overrides.name.is_none() {
            merged.name.clear();
        }
    }
    if let Some(name) = &overrides.name {
        merged.name.clone_from(name);
    }
    if let Some(role) = &overrides.role {
        merged.role.clone_from(role);
    }
    merged.actor().map(Some)
}

#[cfg(test)]
mod tests {
    use moc_core::enums::Role;
    use pretty_assertions::assert_eq;

    use super::*;

    fn configured() -> ActorConfig {
        ActorConfig {
            id: "usr-eng".into(),
            name: "Dana Ortiz".into(),
            role: "engineer".into(),
        }
    }

    #[test]
    fn nothing_configured_is_none() {
        let actor = resolve_actor(&ActorConfig::default(), &ActorOverride::default()).unwrap();
        assert!(actor.is_none());
    }

    #[test]
    fn config_alone_is_used() {
        let actor = resolve_actor(&configured(), &ActorOverride::default())
            .unwrap()
            .unwrap();
        assert_eq!(actor, Actor::new("usr-eng", "Dana Ortiz", Role::Engineer));
    }

    #[test]
    fn role_override_keeps_configured_identity() {
        let actor = resolve_actor(
            &configured(),
            &ActorOverride {
                role: Some("manager".into()),
                ..ActorOverride::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(actor.name, "Dana Ortiz");
        assert_eq!(actor.role, Role::Manager);
    }

    #[test]
    fn id_override_drops_configured_name() {
        let actor = resolve_actor(
            &configured(),
            &ActorOverride {
                id: Some("usr-mgr".into()),
                ..ActorOverride::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(actor.name, "usr-mgr");
        assert_eq!(actor.role, Role::Engineer);
    }

    #[test]
    fn override_without_role_is_not_configured() {
        let err = resolve_actor(
            &ActorConfig::default(),
            &ActorOverride {
                id: Some("usr-x".into()),
                ..ActorOverride::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { .. }));
    }

    #[test]
    fn unknown_role_is_invalid() {
        let err = resolve_actor(
            &configured(),
            &ActorOverride {
                role: Some("supervisor".into()),
                ..ActorOverride::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
