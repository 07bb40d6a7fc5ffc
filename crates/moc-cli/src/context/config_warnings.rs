use moc_config::MocConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &MocConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &MocConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.actor.is_configured() && has_single_underscore_key(&env_keys, "MOC_ACTOR") {
        warnings.push(
            "Actor config appears unset while MOC_ACTOR* env vars exist. Use double underscores (example: MOC_ACTOR__ROLE)."
                .to_string(),
        );
    }

    if has_single_underscore_key(&env_keys, "MOC_WORKFLOW") {
        warnings.push(
            "MOC_WORKFLOW* env vars use a single underscore and are ignored. Use double underscores (example: MOC_WORKFLOW__APPROVER_ROLES)."
                .to_string(),
        );
    }

    warnings
}

/// `MOC_ACTOR_ROLE` style keys: the section prefix followed by one underscore.
fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(keys: &[&str]) -> Vec<(String, String)> {
        keys.iter().map(|k| ((*k).to_string(), "x".to_string())).collect()
    }

    #[test]
    fn single_underscore_actor_key_warns() {
        let warnings =
            collect_unconfigured_warnings(&MocConfig::default(), env(&["MOC_ACTOR_ROLE"]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("MOC_ACTOR__ROLE"));
    }

    #[test]
    fn double_underscore_keys_are_quiet() {
        let warnings = collect_unconfigured_warnings(
            &MocConfig::default(),
            env(&["MOC_ACTOR__ROLE", "MOC_WORKFLOW__REQUIRE_PRE_TASKS_FOR_CLOSE"]),
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn single_underscore_workflow_key_warns() {
        let warnings = collect_unconfigured_warnings(
            &MocConfig::default(),
            env(&["MOC_WORKFLOW_APPROVER_ROLES"]),
        );
        assert_eq!(warnings.len(), 1);
    }
}
