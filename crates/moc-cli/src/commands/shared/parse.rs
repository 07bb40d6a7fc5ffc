use moc_core::entities::Impacts;
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse repeated `--impact` values into the impact flags.
pub fn parse_impacts(names: &[String]) -> anyhow::Result<Impacts> {
    let mut impacts = Impacts::default();
    for name in names {
        if !impacts.set(name.trim().to_ascii_lowercase().as_str()) {
            anyhow::bail!(
                "invalid impact '{name}': expected one of {}",
                Impacts::NAMES.join(", ")
            );
        }
    }
    Ok(impacts)
}
