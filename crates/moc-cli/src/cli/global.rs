use clap::ValueEnum;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Raw,
}

/// When to colour table cells.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub limit: Option<u32>,
    pub quiet: bool,
    pub verbose: bool,
    pub color: ColorMode,
    pub project: Option<String>,
    pub actor: ActorOverride,
}

/// Per-invocation identity, layered over the `[actor]` config section.
#[derive(Clone, Debug, Default)]
pub struct ActorOverride {
    pub id: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl ActorOverride {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.role.is_none()
    }
}
