use clap::Subcommand;

/// Risk calculator commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RiskCommands {
    /// Quick estimate from priority and impact flags.
    Estimate {
        #[arg(long)]
        priority: String,
        /// Impact flag; repeat for several.
        #[arg(long)]
        impact: Vec<String>,
    },
    /// Probability × severity, each 1 to 5.
    Pxs {
        #[arg(allow_negative_numbers = true)]
        probability: i64,
        #[arg(allow_negative_numbers = true)]
        severity: i64,
    },
    /// Tier of a score.
    Classify { score: u32 },
}
