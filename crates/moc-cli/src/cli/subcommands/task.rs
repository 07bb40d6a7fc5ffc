use chrono::NaiveDate;
use clap::Subcommand;

/// Checklist task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Add a task to a change request.
    Add {
        change_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        assignee: Option<String>,
        /// Due date, YYYY-MM-DD.
        #[arg(long)]
        due: Option<NaiveDate>,
        /// `pre` (gates close-out) or `post`.
        #[arg(long, default_value = "pre")]
        phase: String,
    },
    /// Move a task to a new status.
    Status {
        change_id: String,
        task_id: String,
        /// `to_do`, `in_progress`, `blocked`, or `done`.
        status: String,
    },
}
