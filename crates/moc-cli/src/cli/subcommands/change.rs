use std::path::PathBuf;

use clap::Subcommand;

/// Change request commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ChangeCommands {
    /// Open a change request in draft, or file an emergency with `--emergency`.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Impact flag; repeat for several.
        #[arg(long)]
        impact: Vec<String>,
        #[arg(long)]
        facility: Option<String>,
        #[arg(long)]
        asset: Option<String>,
        /// File directly as an emergency with this justification.
        #[arg(long, value_name = "JUSTIFICATION")]
        emergency: Option<String>,
    },
    /// Edit details while in draft or under revision.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Replaces all impact flags when given; repeat for several.
        #[arg(long)]
        impact: Vec<String>,
        /// Clear every impact flag.
        #[arg(long, conflicts_with = "impact")]
        no_impacts: bool,
    },
    /// Show a change request.
    Show { id: String },
    /// List change requests, newest first.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        facility: Option<String>,
    },
    /// draft → submitted.
    Submit { id: String },
    /// submitted → under evaluation.
    Review { id: String },
    /// under evaluation → approved.
    Approve { id: String },
    /// under evaluation → under revision.
    Revise {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// under evaluation → rejected.
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// under revision → submitted.
    Resubmit { id: String },
    /// approved → implementation.
    Start { id: String },
    /// implementation → completed.
    Close { id: String },
    /// Emergency bypass straight to implementation.
    Emergency {
        id: String,
        #[arg(long)]
        justification: String,
    },
    /// Attach a probability × severity assessment.
    Assess {
        id: String,
        #[arg(long, allow_negative_numbers = true)]
        probability: i64,
        #[arg(long, allow_negative_numbers = true)]
        severity: i64,
        #[arg(long, default_value = "")]
        rationale: String,
    },
    /// Add a comment.
    Comment { id: String, text: String },
    /// Merged audit history.
    History { id: String },
    /// Report snapshot with history.
    Report { id: String },
    /// Write the history as JSON Lines.
    Export {
        id: String,
        #[arg(long)]
        out: PathBuf,
    },
}
