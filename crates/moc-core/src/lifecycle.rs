//! Change request workflow.
//!
//! `Lifecycle` owns every mutation of a `ChangeRequest`. Each operation takes
//! the current record by reference and returns an updated copy, so a refused
//! operation leaves the caller's record exactly as it was. Every successful
//! operation appends exactly one audit entry.
//!
//! | from | to | trigger | gate |
//! |---|---|---|---|
//! | draft | submitted | submit | title and description non-empty |
//! | submitted | under_evaluation | begin review | |
//! | under_evaluation | approved | approve | approver role |
//! | under_evaluation | under_revision | request revision | reason |
//! | under_evaluation | rejected | reject | reason |
//! | under_revision | submitted | resubmit | |
//! | approved | implementation | start implementation | |
//! | implementation | completed | close out | pre tasks done (policy) |
//! | any non-terminal | implementation | emergency bypass | justification |

use serde::{Deserialize, Serialize};

use crate::audit_detail::StatusChangedDetail;
use crate::entities::{ChangeRequest, Impacts, NewChangeRequest, NewTask, RiskAssessment, Task};
use crate::enums::{AuditAction, ChangeStatus, Priority, Role, TaskStatus};
use crate::errors::LifecycleError;
use crate::identity::Actor;
use crate::risk;

/// Organisation rules the workflow enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowPolicy {
    /// Roles allowed to approve a change under evaluation.
    pub approver_roles: Vec<Role>,
    /// Whether close-out requires every `pre` task to be done.
    pub require_pre_tasks_for_close: bool,
}

impl Default for WorkflowPolicy {
    fn default() -> Self {
        Self {
            approver_roles: vec![Role::Manager, Role::Admin],
            require_pre_tasks_for_close: true,
        }
    }
}

impl WorkflowPolicy {
    #[must_use]
    pub fn can_approve(&self, role: Role) -> bool {
        self.approver_roles.contains(&role)
    }
}

/// A requested status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Submit,
    BeginReview,
    Approve,
    RequestRevision { reason: String },
    Reject { reason: String },
    Resubmit,
    StartImplementation,
    CloseOut,
    EmergencyBypass { justification: String },
}

impl Transition {
    /// Every trigger with a fixed source state, in table order.
    #[must_use]
    pub fn table() -> Vec<Self> {
        vec![
            Self::Submit,
            Self::BeginReview,
            Self::Approve,
            Self::RequestRevision {
                reason: String::from("needs rework"),
            },
            Self::Reject {
                reason: String::from("not justified"),
            },
            Self::Resubmit,
            Self::StartImplementation,
            Self::CloseOut,
        ]
    }

    /// Status the trigger must start from. `None` for the emergency bypass,
    /// which leaves every non-terminal state.
    #[must_use]
    pub const fn source(&self) -> Option<ChangeStatus> {
        match self {
            Self::Submit => Some(ChangeStatus::Draft),
            Self::BeginReview => Some(ChangeStatus::Submitted),
            Self::Approve | Self::RequestRevision { .. } | Self::Reject { .. } => {
                Some(ChangeStatus::UnderEvaluation)
            }
            Self::Resubmit => Some(ChangeStatus::UnderRevision),
            Self::StartImplementation => Some(ChangeStatus::Approved),
            Self::CloseOut => Some(ChangeStatus::Implementation),
            Self::EmergencyBypass { .. } => None,
        }
    }

    /// Status the record ends in.
    #[must_use]
    pub const fn target(&self) -> ChangeStatus {
        match self {
            Self::Submit | Self::Resubmit => ChangeStatus::Submitted,
            Self::BeginReview => ChangeStatus::UnderEvaluation,
            Self::Approve => ChangeStatus::Approved,
            Self::RequestRevision { .. } => ChangeStatus::UnderRevision,
            Self::Reject { .. } => ChangeStatus::Rejected,
            Self::StartImplementation | Self::EmergencyBypass { .. } => {
                ChangeStatus::Implementation
            }
            Self::CloseOut => ChangeStatus::Completed,
        }
    }

    /// Verb phrase used in error messages.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::BeginReview => "begin review",
            Self::Approve => "approve",
            Self::RequestRevision { .. } => "request revision",
            Self::Reject { .. } => "reject",
            Self::Resubmit => "resubmit",
            Self::StartImplementation => "start implementation",
            Self::CloseOut => "close out",
            Self::EmergencyBypass { .. } => "declare an emergency",
        }
    }

    fn reason(&self) -> Option<&str> {
        match self {
            Self::RequestRevision { reason } | Self::Reject { reason } => Some(reason),
            Self::EmergencyBypass { justification } => Some(justification),
            _ => None,
        }
    }
}

/// Editable draft fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impacts: Option<Impacts>,
}

impl DetailsUpdate {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.impacts.is_none()
    }
}

/// The change request state machine, parameterised by a `WorkflowPolicy`.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    policy: WorkflowPolicy,
}

impl Lifecycle {
    #[must_use]
    pub const fn new(policy: WorkflowPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &WorkflowPolicy {
        &self.policy
    }

    /// Apply a status transition.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the edge is not in the workflow table
    /// - `MissingReason` for revision, rejection, or emergency without text
    /// - `Validation` when submitting without title or description
    /// - `Unauthorized` when the actor's role cannot approve
    /// - `PreconditionFailed` when closing out with open `pre` tasks
    pub fn apply(
        &self,
        record: &ChangeRequest,
        transition: &Transition,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        let from = record.status;
        let to = transition.target();

        if let Transition::EmergencyBypass { justification } = transition {
            return Self::emergency_bypass_inner(record, justification, actor);
        }

        if transition.source() != Some(from) || !from.can_transition_to(to) {
            return Err(invalid_transition(record, to));
        }
        self.check_gate(record, transition, actor)?;

        let reason = transition.reason().map(|r| r.trim().to_string());
        let details = reason
            .clone()
            .unwrap_or_else(|| format!("Status changed from {from} to {to}"));

        let mut next = record.clone();
        next.status = to;
        let stamped = next
            .audit_log
            .record(
                &record.id,
                record.created_at,
                actor,
                AuditAction::StatusUpdate,
                details,
                Some(StatusChangedDetail { from, to, reason }),
            )
            .timestamp;
        next.updated_at = stamped;

        tracing::debug!(id = %next.id, %from, %to, actor = %actor.id, "change request transitioned");
        Ok(next)
    }

    fn check_gate(
        &self,
        record: &ChangeRequest,
        transition: &Transition,
        actor: &Actor,
    ) -> Result<(), LifecycleError> {
        match transition {
            Transition::Submit => {
                if record.title.trim().is_empty() {
                    return Err(LifecycleError::Validation(
                        "title must not be empty".into(),
                    ));
                }
                if record.description.trim().is_empty() {
                    return Err(LifecycleError::Validation(
                        "description must not be empty".into(),
                    ));
                }
            }
            Transition::Approve => {
                if !self.policy.can_approve(actor.role) {
                    return Err(LifecycleError::Unauthorized {
                        actor: actor.name.clone(),
                        role: actor.role,
                        action: transition.verb(),
                    });
                }
            }
            Transition::RequestRevision { reason } | Transition::Reject { reason } => {
                require_reason(reason, transition.verb())?;
            }
            Transition::CloseOut => {
                let open = record.open_pre_tasks();
                if self.policy.require_pre_tasks_for_close && open > 0 {
                    return Err(LifecycleError::PreconditionFailed(format!(
                        "{open} pre-implementation task(s) not done"
                    )));
                }
            }
            Transition::BeginReview
            | Transition::Resubmit
            | Transition::StartImplementation
            | Transition::EmergencyBypass { .. } => {}
        }
        Ok(())
    }

    fn emergency_bypass_inner(
        record: &ChangeRequest,
        justification: &str,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        let from = record.status;
        if from.is_terminal() {
            return Err(invalid_transition(record, ChangeStatus::Implementation));
        }
        let justification = require_reason(justification, "declare an emergency")?;

        let mut next = record.clone();
        next.status = ChangeStatus::Implementation;
        apply_emergency_override(&mut next);
        let stamped = next
            .audit_log
            .record(
                &record.id,
                record.created_at,
                actor,
                AuditAction::EmergencyOverride,
                justification,
                Some(StatusChangedDetail {
                    from,
                    to: ChangeStatus::Implementation,
                    reason: Some(justification.to_string()),
                }),
            )
            .timestamp;
        next.updated_at = stamped;

        tracing::warn!(id = %next.id, %from, actor = %actor.id, "emergency bypass applied");
        Ok(next)
    }

    /// `draft → submitted`.
    ///
    /// # Errors
    ///
    /// See [`Lifecycle::apply`].
    pub fn submit(
        &self,
        record: &ChangeRequest,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        self.apply(record, &Transition::Submit, actor)
    }

    /// `submitted → under_evaluation`.
    ///
    /// # Errors
    ///
    /// See [`Lifecycle::apply`].
    pub fn begin_review(
        &self,
        record: &ChangeRequest,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        self.apply(record, &Transition::BeginReview, actor)
    }

    /// `under_evaluation → approved`.
    ///
    /// # Errors
    ///
    /// See [`Lifecycle::apply`].
    pub fn approve(
        &self,
        record: &ChangeRequest,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        self.apply(record, &Transition::Approve, actor)
    }

    /// `under_evaluation → under_revision`.
    ///
    /// # Errors
    ///
    /// See [`Lifecycle::apply`].
    pub fn request_revision(
        &self,
        record: &ChangeRequest,
        reason: &str,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        let transition = Transition::RequestRevision {
            reason: reason.to_string(),
        };
        self.apply(record, &transition, actor)
    }

    /// `under_evaluation → rejected`.
    ///
    /// # Errors
    ///
    /// See [`Lifecycle::apply`].
    pub fn reject(
        &self,
        record: &ChangeRequest,
        reason: &str,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        let transition = Transition::Reject {
            reason: reason.to_string(),
        };
        self.apply(record, &transition, actor)
    }

    /// `under_revision → submitted`.
    ///
    /// # Errors
    ///
    /// See [`Lifecycle::apply`].
    pub fn resubmit(
        &self,
        record: &ChangeRequest,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        self.apply(record, &Transition::Resubmit, actor)
    }

    /// `approved → implementation`.
    ///
    /// # Errors
    ///
    /// See [`Lifecycle::apply`].
    pub fn start_implementation(
        &self,
        record: &ChangeRequest,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        self.apply(record, &Transition::StartImplementation, actor)
    }

    /// `implementation → completed`.
    ///
    /// # Errors
    ///
    /// See [`Lifecycle::apply`].
    pub fn close_out(
        &self,
        record: &ChangeRequest,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        self.apply(record, &Transition::CloseOut, actor)
    }

    /// Any non-terminal state straight to `implementation`, score pinned to 25.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` from a terminal state, `MissingReason` without a
    /// justification.
    pub fn emergency_bypass(
        &self,
        record: &ChangeRequest,
        justification: &str,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        let transition = Transition::EmergencyBypass {
            justification: justification.to_string(),
        };
        self.apply(record, &transition, actor)
    }

    /// Open an emergency fast-track record directly in `submitted`.
    ///
    /// # Errors
    ///
    /// `MissingReason` without a justification.
    pub fn file_emergency(
        &self,
        new: NewChangeRequest,
        justification: &str,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        let justification = require_reason(justification, "declare an emergency")?;
        let mut record = ChangeRequest::draft(new, actor);
        record.status = ChangeStatus::Submitted;
        apply_emergency_override(&mut record);
        let id = record.id.clone();
        let stamped = record
            .audit_log
            .record(
                &id,
                record.created_at,
                actor,
                AuditAction::EmergencyOverride,
                justification,
                Some(StatusChangedDetail {
                    from: ChangeStatus::Draft,
                    to: ChangeStatus::Submitted,
                    reason: Some(justification.to_string()),
                }),
            )
            .timestamp;
        record.updated_at = stamped;
        Ok(record)
    }

    /// Edit title, description, priority, or impacts while the author owns
    /// the record (`draft` or `under_revision`).
    ///
    /// # Errors
    ///
    /// `RecordClosed` for terminal records, `PreconditionFailed` outside the
    /// editable states, `Validation` for an empty update.
    pub fn edit_details(
        &self,
        record: &ChangeRequest,
        update: &DetailsUpdate,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        ensure_open(record)?;
        if !matches!(
            record.status,
            ChangeStatus::Draft | ChangeStatus::UnderRevision
        ) {
            return Err(LifecycleError::PreconditionFailed(format!(
                "details can only be edited in draft or under_revision, not {}",
                record.status
            )));
        }
        if update.is_empty() {
            return Err(LifecycleError::Validation("nothing to update".into()));
        }
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(LifecycleError::Validation("title must not be empty".into()));
        }
        if update
            .description
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            return Err(LifecycleError::Validation(
                "description must not be empty".into(),
            ));
        }

        let mut next = record.clone();
        let mut changed = Vec::new();
        if let Some(title) = &update.title {
            next.title.clone_from(title);
            changed.push("title");
        }
        if let Some(description) = &update.description {
            next.description.clone_from(description);
            changed.push("description");
        }
        if let Some(priority) = update.priority {
            next.priority = priority;
            changed.push("priority");
        }
        if let Some(impacts) = update.impacts {
            next.impacts = impacts;
            changed.push("impacts");
        }
        next.risk_score = risk::derive_score(&next);

        let stamped = next
            .audit_log
            .record(
                &record.id,
                record.created_at,
                actor,
                AuditAction::DetailsUpdated,
                format!("Updated {}", changed.join(", ")),
                None,
            )
            .timestamp;
        next.updated_at = stamped;
        Ok(next)
    }

    /// Attach a detailed P×S assessment; the record's score follows it.
    ///
    /// # Errors
    ///
    /// `Risk` for ratings outside `1..=5`, `RecordClosed` for terminal
    /// records, `PreconditionFailed` once an emergency override is in force.
    pub fn assess_risk(
        &self,
        record: &ChangeRequest,
        probability: i64,
        severity: i64,
        rationale: &str,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        ensure_open(record)?;
        if record.emergency_override {
            return Err(LifecycleError::PreconditionFailed(
                "risk is pinned by an emergency override".into(),
            ));
        }
        let assessment = RiskAssessment::new(probability, severity, rationale)?;
        let details = format!(
            "P{}×S{} = {} ({})",
            assessment.probability,
            assessment.severity,
            assessment.score,
            assessment.tier()
        );

        let mut next = record.clone();
        next.risk_assessment = Some(assessment);
        next.risk_score = risk::derive_score(&next);
        let stamped = next
            .audit_log
            .record(
                &record.id,
                record.created_at,
                actor,
                AuditAction::RiskAssessment,
                details,
                None,
            )
            .timestamp;
        next.updated_at = stamped;
        Ok(next)
    }

    /// Free-form comment. Allowed in every state, terminal ones included.
    ///
    /// # Errors
    ///
    /// `Validation` for empty text.
    pub fn add_comment(
        &self,
        record: &ChangeRequest,
        text: &str,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LifecycleError::Validation("comment must not be empty".into()));
        }
        let mut next = record.clone();
        let stamped = next
            .audit_log
            .record(
                &record.id,
                record.created_at,
                actor,
                AuditAction::Comment,
                text,
                None,
            )
            .timestamp;
        next.updated_at = stamped;
        Ok(next)
    }

    /// Add a checklist task in `to_do`.
    ///
    /// # Errors
    ///
    /// `RecordClosed` for terminal records, `Validation` for an empty title
    /// or a duplicate ID.
    pub fn add_task(
        &self,
        record: &ChangeRequest,
        task: NewTask,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        ensure_open(record)?;
        if task.title.trim().is_empty() {
            return Err(LifecycleError::Validation("task title must not be empty".into()));
        }
        if record.task(&task.id).is_some() {
            return Err(LifecycleError::Validation(format!(
                "task {} already exists",
                task.id
            )));
        }

        let details = format!("Added {} task \"{}\"", task.phase, task.title);
        let mut next = record.clone();
        next.tasks.push(Task::from(task));
        let stamped = next
            .audit_log
            .record(
                &record.id,
                record.created_at,
                actor,
                AuditAction::TaskUpdate,
                details,
                None,
            )
            .timestamp;
        next.updated_at = stamped;
        Ok(next)
    }

    /// Move a task along the task state machine.
    ///
    /// # Errors
    ///
    /// `RecordClosed`, `TaskNotFound`, or `InvalidTaskTransition`.
    pub fn set_task_status(
        &self,
        record: &ChangeRequest,
        task_id: &str,
        status: TaskStatus,
        actor: &Actor,
    ) -> Result<ChangeRequest, LifecycleError> {
        ensure_open(record)?;
        let mut next = record.clone();
        let task = next
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| LifecycleError::TaskNotFound {
                id: task_id.to_string(),
            })?;
        if !task.status.can_transition_to(status) {
            return Err(LifecycleError::InvalidTaskTransition {
                id: task_id.to_string(),
                from: task.status,
                to: status,
            });
        }
        let details = format!("Task \"{}\": {} → {}", task.title, task.status, status);
        task.set_status(status);

        let stamped = next
            .audit_log
            .record(
                &record.id,
                record.created_at,
                actor,
                AuditAction::TaskUpdate,
                details,
                None,
            )
            .timestamp;
        next.updated_at = stamped;
        Ok(next)
    }
}

fn invalid_transition(record: &ChangeRequest, to: ChangeStatus) -> LifecycleError {
    LifecycleError::InvalidTransition {
        id: record.id.clone(),
        from: record.status,
        to,
    }
}

fn require_reason<'a>(
    reason: &'a str,
    transition: &'static str,
) -> Result<&'a str, LifecycleError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(LifecycleError::MissingReason { transition });
    }
    Ok(reason)
}

fn ensure_open(record: &ChangeRequest) -> Result<(), LifecycleError> {
    if record.status.is_terminal() {
        return Err(LifecycleError::RecordClosed {
            id: record.id.clone(),
            status: record.status,
        });
    }
    Ok(())
}

/// The emergency override as a special case: flags forced, score pinned.
fn apply_emergency_override(record: &mut ChangeRequest) {
    record.emergency_override = true;
    record.impacts = Impacts::all();
    record.risk_score = risk::EMERGENCY_SCORE;
    debug_assert_eq!(record.risk_score, risk::derive_score(record));
}
