use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{TaskPhase, TaskStatus};

/// A checklist item on a change request.
///
/// `completed` mirrors `status == Done`; only `Task::set_status` changes
/// either field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub completed: bool,
    pub phase: TaskPhase,
}

impl Task {
    pub(crate) fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed = status == TaskStatus::Done;
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// Input for adding a task. The caller supplies the generated ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub id: String,
    pub title: String,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub phase: TaskPhase,
}

impl From<NewTask> for Task {
    fn from(new: NewTask) -> Self {
        Self {
            id: new.id,
            title: new.title,
            assignee: new.assignee,
            due_date: new.due_date,
            status: TaskStatus::ToDo,
            completed: false,
            phase: new.phase,
        }
    }
}
