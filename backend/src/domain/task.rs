//! Care tasks such as feeding, walks or medication reminders.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::validation::{FieldError, optional_text, required_text};
use super::{PetId, TaskId, UserId};

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 1000;

/// A to-do item owned by one user, optionally about one of their pets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub owner_id: UserId,
    pub pet_id: Option<PetId>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Apply a validated patch.
    pub fn apply(&mut self, patch: TaskPatch, at: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_at) = patch.due_at {
            self.due_at = due_at;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(pet_id) = patch.pet_id {
            self.pet_id = pet_id;
        }
        self.updated_at = at;
    }
}

/// List order: open tasks first, then by due time (undated last), then by
/// creation time.
#[must_use]
pub fn task_order(left: &Task, right: &Task) -> Ordering {
    left.completed
        .cmp(&right.completed)
        .then_with(|| match (left.due_at, right.due_at) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| left.created_at.cmp(&right.created_at))
}

/// Validated fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub pet_id: Option<PetId>,
}

impl TaskDraft {
    /// Validate raw task fields. Pet ownership is checked by the task service.
    pub fn try_from_parts(
        title: &str,
        description: Option<&str>,
        due_at: Option<DateTime<Utc>>,
        pet_id: Option<PetId>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            title: required_text("title", title, TITLE_MAX)?,
            description: optional_text("description", description, DESCRIPTION_MAX)?,
            due_at,
            pet_id,
        })
    }

    /// Materialise the task for `owner_id`.
    #[must_use]
    pub fn into_task(self, owner_id: UserId, at: DateTime<Utc>) -> Task {
        Task {
            id: TaskId::random(),
            owner_id,
            pet_id: self.pet_id,
            title: self.title,
            description: self.description,
            due_at: self.due_at,
            completed: false,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Validated task update. Outer `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_at: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
    pub pet_id: Option<Option<PetId>>,
}

/// Raw task update as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct TaskPatchInput<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub due_at: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
    pub pet_id: Option<Option<PetId>>,
}

impl TaskPatch {
    /// Validate a raw patch. An empty description clears it.
    pub fn try_new(input: TaskPatchInput<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            title: input
                .title
                .map(|value| required_text("title", value, TITLE_MAX))
                .transpose()?,
            description: input
                .description
                .map(|value| optional_text("description", Some(value), DESCRIPTION_MAX))
                .transpose()?,
            due_at: input.due_at,
            completed: input.completed,
            pet_id: input.pet_id,
        })
    }
}

/// Optional list filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub pet_id: Option<PetId>,
}

impl TaskFilter {
    /// Whether `task` passes the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.completed.is_none_or(|completed| task.completed == completed)
            && self.pet_id.is_none_or(|pet_id| task.pet_id == Some(pet_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn task(title: &str, due_in_hours: Option<i64>, completed: bool, created_offset: i64) -> Task {
        let mut task = TaskDraft::try_from_parts(
            title,
            None,
            due_in_hours.map(|hours| base() + Duration::hours(hours)),
            None,
        )
        .expect("valid draft")
        .into_task(UserId::random(), base() + Duration::minutes(created_offset));
        task.completed = completed;
        task
    }

    #[rstest]
    fn ordering_puts_open_dated_tasks_first() {
        let mut tasks = vec![
            task("done", Some(1), true, 0),
            task("undated", None, false, 0),
            task("later", Some(5), false, 0),
            task("sooner", Some(2), false, 0),
            task("undated-newer", None, false, 10),
        ];
        tasks.sort_by(task_order);
        let titles: Vec<_> = tasks.iter().map(|task| task.title.as_str()).collect();
        assert_eq!(
            titles,
            ["sooner", "later", "undated", "undated-newer", "done"]
        );
    }

    #[rstest]
    fn filter_by_completion_and_pet() {
        let pet = PetId::random();
        let mut walk = task("walk", None, false, 0);
        walk.pet_id = Some(pet);
        let filter = TaskFilter {
            completed: Some(false),
            pet_id: Some(pet),
        };
        assert!(filter.matches(&walk));
        assert!(!filter.matches(&task("other", None, false, 0)));
    }

    #[rstest]
    fn patch_marks_complete_and_clears_due() {
        let mut walk = task("walk", Some(3), false, 0);
        let patch = TaskPatch::try_new(TaskPatchInput {
            completed: Some(true),
            due_at: Some(None),
            ..TaskPatchInput::default()
        })
        .expect("valid patch");
        walk.apply(patch, base());
        assert!(walk.completed);
        assert_eq!(walk.due_at, None);
    }
}
