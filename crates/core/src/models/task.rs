//! Planning task entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::status::{Priority, TaskStatus};
use crate::types::{serde_date, Date, EntityId, Timestamp};

/// Upper bound of [`Task::progress`].
pub const MAX_PROGRESS: u8 = 100;

/// A scheduled piece of work on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub project_id: EntityId,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(with = "serde_date")]
    pub start_date: Date,
    #[serde(with = "serde_date")]
    pub end_date: Date,
    /// Planned length in days, as entered. Not derived from the dates.
    pub duration: u32,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub progress: u8,
    /// Ids of tasks this one waits on. Advisory only, never enforced.
    #[serde(default)]
    pub dependencies: Vec<EntityId>,
    pub created_at: Timestamp,
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_task_dates"))]
pub struct CreateTask {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "Project is required"))]
    pub project_id: EntityId,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(with = "serde_date")]
    pub start_date: Date,
    #[serde(with = "serde_date")]
    pub end_date: Date,
    #[validate(range(min = 1, message = "Duration must be at least one day"))]
    pub duration: u32,
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Priority,
    #[validate(range(max = 100, message = "Progress must be between 0 and 100"))]
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub dependencies: Vec<EntityId>,
}

fn validate_task_dates(input: &CreateTask) -> Result<(), ValidationError> {
    if input.end_date < input.start_date {
        let mut err = ValidationError::new("date_order");
        err.message = Some("End date must not be before start date".into());
        return Err(err);
    }
    Ok(())
}

/// DTO for updating an existing task. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTask {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<EntityId>,
    pub assigned_to: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[validate(range(min = 1, message = "Duration must be at least one day"))]
    pub duration: Option<u32>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    #[validate(range(max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: Option<u8>,
    pub dependencies: Option<Vec<EntityId>>,
}

impl Task {
    pub fn from_create(input: &CreateTask, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            title: input.title.trim().to_string(),
            description: input.description.clone(),
            project_id: input.project_id.clone(),
            assigned_to: input.assigned_to.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            duration: input.duration,
            status: input.status.unwrap_or(TaskStatus::Pending),
            priority: input.priority,
            progress: input.progress.min(MAX_PROGRESS),
            dependencies: input.dependencies.clone(),
            created_at: now,
        }
    }
}

impl UpdateTask {
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(project_id) = &self.project_id {
            task.project_id = project_id.clone();
        }
        if let Some(assigned_to) = &self.assigned_to {
            task.assigned_to = assigned_to.clone();
        }
        if let Some(start) = self.start_date {
            task.start_date = start;
        }
        if let Some(end) = self.end_date {
            task.end_date = end;
        }
        if let Some(duration) = self.duration {
            task.duration = duration;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(progress) = self.progress {
            task.progress = progress.min(MAX_PROGRESS);
        }
        if let Some(dependencies) = &self.dependencies {
            task.dependencies = dependencies.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create() -> CreateTask {
        CreateTask {
            title: "Fondations".into(),
            description: String::new(),
            project_id: "proj1".into(),
            assigned_to: "BTP Martin".into(),
            start_date: "2024-02-01".parse().unwrap(),
            end_date: "2024-03-15".parse().unwrap(),
            duration: 44,
            status: None,
            priority: Priority::Urgent,
            progress: 0,
            dependencies: vec![],
        }
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut input = create();
        input.duration = 0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn progress_above_hundred_is_rejected() {
        let mut input = create();
        input.progress = 101;
        assert!(input.validate().is_err());
    }

    #[test]
    fn defaults_to_pending() {
        let t = Task::from_create(&create(), "t1".into(), chrono::Utc::now());
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.priority, Priority::Urgent);
    }

    #[test]
    fn reads_legacy_record_with_french_values() {
        let json = r#"{
            "id": "task1",
            "title": "Gros œuvre",
            "description": "",
            "projectId": "proj1",
            "assignedTo": "BTP Martin",
            "startDate": "2024-01-15",
            "endDate": "2024-06-30",
            "duration": 167,
            "status": "en_cours",
            "priority": "faible",
            "progress": 65,
            "dependencies": [],
            "createdAt": "2024-01-15T10:00:00.000Z"
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.status, TaskStatus::InProgress);
        assert_eq!(t.priority, Priority::Low);
        assert_eq!(t.progress, 65);
    }
}
