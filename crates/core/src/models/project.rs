//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::status::ProjectStatus;
use crate::types::{serde_date, Date, EntityId, Timestamp};

/// A construction project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "serde_date")]
    pub start_date: Date,
    #[serde(with = "serde_date")]
    pub end_date: Date,
    pub status: ProjectStatus,
    pub created_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_project_dates"))]
pub struct CreateProject {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "serde_date")]
    pub start_date: Date,
    #[serde(with = "serde_date")]
    pub end_date: Date,
    /// Defaults to `pending` if omitted.
    pub status: Option<ProjectStatus>,
}

fn validate_project_dates(input: &CreateProject) -> Result<(), ValidationError> {
    if input.end_date < input.start_date {
        let mut err = ValidationError::new("date_order");
        err.message = Some("End date must not be before start date".into());
        return Err(err);
    }
    Ok(())
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProject {
    #[validate(length(min = 1, message = "Project name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: Option<ProjectStatus>,
}

impl Project {
    /// Build a new record from a validated create DTO.
    pub fn from_create(input: &CreateProject, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status.unwrap_or(ProjectStatus::Pending),
            created_at: now,
        }
    }

    /// Whole days left before the end date (negative once past).
    pub fn days_until_end(&self, today: Date) -> i64 {
        (self.end_date - today).num_days()
    }
}

impl UpdateProject {
    /// Apply the non-`None` fields to `project`.
    pub fn apply(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(start) = self.start_date {
            project.start_date = start;
        }
        if let Some(end) = self.end_date {
            project.end_date = end;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
    }
}
