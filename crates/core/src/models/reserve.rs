//! Reserve (punch-list defect) entity model and DTOs.
//!
//! Status changes do not go through [`UpdateReserve`]; see
//! [`crate::reserve_lifecycle`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::status::{Priority, ReserveStatus};
use crate::types::{Date, EntityId, Timestamp};

/// A defect raised against a project, optionally narrowed to a block and
/// apartment, owned by one category and one contractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reserve {
    pub id: EntityId,
    pub project_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment_id: Option<EntityId>,
    pub category_id: EntityId,
    pub contractor_id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Photos as data URIs, stored inline.
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ReserveStatus,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
}

/// DTO for raising a new reserve. Status is always `open` on creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReserve {
    #[validate(length(min = 1, message = "Project is required"))]
    pub project_id: EntityId,
    #[serde(default)]
    pub block_id: Option<EntityId>,
    #[serde(default)]
    pub apartment_id: Option<EntityId>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category_id: EntityId,
    #[validate(length(min = 1, message = "Contractor is required"))]
    pub contractor_id: EntityId,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
}

/// DTO for editing a reserve's descriptive fields.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateReserve {
    pub block_id: Option<Option<EntityId>>,
    pub apartment_id: Option<Option<EntityId>>,
    #[validate(length(min = 1, message = "Category must not be empty"))]
    pub category_id: Option<EntityId>,
    #[validate(length(min = 1, message = "Contractor must not be empty"))]
    pub contractor_id: Option<EntityId>,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub priority: Option<Priority>,
}

impl Reserve {
    pub fn from_create(input: &CreateReserve, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            project_id: input.project_id.clone(),
            block_id: non_empty(&input.block_id),
            apartment_id: non_empty(&input.apartment_id),
            category_id: input.category_id.clone(),
            contractor_id: input.contractor_id.clone(),
            title: input.title.trim().to_string(),
            description: input.description.clone(),
            images: input.images.clone(),
            status: ReserveStatus::Open,
            priority: input.priority,
            created_at: now,
            resolved_at: None,
            resolution_notes: None,
        }
    }

    /// Open or in progress.
    pub fn is_pending(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn is_urgent(&self) -> bool {
        self.priority == Priority::Urgent
    }

    /// Whole days elapsed since the reserve was raised.
    pub fn days_since_creation(&self, today: Date) -> i64 {
        (today - self.created_at.date_naive()).num_days()
    }
}

impl UpdateReserve {
    pub fn apply(&self, reserve: &mut Reserve) {
        if let Some(block_id) = &self.block_id {
            reserve.block_id = non_empty(block_id);
        }
        if let Some(apartment_id) = &self.apartment_id {
            reserve.apartment_id = non_empty(apartment_id);
        }
        if let Some(category_id) = &self.category_id {
            reserve.category_id = category_id.clone();
        }
        if let Some(contractor_id) = &self.contractor_id {
            reserve.contractor_id = contractor_id.clone();
        }
        if let Some(title) = &self.title {
            reserve.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            reserve.description = description.clone();
        }
        if let Some(images) = &self.images {
            reserve.images = images.clone();
        }
        if let Some(priority) = self.priority {
            reserve.priority = priority;
        }
    }
}

// Forms post "" for "no selection".
fn non_empty(id: &Option<EntityId>) -> Option<EntityId> {
    id.as_ref().filter(|s| !s.is_empty()).cloned()
}
