//! Block (building / wing) entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{EntityId, Timestamp};

/// A building or wing belonging to one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new block.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlock {
    #[validate(length(min = 1, message = "Project is required"))]
    pub project_id: EntityId,
    #[validate(length(min = 1, message = "Block name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// DTO for updating an existing block. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateBlock {
    #[validate(length(min = 1, message = "Block name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Block {
    pub fn from_create(input: &CreateBlock, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            project_id: input.project_id.clone(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            created_at: now,
        }
    }
}

impl UpdateBlock {
    pub fn apply(&self, block: &mut Block) {
        if let Some(name) = &self.name {
            block.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            block.description = description.clone();
        }
    }
}
