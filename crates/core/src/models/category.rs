//! Work category entity model and DTOs.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::types::{EntityId, Timestamp};

/// Colour used when a category is created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3B82F6";

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex colour pattern is valid"));

/// A trade / category of work (plumbing, electricity, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
}

/// DTO for updating an existing category. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCategory {
    #[validate(length(min = 1, message = "Category name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
}

/// Validate that a colour is in `#RRGGBB` form.
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR.is_match(color) {
        Ok(())
    } else {
        let mut err = ValidationError::new("hex_color");
        err.message = Some(format!("Invalid color '{color}'. Must be in #RRGGBB hex format").into());
        Err(err)
    }
}

impl Category {
    pub fn from_create(input: &CreateCategory, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            color: input
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
            created_at: now,
        }
    }
}

impl UpdateCategory {
    pub fn apply(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            category.description = description.clone();
        }
        if let Some(color) = &self.color {
            category.color = color.clone();
        }
    }
}
