//! Apartment (housing unit) entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::status::{ApartmentStatus, ApartmentType};
use crate::types::{EntityId, Timestamp};

/// A housing unit inside a block.
///
/// `project_id` duplicates the owning block's project so list views can
/// filter without a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    pub id: EntityId,
    pub block_id: EntityId,
    pub project_id: EntityId,
    pub number: String,
    #[serde(rename = "type")]
    pub kind: ApartmentType,
    pub surface: f64,
    pub status: ApartmentStatus,
    pub created_at: Timestamp,
}

/// DTO for creating a new apartment.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApartment {
    #[validate(length(min = 1, message = "Block is required"))]
    pub block_id: EntityId,
    #[validate(length(min = 1, message = "Project is required"))]
    pub project_id: EntityId,
    #[validate(length(min = 1, message = "Apartment number is required"))]
    pub number: String,
    #[serde(rename = "type")]
    pub kind: ApartmentType,
    #[validate(range(exclusive_min = 0.0, message = "Surface must be positive"))]
    pub surface: f64,
    /// Defaults to `free` if omitted.
    pub status: Option<ApartmentStatus>,
}

/// DTO for updating an existing apartment. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateApartment {
    #[validate(length(min = 1, message = "Apartment number must not be empty"))]
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ApartmentType>,
    #[validate(range(exclusive_min = 0.0, message = "Surface must be positive"))]
    pub surface: Option<f64>,
    pub status: Option<ApartmentStatus>,
}

impl Apartment {
    pub fn from_create(input: &CreateApartment, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            block_id: input.block_id.clone(),
            project_id: input.project_id.clone(),
            number: input.number.trim().to_string(),
            kind: input.kind,
            surface: input.surface,
            status: input.status.unwrap_or(ApartmentStatus::Free),
            created_at: now,
        }
    }
}

impl UpdateApartment {
    pub fn apply(&self, apartment: &mut Apartment) {
        if let Some(number) = &self.number {
            apartment.number = number.trim().to_string();
        }
        if let Some(kind) = self.kind {
            apartment.kind = kind;
        }
        if let Some(surface) = self.surface {
            apartment.surface = surface;
        }
        if let Some(status) = self.status {
            apartment.status = status;
        }
    }
}
