//! Reception (handover inspection) record.
//!
//! Receptions are built by [`crate::reception::build_reception`]; the only
//! user-editable field afterwards is the list of responsible parties.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{serde_date, Date, EntityId, Timestamp};

/// A handover inspection together with its generated PV text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reception {
    pub id: EntityId,
    pub project_id: EntityId,
    /// Set only when exactly one block was selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    #[serde(with = "serde_date")]
    pub date: Date,
    #[serde(default)]
    pub responsible_parties: Vec<String>,
    pub has_reserves: bool,
    pub reserve_count: usize,
    pub is_on_time: bool,
    pub delay_days: i64,
    pub pv_generated: bool,
    /// Number printed in the PV. Receptions from older backups lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv_number: Option<String>,
    pub pv_content: String,
    pub created_at: Timestamp,
}

/// Selection made on the reception form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReception {
    #[validate(length(min = 1, message = "Veuillez sélectionner un projet"))]
    pub project_id: EntityId,
    #[serde(default)]
    pub block_ids: Vec<EntityId>,
    pub category_id: Option<EntityId>,
    pub contractor_id: Option<EntityId>,
    #[serde(default)]
    pub responsible_parties: Vec<String>,
}

/// Edit of an existing reception.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateReception {
    pub responsible_parties: Option<Vec<String>>,
}

/// Split a comma separated list of parties, dropping blanks.
pub fn parse_parties(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

impl UpdateReception {
    pub fn apply(&self, reception: &mut Reception) {
        if let Some(parties) = &self.responsible_parties {
            reception.responsible_parties = parties
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }
    }
}
